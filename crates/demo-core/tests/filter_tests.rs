// Host-side tests for the image-filter parameters and pixel packing.

use demo_core::constants::{FILTER_IMAGE_HEIGHT, FILTER_IMAGE_WIDTH};
use demo_core::filter::*;

#[test]
fn filter_names_parse_to_their_kinds() {
    assert_eq!(FilterKind::from_name("none"), Ok(FilterKind::None));
    assert_eq!(FilterKind::from_name("grayscale"), Ok(FilterKind::Grayscale));
    assert_eq!(FilterKind::from_name("sepia"), Ok(FilterKind::Sepia));
    assert_eq!(FilterKind::from_name("invert"), Ok(FilterKind::Invert));
    assert_eq!(FilterKind::from_name("blur"), Ok(FilterKind::Blur));
}

#[test]
fn unknown_filter_name_is_an_error() {
    let err = FilterKind::from_name("posterize").unwrap_err();
    assert_eq!(err, FilterError::UnknownFilter("posterize".to_string()));
    assert_eq!(err.to_string(), "unknown filter 'posterize'");
}

#[test]
fn kernel_discriminants_are_stable() {
    // These are the switch values in filter.wgsl.
    assert_eq!(FilterKind::None.as_u32(), 0);
    assert_eq!(FilterKind::Grayscale.as_u32(), 1);
    assert_eq!(FilterKind::Sepia.as_u32(), 2);
    assert_eq!(FilterKind::Invert.as_u32(), 3);
    assert_eq!(FilterKind::Blur.as_u32(), 4);
}

#[test]
fn filter_params_layout_matches_wgsl() {
    assert_eq!(std::mem::size_of::<FilterParams>(), 16);
}

#[test]
fn rgba_packing_puts_red_in_the_low_byte() {
    let packed = pack_rgba(0x12, 0x34, 0x56, 0x78);
    assert_eq!(packed, 0x7856_3412);
    assert_eq!(unpack_rgba(packed), [0x12, 0x34, 0x56, 0x78]);
}

#[test]
fn packing_round_trips_whole_images() {
    let rgba: Vec<u8> = (0..=255u8).cycle().take(64 * 4).collect();
    let packed = pack_pixels(&rgba);
    assert_eq!(packed.len(), 64);
    assert_eq!(unpack_pixels(&packed), rgba);
}

#[test]
fn sample_image_has_the_right_shape_and_is_opaque() {
    let img = sample_image(FILTER_IMAGE_WIDTH, FILTER_IMAGE_HEIGHT);
    assert_eq!(
        img.len(),
        (FILTER_IMAGE_WIDTH * FILTER_IMAGE_HEIGHT * 4) as usize
    );
    for px in img.chunks_exact(4) {
        assert_eq!(px[3], 255);
    }
}

#[test]
fn sample_image_is_deterministic() {
    assert_eq!(sample_image(64, 48), sample_image(64, 48));
}

#[test]
fn sample_image_contains_its_shapes() {
    let img = sample_image(FILTER_IMAGE_WIDTH, FILTER_IMAGE_HEIGHT);
    let px = |x: u32, y: u32| {
        let i = ((y * FILTER_IMAGE_WIDTH + x) * 4) as usize;
        [img[i], img[i + 1], img[i + 2]]
    };
    // The circle center is brightened toward white.
    let circle = px(100, 100);
    assert!(circle.iter().all(|&c| c > 180), "circle not bright: {circle:?}");
    // The square is darker than the gradient just outside it.
    let inside = px(300, 130);
    let outside = px(300, 200);
    let sum = |p: [u8; 3]| p.iter().map(|&c| c as u32).sum::<u32>();
    assert!(
        sum(inside) < sum(outside),
        "square not darker: {inside:?} vs {outside:?}"
    );
}
