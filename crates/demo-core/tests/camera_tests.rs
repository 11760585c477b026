// Host-side tests for the orbit camera controller.

use demo_core::camera::*;
use glam::{Vec3, Vec4};

const EPS: f32 = 1e-4;

fn assert_vec3_near(a: Vec3, b: Vec3, tol: f32) {
    assert!(
        (a - b).length() < tol,
        "expected {b:?}, got {a:?} (tol {tol})"
    );
}

#[test]
fn default_state_matches_reset_values() {
    let state = CameraState::default();
    assert_eq!(state.distance, 500.0);
    assert!((state.theta - std::f32::consts::FRAC_PI_4).abs() < EPS);
    assert!((state.phi - std::f32::consts::FRAC_PI_6).abs() < EPS);
    assert_eq!(state.target, Vec3::ZERO);
}

#[test]
fn phi_stays_clamped_under_any_drag_sequence() {
    let mut cam = OrbitCamera::new();
    cam.begin_drag(0.0, 0.0, DragMode::Rotate);
    // Sweep far past both poles in both directions.
    for step in 0..500 {
        let y = if step % 2 == 0 { 10_000.0 } else { -10_000.0 };
        cam.drag_to(step as f32, y);
        let phi = cam.state().phi;
        assert!(
            (MIN_PHI..=MAX_PHI).contains(&phi),
            "phi {phi} escaped clamp at step {step}"
        );
    }
}

#[test]
fn distance_stays_clamped_under_any_wheel_sequence() {
    let mut cam = OrbitCamera::new();
    for _ in 0..100 {
        cam.zoom(120.0);
        assert!(cam.state().distance <= MAX_DISTANCE);
    }
    assert_eq!(cam.state().distance, MAX_DISTANCE);
    for _ in 0..200 {
        cam.zoom(-120.0);
        assert!(cam.state().distance >= MIN_DISTANCE);
    }
    assert_eq!(cam.state().distance, MIN_DISTANCE);
}

#[test]
fn zoom_step_scales_with_current_distance() {
    let mut cam = OrbitCamera::with_state(CameraState {
        distance: 500.0,
        ..CameraState::default()
    });
    cam.zoom(1.0);
    assert!((cam.state().distance - 550.0).abs() < EPS);
    cam.zoom(-1.0);
    assert!((cam.state().distance - 495.0).abs() < EPS);
}

#[test]
fn zoom_with_zero_delta_is_a_no_op() {
    let mut cam = OrbitCamera::new();
    let before = cam.state();
    cam.zoom(0.0);
    assert_eq!(cam.state(), before);
}

#[test]
fn reset_restores_defaults_regardless_of_prior_state() {
    let mut cam = OrbitCamera::new();
    cam.begin_drag(0.0, 0.0, DragMode::Rotate);
    cam.drag_to(333.0, -777.0);
    cam.end_drag();
    cam.begin_drag(10.0, 10.0, DragMode::Pan);
    cam.drag_to(60.0, -40.0);
    cam.zoom(120.0);
    cam.zoom(120.0);

    cam.reset();
    assert_eq!(cam.state(), CameraState::default());
    assert_eq!(cam.mode(), DragMode::None);
}

#[test]
fn eye_position_on_the_x_axis_when_angles_are_zero() {
    let cam = OrbitCamera::with_state(CameraState {
        distance: 500.0,
        theta: 0.0,
        phi: 0.0,
        target: Vec3::ZERO,
    });
    assert_vec3_near(cam.eye_position(), Vec3::new(500.0, 0.0, 0.0), 1e-3);
}

#[test]
fn view_matrix_maps_eye_to_view_space_origin() {
    let cam = OrbitCamera::new();
    let m = cam.matrices(16.0 / 9.0);
    let eye_in_view = m.view * Vec4::new(m.position.x, m.position.y, m.position.z, 1.0);
    assert!(eye_in_view.truncate().length() < 1e-3, "got {eye_in_view:?}");
    assert!((eye_in_view.w - 1.0).abs() < EPS);
}

#[test]
fn view_projection_is_projection_times_view() {
    let cam = OrbitCamera::with_state(CameraState {
        distance: 777.0,
        theta: 1.3,
        phi: -0.4,
        target: Vec3::new(10.0, -5.0, 30.0),
    });
    let m = cam.matrices(1.5);
    let product = m.projection * m.view;
    let a = m.view_projection.to_cols_array();
    let b = product.to_cols_array();
    for (i, (x, y)) in a.iter().zip(b.iter()).enumerate() {
        assert!((x - y).abs() < EPS, "element {i}: {x} != {y}");
    }
}

#[test]
fn projection_uses_gl_clip_convention() {
    let cam = OrbitCamera::new();
    let p = cam.matrices(1.0).projection;
    let (n, f) = (Z_NEAR, Z_FAR);
    assert!((p.z_axis.z - (n + f) / (n - f)).abs() < EPS);
    assert!((p.w_axis.z - 2.0 * n * f / (n - f)).abs() < 1e-2);
}

#[test]
fn pan_with_zero_delta_leaves_target_unchanged() {
    let mut cam = OrbitCamera::new();
    cam.begin_drag(100.0, 100.0, DragMode::Pan);
    cam.drag_to(100.0, 100.0);
    assert_eq!(cam.state().target, Vec3::ZERO);
}

#[test]
fn pan_moves_target_along_the_camera_basis() {
    // theta = 0, phi = 0: right = (0, 0, -1), up = (0, 1, 0).
    let mut cam = OrbitCamera::with_state(CameraState {
        distance: 500.0,
        theta: 0.0,
        phi: 0.0,
        target: Vec3::ZERO,
    });
    cam.begin_drag(0.0, 0.0, DragMode::Pan);
    cam.drag_to(10.0, 0.0);
    let speed = 500.0 * PAN_DISTANCE_FACTOR;
    assert_vec3_near(cam.state().target, Vec3::new(0.0, 0.0, -10.0 * speed), 1e-3);

    cam.drag_to(10.0, 20.0);
    assert_vec3_near(
        cam.state().target,
        Vec3::new(0.0, 20.0 * speed, -10.0 * speed),
        1e-3,
    );
}

#[test]
fn pan_speed_scales_with_distance() {
    let mut near = OrbitCamera::with_state(CameraState {
        distance: 100.0,
        theta: 0.0,
        phi: 0.0,
        target: Vec3::ZERO,
    });
    let mut far = OrbitCamera::with_state(CameraState {
        distance: 1000.0,
        theta: 0.0,
        phi: 0.0,
        target: Vec3::ZERO,
    });
    for cam in [&mut near, &mut far] {
        cam.begin_drag(0.0, 0.0, DragMode::Pan);
        cam.drag_to(10.0, 0.0);
    }
    let ratio = far.state().target.length() / near.state().target.length();
    assert!((ratio - 10.0).abs() < 1e-3, "ratio {ratio}");
}

#[test]
fn rotation_ignores_input_while_not_dragging() {
    let mut cam = OrbitCamera::new();
    let before = cam.state();
    cam.drag_to(400.0, 300.0);
    assert_eq!(cam.state(), before);

    cam.begin_drag(0.0, 0.0, DragMode::Rotate);
    cam.end_drag();
    cam.drag_to(400.0, 300.0);
    assert_eq!(cam.state(), before);
}

#[test]
fn rotation_applies_sensitivity_per_pixel() {
    let mut cam = OrbitCamera::with_state(CameraState {
        theta: 1.0,
        phi: 0.2,
        ..CameraState::default()
    });
    cam.begin_drag(0.0, 0.0, DragMode::Rotate);
    cam.drag_to(40.0, -20.0);
    assert!((cam.state().theta - (1.0 - 40.0 * ROTATE_SENSITIVITY)).abs() < EPS);
    assert!((cam.state().phi - (0.2 - 20.0 * ROTATE_SENSITIVITY)).abs() < EPS);
}

#[test]
fn drag_mode_from_pointer_buttons() {
    assert_eq!(DragMode::from_pointer(0, false), DragMode::Rotate);
    assert_eq!(DragMode::from_pointer(2, false), DragMode::Pan);
    assert_eq!(DragMode::from_pointer(0, true), DragMode::Pan);
    assert_eq!(DragMode::from_pointer(1, false), DragMode::None);
}

#[test]
fn set_state_clamps_out_of_range_values() {
    let mut cam = OrbitCamera::new();
    cam.set_state(CameraState {
        distance: 1e9,
        theta: 0.0,
        phi: 10.0,
        target: Vec3::ZERO,
    });
    assert_eq!(cam.state().distance, MAX_DISTANCE);
    assert_eq!(cam.state().phi, MAX_PHI);
}
