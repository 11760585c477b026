// Scene tuning shared between the Rust side and the WGSL shaders.

// Orbit-line geometry. Keep in sync with orbit_lines.wgsl.
pub const ORBIT_SEGMENTS: u32 = 128;
pub const ORBIT_LINE_WIDTH: f32 = 2.0;

// Saturn's ring plane tilt (radians, ~27 degrees). Keep in sync with
// particle_update.wgsl.
pub const RING_TILT: f32 = 0.47;

// Compute dispatch sizes. Keep in sync with the respective shaders.
pub const PARTICLE_WORKGROUP_SIZE: u32 = 64;
pub const PLANET_WORKGROUP_SIZE: u32 = 16;
pub const FILTER_WORKGROUP_SIZE: u32 = 64;

// Image filter canvas dimensions.
pub const FILTER_IMAGE_WIDTH: u32 = 512;
pub const FILTER_IMAGE_HEIGHT: u32 = 384;

// Time-speed slider: raw range 0..=200 maps to 0x..4x.
pub const TIME_SPEED_DIVISOR: f32 = 50.0;
