pub mod camera;
pub mod constants;
pub mod filter;
pub mod solar;

pub static PLANETS_WGSL: &str = include_str!("../shaders/planets.wgsl");
pub static PARTICLES_WGSL: &str = include_str!("../shaders/particles.wgsl");
pub static ORBIT_LINES_WGSL: &str = include_str!("../shaders/orbit_lines.wgsl");
pub static PLANET_UPDATE_WGSL: &str = include_str!("../shaders/planet_update.wgsl");
pub static PARTICLE_UPDATE_WGSL: &str = include_str!("../shaders/particle_update.wgsl");
pub static FILTER_WGSL: &str = include_str!("../shaders/filter.wgsl");
pub static FILTER_PRESENT_WGSL: &str = include_str!("../shaders/filter_present.wgsl");
pub static DOUBLER_WGSL: &str = include_str!("../shaders/doubler.wgsl");

pub use camera::*;
pub use constants::*;
pub use filter::*;
pub use solar::*;
