//! Solar-system model: static scene data, the GPU-shared instance layouts,
//! particle seeding, and the CPU-side orbital trackers.
//!
//! Planet and particle positions are advanced on the GPU by the compute
//! shaders; the CPU keeps a mirror of the planet orbits because two things
//! cannot be fed back from GPU memory: the Saturn position uniform the ring
//! particles follow, and the satellite particles that re-parent to their
//! planet every frame.

use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use rand::Rng;
use std::f32::consts::TAU;

use crate::constants::RING_TILT;

#[derive(Clone, Copy, Debug)]
pub struct Satellite {
    pub name: &'static str,
    pub radius: f32,
    /// Distance from the parent planet.
    pub orbit_radius: f32,
    pub orbit_speed: f32,
    pub color: [f32; 3],
}

#[derive(Clone, Copy, Debug)]
pub struct Planet {
    pub name: &'static str,
    pub radius: f32,
    pub orbit_radius: f32,
    /// Angular velocity in rad/s at 1x time speed.
    pub orbit_speed: f32,
    pub color: [f32; 3],
    pub has_ring: bool,
    pub satellites: &'static [Satellite],
}

pub const SUN_RADIUS: f32 = 30.0;
pub const SUN_COLOR: [f32; 3] = [1.0, 0.9, 0.5];

// Sizes and distances are stylized; true ratios would be invisible.
pub const PLANETS: [Planet; 8] = [
    Planet {
        name: "Mercury",
        radius: 2.0,
        orbit_radius: 60.0,
        orbit_speed: 0.8,
        color: [0.7, 0.7, 0.7],
        has_ring: false,
        satellites: &[],
    },
    Planet {
        name: "Venus",
        radius: 4.0,
        orbit_radius: 90.0,
        orbit_speed: 0.6,
        color: [0.9, 0.8, 0.6],
        has_ring: false,
        satellites: &[],
    },
    Planet {
        name: "Earth",
        radius: 4.2,
        orbit_radius: 120.0,
        orbit_speed: 0.5,
        color: [0.2, 0.5, 0.9],
        has_ring: false,
        satellites: &[Satellite {
            name: "Moon",
            radius: 1.0,
            orbit_radius: 10.0,
            orbit_speed: 2.0,
            color: [0.8, 0.8, 0.8],
        }],
    },
    Planet {
        name: "Mars",
        radius: 3.0,
        orbit_radius: 160.0,
        orbit_speed: 0.4,
        color: [0.8, 0.4, 0.2],
        has_ring: false,
        satellites: &[],
    },
    Planet {
        name: "Jupiter",
        radius: 14.0,
        orbit_radius: 240.0,
        orbit_speed: 0.2,
        color: [0.8, 0.7, 0.5],
        has_ring: false,
        satellites: &[
            Satellite {
                name: "Io",
                radius: 1.2,
                orbit_radius: 22.0,
                orbit_speed: 3.0,
                color: [0.9, 0.8, 0.4],
            },
            Satellite {
                name: "Europa",
                radius: 1.0,
                orbit_radius: 28.0,
                orbit_speed: 2.5,
                color: [0.8, 0.8, 0.9],
            },
            Satellite {
                name: "Ganymede",
                radius: 1.5,
                orbit_radius: 36.0,
                orbit_speed: 2.0,
                color: [0.7, 0.7, 0.7],
            },
            Satellite {
                name: "Callisto",
                radius: 1.3,
                orbit_radius: 44.0,
                orbit_speed: 1.5,
                color: [0.5, 0.5, 0.5],
            },
        ],
    },
    Planet {
        name: "Saturn",
        radius: 12.0,
        orbit_radius: 340.0,
        orbit_speed: 0.15,
        color: [0.9, 0.85, 0.6],
        has_ring: true,
        satellites: &[Satellite {
            name: "Titan",
            radius: 1.5,
            orbit_radius: 35.0,
            orbit_speed: 1.8,
            color: [0.8, 0.7, 0.4],
        }],
    },
    Planet {
        name: "Uranus",
        radius: 7.0,
        orbit_radius: 440.0,
        orbit_speed: 0.1,
        color: [0.6, 0.85, 0.9],
        has_ring: false,
        satellites: &[],
    },
    Planet {
        name: "Neptune",
        radius: 6.5,
        orbit_radius: 540.0,
        orbit_speed: 0.08,
        color: [0.3, 0.5, 0.9],
        has_ring: false,
        satellites: &[],
    },
];

/// An annular particle field (Saturn's ring, the asteroid belt).
#[derive(Clone, Copy, Debug)]
pub struct RingParams {
    pub inner_radius: f32,
    pub outer_radius: f32,
    pub particle_count: usize,
    pub color: [f32; 4],
}

pub const SATURN_RING: RingParams = RingParams {
    inner_radius: 15.0,
    outer_radius: 28.0,
    particle_count: 20_000,
    color: [0.85, 0.8, 0.7, 0.6],
};

// Between Mars and Jupiter.
pub const ASTEROID_BELT: RingParams = RingParams {
    inner_radius: 180.0,
    outer_radius: 220.0,
    particle_count: 8_000,
    color: [0.5, 0.5, 0.5, 0.8],
};

#[derive(Clone, Copy, Debug)]
pub struct StarfieldParams {
    pub count: usize,
    pub min_distance: f32,
    pub max_distance: f32,
}

pub const BACKGROUND_STARS: StarfieldParams = StarfieldParams {
    count: 3_000,
    min_distance: 800.0,
    max_distance: 2000.0,
};

/// Sun plus the eight planets.
pub const PLANET_INSTANCE_COUNT: usize = 1 + PLANETS.len();

/// Index of the ringed planet in `PLANETS` (checked by tests).
pub const SATURN_INDEX: usize = 5;

// ===================== GPU-shared layouts =====================
//
// These mirror the WGSL structs; vec3 fields are 16-byte aligned in WGSL,
// hence the explicit padding.

#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct CameraUniforms {
    pub view_projection: [[f32; 4]; 4],
    pub camera_position: [f32; 3],
    pub _pad: f32,
}

#[repr(C)]
#[derive(Copy, Clone, Debug, Default, Pod, Zeroable)]
pub struct TimeUniforms {
    pub time: f32,
    pub delta_time: f32,
}

#[repr(C)]
#[derive(Copy, Clone, Debug, Default, Pod, Zeroable)]
pub struct PlanetInstance {
    pub position: [f32; 3],
    pub radius: f32,
    pub color: [f32; 3],
    pub _pad: f32,
}

#[repr(C)]
#[derive(Copy, Clone, Debug, Default, Pod, Zeroable)]
pub struct Particle {
    pub position: [f32; 3],
    pub size: f32,
    pub color: [f32; 4],
    pub orbit_center: [f32; 3],
    /// Zero means the particle is static (background stars).
    pub orbit_radius: f32,
    pub orbit_speed: f32,
    pub orbit_angle: f32,
    /// Ring particles store their vertical offset here; belt particles
    /// their vertical amplitude.
    pub orbit_tilt: f32,
    pub _pad: f32,
}

#[repr(C)]
#[derive(Copy, Clone, Debug, Default, Pod, Zeroable)]
pub struct PlanetOrbit {
    pub orbit_radius: f32,
    pub orbit_speed: f32,
    pub angle: f32,
    pub _pad: f32,
}

#[repr(C)]
#[derive(Copy, Clone, Debug, Default, Pod, Zeroable)]
pub struct OrbitLine {
    pub radius: f32,
    pub _pad: [f32; 3],
    pub color: [f32; 4],
}

/// Uniform telling the particle update pass which slice of the particle
/// buffer is Saturn's ring, and where Saturn currently is.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, Pod, Zeroable)]
pub struct ParticleParams {
    pub saturn_ring_start: u32,
    pub saturn_ring_end: u32,
    pub _pad0: [u32; 2],
    pub saturn_position: [f32; 3],
    pub _pad1: f32,
}

// ===================== Seeding =====================

pub fn initial_planet_instances() -> Vec<PlanetInstance> {
    let mut out = Vec::with_capacity(PLANET_INSTANCE_COUNT);
    out.push(PlanetInstance {
        position: [0.0, 0.0, 0.0],
        radius: SUN_RADIUS,
        color: SUN_COLOR,
        _pad: 0.0,
    });
    for p in &PLANETS {
        out.push(PlanetInstance {
            position: [p.orbit_radius, 0.0, 0.0],
            radius: p.radius,
            color: p.color,
            _pad: 0.0,
        });
    }
    out
}

/// Orbit state for the planet update pass: index 0 is the sun (inert),
/// planets start at a random angle.
pub fn initial_orbits(rng: &mut impl Rng) -> Vec<PlanetOrbit> {
    let mut out = Vec::with_capacity(PLANET_INSTANCE_COUNT);
    out.push(PlanetOrbit::default());
    for p in &PLANETS {
        out.push(PlanetOrbit {
            orbit_radius: p.orbit_radius,
            orbit_speed: p.orbit_speed,
            angle: rng.gen::<f32>() * TAU,
            _pad: 0.0,
        });
    }
    out
}

/// One faint circle per planet, tinted from the planet color.
pub fn orbit_line_instances() -> Vec<OrbitLine> {
    PLANETS
        .iter()
        .map(|p| OrbitLine {
            radius: p.orbit_radius,
            _pad: [0.0; 3],
            color: [p.color[0] * 0.4, p.color[1] * 0.4, p.color[2] * 0.4, 0.5],
        })
        .collect()
}

/// CPU-side tracker for one satellite particle.
#[derive(Clone, Copy, Debug)]
pub struct SatelliteTracker {
    /// Index of the parent planet in `PLANETS`.
    pub planet_index: usize,
    /// Index of this satellite in the particle buffer.
    pub particle_index: usize,
    pub orbit_radius: f32,
    pub orbit_speed: f32,
    pub angle: f32,
}

/// The seeded particle buffer plus the metadata the frame loop needs:
/// the Saturn-ring slice for the ring-follow uniform and the satellite
/// trackers (satellites occupy a contiguous slice right after the ring,
/// so their per-frame re-upload can be offset-ranged).
pub struct ParticleSet {
    pub particles: Vec<Particle>,
    pub satellites: Vec<SatelliteTracker>,
    pub saturn_ring_start: u32,
    pub saturn_ring_end: u32,
}

impl ParticleSet {
    pub fn satellite_range(&self) -> std::ops::Range<usize> {
        let start = self.saturn_ring_end as usize;
        start..start + self.satellites.len()
    }
}

pub fn seed_particles(rng: &mut impl Rng) -> ParticleSet {
    let satellite_count: usize = PLANETS.iter().map(|p| p.satellites.len()).sum();
    let total = SATURN_RING.particle_count
        + satellite_count
        + ASTEROID_BELT.particle_count
        + BACKGROUND_STARS.count;
    let mut particles = Vec::with_capacity(total);

    seed_saturn_ring(rng, &mut particles);
    let saturn_ring_end = particles.len() as u32;
    let satellites = seed_satellites(rng, &mut particles);
    seed_asteroid_belt(rng, &mut particles);
    seed_background_stars(rng, &mut particles);

    ParticleSet {
        particles,
        satellites,
        saturn_ring_start: 0,
        saturn_ring_end,
    }
}

fn seed_saturn_ring(rng: &mut impl Rng, out: &mut Vec<Particle>) {
    let saturn = &PLANETS[SATURN_INDEX];
    let (sin_tilt, cos_tilt) = RING_TILT.sin_cos();
    let span = SATURN_RING.outer_radius - SATURN_RING.inner_radius;

    for _ in 0..SATURN_RING.particle_count {
        let angle = rng.gen::<f32>() * TAU;
        // Quadratic bias packs more particles toward the inner edge.
        let t = rng.gen::<f32>();
        let radius = SATURN_RING.inner_radius + t * t * span;
        let thickness = (rng.gen::<f32>() - 0.5) * 1.5;

        let local_x = angle.cos() * radius;
        let local_y = thickness;
        let local_z = angle.sin() * radius;
        let tilted_y = local_y * cos_tilt - local_z * sin_tilt;
        let tilted_z = local_y * sin_tilt + local_z * cos_tilt;

        let normalized = (radius - SATURN_RING.inner_radius) / span;
        let brightness = 0.7 + normalized * 0.3;
        let alpha = 0.4 + (1.0 - normalized) * 0.4;

        out.push(Particle {
            position: [saturn.orbit_radius + local_x, tilted_y, tilted_z],
            size: 0.2 + rng.gen::<f32>() * 0.4 + (1.0 - normalized) * 0.3,
            color: [
                SATURN_RING.color[0] * brightness + (rng.gen::<f32>() - 0.5) * 0.15,
                SATURN_RING.color[1] * brightness + (rng.gen::<f32>() - 0.5) * 0.15,
                SATURN_RING.color[2] * brightness + (rng.gen::<f32>() - 0.5) * 0.1,
                alpha,
            ],
            orbit_center: [saturn.orbit_radius, 0.0, 0.0],
            orbit_radius: radius,
            orbit_speed: 0.3 + rng.gen::<f32>() * 0.4,
            orbit_angle: angle,
            orbit_tilt: thickness,
            _pad: 0.0,
        });
    }
}

fn seed_satellites(rng: &mut impl Rng, out: &mut Vec<Particle>) -> Vec<SatelliteTracker> {
    let mut trackers = Vec::new();
    for (planet_index, planet) in PLANETS.iter().enumerate() {
        for sat in planet.satellites {
            let angle = rng.gen::<f32>() * TAU;
            trackers.push(SatelliteTracker {
                planet_index,
                particle_index: out.len(),
                orbit_radius: sat.orbit_radius,
                orbit_speed: sat.orbit_speed,
                angle,
            });
            // Initial placement only; the trackers rewrite these each frame.
            out.push(Particle {
                position: [planet.orbit_radius + sat.orbit_radius, 0.0, 0.0],
                size: sat.radius,
                color: [sat.color[0], sat.color[1], sat.color[2], 1.0],
                orbit_center: [planet.orbit_radius, 0.0, 0.0],
                orbit_radius: sat.orbit_radius,
                orbit_speed: sat.orbit_speed,
                orbit_angle: angle,
                orbit_tilt: 0.0,
                _pad: 0.0,
            });
        }
    }
    trackers
}

fn seed_asteroid_belt(rng: &mut impl Rng, out: &mut Vec<Particle>) {
    let span = ASTEROID_BELT.outer_radius - ASTEROID_BELT.inner_radius;
    for _ in 0..ASTEROID_BELT.particle_count {
        let angle = rng.gen::<f32>() * TAU;
        let radius = ASTEROID_BELT.inner_radius + rng.gen::<f32>() * span;
        let tilt = (rng.gen::<f32>() - 0.5) * 4.0;
        let brightness = 0.7 + rng.gen::<f32>() * 0.5;
        out.push(Particle {
            position: [
                angle.cos() * radius,
                angle.sin() * tilt,
                angle.sin() * radius,
            ],
            size: 0.5 + rng.gen::<f32>(),
            color: [
                ASTEROID_BELT.color[0] * brightness,
                ASTEROID_BELT.color[1] * brightness,
                ASTEROID_BELT.color[2] * brightness,
                ASTEROID_BELT.color[3],
            ],
            orbit_center: [0.0, 0.0, 0.0],
            orbit_radius: radius,
            orbit_speed: 0.25 + rng.gen::<f32>() * 0.15,
            orbit_angle: angle,
            orbit_tilt: tilt,
            _pad: 0.0,
        });
    }
}

fn seed_background_stars(rng: &mut impl Rng, out: &mut Vec<Particle>) {
    let span = BACKGROUND_STARS.max_distance - BACKGROUND_STARS.min_distance;
    for _ in 0..BACKGROUND_STARS.count {
        let theta = rng.gen::<f32>() * TAU;
        let phi = (2.0 * rng.gen::<f32>() - 1.0).acos();
        let dist = BACKGROUND_STARS.min_distance + rng.gen::<f32>() * span;

        let x = dist * phi.sin() * theta.cos();
        let y = dist * phi.sin() * theta.sin();
        let z = dist * phi.cos();
        let brightness = 0.5 + rng.gen::<f32>() * 0.5;

        out.push(Particle {
            position: [x, y, z],
            size: 1.0 + rng.gen::<f32>() * 2.0,
            color: [brightness, brightness, brightness * 0.9, 1.0],
            orbit_center: [0.0, 0.0, 0.0],
            orbit_radius: 0.0,
            orbit_speed: 0.0,
            orbit_angle: 0.0,
            orbit_tilt: 0.0,
            _pad: 0.0,
        });
    }
}

// ===================== CPU orbital trackers =====================

/// CPU mirror of the planet orbits. Must advance with the same `dt` as the
/// GPU compute pass so the ring-follow uniform and the satellites stay in
/// step with the rendered planets.
pub struct SolarSim {
    orbits: Vec<PlanetOrbit>,
    positions: Vec<Vec3>,
    saturn_index: usize,
}

impl SolarSim {
    /// Build from the same initial orbit list that seeds the GPU buffer.
    /// `initial` includes the sun at index 0, which is skipped here.
    pub fn new(initial: &[PlanetOrbit]) -> Self {
        let orbits: Vec<PlanetOrbit> = initial.iter().skip(1).copied().collect();
        let positions = orbits
            .iter()
            .map(|o| Vec3::new(o.angle.cos() * o.orbit_radius, 0.0, o.angle.sin() * o.orbit_radius))
            .collect();
        Self {
            orbits,
            positions,
            saturn_index: SATURN_INDEX,
        }
    }

    pub fn step(&mut self, dt: f32) {
        for (orbit, pos) in self.orbits.iter_mut().zip(&mut self.positions) {
            orbit.angle += orbit.orbit_speed * dt;
            *pos = Vec3::new(
                orbit.angle.cos() * orbit.orbit_radius,
                0.0,
                orbit.angle.sin() * orbit.orbit_radius,
            );
        }
    }

    pub fn planet_positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn saturn_position(&self) -> Vec3 {
        self.positions[self.saturn_index]
    }

    /// Advance the satellite trackers and rewrite their particles so each
    /// stays on a circle around its (moving) parent planet.
    pub fn update_satellites(
        &self,
        satellites: &mut [SatelliteTracker],
        particles: &mut [Particle],
        dt: f32,
    ) {
        for sat in satellites {
            sat.angle += sat.orbit_speed * dt;
            let parent = self.positions[sat.planet_index];
            let p = &mut particles[sat.particle_index];
            p.position = [
                parent.x + sat.angle.cos() * sat.orbit_radius,
                0.0,
                parent.z + sat.angle.sin() * sat.orbit_radius,
            ];
            p.orbit_center = [parent.x, parent.y, parent.z];
            // Keep the GPU copy of the angle in step, so the compute pass
            // recomputes the same position it was just handed.
            p.orbit_angle = sat.angle;
        }
    }
}
