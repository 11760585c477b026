// Host-side tests for the solar-system model: data tables, seeding and the
// CPU-side orbital trackers.

use demo_core::solar::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::f32::consts::TAU;

fn rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

#[test]
fn planet_table_has_eight_planets_and_one_ring() {
    assert_eq!(PLANETS.len(), 8);
    let ringed: Vec<_> = PLANETS.iter().filter(|p| p.has_ring).collect();
    assert_eq!(ringed.len(), 1);
    assert_eq!(ringed[0].name, "Saturn");
    assert_eq!(PLANETS[SATURN_INDEX].name, "Saturn");
}

#[test]
fn orbit_radii_increase_outward() {
    for pair in PLANETS.windows(2) {
        assert!(
            pair[0].orbit_radius < pair[1].orbit_radius,
            "{} not inside {}",
            pair[0].name,
            pair[1].name
        );
    }
    // Outer planets orbit slower.
    for pair in PLANETS.windows(2) {
        assert!(pair[0].orbit_speed > pair[1].orbit_speed);
    }
}

#[test]
fn gpu_struct_layouts_match_wgsl() {
    assert_eq!(std::mem::size_of::<Particle>(), 64);
    assert_eq!(std::mem::size_of::<CameraUniforms>(), 80);
    assert_eq!(std::mem::size_of::<TimeUniforms>(), 8);
    assert_eq!(std::mem::size_of::<PlanetInstance>(), 32);
    assert_eq!(std::mem::size_of::<PlanetOrbit>(), 16);
    assert_eq!(std::mem::size_of::<OrbitLine>(), 32);
    assert_eq!(std::mem::size_of::<ParticleParams>(), 32);
}

#[test]
fn planet_instances_start_with_the_sun() {
    let instances = initial_planet_instances();
    assert_eq!(instances.len(), PLANET_INSTANCE_COUNT);
    assert_eq!(instances[0].radius, SUN_RADIUS);
    assert_eq!(instances[0].color, SUN_COLOR);
    assert_eq!(instances[0].position, [0.0, 0.0, 0.0]);
    // Planets begin on the +X axis at their orbit radius.
    for (inst, planet) in instances[1..].iter().zip(PLANETS.iter()) {
        assert_eq!(inst.position, [planet.orbit_radius, 0.0, 0.0]);
        assert_eq!(inst.radius, planet.radius);
    }
}

#[test]
fn initial_orbits_randomize_planet_angles_but_not_the_sun() {
    let orbits = initial_orbits(&mut rng());
    assert_eq!(orbits.len(), PLANET_INSTANCE_COUNT);
    assert_eq!(orbits[0].orbit_radius, 0.0);
    assert_eq!(orbits[0].orbit_speed, 0.0);
    for (orbit, planet) in orbits[1..].iter().zip(PLANETS.iter()) {
        assert_eq!(orbit.orbit_radius, planet.orbit_radius);
        assert_eq!(orbit.orbit_speed, planet.orbit_speed);
        assert!((0.0..TAU).contains(&orbit.angle));
    }
}

#[test]
fn orbit_lines_are_dimmed_planet_colors() {
    let lines = orbit_line_instances();
    assert_eq!(lines.len(), PLANETS.len());
    for (line, planet) in lines.iter().zip(PLANETS.iter()) {
        assert_eq!(line.radius, planet.orbit_radius);
        assert!((line.color[0] - planet.color[0] * 0.4).abs() < 1e-6);
        assert_eq!(line.color[3], 0.5);
    }
}

#[test]
fn seeded_particle_buffer_has_the_expected_layout() {
    let set = seed_particles(&mut rng());
    let satellite_count: usize = PLANETS.iter().map(|p| p.satellites.len()).sum();
    assert_eq!(satellite_count, 6);
    assert_eq!(
        set.particles.len(),
        SATURN_RING.particle_count
            + satellite_count
            + ASTEROID_BELT.particle_count
            + BACKGROUND_STARS.count
    );

    // Ring first, satellites in a contiguous slice right after.
    assert_eq!(set.saturn_ring_start, 0);
    assert_eq!(set.saturn_ring_end as usize, SATURN_RING.particle_count);
    let range = set.satellite_range();
    assert_eq!(range.start, SATURN_RING.particle_count);
    assert_eq!(range.len(), satellite_count);
    for (tracker, index) in set.satellites.iter().zip(range) {
        assert_eq!(tracker.particle_index, index);
    }
}

#[test]
fn ring_particles_stay_inside_the_annulus() {
    let set = seed_particles(&mut rng());
    for p in &set.particles[..set.saturn_ring_end as usize] {
        assert!(p.orbit_radius >= SATURN_RING.inner_radius);
        assert!(p.orbit_radius <= SATURN_RING.outer_radius);
        assert_eq!(p.orbit_center, [PLANETS[SATURN_INDEX].orbit_radius, 0.0, 0.0]);
        assert!(p.color[3] > 0.0 && p.color[3] <= 1.0);
    }
}

#[test]
fn belt_particles_stay_inside_the_annulus() {
    let set = seed_particles(&mut rng());
    let start = set.satellite_range().end;
    let end = start + ASTEROID_BELT.particle_count;
    for p in &set.particles[start..end] {
        assert!(p.orbit_radius >= ASTEROID_BELT.inner_radius);
        assert!(p.orbit_radius <= ASTEROID_BELT.outer_radius);
        assert_eq!(p.orbit_center, [0.0, 0.0, 0.0]);
    }
}

#[test]
fn background_stars_sit_on_the_distance_shell_and_never_move() {
    let set = seed_particles(&mut rng());
    let start = set.satellite_range().end + ASTEROID_BELT.particle_count;
    let stars = &set.particles[start..];
    assert_eq!(stars.len(), BACKGROUND_STARS.count);
    for p in stars {
        let dist = (p.position[0].powi(2) + p.position[1].powi(2) + p.position[2].powi(2)).sqrt();
        assert!(dist >= BACKGROUND_STARS.min_distance - 1e-3);
        assert!(dist <= BACKGROUND_STARS.max_distance + 1e-3);
        // orbit_radius == 0 marks them static for the update pass.
        assert_eq!(p.orbit_radius, 0.0);
    }
}

#[test]
fn sim_advances_angles_by_speed_times_dt() {
    let orbits = initial_orbits(&mut rng());
    let mut sim = SolarSim::new(&orbits);
    let before = orbits[1].angle;
    sim.step(0.5);
    let pos = sim.planet_positions()[0];
    let expected_angle = before + PLANETS[0].orbit_speed * 0.5;
    assert!((pos.x - expected_angle.cos() * PLANETS[0].orbit_radius).abs() < 1e-3);
    assert!((pos.z - expected_angle.sin() * PLANETS[0].orbit_radius).abs() < 1e-3);
    assert_eq!(pos.y, 0.0);
}

#[test]
fn saturn_position_tracks_its_orbit_radius() {
    let orbits = initial_orbits(&mut rng());
    let mut sim = SolarSim::new(&orbits);
    for _ in 0..100 {
        sim.step(0.1);
        let saturn = sim.saturn_position();
        let radius = (saturn.x * saturn.x + saturn.z * saturn.z).sqrt();
        assert!((radius - PLANETS[SATURN_INDEX].orbit_radius).abs() < 1e-2);
    }
}

#[test]
fn satellites_stay_on_a_circle_around_their_parent() {
    let mut rng = rng();
    let orbits = initial_orbits(&mut rng);
    let mut set = seed_particles(&mut rng);
    let mut sim = SolarSim::new(&orbits);

    for _ in 0..50 {
        sim.step(0.1);
        sim.update_satellites(&mut set.satellites, &mut set.particles, 0.1);

        for sat in &set.satellites {
            let parent = sim.planet_positions()[sat.planet_index];
            let p = &set.particles[sat.particle_index];
            let dx = p.position[0] - parent.x;
            let dz = p.position[2] - parent.z;
            let dist = (dx * dx + dz * dz).sqrt();
            assert!(
                (dist - sat.orbit_radius).abs() < 1e-2,
                "satellite {} drifted to {dist} (expected {})",
                sat.particle_index,
                sat.orbit_radius
            );
            assert_eq!(p.orbit_center, [parent.x, parent.y, parent.z]);
        }
    }
}

#[test]
fn seeding_is_deterministic_for_a_fixed_seed() {
    let a = seed_particles(&mut rng());
    let b = seed_particles(&mut rng());
    assert_eq!(a.particles.len(), b.particles.len());
    for (x, y) in a.particles.iter().zip(b.particles.iter()) {
        assert_eq!(x.position, y.position);
        assert_eq!(x.orbit_angle, y.orbit_angle);
    }
}
