use drape_engine::bodies::{BodyAdapter, BodyId, ACTIVATION_GRACE_FRAMES};
use drape_engine::cloth::ClothBody;
use drape_engine::error::EngineError;
use drape_engine::math::{Vector2, Vector3};
use drape_engine::world::{PinMode, SimulationConfig, SimulationWorld};
use drape_engine::{Body, RigidBody2D, RigidShape};

const DT: f32 = 1.0 / 60.0;

fn zero_gravity_config() -> SimulationConfig {
    let mut config = SimulationConfig::default();
    config.gravity = Vector3::zero();
    config.pin_mode = PinMode::None;
    config
}

fn circle(id: u64, position: Vector2, config: &SimulationConfig) -> RigidBody2D {
    RigidBody2D::new(BodyId(id), RigidShape::Circle, position, 0.5, 0.5, config)
}

/// Builds a cloth and runs it until the sleep hysteresis trips
fn asleep_cloth(config: &SimulationConfig) -> ClothBody {
    let adapter = BodyAdapter::new(Vector2::new(2.0, 1.5), 1.0, 0.0);
    let mut cloth = ClothBody::new(BodyId(1), adapter, Vector2::new(1.0, 0.8), 6, 5, config);
    for _ in 0..(ACTIVATION_GRACE_FRAMES + config.sleep.frame_threshold) {
        cloth.update(DT);
    }
    assert!(cloth.is_sleeping());
    cloth
}

#[test]
fn test_duplicate_body_id_rejected() {
    let config = zero_gravity_config();
    let mut world = SimulationWorld::new(config.clone());

    world
        .add_body(Box::new(circle(1, Vector2::new(1.0, 1.0), &config)))
        .unwrap();
    let result = world.add_body(Box::new(circle(1, Vector2::new(2.0, 1.0), &config)));

    assert!(matches!(result, Err(EngineError::DuplicateBody(BodyId(1)))));
    assert_eq!(world.body_count(), 1);
}

#[test]
fn test_missing_body_lookup_errors() {
    let config = zero_gravity_config();
    let mut world = SimulationWorld::new(config);

    assert!(matches!(
        world.remove_body(BodyId(42)),
        Err(EngineError::BodyNotFound(BodyId(42)))
    ));
    assert!(matches!(
        world.body(BodyId(42)),
        Err(EngineError::BodyNotFound(BodyId(42)))
    ));
}

#[test]
fn test_remove_returns_the_body() {
    let config = zero_gravity_config();
    let mut world = SimulationWorld::new(config.clone());

    world
        .add_body(Box::new(circle(3, Vector2::new(1.0, 1.0), &config)))
        .unwrap();
    let removed = world.remove_body(BodyId(3)).unwrap();

    assert_eq!(removed.id(), BodyId(3));
    assert_eq!(world.body_count(), 0);
}

#[test]
fn test_step_skips_sleeping_bodies() {
    let mut config = zero_gravity_config();
    config.sleep.frame_threshold = 5;
    let mut cloth = asleep_cloth(&config);

    // restore gravity; a sleeping body must not feel it
    cloth.gravity_mut().set_base(Vector3::new(0.0, -9.81, 0.0));

    let mut world = SimulationWorld::new(config);
    world.add_body(Box::new(cloth)).unwrap();
    let before = world.get_snapshot()[0].clone();

    for _ in 0..60 {
        world.step(DT);
    }

    let after = world.get_snapshot()[0].clone();
    assert!(after.sleeping);
    assert_eq!(before.center, after.center);
}

#[test]
fn test_pointer_wakes_only_contained_sleepers() {
    let mut config = zero_gravity_config();
    config.sleep.frame_threshold = 5;
    let mut world = SimulationWorld::new(config.clone());
    world.add_body(Box::new(asleep_cloth(&config))).unwrap();

    world.notify_pointer(Vector2::new(0.1, 0.1));
    assert!(world.body(BodyId(1)).unwrap().is_sleeping());

    world.notify_pointer(Vector2::new(2.0, 1.5));
    assert!(!world.body(BodyId(1)).unwrap().is_sleeping());
}

#[test]
fn test_pointer_impulse_respects_broad_phase() {
    let config = zero_gravity_config();
    let mut world = SimulationWorld::new(config.clone());

    world
        .add_body(Box::new(circle(1, Vector2::new(1.0, 1.5), &config)))
        .unwrap();
    world
        .add_body(Box::new(circle(2, Vector2::new(3.0, 1.5), &config)))
        .unwrap();

    world.apply_pointer_impulse(Vector2::new(1.0, 1.5), Vector2::new(0.3, 0.0), 0.2);

    let hit = world.body(BodyId(1)).unwrap().velocity();
    let missed = world.body(BodyId(2)).unwrap().velocity();
    assert!(hit.x > 0.2);
    assert_eq!(missed, Vector2::zero());
}

#[test]
fn test_sweeping_mover_wakes_sleeping_body() {
    let config = zero_gravity_config();
    let mut world = SimulationWorld::new(config.clone());

    let mut mover = circle(1, Vector2::new(0.6, 1.5), &config);
    mover.set_linear_velocity(Vector2::new(0.5, 0.0));
    world.add_body(Box::new(mover)).unwrap();
    world
        .add_body(Box::new(circle(2, Vector2::new(2.6, 1.5), &config)))
        .unwrap();

    let mut resting_slept = false;
    let mut resting_rewoke = false;
    for _ in 0..400 {
        world.step(DT);
        let sleeping = world.body(BodyId(2)).unwrap().is_sleeping();
        if sleeping {
            resting_slept = true;
        } else if resting_slept {
            resting_rewoke = true;
            break;
        }
    }

    assert!(resting_slept, "the resting body never fell asleep");
    assert!(resting_rewoke, "the mover's bound never woke it");
}

#[test]
fn test_snapshots_are_independent_copies() {
    let config = zero_gravity_config();
    let mut world = SimulationWorld::new(config.clone());
    world
        .add_body(Box::new(circle(5, Vector2::new(1.0, 1.0), &config)))
        .unwrap();
    world
        .add_body(Box::new(circle(9, Vector2::new(3.0, 2.0), &config)))
        .unwrap();

    let mut snapshot = world.get_snapshot();
    assert_eq!(snapshot[0].id, BodyId(5));
    assert_eq!(snapshot[1].id, BodyId(9));

    snapshot[0].center = Vector2::new(-100.0, -100.0);
    let fresh = world.get_snapshot();
    assert_eq!(fresh[0].center, Vector2::new(1.0, 1.0));
}

#[test]
fn test_invalid_timestep_is_ignored() {
    let config = zero_gravity_config();
    let mut world = SimulationWorld::new(config.clone());
    let mut mover = circle(1, Vector2::new(1.0, 1.5), &config);
    mover.set_linear_velocity(Vector2::new(1.0, 0.0));
    world.add_body(Box::new(mover)).unwrap();

    let before = world.get_snapshot()[0].clone();
    world.step(-1.0);
    world.step(0.0);
    world.step(f32::NAN);

    assert_eq!(world.time(), 0.0);
    assert_eq!(world.get_snapshot()[0].center, before.center);
}
