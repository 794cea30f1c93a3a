use drape_engine::bodies::{Body, BodyAdapter, BodyId};
use drape_engine::cloth::ClothBody;
use drape_engine::collision::sat::{apply_restitution_friction, circle_aabb_push, obb_vs_aabb};
use drape_engine::collision::{BroadPhaseConfig, BroadPhaseMode, CollisionSystem};
use drape_engine::math::{Aabb, PixelRect, Vector2, Vector3};
use drape_engine::shapes::Obb;
use drape_engine::world::{PinMode, SimulationConfig, SimulationWorld};
use drape_engine::{RigidBody2D, RigidShape};

use approx::assert_relative_eq;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const DT: f32 = 1.0 / 60.0;

#[test]
fn test_sat_reports_separation() {
    let obb = Obb::new(Vector2::zero(), Vector2::new(1.0, 0.5), 0.0);
    let aabb = Aabb::new(Vector2::new(1.4, -0.2), Vector2::new(2.2, 0.2));

    let contact = obb_vs_aabb(&obb, &aabb);
    assert!(!contact.collided);
    assert_eq!(contact.depth, 0.0);
    assert_eq!(contact.mtv, Vector2::zero());
}

#[test]
fn test_sat_minimum_translation_vector() {
    // x overlap 0.2, y overlap 0.6; the minimum axis is the OBB's local x
    let obb = Obb::new(Vector2::zero(), Vector2::new(1.0, 0.5), 0.0);
    let aabb = Aabb::new(Vector2::new(0.8, -0.3), Vector2::new(1.6, 0.3));

    let contact = obb_vs_aabb(&obb, &aabb);
    assert!(contact.collided);
    assert_relative_eq!(contact.depth, 0.2, epsilon = 1.0e-5);
    // normal points from the AABB toward the OBB, which sits to the left
    assert_relative_eq!(contact.normal.x, -1.0, epsilon = 1.0e-5);
    assert_relative_eq!(contact.normal.y, 0.0, epsilon = 1.0e-5);
    assert_relative_eq!(contact.mtv.x, -0.2, epsilon = 1.0e-5);
    assert!(contact.mtv.x.abs() > contact.mtv.y.abs());
}

#[test]
fn test_sat_diagonal_axis_proves_separation() {
    // Both world-axis projections overlap, but the rotated box's own axis
    // separates the shapes; only a full SAT pass catches this.
    let aabb = Aabb::new(Vector2::new(0.0, 0.0), Vector2::new(1.0, 1.0));
    let obb = Obb::new(
        Vector2::new(1.5, 1.5),
        Vector2::new(0.5, 0.5),
        std::f32::consts::FRAC_PI_4,
    );

    let contact = obb_vs_aabb(&obb, &aabb);
    assert!(!contact.collided);
}

#[test]
fn test_circle_push_from_outside() {
    let aabb = Aabb::new(Vector2::new(0.0, 0.0), Vector2::new(2.0, 1.0));

    let push = circle_aabb_push(Vector2::new(2.3, 0.5), 0.5, &aabb).unwrap();
    assert_relative_eq!(push.x, 0.2, epsilon = 1.0e-5);
    assert_relative_eq!(push.y, 0.0, epsilon = 1.0e-5);

    assert!(circle_aabb_push(Vector2::new(3.0, 0.5), 0.5, &aabb).is_none());
}

#[test]
fn test_circle_push_from_inside_takes_shortest_exit() {
    let aabb = Aabb::new(Vector2::new(0.0, 0.0), Vector2::new(2.0, 1.0));

    // nearest face is the left one, radius included in the push depth
    let push = circle_aabb_push(Vector2::new(0.2, 0.5), 0.1, &aabb).unwrap();
    assert_relative_eq!(push.x, -0.3, epsilon = 1.0e-5);
    assert_relative_eq!(push.y, 0.0, epsilon = 1.0e-5);
}

#[test]
fn test_restitution_reflects_normal_component() {
    let velocity = Vector2::new(1.0, -2.0);
    let normal = Vector2::new(0.0, 1.0);

    let out = apply_restitution_friction(velocity, normal, 0.4, 0.0);
    assert_relative_eq!(out.x, 1.0, epsilon = 1.0e-5);
    assert_relative_eq!(out.y, 0.8, epsilon = 1.0e-5);
}

#[test]
fn test_friction_shrinks_tangential_component() {
    let velocity = Vector2::new(-2.0, 1.0);
    let normal = Vector2::new(1.0, 0.0);

    let out = apply_restitution_friction(velocity, normal, 0.5, 0.2);
    assert_relative_eq!(out.x, 1.0, epsilon = 1.0e-5);
    assert_relative_eq!(out.y, 0.8, epsilon = 1.0e-5);
}

#[test]
fn test_cloth_stays_inside_world_under_random_kicks() {
    let mut config = SimulationConfig::default();
    config.pin_mode = PinMode::None;
    let adapter = BodyAdapter::new(Vector2::new(2.0, 1.5), 1.0, 0.0);
    let mut cloth = ClothBody::new(BodyId(1), adapter, Vector2::new(1.0, 0.8), 6, 5, &config);

    let system = CollisionSystem::default();
    let bounds = system.world_bounds().expand(1.0e-4);

    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..240 {
        let point = Vector2::new(rng.gen_range(0.0..4.0), rng.gen_range(0.0..3.0));
        let kick = Vector2::new(rng.gen_range(-0.2..0.2), rng.gen_range(-0.2..0.2));
        cloth.apply_impulse(point, kick, 0.6);
        cloth.update(DT);
        system.apply(&mut cloth, config.collision_damping);

        for position in cloth.positions() {
            assert!(bounds.contains_point(position.xy()));
        }
    }
}

#[test]
fn test_rigid_circle_rests_on_obstacle() {
    let config = SimulationConfig::default();
    let mut world = SimulationWorld::new(config.clone());

    // a 60px strip along the bottom of the reference 1024x768 viewport
    world
        .collision_mut()
        .add_obstacle(1, PixelRect::new(0.0, 708.0, 1024.0, 60.0), 0.0);
    let floor_top = world.collision().obstacles()[0].shape.aabb().max.y;

    let ball = RigidBody2D::new(
        BodyId(2),
        RigidShape::Circle,
        Vector2::new(2.0, 1.5),
        0.5,
        0.5,
        &config,
    );
    world.add_body(Box::new(ball)).unwrap();

    for _ in 0..600 {
        world.step(DT);
    }

    let sphere = world.body(BodyId(2)).unwrap().bounding_sphere();
    assert_relative_eq!(sphere.center.y, floor_top + 0.25, epsilon = 0.05);
    assert_relative_eq!(sphere.center.x, 2.0, epsilon = 1.0e-3);
}

#[test]
fn test_rigid_box_pushed_out_of_rotated_obstacle() {
    let mut config = SimulationConfig::default();
    config.gravity = Vector3::zero();
    let mut world = SimulationWorld::new(config.clone());

    // rotated element near the middle of the reference viewport
    world
        .collision_mut()
        .add_obstacle(1, PixelRect::new(448.0, 320.0, 128.0, 128.0), 0.4);
    let obstacle_aabb = world.collision().obstacles()[0].shape.aabb();

    let mut block = RigidBody2D::new(
        BodyId(2),
        RigidShape::Box,
        obstacle_aabb.center(),
        0.3,
        0.3,
        &config,
    );
    block.set_linear_velocity(Vector2::new(0.0, -0.01));
    world.add_body(Box::new(block)).unwrap();

    for _ in 0..120 {
        world.step(DT);
    }

    // starting dead-center inside, the body must have been expelled
    let aabb = world.body(BodyId(2)).unwrap().aabb();
    let contact = obb_vs_aabb(
        &Obb::new(obstacle_aabb.center(), Vector2::new(0.25, 0.25), 0.4),
        &aabb,
    );
    assert!(contact.depth < 0.05);
}

#[test]
fn test_viewport_bounds_contain_rigid_body() {
    let config = SimulationConfig::default();
    let mut world = SimulationWorld::new(config.clone());

    let mut ball = RigidBody2D::new(
        BodyId(1),
        RigidShape::Circle,
        Vector2::new(0.5, 2.5),
        0.4,
        0.4,
        &config,
    );
    ball.set_linear_velocity(Vector2::new(-3.0, 0.0));
    world.add_body(Box::new(ball)).unwrap();

    let bounds = world.collision().world_bounds().expand(1.0e-4);
    for _ in 0..300 {
        world.step(DT);
        let sphere = world.body(BodyId(1)).unwrap().bounding_sphere();
        assert!(bounds.contains_point(sphere.center));
        assert!(sphere.center.x - sphere.radius >= bounds.min.x - 1.0e-3);
    }
}

#[test]
fn test_broad_phase_fat_aabb_is_looser_than_sphere() {
    let config = SimulationConfig::default();
    let mut ball = RigidBody2D::new(
        BodyId(1),
        RigidShape::Circle,
        Vector2::new(2.0, 1.5),
        0.5,
        0.5,
        &config,
    );
    ball.set_linear_velocity(Vector2::new(1.0, 0.0));

    let tight = BroadPhaseConfig {
        mode: BroadPhaseMode::Sphere,
        ..BroadPhaseConfig::default()
    };
    let fat = BroadPhaseConfig {
        mode: BroadPhaseMode::FatAabb,
        ..BroadPhaseConfig::default()
    };

    // a point just past the tight bound still falls inside the fat one
    let probe = Vector2::new(2.26, 1.5);
    assert!(!tight.fit(&ball).contains_point(probe));
    assert!(fat.fit(&ball).contains_point(probe));
}
