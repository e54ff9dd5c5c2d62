use bevy_ecs::prelude::*;
use glam::Vec3;
use scene_runtime::config::RuntimeConfig;
use scene_runtime::core::init_logging;
use scene_runtime::ecs::{Time, Transform};
use scene_runtime::particles::{
    particle_system_update_system, ParticleCollisionMode, ParticleCollisions, ParticleSystem,
};
use scene_runtime::physics::{attach_box_colliders_system, physics_step_system, BoxCollider};

const FRAMES: usize = 120;

fn main() {
    let mut config = RuntimeConfig::load_or_default();
    config.apply_env_overrides();
    init_logging(&config.logging);

    if let Err(e) = config.validate() {
        eprintln!("Invalid configuration: {}", e);
        std::process::exit(1);
    }

    let mut world = World::new();
    world.insert_resource(Time::default());
    world.insert_resource(config.physics.build_world());

    // 静态地面，没有刚体时 center 即世界位置
    world.spawn(
        BoxCollider::new(Vec3::new(10.0, 0.5, 10.0))
            .with_center(Vec3::new(0.0, -0.5, 0.0))
            .with_layer(config.physics.default_layer),
    );

    let mut collisions = config.particles.collisions;
    collisions.mode = ParticleCollisionMode::World;
    let mut settings = config.particles.system_settings(7);
    settings.gravity = config.physics.gravity;
    let mut particles = ParticleSystem::new(settings)
        .with_evolver(Box::new(ParticleCollisions::new(collisions)));
    particles.emit_burst(64, Vec3::new(0.0, 3.0, 0.0), 2.0, 4.0);
    world.spawn((Transform::default(), particles));

    let mut schedule = Schedule::default();
    schedule.add_systems(
        (
            attach_box_colliders_system,
            physics_step_system,
            particle_system_update_system,
        )
            .chain(),
    );

    let dt = config.physics.fixed_time_step;
    for _ in 0..FRAMES {
        world.resource_mut::<Time>().advance(dt);
        schedule.run(&mut world);
    }

    let mut query = world.query::<&ParticleSystem>();
    for system in query.iter(&world) {
        tracing::info!(target: "particles", "{} particles alive after {} frames", system.particles().count(), FRAMES);
    }
}
