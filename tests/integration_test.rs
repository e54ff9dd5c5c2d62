use bevy_ecs::prelude::*;
use glam::{IVec2, Vec3};
use scene_runtime::audio::*;
use scene_runtime::config::RuntimeConfig;
use scene_runtime::ecs::{Time, Transform};
use scene_runtime::math::{Plane, Rect2I};
use scene_runtime::particles::*;
use scene_runtime::physics::*;
use scene_runtime::resources::Handle;
use scene_runtime::scripting::{ColliderBindings, ScriptApi, ScriptResult, ScriptValue};
use scene_runtime::ui::*;
use std::sync::{Arc, Mutex};

fn approx(a: Vec3, b: Vec3) -> bool {
    (a - b).length() < 1e-4
}

fn scene_schedule() -> Schedule {
    let mut schedule = Schedule::default();
    schedule.add_systems(
        (
            attach_box_colliders_system,
            particle_system_update_system,
            audio_source_update_system,
            gui_widget_update_system,
        )
            .chain(),
    );
    schedule
}

/// 地面盒体顶面在 y = 0
fn ground() -> BoxCollider {
    BoxCollider::new(Vec3::new(10.0, 0.5, 10.0)).with_center(Vec3::new(0.0, -0.5, 0.0))
}

fn falling_particles(mode: ParticleCollisionMode) -> ParticleSystem {
    // 半径为 0 时平面模式的接触点与射线命中点一致
    let collisions = ParticleCollisions::new(ParticleCollisionsDesc {
        mode,
        radius: 0.0,
        ..Default::default()
    })
    .with_planes(vec![Plane::new(Vec3::Y, 0.0)]);

    let mut system = ParticleSystem::new(ParticleSystemSettings::default())
        .with_evolver(Box::new(collisions));
    system.spawn(ParticleSpawn::new(
        Vec3::new(0.0, 0.1, 0.0),
        Vec3::new(0.0, -4.0, 0.0),
        2.0,
        0,
    ));
    system
}

#[test]
fn test_particles_bounce_off_box_collider() {
    let mut world = World::new();
    world.insert_resource(Time::default());
    world.insert_resource(RuntimeConfig::default().physics.build_world());

    world.spawn(ground());
    let particles = world
        .spawn((Transform::default(), falling_particles(ParticleCollisionMode::World)))
        .id();

    let mut schedule = scene_schedule();
    world.resource_mut::<Time>().advance(0.05);
    schedule.run(&mut world);

    let system = world.get::<ParticleSystem>(particles).unwrap();
    let data = system.particles().particles();
    // 反射后按默认衰减 0.5 缩放
    assert!(approx(data.position[0], Vec3::new(0.0, 0.05, 0.0)));
    assert!(approx(data.velocity[0], Vec3::new(0.0, 2.0, 0.0)));
}

#[test]
fn test_world_and_plane_modes_agree() {
    let mut world = World::new();
    world.insert_resource(Time::default());
    world.insert_resource(PhysicsWorld::new());

    world.spawn(ground());
    let world_mode = world
        .spawn((Transform::default(), falling_particles(ParticleCollisionMode::World)))
        .id();
    let plane_mode = world
        .spawn((Transform::default(), falling_particles(ParticleCollisionMode::Plane)))
        .id();

    let mut schedule = scene_schedule();
    world.resource_mut::<Time>().advance(0.05);
    schedule.run(&mut world);

    let a = world.get::<ParticleSystem>(world_mode).unwrap().particles().particles().clone();
    let b = world.get::<ParticleSystem>(plane_mode).unwrap().particles().particles().clone();
    assert!(approx(a.position[0], b.position[0]));
    assert!(approx(a.velocity[0], b.velocity[0]));
}

#[test]
fn test_trigger_colliders_are_ignored_by_particles() {
    let mut world = World::new();
    world.insert_resource(Time::default());
    world.insert_resource(PhysicsWorld::new());

    world.spawn(ground().with_trigger(true));
    let particles = world
        .spawn((Transform::default(), falling_particles(ParticleCollisionMode::World)))
        .id();

    let mut schedule = scene_schedule();
    world.resource_mut::<Time>().advance(0.05);
    schedule.run(&mut world);

    let data = world.get::<ParticleSystem>(particles).unwrap().particles().particles().clone();
    assert!(approx(data.position[0], Vec3::new(0.0, -0.1, 0.0)));
}

#[test]
fn test_script_moves_collider_out_of_particle_path() {
    let mut world = World::new();
    world.insert_resource(Time::default());
    world.insert_resource(PhysicsWorld::new());
    let ground = world.spawn(ground()).id();

    let mut schedule = scene_schedule();
    schedule.run(&mut world);

    let world = Arc::new(Mutex::new(world));
    let mut api = ScriptApi::new();
    ColliderBindings::new(world.clone()).register_api(&mut api);

    let id = ScriptValue::Int(ground.to_bits() as i64);
    let result = api.call(
        "box_collider_set_center",
        &[id, ScriptValue::from_vec3(Vec3::new(0.0, -5.0, 0.0))],
    );
    assert_eq!(result, ScriptResult::Value(ScriptValue::Bool(true)));

    let mut world = world.lock().unwrap();
    let particles = world
        .spawn((Transform::default(), falling_particles(ParticleCollisionMode::World)))
        .id();
    world.resource_mut::<Time>().advance(0.05);
    schedule.run(&mut world);

    let data = world.get::<ParticleSystem>(particles).unwrap().particles().particles().clone();
    assert!(approx(data.position[0], Vec3::new(0.0, -0.1, 0.0)));
}

#[test]
fn test_config_drives_particle_settings() {
    let config = RuntimeConfig::from_toml_str(
        r#"
        [particles]
        max_particles = 4
        world_space = false

        [particles.collisions]
        mode = "world"
        dampening = 0.25
        "#,
    )
    .unwrap();
    config.validate().unwrap();

    let mut system = ParticleSystem::new(config.particles.system_settings(3))
        .with_evolver(Box::new(ParticleCollisions::new(config.particles.collisions)));
    assert_eq!(system.emit_burst(10, Vec3::ZERO, 1.0, 1.0), 4);
    assert!(!system.settings().world_space);
    assert_eq!(system.evolvers().next().map(|e| e.name()), Some("collisions"));
}

#[test]
fn test_audio_and_ui_components_update_in_schedule() {
    let mut world = World::new();
    world.insert_resource(Time::default());
    world.insert_resource(PhysicsWorld::new());

    let mut source = AudioSource::new().with_clip(Handle::loaded(AudioClip::new("loop", 1.0)));
    source.looping = true;
    source.play().unwrap();
    let audio = world.spawn(source).id();

    let mut widget = GuiWidgetComponent::new(GuiCamera::new("main", 320, 240));
    if let Some(widget) = widget.widget_mut() {
        widget.add_element(GuiElement::new("button", Rect2I::new(0, 0, 50, 20)));
    }
    let ui = world
        .spawn((Transform::from_translation(Vec3::new(100.0, 100.0, 0.0)), widget))
        .id();

    let mut schedule = scene_schedule();
    for _ in 0..3 {
        world.resource_mut::<Time>().advance(0.5);
        schedule.run(&mut world);
    }

    let source = world.get::<AudioSource>(audio).unwrap();
    assert!(source.is_playing());
    assert!((source.time() - 0.5).abs() < 1e-5);

    let widget = world.get::<GuiWidgetComponent>(ui).unwrap();
    assert!(widget.in_bounds(IVec2::new(120, 110)));
    assert!(!widget.in_bounds(IVec2::new(10, 10)));
}
