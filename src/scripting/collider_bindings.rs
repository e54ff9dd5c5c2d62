use super::api::ScriptApi;
use super::system::{ScriptArgs, ScriptResult, ScriptValue};
use crate::core::{PhysicsResult, ScriptCallResult, ScriptError};
use crate::physics::{BoxCollider, PhysicsWorld};
use bevy_ecs::prelude::*;
use std::sync::{Arc, Mutex};

fn entity_from_bits(bits: u64) -> ScriptCallResult<Entity> {
    Entity::try_from_bits(bits).map_err(|_| ScriptError::EntityNotFound(bits))
}

fn component_missing(entity: Entity) -> ScriptError {
    ScriptError::ComponentNotFound {
        entity: entity.to_bits(),
        component: "BoxCollider".to_string(),
    }
}

/// 在 `PhysicsWorld` 资源可用时修改实体上的盒形碰撞体
fn with_box_collider<R>(
    world: &mut World,
    entity: Entity,
    f: impl FnOnce(&mut BoxCollider, &mut PhysicsWorld) -> PhysicsResult<R>,
) -> ScriptCallResult<R> {
    if world.get_entity(entity).is_none() {
        return Err(ScriptError::EntityNotFound(entity.to_bits()));
    }
    if !world.contains_resource::<PhysicsWorld>() {
        return Err(ScriptError::ResourceMissing("PhysicsWorld".to_string()));
    }

    world.resource_scope(|world, mut physics: Mut<PhysicsWorld>| {
        let mut collider = world
            .get_mut::<BoxCollider>(entity)
            .ok_or_else(|| component_missing(entity))?;
        Ok(f(&mut *collider, &mut *physics)?)
    })
}

fn read_box_collider<R>(
    world: &World,
    entity: Entity,
    f: impl FnOnce(&BoxCollider) -> R,
) -> ScriptCallResult<R> {
    if world.get_entity(entity).is_none() {
        return Err(ScriptError::EntityNotFound(entity.to_bits()));
    }
    world
        .get::<BoxCollider>(entity)
        .map(f)
        .ok_or_else(|| component_missing(entity))
}

/// 盒形碰撞体脚本绑定
///
/// 实体以 `Entity::to_bits` 的整数值传入，向量接受 `[x, y, z]` 或 `{x, y, z}`。
/// 设置函数返回值是否真正改变。
pub struct ColliderBindings {
    world: Arc<Mutex<World>>,
}

impl ColliderBindings {
    pub fn new(world: Arc<Mutex<World>>) -> Self {
        Self { world }
    }

    /// 注册碰撞体相关的脚本API
    pub fn register_api(&self, api: &mut ScriptApi) {
        self.register(api, "box_collider_set_extents", |world, args| {
            let args = ScriptArgs::new("box_collider_set_extents", "entity_id, extents", args);
            let entity = entity_from_bits(args.entity_bits(0)?)?;
            let extents = args.vec3(1)?;
            with_box_collider(world, entity, |collider, physics| {
                collider.set_extents(physics, extents)
            })
            .map(ScriptValue::Bool)
        });

        self.register(api, "box_collider_get_extents", |world, args| {
            let args = ScriptArgs::new("box_collider_get_extents", "entity_id", args);
            let entity = entity_from_bits(args.entity_bits(0)?)?;
            read_box_collider(world, entity, |collider| ScriptValue::from_vec3(collider.extents()))
        });

        self.register(api, "box_collider_set_center", |world, args| {
            let args = ScriptArgs::new("box_collider_set_center", "entity_id, center", args);
            let entity = entity_from_bits(args.entity_bits(0)?)?;
            let center = args.vec3(1)?;
            with_box_collider(world, entity, |collider, physics| {
                collider.set_center(physics, center)
            })
            .map(ScriptValue::Bool)
        });

        self.register(api, "box_collider_get_center", |world, args| {
            let args = ScriptArgs::new("box_collider_get_center", "entity_id", args);
            let entity = entity_from_bits(args.entity_bits(0)?)?;
            read_box_collider(world, entity, |collider| ScriptValue::from_vec3(collider.center()))
        });

        self.register(api, "box_collider_set_trigger", |world, args| {
            let args = ScriptArgs::new("box_collider_set_trigger", "entity_id, is_trigger", args);
            let entity = entity_from_bits(args.entity_bits(0)?)?;
            let is_trigger = args.bool(1)?;
            with_box_collider(world, entity, |collider, physics| {
                collider.set_trigger(physics, is_trigger)
            })
            .map(ScriptValue::Bool)
        });

        self.register(api, "box_collider_set_layer", |world, args| {
            let args = ScriptArgs::new("box_collider_set_layer", "entity_id, layer", args);
            let entity = entity_from_bits(args.entity_bits(0)?)?;
            let layer = args.u32(1)?;
            with_box_collider(world, entity, |collider, physics| {
                collider.set_layer(physics, layer)
            })
            .map(ScriptValue::Bool)
        });

        self.register(api, "box_collider_set_material", |world, args| {
            let args = ScriptArgs::new(
                "box_collider_set_material",
                "entity_id, friction, restitution",
                args,
            );
            let entity = entity_from_bits(args.entity_bits(0)?)?;
            let friction = args.f32(1)?;
            let restitution = args.f32(2)?;
            with_box_collider(world, entity, |collider, physics| {
                collider.set_material(physics, friction, restitution)
            })
            .map(ScriptValue::Bool)
        });
    }

    fn register<F>(&self, api: &mut ScriptApi, name: &'static str, func: F)
    where
        F: Fn(&mut World, &[ScriptValue]) -> ScriptCallResult<ScriptValue> + Send + Sync + 'static,
    {
        let world = Arc::clone(&self.world);
        api.register_function(name, move |args| {
            let result = world
                .lock()
                .map_err(|_| ScriptError::LockPoisoned)
                .and_then(|mut world| func(&mut world, args));

            match result {
                Ok(value) => ScriptResult::Value(value),
                Err(err) => {
                    tracing::warn!(target: "scripting", "{}() failed: {}", name, err);
                    ScriptResult::Error(err.to_string())
                }
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use rapier3d::prelude::{nalgebra, vector, RigidBodyBuilder};

    struct Fixture {
        api: ScriptApi,
        world: Arc<Mutex<World>>,
        entity: Entity,
    }

    fn fixture() -> Fixture {
        let mut world = World::new();
        let mut physics = PhysicsWorld::new();
        let body = physics.add_body(RigidBodyBuilder::dynamic().translation(vector![0.0, 1.0, 0.0]).build());
        let mut collider = BoxCollider::new(Vec3::splat(0.5));
        collider.attach(&mut physics, Some(body)).unwrap();

        world.insert_resource(physics);
        let entity = world.spawn(collider).id();

        let world = Arc::new(Mutex::new(world));
        let mut api = ScriptApi::new();
        ColliderBindings::new(world.clone()).register_api(&mut api);

        Fixture { api, world, entity }
    }

    fn id(entity: Entity) -> ScriptValue {
        ScriptValue::Int(entity.to_bits() as i64)
    }

    fn vec3(x: f64, y: f64, z: f64) -> ScriptValue {
        ScriptValue::Array(vec![
            ScriptValue::Float(x),
            ScriptValue::Float(y),
            ScriptValue::Float(z),
        ])
    }

    #[test]
    fn test_set_and_get_extents() {
        let fx = fixture();

        let result = fx.api.call("box_collider_set_extents", &[id(fx.entity), vec3(1.0, 2.0, 3.0)]);
        assert_eq!(result, ScriptResult::Value(ScriptValue::Bool(true)));

        let result = fx.api.call("box_collider_set_extents", &[id(fx.entity), vec3(1.0, 2.0, 3.0)]);
        assert_eq!(result, ScriptResult::Value(ScriptValue::Bool(false)));

        let extents = fx.api.call("box_collider_get_extents", &[id(fx.entity)]);
        assert_eq!(extents.value().and_then(ScriptValue::as_vec3), Some(Vec3::new(1.0, 2.0, 3.0)));

        // 底层碰撞体同步更新
        let world = fx.world.lock().unwrap();
        let handle = world.get::<BoxCollider>(fx.entity).unwrap().handle().unwrap();
        let physics = world.resource::<PhysicsWorld>();
        let cuboid = physics.collider(handle).unwrap().shape().as_cuboid().unwrap();
        assert_eq!(cuboid.half_extents.z, 3.0);
    }

    #[test]
    fn test_extents_clamped_through_script() {
        let fx = fixture();
        fx.api.call("box_collider_set_extents", &[id(fx.entity), vec3(0.0, 0.0, 0.0)]);

        let extents = fx.api.call("box_collider_get_extents", &[id(fx.entity)]);
        assert_eq!(extents.value().and_then(ScriptValue::as_vec3), Some(Vec3::splat(0.01)));
    }

    #[test]
    fn test_set_center_trigger_layer() {
        let fx = fixture();

        fx.api.call("box_collider_set_center", &[id(fx.entity), ScriptValue::from_vec3(Vec3::X)]);
        let center = fx.api.call("box_collider_get_center", &[id(fx.entity)]);
        assert_eq!(center.value().and_then(ScriptValue::as_vec3), Some(Vec3::X));

        let result = fx.api.call("box_collider_set_trigger", &[id(fx.entity), ScriptValue::Bool(true)]);
        assert_eq!(result, ScriptResult::Value(ScriptValue::Bool(true)));

        let result = fx.api.call("box_collider_set_layer", &[id(fx.entity), ScriptValue::Int(2)]);
        assert_eq!(result, ScriptResult::Value(ScriptValue::Bool(true)));

        let world = fx.world.lock().unwrap();
        let collider = world.get::<BoxCollider>(fx.entity).unwrap();
        assert!(collider.is_trigger());
        assert_eq!(collider.layer(), 2);
    }

    #[test]
    fn test_material() {
        let fx = fixture();
        let result = fx.api.call(
            "box_collider_set_material",
            &[id(fx.entity), ScriptValue::Float(0.9), ScriptValue::Int(1)],
        );
        assert_eq!(result, ScriptResult::Value(ScriptValue::Bool(true)));

        let world = fx.world.lock().unwrap();
        let collider = world.get::<BoxCollider>(fx.entity).unwrap();
        assert!((collider.friction() - 0.9).abs() < 1e-6);
        assert_eq!(collider.restitution(), 1.0);
    }

    #[test]
    fn test_invalid_arguments() {
        let fx = fixture();
        let result = fx.api.call("box_collider_set_extents", &[id(fx.entity)]);
        assert!(result.is_error());

        let result = fx.api.call("box_collider_set_layer", &[id(fx.entity), ScriptValue::Int(-4)]);
        assert!(result.is_error());
    }

    #[test]
    fn test_missing_component() {
        let fx = fixture();
        let other = fx.world.lock().unwrap().spawn_empty().id();

        let result = fx.api.call("box_collider_get_center", &[id(other)]);
        assert!(matches!(result, ScriptResult::Error(msg) if msg.contains("BoxCollider")));
    }

    #[test]
    fn test_missing_physics_world() {
        let fx = fixture();
        fx.world.lock().unwrap().remove_resource::<PhysicsWorld>();

        let result = fx.api.call("box_collider_set_trigger", &[id(fx.entity), ScriptValue::Bool(true)]);
        assert!(matches!(result, ScriptResult::Error(msg) if msg.contains("PhysicsWorld")));
    }
}
