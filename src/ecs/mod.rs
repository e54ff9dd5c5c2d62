use bevy_ecs::prelude::*;
use glam::{Mat4, Quat, Vec3};
use std::hash::{Hash, Hasher};

#[derive(Component, Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub pos: Vec3,
    pub rot: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            pos: Vec3::ZERO,
            rot: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    pub fn from_translation(pos: Vec3) -> Self {
        Self {
            pos,
            ..Default::default()
        }
    }

    /// 局部到世界矩阵
    pub fn local_to_world(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rot, self.pos)
    }

    /// 世界到局部矩阵
    pub fn world_to_local(&self) -> Mat4 {
        self.local_to_world().inverse()
    }

    /// 变换内容的哈希值，内容不变时哈希不变
    ///
    /// 组件用它判断是否需要把变换推送给底层对象。
    pub fn transform_hash(&self) -> u32 {
        let mut hasher = std::collections::hash_map::DefaultHasher::new();
        for value in self
            .pos
            .to_array()
            .iter()
            .chain(self.rot.to_array().iter())
            .chain(self.scale.to_array().iter())
        {
            // -0.0 与 0.0 视为相同
            let value = if *value == 0.0 { 0.0f32 } else { *value };
            value.to_bits().hash(&mut hasher);
        }
        let hash = hasher.finish();
        (hash ^ (hash >> 32)) as u32
    }
}

#[derive(Resource)]
pub struct Time {
    pub delta_seconds: f32,
    pub elapsed_seconds: f64,
    pub fixed_time_step: f64,
}

impl Default for Time {
    fn default() -> Self {
        Self {
            delta_seconds: 0.0,
            elapsed_seconds: 0.0,
            fixed_time_step: 1.0 / 60.0,
        }
    }
}

impl Time {
    /// 推进一帧
    pub fn advance(&mut self, delta_seconds: f32) {
        self.delta_seconds = delta_seconds.max(0.0);
        self.elapsed_seconds += self.delta_seconds as f64;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transform_hash_is_stable() {
        let a = Transform::from_translation(Vec3::new(1.0, 2.0, 3.0));
        let b = Transform::from_translation(Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(a.transform_hash(), b.transform_hash());

        let c = Transform::from_translation(Vec3::new(1.0, 2.0, 3.5));
        assert_ne!(a.transform_hash(), c.transform_hash());
    }

    #[test]
    fn test_matrices_are_inverse() {
        let t = Transform {
            pos: Vec3::new(3.0, -1.0, 2.0),
            rot: Quat::from_rotation_y(0.7),
            scale: Vec3::splat(2.0),
        };
        let p = Vec3::new(0.5, 0.25, -4.0);
        let round_trip = t.world_to_local().transform_point3(t.local_to_world().transform_point3(p));
        assert!((round_trip - p).length() < 1e-4);
    }

    #[test]
    fn test_time_advance() {
        let mut time = Time::default();
        time.advance(0.5);
        time.advance(-1.0);
        assert_eq!(time.delta_seconds, 0.0);
        assert_eq!(time.elapsed_seconds, 0.5);
    }
}
