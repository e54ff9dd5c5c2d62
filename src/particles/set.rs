//! 粒子集合
//!
//! SoA (Structure of Arrays) 布局：每个属性一个连续数组，演化器按索引原地修改。
//! 移除粒子使用 swap-remove 保持数组紧凑，因此粒子索引在移除后不稳定。

use glam::Vec3;

/// 粒子属性数组
#[derive(Debug, Clone, Default)]
pub struct ParticleSetData {
    /// 位置
    pub position: Vec<Vec3>,
    /// 速度
    pub velocity: Vec<Vec3>,
    /// 剩余生命（秒）
    pub lifetime: Vec<f32>,
    /// 初始生命（秒）
    pub initial_lifetime: Vec<f32>,
    /// 每个粒子的随机种子
    pub seed: Vec<u32>,
    /// 当前纹理动画帧（连续值）
    pub frame: Vec<f32>,
}

impl ParticleSetData {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            position: Vec::with_capacity(capacity),
            velocity: Vec::with_capacity(capacity),
            lifetime: Vec::with_capacity(capacity),
            initial_lifetime: Vec::with_capacity(capacity),
            seed: Vec::with_capacity(capacity),
            frame: Vec::with_capacity(capacity),
        }
    }

    /// 位置数组的字节视图，用于上传到 GPU 缓冲
    pub fn position_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.position)
    }

    /// 帧数组的字节视图
    pub fn frame_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.frame)
    }
}

/// 新粒子的初始属性
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleSpawn {
    pub position: Vec3,
    pub velocity: Vec3,
    pub lifetime: f32,
    pub seed: u32,
}

impl ParticleSpawn {
    pub fn new(position: Vec3, velocity: Vec3, lifetime: f32, seed: u32) -> Self {
        Self {
            position,
            velocity,
            lifetime,
            seed,
        }
    }
}

/// 粒子集合
#[derive(Debug, Clone)]
pub struct ParticleSet {
    data: ParticleSetData,
    capacity: usize,
}

impl ParticleSet {
    /// 创建新的粒子集合
    ///
    /// # 参数
    ///
    /// * `capacity` - 最大粒子数
    pub fn new(capacity: usize) -> Self {
        Self {
            data: ParticleSetData::with_capacity(capacity),
            capacity,
        }
    }

    /// 当前粒子数
    pub fn count(&self) -> usize {
        self.data.position.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }

    pub fn is_full(&self) -> bool {
        self.count() >= self.capacity
    }

    pub fn particles(&self) -> &ParticleSetData {
        &self.data
    }

    pub fn particles_mut(&mut self) -> &mut ParticleSetData {
        &mut self.data
    }

    /// 添加粒子
    ///
    /// 返回新粒子的索引；集合已满时返回 `None`。
    pub fn spawn(&mut self, spawn: ParticleSpawn) -> Option<usize> {
        if self.is_full() {
            return None;
        }

        let index = self.count();
        self.data.position.push(spawn.position);
        self.data.velocity.push(spawn.velocity);
        self.data.lifetime.push(spawn.lifetime);
        self.data.initial_lifetime.push(spawn.lifetime);
        self.data.seed.push(spawn.seed);
        self.data.frame.push(0.0);
        Some(index)
    }

    /// 一次分配最多 `count` 个默认粒子（零位置、零速度、零生命）
    ///
    /// 返回第一个新粒子的索引和实际分配数量，调用方随后填写属性。
    pub fn allocate(&mut self, count: usize) -> (usize, usize) {
        let start = self.count();
        let allocated = count.min(self.capacity.saturating_sub(start));
        let end = start + allocated;

        self.data.position.resize(end, Vec3::ZERO);
        self.data.velocity.resize(end, Vec3::ZERO);
        self.data.lifetime.resize(end, 0.0);
        self.data.initial_lifetime.resize(end, 0.0);
        self.data.seed.resize(end, 0);
        self.data.frame.resize(end, 0.0);
        (start, allocated)
    }

    /// 移除指定索引的粒子（swap-remove）
    ///
    /// 最后一个粒子会被移动到 `index`。
    pub fn free(&mut self, index: usize) -> bool {
        if index >= self.count() {
            return false;
        }

        self.data.position.swap_remove(index);
        self.data.velocity.swap_remove(index);
        self.data.lifetime.swap_remove(index);
        self.data.initial_lifetime.swap_remove(index);
        self.data.seed.swap_remove(index);
        self.data.frame.swap_remove(index);
        true
    }

    /// 移除所有生命耗尽的粒子，返回移除数量
    pub fn remove_dead(&mut self) -> usize {
        let mut removed = 0;
        let mut index = 0;
        while index < self.count() {
            if self.data.lifetime[index] <= 0.0 {
                self.free(index);
                removed += 1;
            } else {
                index += 1;
            }
        }
        removed
    }

    pub fn clear(&mut self) {
        self.data.position.clear();
        self.data.velocity.clear();
        self.data.lifetime.clear();
        self.data.initial_lifetime.clear();
        self.data.seed.clear();
        self.data.frame.clear();
    }
}

impl Default for ParticleSet {
    fn default() -> Self {
        Self::new(1000)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spawn_at(x: f32, lifetime: f32) -> ParticleSpawn {
        ParticleSpawn::new(Vec3::new(x, 0.0, 0.0), Vec3::ZERO, lifetime, x as u32)
    }

    #[test]
    fn test_spawn_respects_capacity() {
        let mut set = ParticleSet::new(2);
        assert_eq!(set.spawn(spawn_at(0.0, 1.0)), Some(0));
        assert_eq!(set.spawn(spawn_at(1.0, 1.0)), Some(1));
        assert_eq!(set.spawn(spawn_at(2.0, 1.0)), None);
        assert_eq!(set.count(), 2);
        assert!(set.is_full());
    }

    #[test]
    fn test_spawn_initializes_fields() {
        let mut set = ParticleSet::new(4);
        set.spawn(spawn_at(3.0, 2.5));

        let particles = set.particles();
        assert_eq!(particles.lifetime[0], 2.5);
        assert_eq!(particles.initial_lifetime[0], 2.5);
        assert_eq!(particles.seed[0], 3);
        assert_eq!(particles.frame[0], 0.0);
    }

    #[test]
    fn test_allocate_clamps_to_capacity() {
        let mut set = ParticleSet::new(5);
        set.spawn(spawn_at(1.0, 1.0));

        assert_eq!(set.allocate(3), (1, 3));
        assert_eq!(set.allocate(3), (4, 1));
        assert_eq!(set.allocate(1), (5, 0));
        assert_eq!(set.count(), 5);
        assert_eq!(set.particles().seed.len(), 5);
        assert_eq!(set.particles().lifetime[4], 0.0);
    }

    #[test]
    fn test_free_swaps_last_into_place() {
        let mut set = ParticleSet::new(8);
        for i in 0..3 {
            set.spawn(spawn_at(i as f32, 1.0));
        }

        assert!(set.free(0));
        assert!(!set.free(5));
        assert_eq!(set.count(), 2);
        assert_eq!(set.particles().position[0].x, 2.0);
        assert_eq!(set.particles().seed[0], 2);
    }

    #[test]
    fn test_remove_dead() {
        let mut set = ParticleSet::new(8);
        set.spawn(spawn_at(0.0, 0.0));
        set.spawn(spawn_at(1.0, 1.0));
        set.spawn(spawn_at(2.0, -0.5));
        set.spawn(spawn_at(3.0, 2.0));

        assert_eq!(set.remove_dead(), 2);
        assert_eq!(set.count(), 2);
        assert!(set.particles().lifetime.iter().all(|&l| l > 0.0));
    }

    #[test]
    fn test_byte_views() {
        let mut set = ParticleSet::new(4);
        set.spawn(spawn_at(1.0, 1.0));
        set.spawn(spawn_at(2.0, 1.0));
        assert_eq!(set.particles().position_bytes().len(), 2 * 12);
        assert_eq!(set.particles().frame_bytes().len(), 2 * 4);
    }
}
