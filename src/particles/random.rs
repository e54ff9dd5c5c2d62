//! 确定性随机数生成器
//!
//! 同一种子总是产生同一序列，粒子用自身的种子派生子生成器来获得稳定的随机属性。

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[derive(Debug, Clone)]
pub struct Random {
    rng: StdRng,
}

impl Random {
    pub fn new(seed: u32) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed as u64),
        }
    }

    /// 重新设置种子
    pub fn set_seed(&mut self, seed: u32) {
        self.rng = StdRng::seed_from_u64(seed as u64);
    }

    pub fn next_u32(&mut self) -> u32 {
        self.rng.gen()
    }

    /// `[min, max)` 范围内的整数，`max <= min` 时返回 `min`
    pub fn range(&mut self, min: u32, max: u32) -> u32 {
        if max <= min {
            return min;
        }
        self.rng.gen_range(min..max)
    }

    /// `[0, 1)` 范围内的浮点数
    pub fn unit_float(&mut self) -> f32 {
        self.rng.gen::<f32>()
    }

    /// `[min, max)` 范围内的浮点数
    pub fn range_f32(&mut self, min: f32, max: f32) -> f32 {
        if max <= min {
            return min;
        }
        self.rng.gen_range(min..max)
    }
}

impl Default for Random {
    fn default() -> Self {
        Self::new(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_sequence() {
        let mut a = Random::new(42);
        let mut b = Random::new(42);
        for _ in 0..16 {
            assert_eq!(a.next_u32(), b.next_u32());
        }
    }

    #[test]
    fn test_range_is_half_open() {
        let mut random = Random::new(7);
        for _ in 0..1000 {
            let value = random.range(0, 3);
            assert!(value < 3);
        }
        assert_eq!(random.range(5, 5), 5);
        assert_eq!(random.range(5, 2), 5);
    }

    #[test]
    fn test_unit_float() {
        let mut random = Random::new(1);
        for _ in 0..1000 {
            let value = random.unit_float();
            assert!((0.0..1.0).contains(&value));
        }
        assert_eq!(random.range_f32(2.0, 1.0), 2.0);
    }
}
