//! 平面

use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};

/// 平面表示（法向量和距离）
///
/// 满足 `normal · p = distance` 的点 `p` 位于平面上。
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Plane {
    /// 法向量（单位长度）
    pub normal: Vec3,
    /// 沿法线到原点的距离
    pub distance: f32,
}

impl Plane {
    /// 创建平面，法向量会被归一化
    pub fn new(normal: Vec3, distance: f32) -> Self {
        Self {
            normal: normal.normalize_or_zero(),
            distance,
        }
    }

    /// 从平面上一点和法向量创建平面
    pub fn from_point_normal(point: Vec3, normal: Vec3) -> Self {
        let normal = normal.normalize_or_zero();
        Self {
            normal,
            distance: normal.dot(point),
        }
    }

    /// 从三个点创建平面
    pub fn from_points(p0: Vec3, p1: Vec3, p2: Vec3) -> Self {
        let normal = (p1 - p0).cross(p2 - p0).normalize_or_zero();
        let distance = normal.dot(p0);
        Self { normal, distance }
    }

    /// 计算点到平面的有符号距离
    pub fn distance_to_point(&self, point: Vec3) -> f32 {
        self.normal.dot(point) - self.distance
    }

    /// 用仿射矩阵变换平面
    ///
    /// 法线使用逆转置矩阵变换，结果重新归一化，因此带缩放的矩阵也能得到正确的距离。
    pub fn transformed(&self, matrix: &Mat4) -> Self {
        let point_on_plane = self.normal * self.distance;
        let inverse_transpose = matrix.inverse().transpose();

        let normal = inverse_transpose.transform_vector3(self.normal);
        let length = normal.length();
        if length <= f32::EPSILON {
            return *self;
        }

        let normal = normal / length;
        let point = matrix.transform_point3(point_on_plane);
        Self {
            normal,
            distance: normal.dot(point),
        }
    }
}
