//! 几何与形状特征.
//!
//! 长度以毫米为单位. 退化几何 (零周长, 单体素候选等) 按 IEEE 语义给出 `inf` 或 `NaN`.

use std::f64::consts::PI;

use super::region::{count_foreground, NormalizedRegion};
use super::FeatureVector;
use crate::consts::slot;
use crate::data::{Candidate, Spacing};
use crate::toolbox::minkowski::{euler_number_3d, mean_breadth_3d, perimeter_2d, surface_area_3d};

/// 圆形度 `4πA / P²`. 对圆取 1.
#[inline]
fn compactness(area: f64, perimeter: f64) -> f64 {
    4.0 * PI * area / perimeter.powi(2)
}

/// 代表切片 (约减后掩膜) 上的二维几何特征.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Geometry2d {
    /// 面积 (mm²).
    pub area: f64,

    /// 包围盒宽高的较大者 (mm). 掩膜为空时为 `NaN`.
    pub max_extent: f64,

    /// 周长 (mm).
    pub perimeter: f64,

    /// 圆形度.
    pub compactness: f64,
}

impl Geometry2d {
    /// 计算 `region` 的二维几何特征.
    ///
    /// # 注意
    ///
    /// 像素周长只乘以列方向分辨率 `spacing.x`, 即假定平面内各向同性.
    pub fn compute(region: &NormalizedRegion, spacing: &Spacing) -> Self {
        let area = region.reduced_area() as f64 * spacing.slice_pixel();
        let max_extent = region.slice_bbox().map_or(f64::NAN, |b| {
            let width = b.w.len() as f64 * spacing.x;
            let height = b.h.len() as f64 * spacing.y;
            width.max(height)
        });
        let perimeter = perimeter_2d(region.reduced()) * spacing.x;
        Self {
            area,
            max_extent,
            perimeter,
            compactness: compactness(area, perimeter),
        }
    }

    /// 写入特征向量的 0..4 槽位.
    pub fn write_to(&self, v: &mut FeatureVector) {
        v.put(
            slot::AREA_2D,
            &[self.area, self.max_extent, self.perimeter, self.compactness],
        );
    }
}

/// 候选整体的三维几何特征, 以及未约减代表切片的圆形度.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Geometry3d {
    /// 体积 (mm³).
    pub volume: f64,

    /// 最大尺寸的一半与体素到中心均方根距离之比.
    pub radius_ratio: f64,

    /// 平面内最短边与最长边之比.
    pub elongation_2d: f64,

    /// 三维最短边与最长边之比.
    pub elongation_3d: f64,

    /// 表面紧致度 `S³ / (36π V²)`. 对球取 1.
    pub surface_compactness: f64,

    /// 平均宽度 (mm).
    pub mean_breadth: f64,

    /// 欧拉数.
    pub euler: f64,

    /// 未约减代表切片的圆形度 (像素单位).
    pub local_compactness: f64,
}

impl Geometry3d {
    /// 计算 `candidate` 的三维几何特征. `region` 必须由同一个候选归一化得到.
    pub fn compute(candidate: &Candidate, region: &NormalizedRegion, spacing: &Spacing) -> Self {
        let bbox = region.bbox();
        let volume = candidate.len() as f64 * spacing.voxel();

        let x_len = bbox.w.len() as f64 * spacing.x;
        let y_len = bbox.h.len() as f64 * spacing.y;
        let z_len = bbox.z.len() as f64 * spacing.z;
        let max_len = x_len.max(y_len).max(z_len);
        let min_len = x_len.min(y_len).min(z_len);

        // 行偏移乘 `x`, 列偏移乘 `y`. 平面内各向同性时与几何距离一致.
        let (cz, ch, cw) = (bbox.z.mid(), bbox.h.mid(), bbox.w.mid());
        let offset = |v: usize, c: usize, d: f64| (v as f64 - c as f64) * d;
        let sq_sum: f64 = candidate
            .voxels()
            .iter()
            .map(|&(z, h, w)| {
                offset(h, ch, spacing.x).powi(2)
                    + offset(w, cw, spacing.y).powi(2)
                    + offset(z, cz, spacing.z).powi(2)
            })
            .sum();
        let rms = (sq_sum / candidate.len() as f64).sqrt();

        let local = region.local_mask();
        let surface = surface_area_3d(local, spacing);

        let projected = region.projected();
        let local_compactness = compactness(
            count_foreground(projected) as f64,
            perimeter_2d(projected),
        );

        Self {
            volume,
            radius_ratio: max_len * 0.5 / rms,
            elongation_2d: x_len.min(y_len) / x_len.max(y_len),
            elongation_3d: min_len / max_len,
            surface_compactness: surface.powi(3) / (36.0 * PI * volume.powi(2)),
            mean_breadth: mean_breadth_3d(local, spacing),
            euler: euler_number_3d(local) as f64,
            local_compactness,
        }
    }

    /// 写入特征向量的 4..12 槽位.
    pub fn write_to(&self, v: &mut FeatureVector) {
        v.put(
            slot::VOLUME_3D,
            &[
                self.volume,
                self.radius_ratio,
                self.elongation_2d,
                self.elongation_3d,
                self.surface_compactness,
                self.mean_breadth,
                self.euler,
                self.local_compactness,
            ],
        );
    }
}
