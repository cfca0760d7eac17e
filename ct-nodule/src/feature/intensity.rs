//! 强度统计特征与图像矩.
//!
//! 输入扫描应已做全局 z-score 归一化. 所有累加都以 `f64` 进行.

use itertools::iproduct;

use super::region::NormalizedRegion;
use super::FeatureVector;
use crate::consts::gray::{is_background, is_foreground};
use crate::consts::slot;
use crate::data::NoduleScan;
use crate::toolbox::moments::{self, Moments};

/// 归一化对比度 `(inside - outside) / (inside + outside)`.
#[inline]
fn contrast(inside: f64, outside: f64) -> f64 {
    (inside - outside) / (inside + outside)
}

/// 代表切片上的二维强度特征.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Intensity2d {
    /// 掩膜内最小强度. 掩膜为空时为 `+inf`.
    pub min: f64,

    /// 掩膜内与外环的归一化对比度.
    pub contrast: f64,

    /// 掩膜内标准差.
    pub std_dev: f64,

    /// 掩膜内偏度.
    pub skewness: f64,

    /// 掩膜内峰度.
    pub kurtosis: f64,

    /// `m01 / m00`.
    pub m01_ratio: f64,

    /// `m10 / m00`.
    pub m10_ratio: f64,

    /// `m11 / m00`.
    pub m11_ratio: f64,

    /// `m12 / m00`.
    pub m12_ratio: f64,

    /// `m00`.
    pub m00: f64,
}

/// 以强度为权重的原始图像矩.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
struct RawMoments {
    m00: f64,
    m01: f64,
    m10: f64,
    m11: f64,
    m12: f64,
}

impl Intensity2d {
    /// 计算代表切片上约减后掩膜的强度特征.
    ///
    /// 外环为约减后掩膜的包围盒向外扩张 `margin` 个像素 (截断到切片范围内) 再去掉掩膜本身.
    /// 外环为空时对比度为 `NaN`.
    pub fn compute(scan: &NoduleScan, region: &NormalizedRegion, margin: usize) -> Self {
        let slice = scan.slice_at(region.mid_z());
        let (rows, cols) = slice.dim();
        let mask = region.reduced();

        let inside: Vec<(usize, usize)> = mask
            .indexed_iter()
            .filter(|(_, p)| is_foreground(**p))
            .map(|(pos, _)| pos)
            .collect();
        let sample: Vec<f64> = inside.iter().map(|&pos| slice[pos] as f64).collect();
        let stats = Moments::of(&sample);

        let mut ring = Vec::new();
        if let Some(b) = region.slice_bbox() {
            if let (Some(hs), Some(ws)) = (
                b.h.expand_clipped(margin, rows),
                b.w.expand_clipped(margin, cols),
            ) {
                ring.extend(
                    iproduct!(hs.min..=hs.max, ws.min..=ws.max)
                        .filter(|&pos| is_background(mask[pos]))
                        .map(|pos| slice[pos] as f64),
                );
            }
        }

        // 行坐标列表与列坐标列表做笛卡尔积, 而不是逐像素累加.
        let mut m = RawMoments::default();
        for (&(u, _), &(_, v)) in iproduct!(inside.iter(), inside.iter()) {
            let (x, y) = ((u + 1) as f64, (v + 1) as f64);
            let p = slice[(u, v)] as f64;
            m.m00 += p;
            m.m01 += y * p;
            m.m10 += x * p;
            m.m11 += x * y * p;
            m.m12 += x * y * y * p;
        }

        Self {
            min: stats.min,
            contrast: contrast(stats.mean, moments::mean(&ring)),
            std_dev: stats.std_dev,
            skewness: stats.skewness,
            kurtosis: stats.kurtosis,
            m01_ratio: m.m01 / m.m00,
            m10_ratio: m.m10 / m.m00,
            m11_ratio: m.m11 / m.m00,
            m12_ratio: m.m12 / m.m00,
            m00: m.m00,
        }
    }

    /// 写入特征向量的 12..22 槽位.
    pub fn write_to(&self, v: &mut FeatureVector) {
        v.put(
            slot::MIN_INTENSITY_2D,
            &[
                self.min,
                self.contrast,
                self.std_dev,
                self.skewness,
                self.kurtosis,
                self.m01_ratio,
                self.m10_ratio,
                self.m11_ratio,
                self.m12_ratio,
                self.m00,
            ],
        );
    }
}

/// 候选整体的三维强度特征.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Intensity3d {
    /// 候选体素最小强度.
    pub min: f64,

    /// 候选与外环的归一化对比度.
    pub contrast: f64,

    /// 候选体素标准差.
    pub std_dev: f64,

    /// 候选体素偏度.
    pub skewness: f64,

    /// 候选体素峰度.
    pub kurtosis: f64,
}

impl Intensity3d {
    /// 计算候选整体的强度特征.
    ///
    /// # 注意
    ///
    /// 外环只取整个体积的第 0 层切片: 候选包围盒的行列范围各向外扩张 `margin`
    /// 个像素 (截断到切片范围内), 去掉其中属于候选的体素.
    pub fn compute(scan: &NoduleScan, region: &NormalizedRegion, margin: usize) -> Self {
        let sample: Vec<f64> = region
            .local_scan()
            .iter()
            .zip(region.local_mask().iter())
            .filter(|(_, p)| is_foreground(**p))
            .map(|(v, _)| *v as f64)
            .collect();
        let stats = Moments::of(&sample);

        let (_, rows, cols) = scan.shape();
        let b = region.bbox();
        let mut ring = Vec::new();
        if let (Some(hs), Some(ws)) = (
            b.h.expand_clipped(margin, rows),
            b.w.expand_clipped(margin, cols),
        ) {
            ring.extend(
                iproduct!(0..1, hs.min..=hs.max, ws.min..=ws.max)
                    .filter(|&pos| !region.contains(pos))
                    .map(|pos| scan[pos] as f64),
            );
        }

        Self {
            min: stats.min,
            contrast: contrast(stats.mean, moments::mean(&ring)),
            std_dev: stats.std_dev,
            skewness: stats.skewness,
            kurtosis: stats.kurtosis,
        }
    }

    /// 写入特征向量的 22..27 槽位.
    pub fn write_to(&self, v: &mut FeatureVector) {
        v.put(
            slot::MIN_INTENSITY_3D,
            &[
                self.min,
                self.contrast,
                self.std_dev,
                self.skewness,
                self.kurtosis,
            ],
        );
    }
}
