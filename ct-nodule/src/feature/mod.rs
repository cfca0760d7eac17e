//! 结节候选特征提取.
//!
//! 每个候选得到 27 维特征向量, 分为四块:
//!
//! | 槽位 | 内容 | 实现 |
//! |------|------|------|
//! | 0..4 | 代表切片二维几何 | [`geometry::Geometry2d`] |
//! | 4..12 | 三维几何 | [`geometry::Geometry3d`] |
//! | 12..22 | 代表切片强度统计与图像矩 | [`intensity::Intensity2d`] |
//! | 22..27 | 三维强度统计 | [`intensity::Intensity3d`] |
//!
//! 槽位下标见 [`crate::consts::slot`].

use std::ops::{Index, IndexMut};
use std::path::Path;

use ndarray::{Array2, ArrayView1, ArrayView2, Axis};

use crate::consts::FEATURE_LEN;
use crate::error::FeatureError;

pub mod geometry;
pub mod intensity;
mod pipeline;
mod region;

cfg_if::cfg_if! {
    if #[cfg(feature = "rayon")] {
        mod parallel;
    }
}

pub use pipeline::{CandidatePipeline, FeatureExtractionStage};
pub use region::{NormalizedRegion, RegionNormalizer};

/// 单个候选的 27 维特征向量.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FeatureVector([f64; FEATURE_LEN]);

impl Default for FeatureVector {
    /// 所有槽位均为 NaN.
    fn default() -> Self {
        Self([f64::NAN; FEATURE_LEN])
    }
}

impl Index<usize> for FeatureVector {
    type Output = f64;

    #[inline]
    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl IndexMut<usize> for FeatureVector {
    #[inline]
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.0[index]
    }
}

impl From<[f64; FEATURE_LEN]> for FeatureVector {
    #[inline]
    fn from(value: [f64; FEATURE_LEN]) -> Self {
        Self(value)
    }
}

impl FeatureVector {
    /// 以切片形式访问.
    #[inline]
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    /// 取出内部数组.
    #[inline]
    pub fn into_inner(self) -> [f64; FEATURE_LEN] {
        self.0
    }

    /// 从 `start` 开始连续写入 `block`. 越界时 panic.
    #[inline]
    pub(crate) fn put(&mut self, start: usize, block: &[f64]) {
        self.0[start..start + block.len()].copy_from_slice(block);
    }
}

/// 全部候选的特征表, 形状为 `(候选数, 27)`.
///
/// 行顺序即连通分量的枚举顺序.
#[derive(Clone, Debug, PartialEq)]
pub struct FeatureTable {
    data: Array2<f64>,
}

impl FeatureTable {
    /// 从逐行特征向量创建.
    pub fn from_rows(rows: &[FeatureVector]) -> Self {
        let data = Array2::from_shape_fn((rows.len(), FEATURE_LEN), |(r, c)| rows[r][c]);
        Self { data }
    }

    /// 候选个数.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len_of(Axis(0))
    }

    /// 没有任何候选?
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 第 `index` 个候选的特征. 越界时 panic.
    #[inline]
    pub fn row(&self, index: usize) -> ArrayView1<'_, f64> {
        self.data.row(index)
    }

    /// 整张表的视图.
    #[inline]
    pub fn as_array(&self) -> ArrayView2<'_, f64> {
        self.data.view()
    }

    /// 取出内部数组.
    #[inline]
    pub fn into_inner(self) -> Array2<f64> {
        self.data
    }

    /// 以 npy 格式保存到 `path`.
    pub fn write_npy<P: AsRef<Path>>(&self, path: P) -> Result<(), FeatureError> {
        ndarray_npy::write_npy(path, &self.data)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_from_rows() {
        let mut a = FeatureVector::default();
        a.put(0, &[1.0, 2.0]);
        let b = FeatureVector::from([3.0; FEATURE_LEN]);
        let table = FeatureTable::from_rows(&[a, b]);

        assert_eq!(table.len(), 2);
        assert_eq!(table.row(0)[1], 2.0);
        assert!(table.row(0)[2].is_nan());
        assert_eq!(table.row(1).sum(), 3.0 * FEATURE_LEN as f64);
        assert!(FeatureTable::from_rows(&[]).is_empty());
    }
}
