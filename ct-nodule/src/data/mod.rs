use std::ops::Index;
use std::path::Path;

use ndarray::{Array3, ArrayD, ArrayView2, ArrayView3, Axis, Ix3};
use nifti::{InMemNiftiVolume, IntoNdArray, NiftiHeader, NiftiObject, ReaderOptions};

use crate::error::FeatureError;
use crate::Idx3d;

mod bbox;
mod candidate;

pub use bbox::{BBox2d, BBox3d, Span};
pub use candidate::Candidate;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// 体素物理分辨率, 以毫米为单位.
///
/// `x` 为列方向 (自然图像的水平方向), `y` 为行方向 (自然图像的垂直方向),
/// `z` 为层厚 (相邻切片方向).
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Spacing {
    /// 列方向分辨率.
    pub x: f64,

    /// 行方向分辨率.
    pub y: f64,

    /// 层厚.
    pub z: f64,
}

impl Spacing {
    /// 构建分辨率. 任一分量非正或非有限时返回 `None`.
    pub fn new(x: f64, y: f64, z: f64) -> Option<Self> {
        let valid = |v: f64| v.is_finite() && v > 0.0;
        (valid(x) && valid(y) && valid(z)).then_some(Self { x, y, z })
    }

    /// 各向同性分辨率.
    #[inline]
    pub fn isotropic(d: f64) -> Option<Self> {
        Self::new(d, d, d)
    }

    /// 单个体素的实际体积, 以立方毫米为单位.
    #[inline]
    pub fn voxel(&self) -> f64 {
        self.x * self.y * self.z
    }

    /// 水平切片上单个像素的实际面积, 以平方毫米为单位.
    #[inline]
    pub fn slice_pixel(&self) -> f64 {
        self.x * self.y
    }

    /// 从 nifti header 中读取分辨率.
    fn from_header(header: &NiftiHeader) -> Option<Self> {
        let [_, w, h, z, ..] = header.pixdim;
        Self::new(w as f64, h as f64, z as f64)
    }
}

/// 将 nifti 的 \[W, H, z\] 体积转换为 \[z, H, W\] 标准布局.
fn into_zhw<T: Clone>(data: ArrayD<T>) -> Result<Array3<T>, FeatureError> {
    if data.ndim() != 3 {
        return Err(FeatureError::NotVolume(data.ndim()));
    }
    // hint: 原第一维向下增长, 原第二维向右增长.
    let data = data.permuted_axes([2, 1, 0].as_slice());
    Ok(data
        .as_standard_layout()
        .into_owned()
        .into_dimensionality::<Ix3>()?)
}

/// 读取 nifti 文件, 返回 header 与尚未转换的体积.
fn read_nifti(path: &Path) -> Result<(NiftiHeader, InMemNiftiVolume), FeatureError> {
    let obj = ReaderOptions::new().read_file(path)?;
    let header = obj.header().clone();
    Ok((header, obj.into_volume()))
}

/// 3D CT 扫描与体素分辨率. 灰度值以 `f32` 保存, 按 (切片, 行, 列) 组织.
#[derive(Debug, Clone)]
pub struct NoduleScan {
    data: Array3<f32>,
    spacing: Spacing,
}

impl Index<Idx3d> for NoduleScan {
    type Output = f32;

    #[inline]
    fn index(&self, index: Idx3d) -> &Self::Output {
        &self.data[index]
    }
}

impl NoduleScan {
    /// 直接从数据和分辨率创建.
    #[inline]
    pub fn new(data: Array3<f32>, spacing: Spacing) -> Self {
        Self { data, spacing }
    }

    /// 打开 nii 文件格式的 3D CT 扫描, 分辨率取自 header.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, FeatureError> {
        let (header, volume) = read_nifti(path.as_ref())?;
        let data = into_zhw(volume.into_ndarray::<f32>()?)?;
        let spacing = Spacing::from_header(&header).ok_or(FeatureError::InvalidSpacing)?;
        Ok(Self { data, spacing })
    }

    /// 打开 npy 文件格式的 3D 扫描. npy 不携带分辨率, 需要调用者提供.
    pub fn open_npy<P: AsRef<Path>>(path: P, spacing: Spacing) -> Result<Self, FeatureError> {
        let data: Array3<f32> = ndarray_npy::read_npy(path.as_ref())?;
        Ok(Self { data, spacing })
    }

    /// 数据形状 (切片数, 行数, 列数).
    #[inline]
    pub fn shape(&self) -> Idx3d {
        self.data.dim()
    }

    /// 体素分辨率.
    #[inline]
    pub fn spacing(&self) -> &Spacing {
        &self.spacing
    }

    /// 获得数据的一份不可变 shallow copy.
    #[inline]
    pub fn data(&self) -> ArrayView3<'_, f32> {
        self.data.view()
    }

    /// 获取第 `z_index` 层切片视图. 越界时 panic.
    #[inline]
    pub fn slice_at(&self, z_index: usize) -> ArrayView2<'_, f32> {
        self.data.index_axis(Axis(0), z_index)
    }

    /// 获取某体素的值. 越界时返回 `None`.
    #[inline]
    pub fn get(&self, pos: Idx3d) -> Option<f32> {
        self.data.get(pos).copied()
    }

    /// 全局 z-score 归一化: `(v - mean) / std`.
    ///
    /// 返回新的扫描, `self` 保持不变. 标准差的分母为 `n - 1`.
    /// 常数体积的标准差为 0, 结果中的体素值为非有限值.
    pub fn z_score(&self) -> NoduleScan {
        let n = self.data.len() as f64;
        let mean = self.data.iter().map(|&v| v as f64).sum::<f64>() / n;
        let ss: f64 = self.data.iter().map(|&v| (v as f64 - mean).powi(2)).sum();
        let std = (ss / (n - 1.0)).sqrt();
        NoduleScan {
            data: self.data.mapv(|v| ((v as f64 - mean) / std) as f32),
            spacing: self.spacing,
        }
    }

    /// 借助 `rayon` 并行计算 [`Self::z_score`]. 结果与串行版本一致 (至多相差浮点舍入).
    #[cfg(feature = "rayon")]
    pub fn par_z_score(&self) -> NoduleScan {
        use ndarray::parallel::prelude::*;

        let n = self.data.len() as f64;
        let mean = self.data.par_iter().map(|&v| v as f64).sum::<f64>() / n;
        let ss: f64 = self
            .data
            .par_iter()
            .map(|&v| (v as f64 - mean).powi(2))
            .sum();
        let std = (ss / (n - 1.0)).sqrt();

        let mut data = self.data.clone();
        data.par_mapv_inplace(|v| ((v as f64 - mean) / std) as f32);
        NoduleScan {
            data,
            spacing: self.spacing,
        }
    }
}

/// 与扫描同形状的结节候选二值掩膜. 非零体素为候选.
#[derive(Debug, Clone)]
pub struct CandidateMask {
    data: Array3<u8>,
}

impl Index<Idx3d> for CandidateMask {
    type Output = u8;

    #[inline]
    fn index(&self, index: Idx3d) -> &Self::Output {
        &self.data[index]
    }
}

impl CandidateMask {
    /// 直接从数据创建.
    #[inline]
    pub fn new(data: Array3<u8>) -> Self {
        Self { data }
    }

    /// 打开 nii 文件格式的候选掩膜.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, FeatureError> {
        let (_, volume) = read_nifti(path.as_ref())?;
        let data = into_zhw(volume.into_ndarray::<u8>()?)?;
        Ok(Self { data })
    }

    /// 打开 npy 文件格式的候选掩膜.
    pub fn open_npy<P: AsRef<Path>>(path: P) -> Result<Self, FeatureError> {
        let data: Array3<u8> = ndarray_npy::read_npy(path.as_ref())?;
        Ok(Self { data })
    }

    /// 数据形状 (切片数, 行数, 列数).
    #[inline]
    pub fn shape(&self) -> Idx3d {
        self.data.dim()
    }

    /// 获得数据的一份不可变 shallow copy.
    #[inline]
    pub fn data(&self) -> ArrayView3<'_, u8> {
        self.data.view()
    }

    /// 前景体素个数.
    #[inline]
    pub fn count(&self) -> usize {
        self.data.iter().filter(|p| **p != 0).count()
    }
}

/// 一个病例: 3D CT 扫描与对应的候选掩膜.
///
/// 该结构完全透明, 用户可以直接使用其中的子结构来实现上层功能.
#[derive(Debug, Clone)]
pub struct NoduleCase {
    /// 3D CT 扫描.
    pub scan: NoduleScan,

    /// 候选掩膜.
    pub mask: CandidateMask,
}

impl NoduleCase {
    /// 组合扫描与掩膜. 两者形状不一致时返回 `Err`.
    pub fn new(scan: NoduleScan, mask: CandidateMask) -> Result<Self, FeatureError> {
        if scan.shape() != mask.shape() {
            return Err(FeatureError::ShapeMismatch {
                scan: scan.shape(),
                mask: mask.shape(),
            });
        }
        Ok(Self { scan, mask })
    }

    /// 分别打开 nii 文件格式的扫描和候选掩膜.
    pub fn open(
        scan_path: impl AsRef<Path>,
        mask_path: impl AsRef<Path>,
    ) -> Result<Self, FeatureError> {
        Self::new(NoduleScan::open(scan_path)?, CandidateMask::open(mask_path)?)
    }

    /// 分别打开 npy 文件格式的扫描和候选掩膜. 分辨率由调用者提供.
    pub fn open_npy(
        scan_path: impl AsRef<Path>,
        mask_path: impl AsRef<Path>,
        spacing: Spacing,
    ) -> Result<Self, FeatureError> {
        Self::new(
            NoduleScan::open_npy(scan_path, spacing)?,
            CandidateMask::open_npy(mask_path)?,
        )
    }
}
