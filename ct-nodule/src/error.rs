//! 运行时错误.

use crate::Idx3d;
use thiserror::Error;

/// 数据加载与结果保存的错误.
///
/// 特征计算本身不会失败: 退化几何只会产生非有限的特征值.
#[derive(Debug, Error)]
pub enum FeatureError {
    /// 读取 nifti 文件错误.
    #[error("failed to read nifti file: {0}")]
    Nifti(#[from] nifti::NiftiError),

    /// 读取 npy 文件错误.
    #[error("failed to read npy file: {0}")]
    ReadNpy(#[from] ndarray_npy::ReadNpyError),

    /// 写入 npy 文件错误.
    #[error("failed to write npy file: {0}")]
    WriteNpy(#[from] ndarray_npy::WriteNpyError),

    /// 数据不是三维体积. 参数为实际维数.
    #[error("expected a 3D volume, got {0} dimensions")]
    NotVolume(usize),

    /// 数组形状转换错误.
    #[error("array shape error: {0}")]
    Shape(#[from] ndarray::ShapeError),

    /// header 中的体素分辨率非正或非有限.
    #[error("voxel spacing must be positive and finite")]
    InvalidSpacing,

    /// 扫描和掩膜形状不一致.
    #[error("scan shape {scan:?} does not match mask shape {mask:?}")]
    ShapeMismatch {
        /// 扫描形状.
        scan: Idx3d,

        /// 掩膜形状.
        mask: Idx3d,
    },
}
