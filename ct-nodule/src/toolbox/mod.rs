//! 特征计算所依赖的基础算法: 连通分量, 离散几何测度, 统计矩.

pub mod conncomp;
pub mod minkowski;
pub mod moments;

pub use conncomp::{components_2d, components_3d, Connectivity};
