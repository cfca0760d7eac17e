#![warn(missing_docs)] // <= 合适时移除它.
// #![warn(clippy::missing_docs_in_private_items)]  // <= too strict.

//! 核心库. 为胸部 CT 扫描中的肺结节候选区域计算 27 维定量特征, 供下游分类器使用.
//!
//! 该 crate 目前仅提供 `safe` 接口.
//!
//! # 注意
//!
//! 1. 所有体积都按 (切片, 行, 列) 组织, 即 `[z, H, W]` 标准布局.
//!   nifti 文件在读取时自动转换.
//! 2. 特征计算本身不会失败. 退化几何 (单体素候选, 空外环等) 产生 `inf` 或 `NaN`,
//!   调用者需要容忍非有限的特征值.
//! 3. 输入扫描不会被修改: 全局 z-score 归一化返回新的扫描.
//!
//! # 开发计划
//!
//! ### 候选连通分量枚举 ✅
//!
//! 6-/26-邻域 (二维为 4-/8-邻域) 的连通分量标记, 结果顺序确定.
//!
//! 实现位于 `ct-nodule/src/toolbox/conncomp.rs`.
//!
//! ### 离散几何测度 ✅
//!
//! Crofton 公式估计二维周长, 三维表面积与平均宽度; 体素复形欧拉数.
//!
//! 实现位于 `ct-nodule/src/toolbox/minkowski.rs`.
//!
//! ### 区域归一化 ✅
//!
//! 包围盒, 带 1 体素填充的局部子体积, 代表切片投影与最大连通分量约减.
//!
//! 实现位于 `ct-nodule/src/feature/region.rs`.
//!
//! ### 几何特征 (12 维) 与强度特征 (15 维) ✅
//!
//! 实现位于 `ct-nodule/src/feature/{geometry, intensity}.rs`.
//!
//! ### 多线程并行 ✅
//!
//! 打开 `rayon` feature 后, 全局归一化与逐候选计算均可并行, 结果与串行版本一致.
//!
//! ### 完善代码文档 ✅
//!
//! 给每个 public API 提供文档, 并视情况给 private
//! API 提供文档.

/// 二维索引 `(行, 列)`.
pub type Idx2d = (usize, usize);

/// 三维索引 `(切片, 行, 列)`.
pub type Idx3d = (usize, usize, usize);

pub mod config;
pub mod consts;

/// 3D CT 扫描, 候选掩膜与包围盒等基础数据结构.
pub mod data;

pub mod dataset;
pub mod error;
pub mod feature;
pub mod prelude;
pub mod toolbox;

pub use config::FeatureConfig;
pub use data::{BBox2d, BBox3d, Candidate, CandidateMask, NoduleCase, NoduleScan, Spacing};
pub use error::FeatureError;
pub use feature::{FeatureExtractionStage, FeatureTable, FeatureVector};
