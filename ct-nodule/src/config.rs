//! 特征提取配置.

use crate::consts::DEFAULT_RING_MARGIN;
use crate::toolbox::Connectivity;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// 特征提取的可调参数.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct FeatureConfig {
    /// 枚举候选与选取代表切片最大连通分量时使用的连通规则.
    pub connectivity: Connectivity,

    /// 外环在包围盒之外扩展的像素数.
    pub ring_margin: usize,
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            connectivity: Connectivity::Full,
            ring_margin: DEFAULT_RING_MARGIN,
        }
    }
}

impl FeatureConfig {
    /// 替换连通规则.
    #[inline]
    pub fn with_connectivity(mut self, connectivity: Connectivity) -> Self {
        self.connectivity = connectivity;
        self
    }

    /// 替换外环宽度.
    #[inline]
    pub fn with_ring_margin(mut self, ring_margin: usize) -> Self {
        self.ring_margin = ring_margin;
        self
    }
}
