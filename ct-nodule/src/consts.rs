//! 通用常量.

/// 二值掩膜取值.
pub mod gray {
    /// 掩膜中背景的像素值.
    pub const MASK_BACKGROUND: u8 = 0;

    /// 掩膜中前景 (结节候选) 的像素值.
    pub const MASK_FOREGROUND: u8 = 1;

    /// 像素是否是前景? 任何非零值都被视为前景.
    #[inline]
    pub const fn is_foreground(p: u8) -> bool {
        p != MASK_BACKGROUND
    }

    /// 像素是否是背景?
    #[inline]
    pub const fn is_background(p: u8) -> bool {
        p == MASK_BACKGROUND
    }
}

/// 每个结节候选的特征个数.
pub const FEATURE_LEN: usize = 27;

/// 外环 (outer ring) 在包围盒之外默认扩展的像素数.
pub const DEFAULT_RING_MARGIN: usize = 5;

/// 局部子体积在包围盒每个面上的填充厚度.
pub const BOX_PADDING: usize = 1;

/// 特征向量各分量的位置.
///
/// `[0, 4)` 为二维几何特征, `[4, 12)` 为三维几何特征,
/// `[12, 22)` 为二维灰度特征, `[22, 27)` 为三维灰度特征.
pub mod slot {
    /// 代表切片最大连通分量的物理面积 (mm²).
    pub const AREA_2D: usize = 0;

    /// 代表切片包围盒物理宽、高的最大值 (mm).
    pub const MAX_EXTENT_2D: usize = 1;

    /// 代表切片最大连通分量的物理周长 (mm).
    pub const PERIMETER_2D: usize = 2;

    /// 代表切片最大连通分量的紧致度 `4πA / P²`.
    pub const COMPACTNESS_2D: usize = 3;

    /// 候选的物理体积 (mm³).
    pub const VOLUME_3D: usize = 4;

    /// 半径比: 最大物理跨度的一半 / 体素到中心的均方根距离.
    pub const RADIUS_RATIO_3D: usize = 5;

    /// 平面内伸长率.
    pub const ELONGATION_2D: usize = 6;

    /// 三维伸长率.
    pub const ELONGATION_3D: usize = 7;

    /// 表面紧致度 `S³ / (36π V²)`.
    pub const SURFACE_COMPACTNESS_3D: usize = 8;

    /// 平均宽度 (mean breadth).
    pub const MEAN_BREADTH_3D: usize = 9;

    /// 三维欧拉数.
    pub const EULER_3D: usize = 10;

    /// 未经最大连通分量约简的局部代表切片的紧致度.
    pub const LOCAL_COMPACTNESS_2D: usize = 11;

    /// 二维内部最小灰度.
    pub const MIN_INTENSITY_2D: usize = 12;

    /// 二维内外归一化对比度.
    pub const CONTRAST_2D: usize = 13;

    /// 二维内部灰度标准差.
    pub const STD_DEV_2D: usize = 14;

    /// 二维内部灰度偏度.
    pub const SKEWNESS_2D: usize = 15;

    /// 二维内部灰度峰度.
    pub const KURTOSIS_2D: usize = 16;

    /// 图像矩比 `m01 / m00`.
    pub const M01_RATIO: usize = 17;

    /// 图像矩比 `m10 / m00`.
    pub const M10_RATIO: usize = 18;

    /// 图像矩比 `m11 / m00`.
    pub const M11_RATIO: usize = 19;

    /// 图像矩比 `m12 / m00`.
    pub const M12_RATIO: usize = 20;

    /// 零阶图像矩 `m00`.
    pub const M00: usize = 21;

    /// 三维内部最小灰度.
    pub const MIN_INTENSITY_3D: usize = 22;

    /// 三维内外归一化对比度.
    pub const CONTRAST_3D: usize = 23;

    /// 三维内部灰度标准差.
    pub const STD_DEV_3D: usize = 24;

    /// 三维内部灰度偏度.
    pub const SKEWNESS_3D: usize = 25;

    /// 三维内部灰度峰度.
    pub const KURTOSIS_3D: usize = 26;
}
