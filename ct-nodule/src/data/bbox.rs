//! 轴对齐包围盒.

use crate::{Idx2d, Idx3d};

/// 单个坐标轴上的闭区间 `[min, max]`. 保证 `min <= max`.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Span {
    /// 下界 (含).
    pub min: usize,

    /// 上界 (含).
    pub max: usize,
}

impl Span {
    /// 只包含 `v` 的区间.
    #[inline]
    fn point(v: usize) -> Self {
        Self { min: v, max: v }
    }

    /// 扩张区间使其包含 `v`.
    #[inline]
    fn extend(&mut self, v: usize) {
        self.min = self.min.min(v);
        self.max = self.max.max(v);
    }

    /// 区间包含的格点个数.
    #[inline]
    pub fn len(&self) -> usize {
        self.max - self.min + 1
    }

    /// 区间中点, 四舍五入 (0.5 向上取整).
    #[inline]
    pub fn mid(&self) -> usize {
        (self.min + self.max + 1) / 2
    }

    /// 判断 `v` 是否在区间内.
    #[inline]
    pub fn contains(&self, v: usize) -> bool {
        self.min <= v && v <= self.max
    }

    /// 向两侧各扩张 `margin`, 下界在 0 处截断, 上界在 `len - 1` 处截断.
    /// `len` 为 0 时返回 `None`.
    pub fn expand_clipped(&self, margin: usize, len: usize) -> Option<Self> {
        let upper = len.checked_sub(1)?;
        let min = self.min.saturating_sub(margin).min(upper);
        let max = self.max.saturating_add(margin).min(upper);
        Some(Self { min, max })
    }
}

/// 三维包围盒, 按 (切片, 行, 列) 组织.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct BBox3d {
    /// 切片方向.
    pub z: Span,

    /// 行方向.
    pub h: Span,

    /// 列方向.
    pub w: Span,
}

impl BBox3d {
    /// 计算点集的包围盒. 点集为空时返回 `None`.
    pub fn from_points<I: IntoIterator<Item = Idx3d>>(it: I) -> Option<Self> {
        let mut it = it.into_iter();
        let (z, h, w) = it.next()?;
        let mut ans = Self {
            z: Span::point(z),
            h: Span::point(h),
            w: Span::point(w),
        };
        for (z, h, w) in it {
            ans.z.extend(z);
            ans.h.extend(h);
            ans.w.extend(w);
        }
        Some(ans)
    }

    /// 每个面各填充 `pad` 个体素之后的盒子形状.
    #[inline]
    pub fn padded_shape(&self, pad: usize) -> Idx3d {
        (
            self.z.len() + 2 * pad,
            self.h.len() + 2 * pad,
            self.w.len() + 2 * pad,
        )
    }
}

/// 二维包围盒, 按 (行, 列) 组织.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct BBox2d {
    /// 行方向.
    pub h: Span,

    /// 列方向.
    pub w: Span,
}

impl BBox2d {
    /// 计算点集的包围盒. 点集为空时返回 `None`.
    pub fn from_points<I: IntoIterator<Item = Idx2d>>(it: I) -> Option<Self> {
        let mut it = it.into_iter();
        let (h, w) = it.next()?;
        let mut ans = Self {
            h: Span::point(h),
            w: Span::point(w),
        };
        for (h, w) in it {
            ans.h.extend(h);
            ans.w.extend(w);
        }
        Some(ans)
    }

    /// 判断 `(h, w)` 是否在盒内.
    #[inline]
    pub fn contains(&self, (h, w): Idx2d) -> bool {
        self.h.contains(h) && self.w.contains(w)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bbox_3d() {
        let b = BBox3d::from_points([(3, 5, 7), (4, 2, 9), (6, 5, 8)]).unwrap();
        assert_eq!(b.z, Span { min: 3, max: 6 });
        assert_eq!(b.h, Span { min: 2, max: 5 });
        assert_eq!(b.w, Span { min: 7, max: 9 });
        assert_eq!(b.padded_shape(1), (6, 6, 5));
        assert!(BBox3d::from_points(std::iter::empty()).is_none());
    }

    #[test]
    fn test_span_mid_rounds_half_up() {
        assert_eq!(Span { min: 2, max: 3 }.mid(), 3);
        assert_eq!(Span { min: 2, max: 4 }.mid(), 3);
        assert_eq!(Span::point(7).mid(), 7);
    }

    #[test]
    fn test_expand_clipped() {
        let s = Span { min: 2, max: 4 };
        assert_eq!(s.expand_clipped(5, 8), Some(Span { min: 0, max: 7 }));
        assert_eq!(s.expand_clipped(1, 100), Some(Span { min: 1, max: 5 }));
        assert_eq!(s.expand_clipped(1, 0), None);
    }

    #[test]
    fn test_bbox_2d() {
        let b = BBox2d::from_points([(1, 1), (3, 0)]).unwrap();
        assert!(b.contains((2, 1)));
        assert!(!b.contains((4, 1)));
    }
}
