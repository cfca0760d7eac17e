//! 候选区域归一化: 包围盒, 局部子体积, 代表切片与最大连通分量.

use log::warn;
use ndarray::{s, Array2, Array3, ArrayView2, ArrayView3};

use crate::consts::gray::{is_foreground, MASK_FOREGROUND};
use crate::consts::BOX_PADDING;
use crate::data::{BBox2d, BBox3d, Candidate, NoduleScan};
use crate::toolbox::conncomp::largest;
use crate::toolbox::{components_2d, Connectivity};
use crate::Idx3d;

/// 将单个候选整理为特征计算所需的各个坐标系下的数据.
#[derive(Copy, Clone, Debug, Default)]
pub struct RegionNormalizer {
    connectivity: Connectivity,
}

impl RegionNormalizer {
    /// 使用 `connectivity` 选取代表切片上的最大连通分量.
    #[inline]
    pub fn new(connectivity: Connectivity) -> Self {
        Self { connectivity }
    }

    /// 归一化 `candidate`. `scan` 应为全局归一化之后的扫描.
    ///
    /// # 注意
    ///
    /// 1. 局部子体积在包围盒每个面外侧多取一层体素. 落在整个体积之外的体素读作 `0`,
    ///   对应的局部掩膜恒为 0, 因此不会进入任何统计量.
    /// 2. 代表切片若没有任何前景 (只可能出现在手工构造的不连通候选上),
    ///   约减后的掩膜全为 0, 相关特征退化为非有限值.
    pub fn normalize(&self, scan: &NoduleScan, candidate: &Candidate) -> NormalizedRegion {
        let bbox = *candidate.bbox();
        let (_, rows, cols) = scan.shape();

        let local_scan = carve(scan, &bbox);
        let mut local_mask = Array3::<u8>::zeros(bbox.padded_shape(BOX_PADDING));
        for &pos in candidate.voxels() {
            local_mask[to_local(&bbox, pos)] = MASK_FOREGROUND;
        }

        let mid_z = bbox.z.mid();
        let local_mid_z = mid_z - bbox.z.min + BOX_PADDING;

        let (h, w) = (bbox.h, bbox.w);
        let mut projected = Array2::<u8>::zeros((rows, cols));
        projected
            .slice_mut(s![h.min..=h.max, w.min..=w.max])
            .assign(&local_mask.slice(s![
                local_mid_z,
                BOX_PADDING..BOX_PADDING + h.len(),
                BOX_PADDING..BOX_PADDING + w.len()
            ]));

        let mut reduced = Array2::<u8>::zeros((rows, cols));
        let components = components_2d(projected.view(), self.connectivity);
        match largest(&components) {
            Some(idx) => {
                for &i in components[idx].iter() {
                    reduced[(i / cols, i % cols)] = MASK_FOREGROUND;
                }
            }
            None => warn!("representative slice {mid_z} has no foreground component"),
        }
        let slice_bbox = BBox2d::from_points(
            reduced
                .indexed_iter()
                .filter(|(_, p)| is_foreground(**p))
                .map(|(pos, _)| pos),
        );

        NormalizedRegion {
            bbox,
            local_scan,
            local_mask,
            mid_z,
            local_mid_z,
            projected,
            reduced,
            slice_bbox,
        }
    }
}

/// 全局坐标转换为局部子体积坐标.
#[inline]
fn to_local(bbox: &BBox3d, (z, h, w): Idx3d) -> Idx3d {
    (
        z - bbox.z.min + BOX_PADDING,
        h - bbox.h.min + BOX_PADDING,
        w - bbox.w.min + BOX_PADDING,
    )
}

/// 复制包围盒 (含填充) 范围内的扫描. 体积之外读作 `0`.
fn carve(scan: &NoduleScan, bbox: &BBox3d) -> Array3<f32> {
    let at = |min: usize, offset: usize| (min + offset).checked_sub(BOX_PADDING);
    Array3::from_shape_fn(bbox.padded_shape(BOX_PADDING), |(z, h, w)| {
        match (at(bbox.z.min, z), at(bbox.h.min, h), at(bbox.w.min, w)) {
            (Some(z), Some(h), Some(w)) => scan.get((z, h, w)).unwrap_or(0.0),
            _ => 0.0,
        }
    })
}

/// 归一化之后的候选区域.
///
/// 同时存在三个坐标系: 整个体积 (全局), 含填充的局部子体积, 以及代表切片 (二维, 全尺寸).
/// 所有缓冲区随该结构一起释放.
#[derive(Clone, Debug)]
pub struct NormalizedRegion {
    bbox: BBox3d,
    local_scan: Array3<f32>,
    local_mask: Array3<u8>,
    mid_z: usize,
    local_mid_z: usize,
    projected: Array2<u8>,
    reduced: Array2<u8>,
    slice_bbox: Option<BBox2d>,
}

impl NormalizedRegion {
    /// 候选在整个体积中的三维包围盒.
    #[inline]
    pub fn bbox(&self) -> &BBox3d {
        &self.bbox
    }

    /// 局部子体积扫描.
    #[inline]
    pub fn local_scan(&self) -> ArrayView3<'_, f32> {
        self.local_scan.view()
    }

    /// 局部子体积掩膜. 候选体素为 1, 其余为 0.
    #[inline]
    pub fn local_mask(&self) -> ArrayView3<'_, u8> {
        self.local_mask.view()
    }

    /// 代表切片的全局下标.
    #[inline]
    pub fn mid_z(&self) -> usize {
        self.mid_z
    }

    /// 代表切片在局部子体积中的下标.
    #[inline]
    pub fn local_mid_z(&self) -> usize {
        self.local_mid_z
    }

    /// 局部掩膜代表切片投影到全尺寸平面后的掩膜 (未约减).
    #[inline]
    pub fn projected(&self) -> ArrayView2<'_, u8> {
        self.projected.view()
    }

    /// 只保留最大连通分量的代表切片掩膜.
    #[inline]
    pub fn reduced(&self) -> ArrayView2<'_, u8> {
        self.reduced.view()
    }

    /// 约减后掩膜的紧包围盒. 约减后掩膜为空时为 `None`.
    #[inline]
    pub fn slice_bbox(&self) -> Option<&BBox2d> {
        self.slice_bbox.as_ref()
    }

    /// 全局坐标 `pos` 处是否是该候选的体素.
    pub fn contains(&self, pos @ (z, h, w): Idx3d) -> bool {
        let b = &self.bbox;
        b.z.contains(z)
            && b.h.contains(h)
            && b.w.contains(w)
            && is_foreground(self.local_mask[to_local(b, pos)])
    }

    /// 约减后代表切片上的前景像素个数.
    #[inline]
    pub fn reduced_area(&self) -> usize {
        count_foreground(self.reduced.view())
    }
}

/// 统计二维掩膜中的前景像素个数.
#[inline]
pub(crate) fn count_foreground(img: ArrayView2<u8>) -> usize {
    img.iter().filter(|p| is_foreground(**p)).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Spacing;

    /// 代表切片上被约减掉的像素个数.
    fn dropped(region: &NormalizedRegion) -> usize {
        count_foreground(region.projected()) - region.reduced_area()
    }

    fn scan_of(shape: Idx3d) -> NoduleScan {
        let data = Array3::from_shape_fn(shape, |(z, h, w)| (z * 100 + h * 10 + w) as f32);
        NoduleScan::new(data, Spacing::isotropic(1.0).unwrap())
    }

    #[test]
    fn test_local_box_and_padding() {
        let scan = scan_of((4, 6, 6));
        let c = Candidate::from_voxels(vec![(0, 2, 3), (1, 2, 3), (1, 3, 3)]).unwrap();
        let r = RegionNormalizer::default().normalize(&scan, &c);

        assert_eq!(r.local_mask().dim(), (4, 4, 3));
        assert_eq!(r.local_scan().dim(), (4, 4, 3));
        // 切片 -1 不存在, 读作 0.
        assert_eq!(r.local_scan()[(0, 1, 1)], 0.0);
        assert_eq!(r.local_scan()[(1, 1, 1)], 23.0);
        assert_eq!(r.local_scan()[(2, 2, 1)], 133.0);
        assert_eq!(r.local_mask().iter().filter(|p| **p == 1).count(), 3);

        assert_eq!(r.mid_z(), 1);
        assert_eq!(r.local_mid_z(), 2);
        assert!(r.contains((1, 3, 3)));
        assert!(!r.contains((0, 3, 3)));
        assert!(!r.contains((3, 3, 3)));
    }

    #[test]
    fn test_reduce_to_largest_component() {
        let scan = scan_of((1, 8, 8));
        let mut voxels = vec![(0, 1, 1), (0, 1, 2), (0, 2, 1)];
        voxels.push((0, 5, 5));
        let c = Candidate::from_voxels(voxels).unwrap();
        let r = RegionNormalizer::new(Connectivity::Full).normalize(&scan, &c);

        assert_eq!(count_foreground(r.projected()), 4);
        assert_eq!(r.reduced_area(), 3);
        assert_eq!(dropped(&r), 1);
        let b = r.slice_bbox().unwrap();
        assert_eq!((b.h.min, b.h.max, b.w.min, b.w.max), (1, 2, 1, 2));
    }

    #[test]
    fn test_connected_candidate_is_kept_whole() {
        let scan = scan_of((3, 5, 5));
        let c = Candidate::from_voxels(vec![(1, 1, 1), (1, 2, 2), (1, 3, 3)]).unwrap();
        let full = RegionNormalizer::new(Connectivity::Full).normalize(&scan, &c);
        assert_eq!(dropped(&full), 0);

        // 对角相邻在 4-连通下不连通.
        let face = RegionNormalizer::new(Connectivity::Face).normalize(&scan, &c);
        assert_eq!(face.reduced_area(), 1);
        assert_eq!(face.reduced()[(1, 1)], 1);
    }

    #[test]
    fn test_empty_representative_slice() {
        let scan = scan_of((3, 4, 4));
        let c = Candidate::from_voxels(vec![(0, 1, 1), (2, 1, 1)]).unwrap();
        let r = RegionNormalizer::default().normalize(&scan, &c);
        assert_eq!(r.mid_z(), 1);
        assert_eq!(r.reduced_area(), 0);
        assert!(r.slice_bbox().is_none());
    }
}
