//! 特征提取流程编排.

use log::{debug, info};

use super::geometry::{Geometry2d, Geometry3d};
use super::intensity::{Intensity2d, Intensity3d};
use super::region::RegionNormalizer;
use super::{FeatureTable, FeatureVector};
use crate::config::FeatureConfig;
use crate::data::{Candidate, CandidateMask, NoduleCase, NoduleScan};
use crate::toolbox::components_3d;

/// 对单个候选依次执行区域归一化, 几何特征与强度特征的计算.
///
/// 只持有只读借用, 因此可以在多个线程间共享.
#[derive(Copy, Clone, Debug)]
pub struct CandidatePipeline<'a> {
    scan: &'a NoduleScan,
    config: &'a FeatureConfig,
}

impl<'a> CandidatePipeline<'a> {
    /// `scan` 必须是已经全局归一化的扫描.
    #[inline]
    pub fn new(scan: &'a NoduleScan, config: &'a FeatureConfig) -> Self {
        Self { scan, config }
    }

    /// 计算 `candidate` 的 27 维特征. 所有中间缓冲区在返回前释放.
    pub fn extract(&self, candidate: &Candidate) -> FeatureVector {
        let mut v = FeatureVector::default();
        self.write_row(candidate, &mut v);
        v
    }

    /// 将四组特征依次写入 `v`, 覆盖全部 27 个槽位.
    fn write_row(&self, candidate: &Candidate, v: &mut FeatureVector) {
        let spacing = self.scan.spacing();
        let region =
            RegionNormalizer::new(self.config.connectivity).normalize(self.scan, candidate);
        debug!(
            "candidate with {} voxels, representative slice {}",
            candidate.len(),
            region.mid_z()
        );

        Geometry2d::compute(&region, spacing).write_to(v);
        Geometry3d::compute(candidate, &region, spacing).write_to(v);
        Intensity2d::compute(self.scan, &region, self.config.ring_margin).write_to(v);
        Intensity3d::compute(self.scan, &region, self.config.ring_margin).write_to(v);
    }
}

/// 特征提取的顶层入口.
///
/// 流程: 全局 z-score 归一化 → 枚举候选连通分量 → 逐候选提取特征 → 组装特征表.
#[derive(Clone, Debug, Default)]
pub struct FeatureExtractionStage {
    config: FeatureConfig,
}

impl FeatureExtractionStage {
    /// 以给定配置创建.
    #[inline]
    pub fn new(config: FeatureConfig) -> Self {
        Self { config }
    }

    /// 当前配置.
    #[inline]
    pub fn config(&self) -> &FeatureConfig {
        &self.config
    }

    /// 枚举掩膜中的全部候选, 顺序与连通分量的枚举顺序一致.
    pub fn candidates(&self, mask: &CandidateMask) -> Vec<Candidate> {
        let shape = mask.shape();
        components_3d(mask.data(), self.config.connectivity)
            .iter()
            .filter_map(|comp| Candidate::from_linear(comp, shape))
            .collect()
    }

    /// 串行处理一个病例. 输入扫描保持不变.
    ///
    /// # 返回值
    ///
    /// 形状为 `(候选数, 27)` 的特征表. 没有候选时返回空表.
    pub fn run(&self, case: &NoduleCase) -> FeatureTable {
        info!("feature extraction on volume {:?}", case.scan.shape());
        let scan = case.scan.z_score();
        let candidates = self.candidates(&case.mask);
        info!("{} candidates enumerated", candidates.len());

        let pipeline = CandidatePipeline::new(&scan, &self.config);
        let rows: Vec<FeatureVector> = candidates
            .iter()
            .enumerate()
            .map(|(i, c)| {
                debug!("processing candidate #{i}");
                pipeline.extract(c)
            })
            .collect();

        info!("feature extraction done, {} rows", rows.len());
        FeatureTable::from_rows(&rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{slot, FEATURE_LEN};
    use crate::data::Spacing;
    use crate::toolbox::Connectivity;
    use ndarray::{s, Array3};
    use std::f64::consts::{PI, SQRT_2};

    fn f64_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    /// 常数背景 0, 在 `(z, h, w)` 处放一个边长为 `len`, 强度为 `value` 的立方体.
    fn place_cube(
        scan: &mut Array3<f32>,
        mask: &mut Array3<u8>,
        (z, h, w): (usize, usize, usize),
        len: usize,
        value: f32,
    ) {
        scan.slice_mut(s![z..z + len, h..h + len, w..w + len]).fill(value);
        mask.slice_mut(s![z..z + len, h..h + len, w..w + len]).fill(1);
    }

    fn case_of(scan: Array3<f32>, mask: Array3<u8>, spacing: Spacing) -> NoduleCase {
        NoduleCase::new(NoduleScan::new(scan, spacing), CandidateMask::new(mask)).unwrap()
    }

    fn single_cube_case(spacing: Spacing) -> NoduleCase {
        let mut scan = Array3::<f32>::zeros((9, 9, 9));
        let mut mask = Array3::<u8>::zeros((9, 9, 9));
        place_cube(&mut scan, &mut mask, (3, 3, 3), 3, 10.0);
        case_of(scan, mask, spacing)
    }

    #[test]
    fn test_cube_scenario() {
        let case = single_cube_case(Spacing::isotropic(1.0).unwrap());
        let table = FeatureExtractionStage::default().run(&case);
        assert_eq!(table.len(), 1);

        let row = table.row(0);
        assert!(f64_eq(row[slot::VOLUME_3D], 27.0));
        assert!(f64_eq(row[slot::AREA_2D], 9.0));
        assert!(row[slot::CONTRAST_2D].is_finite());
        assert!(row[slot::CONTRAST_2D] > 0.0);
        assert!(row[slot::CONTRAST_3D].is_finite());
        assert!(row[slot::CONTRAST_3D] > 0.0);
        assert!(f64_eq(row[slot::EULER_3D], 1.0));
    }

    #[test]
    fn test_input_scan_is_untouched() {
        let case = single_cube_case(Spacing::isotropic(1.0).unwrap());
        let before = case.scan.data().to_owned();
        let _ = FeatureExtractionStage::default().run(&case);
        assert_eq!(case.scan.data(), before);
    }

    #[test]
    fn test_single_voxel_does_not_fault() {
        let mut scan = Array3::<f32>::zeros((5, 5, 5));
        let mut mask = Array3::<u8>::zeros((5, 5, 5));
        place_cube(&mut scan, &mut mask, (2, 2, 2), 1, 4.0);
        let case = case_of(scan, mask, Spacing::isotropic(1.0).unwrap());

        let table = FeatureExtractionStage::default().run(&case);
        assert_eq!(table.len(), 1);
        let row = table.row(0);
        let unit_cell = PI / 8.0 * (4.0 + 4.0 / SQRT_2);
        assert!(f64_eq(row[slot::AREA_2D], 1.0));
        assert!(f64_eq(row[slot::PERIMETER_2D], unit_cell));
        assert!(f64_eq(row[slot::COMPACTNESS_2D], 4.0 * PI / unit_cell.powi(2)));
        assert!(row[slot::RADIUS_RATIO_3D].is_infinite());
    }

    #[test]
    fn test_row_is_fully_written() {
        let case = single_cube_case(Spacing::new(0.8, 0.8, 2.0).unwrap());
        let stage = FeatureExtractionStage::default();
        let scan = case.scan.z_score();
        let pipeline = CandidatePipeline::new(&scan, stage.config());
        let candidates = stage.candidates(&case.mask);
        assert_eq!(candidates.len(), 1);

        let mut v = FeatureVector::from([f64::MIN; FEATURE_LEN]);
        pipeline.write_row(&candidates[0], &mut v);
        for (i, x) in v.as_slice().iter().enumerate() {
            assert_ne!(*x, f64::MIN, "slot {i} left unwritten");
        }
    }

    #[test]
    fn test_two_candidates_are_independent() {
        let spacing = Spacing::isotropic(0.7).unwrap();
        let mut scan = Array3::<f32>::zeros((12, 16, 16));
        let mut mask = Array3::<u8>::zeros((12, 16, 16));
        place_cube(&mut scan, &mut mask, (2, 2, 2), 3, 10.0);
        place_cube(&mut scan, &mut mask, (6, 9, 9), 4, 6.0);
        let case = case_of(scan, mask, spacing);

        let stage = FeatureExtractionStage::default();
        let table = stage.run(&case);
        assert_eq!(table.len(), 2);
        assert!(f64_eq(table.row(0)[slot::VOLUME_3D], 27.0 * spacing.voxel()));
        assert!(f64_eq(table.row(1)[slot::VOLUME_3D], 64.0 * spacing.voxel()));

        // 逆序逐个处理, 每行结果不变.
        let normalized = case.scan.z_score();
        let pipeline = CandidatePipeline::new(&normalized, stage.config());
        let mut candidates = stage.candidates(&case.mask);
        candidates.reverse();
        let reversed: Vec<FeatureVector> = candidates.iter().map(|c| pipeline.extract(c)).collect();
        for (i, v) in reversed.iter().rev().enumerate() {
            for j in 0..FEATURE_LEN {
                let (a, b) = (table.row(i)[j], v[j]);
                assert!(a == b || (a.is_nan() && b.is_nan()));
            }
        }
    }

    #[test]
    fn test_row_count_matches_components() {
        let mut scan = Array3::<f32>::zeros((6, 10, 10));
        let mut mask = Array3::<u8>::zeros((6, 10, 10));
        mask[(1, 1, 1)] = 1;
        mask[(2, 2, 2)] = 1;
        mask[(4, 7, 7)] = 1;
        scan[(4, 7, 7)] = 3.0;
        let case = case_of(scan, mask, Spacing::isotropic(1.0).unwrap());

        let full = FeatureExtractionStage::default().run(&case);
        assert_eq!(full.len(), 2);
        let face = FeatureConfig::default().with_connectivity(Connectivity::Face);
        assert_eq!(FeatureExtractionStage::new(face).run(&case).len(), 3);
    }

    #[test]
    fn test_empty_mask() {
        let mut scan = Array3::<f32>::zeros((4, 4, 4));
        scan[(1, 1, 1)] = 1.0;
        let mask = Array3::<u8>::zeros((4, 4, 4));
        let case = case_of(scan, mask, Spacing::isotropic(1.0).unwrap());
        let table = FeatureExtractionStage::default().run(&case);
        assert!(table.is_empty());
        assert_eq!(table.as_array().dim(), (0, FEATURE_LEN));
    }

    #[test]
    fn test_spacing_doubling() {
        let stage = FeatureExtractionStage::default();
        let a = stage.run(&single_cube_case(Spacing::isotropic(1.0).unwrap()));
        let b = stage.run(&single_cube_case(Spacing::isotropic(2.0).unwrap()));
        let (a, b) = (a.row(0), b.row(0));

        assert!(f64_eq(b[slot::AREA_2D], 4.0 * a[slot::AREA_2D]));
        assert!(f64_eq(b[slot::VOLUME_3D], 8.0 * a[slot::VOLUME_3D]));
        for k in [
            slot::COMPACTNESS_2D,
            slot::ELONGATION_2D,
            slot::ELONGATION_3D,
            slot::SURFACE_COMPACTNESS_3D,
        ] {
            assert!(f64_eq(a[k], b[k]));
        }
        // 强度特征与分辨率无关.
        for k in slot::MIN_INTENSITY_2D..FEATURE_LEN {
            assert!(a[k] == b[k] || (a[k].is_nan() && b[k].is_nan()));
        }
    }
}
