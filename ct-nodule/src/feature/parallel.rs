//! 基于 `rayon` 的并行特征提取.

use log::info;
use rayon::prelude::*;

use super::{CandidatePipeline, FeatureExtractionStage, FeatureTable, FeatureVector};
use crate::data::NoduleCase;

impl FeatureExtractionStage {
    /// 借助 `rayon` 并行处理一个病例. 结果与 [`Self::run`] 一致 (至多相差浮点舍入).
    ///
    /// 全局归一化使用并行归约, 各候选在线程池中独立计算并写入各自的行.
    pub fn par_run(&self, case: &NoduleCase) -> FeatureTable {
        info!("parallel feature extraction on volume {:?}", case.scan.shape());
        let scan = case.scan.par_z_score();
        let candidates = self.candidates(&case.mask);
        info!("{} candidates enumerated", candidates.len());

        let pipeline = CandidatePipeline::new(&scan, self.config());
        let rows: Vec<FeatureVector> = candidates.par_iter().map(|c| pipeline.extract(c)).collect();

        info!("feature extraction done, {} rows", rows.len());
        FeatureTable::from_rows(&rows)
    }
}
