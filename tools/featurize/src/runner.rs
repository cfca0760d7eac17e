//! 程序运行函数.

use crate::result::{CaseOutcome, FeaturizeResult};
use ct_nodule::FeatureExtractionStage;
use log::{error, info};
use std::fs;
use std::io;
use std::path::PathBuf;
use std::time::Instant;
use thiserror::Error;
use utils::loader;

/// 运行前的环境错误. 单个病例的错误不会中止运行.
#[derive(Debug, Error)]
pub enum SetupError {
    /// 无法确定目录 (环境变量未设置且没有用户主目录).
    #[error("cannot determine {0} directory")]
    NoDir(&'static str),

    /// 目录读写失败.
    #[error("{}: {source}", .path.display())]
    Io { path: PathBuf, source: io::Error },
}

/// 实际运行.
pub fn run() -> Result<FeaturizeResult, SetupError> {
    let scan_dir = loader::scan_dir_from_env_or_home().ok_or(SetupError::NoDir("scan"))?;
    let mask_dir = loader::mask_dir_from_env_or_home().ok_or(SetupError::NoDir("mask"))?;
    let out_dir = loader::out_dir_from_env_or_home().ok_or(SetupError::NoDir("output"))?;
    fs::create_dir_all(&out_dir).map_err(|source| SetupError::Io {
        path: out_dir.clone(),
        source,
    })?;

    let indices = loader::case_indices(&scan_dir).map_err(|source| SetupError::Io {
        path: scan_dir.clone(),
        source,
    })?;
    let config = loader::config_from_env();
    info!(
        "{} cases found in {}, {:?}, {} threads",
        indices.len(),
        scan_dir.display(),
        config,
        utils::cpus()
    );

    let stage = FeatureExtractionStage::new(config);
    let mut result = FeaturizeResult::default();
    for (idx, case) in loader::case_loader(indices, &scan_dir, &mask_dir) {
        let start = Instant::now();
        let outcome = case.and_then(|case| {
            let table = stage.par_run(&case);
            table.write_npy(out_dir.join(loader::feature_filename(idx)))?;
            Ok(table.len())
        });
        match outcome {
            Ok(candidates) => {
                info!("case #{idx}: {candidates} candidates");
                result.push(
                    idx,
                    CaseOutcome::Done {
                        candidates,
                        elapsed: start.elapsed(),
                    },
                );
            }
            Err(e) => {
                error!("case #{idx}: {e}");
                result.push(idx, CaseOutcome::Failed(e.to_string()));
            }
        }
    }
    Ok(result)
}
