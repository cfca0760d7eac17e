//! 对 `ct-nodule::dataset` 的更一层封装. 从环境变量获取路径与配置.

use ct_nodule::dataset::generic::{self, CaseFormat, CaseLoader};
use ct_nodule::dataset::home_dataset_dir_with;
use ct_nodule::toolbox::Connectivity;
use ct_nodule::FeatureConfig;
use std::env;
use std::path::{Path, PathBuf};

/// 读取环境变量 `key`; 未设置或为空时回退到 `$HOME/dataset/{fallback}`.
fn dir_from_env_or_home(key: &str, fallback: &[&str]) -> Option<PathBuf> {
    match env::var(key) {
        Ok(d) if !d.is_empty() => Some(PathBuf::from(d)),
        _ => home_dataset_dir_with(fallback),
    }
}

/// 获取扫描文件目录.
///
/// 1. 若环境变量 `$NODULE_SCAN_DIR` 非空, 则返回其值;
/// 2. 否则, 返回 `$HOME/dataset/nodule/scan`.
pub fn scan_dir_from_env_or_home() -> Option<PathBuf> {
    dir_from_env_or_home("NODULE_SCAN_DIR", &["nodule", "scan"])
}

/// 获取候选掩膜目录.
///
/// 1. 若环境变量 `$NODULE_MASK_DIR` 非空, 则返回其值;
/// 2. 否则, 返回 `$HOME/dataset/nodule/mask`.
pub fn mask_dir_from_env_or_home() -> Option<PathBuf> {
    dir_from_env_or_home("NODULE_MASK_DIR", &["nodule", "mask"])
}

/// 获取特征表输出目录.
///
/// 1. 若环境变量 `$NODULE_OUT_DIR` 非空, 则返回其值;
/// 2. 否则, 返回 `$HOME/dataset/nodule/feature`.
pub fn out_dir_from_env_or_home() -> Option<PathBuf> {
    dir_from_env_or_home("NODULE_OUT_DIR", &["nodule", "feature"])
}

/// 解析连通规则名. 只接受 `face` 与 `full` (不区分大小写).
pub fn parse_connectivity(s: &str) -> Option<Connectivity> {
    match s.trim().to_ascii_lowercase().as_str() {
        "face" => Some(Connectivity::Face),
        "full" => Some(Connectivity::Full),
        _ => None,
    }
}

/// 从环境变量构建特征提取配置. 无法解析的值被忽略, 保留默认值.
///
/// - `$NODULE_CONNECTIVITY`: `face` 或 `full`;
/// - `$NODULE_RING_MARGIN`: 非负整数.
pub fn config_from_env() -> FeatureConfig {
    let mut config = FeatureConfig::default();
    if let Some(c) = env::var("NODULE_CONNECTIVITY")
        .ok()
        .and_then(|s| parse_connectivity(&s))
    {
        config = config.with_connectivity(c);
    }
    if let Some(m) = env::var("NODULE_RING_MARGIN")
        .ok()
        .and_then(|s| s.trim().parse().ok())
    {
        config = config.with_ring_margin(m);
    }
    config
}

/// 扫描文件名.
pub fn scan_filename(idx: u32) -> String {
    format!("scan-{idx}.nii")
}

/// 候选掩膜文件名.
pub fn mask_filename(idx: u32) -> String {
    format!("mask-{idx}.nii")
}

/// 特征表文件名.
pub fn feature_filename(idx: u32) -> String {
    format!("feature-{idx}.npy")
}

/// 在 `scan_dir` 中按 `scan-{idx}.nii` 搜索全部病例编号, 升序返回.
pub fn case_indices(scan_dir: &Path) -> std::io::Result<Vec<u32>> {
    let mut ans = Vec::new();
    for entry in std::fs::read_dir(scan_dir)? {
        let name = entry?.file_name();
        let idx = name
            .to_str()
            .and_then(|n| n.strip_prefix("scan-"))
            .and_then(|n| n.strip_suffix(".nii"))
            .and_then(|n| n.parse().ok());
        if let Some(idx) = idx {
            ans.push(idx);
        }
    }
    ans.sort_unstable();
    Ok(ans)
}

/// 获取 nifti 病例加载器.
pub fn case_loader<I: IntoIterator<Item = u32>>(
    data: I,
    scan_dir: &Path,
    mask_dir: &Path,
) -> CaseLoader {
    generic::case_loader(
        data,
        CaseFormat::Nifti,
        scan_dir,
        scan_filename,
        mask_dir,
        mask_filename,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_connectivity() {
        assert_eq!(parse_connectivity("Face"), Some(Connectivity::Face));
        assert_eq!(parse_connectivity(" full "), Some(Connectivity::Full));
        assert_eq!(parse_connectivity("26"), None);
    }

    #[test]
    fn test_case_indices() {
        let dir = std::env::temp_dir().join(format!("nodule-indices-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        for name in ["scan-3.nii", "scan-1.nii", "mask-2.nii", "scan-x.nii"] {
            std::fs::write(dir.join(name), b"").unwrap();
        }
        assert_eq!(case_indices(&dir).unwrap(), vec![1, 3]);
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
