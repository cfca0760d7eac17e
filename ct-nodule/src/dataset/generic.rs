//! 通用病例 (scan + mask) 数据加载器.
//!
//! 提供迭代器风格的数据集获取模式.

use crate::data::{NoduleCase, Spacing};
use crate::error::FeatureError;
use std::path::{Path, PathBuf};

/// 文件名构造器. 接受数据集索引数, 获得文件名.
pub type FilenameBuilder = fn(u32) -> String;

/// 病例文件格式.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum CaseFormat {
    /// nifti 文件, 分辨率取自 scan 的 header.
    Nifti,

    /// npy 文件. npy 不携带分辨率, 全部病例共用给定值.
    Npy(Spacing),
}

impl CaseFormat {
    /// 按该格式打开一个病例.
    pub fn open(&self, scan: &Path, mask: &Path) -> Result<NoduleCase, FeatureError> {
        match *self {
            CaseFormat::Nifti => NoduleCase::open(scan, mask),
            CaseFormat::Npy(spacing) => NoduleCase::open_npy(scan, mask, spacing),
        }
    }
}

/// 从指定索引、路径、文件名构造器来创建通用的病例加载器.
///
/// # 注意
///
/// 1. `data` 的所有取值 `value` 必须在 `scan_path` 下有形如
///   `scan_builder(value)` 的文件, 否则加载器在迭代时会返回 `Result::Error`.
/// 2. `data` 的所有取值 `value` 必须在 `mask_path` 下有形如
///   `mask_builder(value)` 的文件, 否则加载器在迭代时会返回 `Result::Error`.
pub fn case_loader<I: IntoIterator<Item = u32>, P: AsRef<Path>>(
    data: I,
    format: CaseFormat,
    scan_path: P,
    scan_builder: FilenameBuilder,
    mask_path: P,
    mask_builder: FilenameBuilder,
) -> CaseLoader {
    let mut data: Vec<u32> = data.into_iter().collect();
    data.reverse();

    CaseLoader {
        format,
        scan_path: scan_path.as_ref().to_owned(),
        scan_builder,
        mask_path: mask_path.as_ref().to_owned(),
        mask_builder,
        data_rev: data,
    }
}

/// 病例数据集 (scan + mask) 加载器, 并在内部自动转换文件名.
#[derive(Debug)]
pub struct CaseLoader {
    format: CaseFormat,
    scan_path: PathBuf,
    scan_builder: FilenameBuilder,
    mask_path: PathBuf,
    mask_builder: FilenameBuilder,
    data_rev: Vec<u32>,
}

impl Iterator for CaseLoader {
    type Item = (u32, Result<NoduleCase, FeatureError>);

    fn next(&mut self) -> Option<Self::Item> {
        let idx = self.data_rev.pop()?;

        self.scan_path.push((self.scan_builder)(idx));
        self.mask_path.push((self.mask_builder)(idx));
        let data = self.format.open(&self.scan_path, &self.mask_path);
        self.mask_path.pop();
        self.scan_path.pop();

        Some((idx, data))
    }
}

impl ExactSizeIterator for CaseLoader {
    #[inline]
    fn len(&self) -> usize {
        self.data_rev.len()
    }
}
