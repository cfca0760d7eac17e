//! 🫁欢迎光临🩻
//!
//! 涵盖了本 crate 一系列常用的功能.

pub use crate::{Idx2d, Idx3d};

pub use crate::config::FeatureConfig;
pub use crate::consts::{slot, FEATURE_LEN};
pub use crate::data::{CandidateMask, NoduleCase, NoduleScan, Spacing};
pub use crate::error::FeatureError;
pub use crate::feature::{FeatureExtractionStage, FeatureTable, FeatureVector};
pub use crate::toolbox::Connectivity;

pub use crate::dataset::home_dataset_dir_with;
pub use crate::dataset::{self, generic};
