//! 批量提取结节候选特征.
//!
//! 从 `$NODULE_SCAN_DIR` 与 `$NODULE_MASK_DIR` (默认 `$HOME/dataset/nodule/{scan, mask}`)
//! 读取 `scan-{i}.nii` 与 `mask-{i}.nii`, 将特征表写入 `$NODULE_OUT_DIR/feature-{i}.npy`.
//! 日志级别由 `$RUST_LOG` 控制, 默认 `info`.

use log::LevelFilter;
use simple_logger::SimpleLogger;

mod result;
mod runner;

fn main() {
    if let Err(e) = SimpleLogger::new()
        .with_level(LevelFilter::Info)
        .env()
        .init()
    {
        eprintln!("Failed to install logger: {e}");
    }

    match runner::run() {
        Ok(result) => result.analyze(),
        Err(e) => {
            log::error!("{e}");
            std::process::exit(1);
        }
    }
}
