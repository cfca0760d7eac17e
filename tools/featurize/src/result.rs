//! 运行结果.

use std::io::{self, Write};
use std::time::Duration;

/// 单个病例的处理结果.
#[derive(Debug)]
pub enum CaseOutcome {
    /// 成功, 记录候选数与耗时.
    Done {
        candidates: usize,
        elapsed: Duration,
    },

    /// 失败原因.
    Failed(String),
}

/// 全部病例的处理结果.
#[derive(Debug, Default)]
pub struct FeaturizeResult {
    data: Vec<(u32, CaseOutcome)>,
}

impl FeaturizeResult {
    /// 追加一个病例的结果.
    pub fn push(&mut self, idx: u32, outcome: CaseOutcome) {
        self.data.push((idx, outcome));
    }

    /// 将汇总写进 `w` 中.
    fn describe_into<W: Write>(&self, w: &mut W) -> io::Result<()> {
        const S4: &str = "    ";

        let mut done = 0usize;
        let mut candidates = 0usize;
        let mut total = Duration::ZERO;
        for (idx, outcome) in self.data.iter() {
            match outcome {
                CaseOutcome::Done {
                    candidates: n,
                    elapsed,
                } => {
                    done += 1;
                    candidates += n;
                    total += *elapsed;
                    writeln!(w, "{S4}#{idx}: {n} candidates, {} ms", elapsed.as_millis())?;
                }
                CaseOutcome::Failed(e) => writeln!(w, "{S4}#{idx}: FAILED ({e})")?,
            }
        }
        writeln!(w, "Cases: {done} done, {} failed", self.data.len() - done)?;
        writeln!(w, "Candidates in total: {candidates}")?;
        write!(w, "Total machine time: {} ms", total.as_millis())?;
        Ok(())
    }

    /// 打印运行结果.
    pub fn analyze(&self) {
        utils::sep();
        let mut buf = Vec::with_capacity(512);
        match self.describe_into(&mut buf) {
            Ok(()) => println!("{}", String::from_utf8_lossy(&buf)),
            Err(e) => eprintln!("Failed to describe result: {e}"),
        }
        utils::sep();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe() {
        let mut r = FeaturizeResult::default();
        r.push(
            1,
            CaseOutcome::Done {
                candidates: 4,
                elapsed: Duration::from_millis(12),
            },
        );
        r.push(2, CaseOutcome::Failed("missing".to_string()));
        let mut buf = Vec::new();
        r.describe_into(&mut buf).unwrap();
        let s = String::from_utf8(buf).unwrap();
        assert!(s.contains("#1: 4 candidates, 12 ms"));
        assert!(s.contains("#2: FAILED (missing)"));
        assert!(s.contains("Cases: 1 done, 1 failed"));
    }
}
