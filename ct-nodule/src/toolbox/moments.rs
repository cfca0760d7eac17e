//! 一维样本的统计矩.
//!
//! 空样本或单元素样本不会 panic, 相应结果为 NaN.

/// 样本均值. 空样本返回 NaN.
pub fn mean(sample: &[f64]) -> f64 {
    sample.iter().sum::<f64>() / sample.len() as f64
}

/// 样本最小值. 空样本返回 `+inf`.
pub fn min(sample: &[f64]) -> f64 {
    sample.iter().copied().fold(f64::INFINITY, f64::min)
}

/// 样本标准差 (分母为 `n - 1`).
pub fn std_dev(sample: &[f64]) -> f64 {
    let n = sample.len() as f64;
    let m = mean(sample);
    let ss: f64 = sample.iter().map(|v| (v - m).powi(2)).sum();
    (ss / (n - 1.0)).sqrt()
}

/// 有偏偏度 `m3 / m2^(3/2)`.
pub fn skewness(sample: &[f64]) -> f64 {
    let (m2, m3, _) = central_moments(sample);
    m3 / m2.powf(1.5)
}

/// 有偏峰度 `m4 / m2^2`. 正态分布约为 3 (不是超额峰度).
pub fn kurtosis(sample: &[f64]) -> f64 {
    let (m2, _, m4) = central_moments(sample);
    m4 / m2.powi(2)
}

/// 二、三、四阶中心矩 (分母为 `n`).
fn central_moments(sample: &[f64]) -> (f64, f64, f64) {
    let n = sample.len() as f64;
    let m = mean(sample);
    let (mut m2, mut m3, mut m4) = (0.0, 0.0, 0.0);
    for d in sample.iter().map(|v| v - m) {
        let d2 = d * d;
        m2 += d2;
        m3 += d2 * d;
        m4 += d2 * d2;
    }
    (m2 / n, m3 / n, m4 / n)
}

/// 一次性计算的样本描述统计量.
#[derive(Copy, Clone, Debug)]
pub struct Moments {
    /// 均值.
    pub mean: f64,

    /// 最小值.
    pub min: f64,

    /// 标准差 (`n - 1`).
    pub std_dev: f64,

    /// 有偏偏度.
    pub skewness: f64,

    /// 有偏峰度.
    pub kurtosis: f64,
}

impl Moments {
    /// 计算 `sample` 的描述统计量.
    pub fn of(sample: &[f64]) -> Self {
        Self {
            mean: mean(sample),
            min: min(sample),
            std_dev: std_dev(sample),
            skewness: skewness(sample),
            kurtosis: kurtosis(sample),
        }
    }
}
