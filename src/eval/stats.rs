//! 一维统计量（内部以 f64 累加，结果转回 f32）

use ndarray::Array1;

fn to_array(values: &[f32]) -> Array1<f64> {
    values.iter().map(|&v| f64::from(v)).collect()
}

/// 均值；空序列返回None
pub(crate) fn mean(values: &[f32]) -> Option<f32> {
    to_array(values).mean().map(|m| m as f32)
}

/// 总体方差（除以n而非n-1）；空序列返回None
pub(crate) fn population_variance(values: &[f32]) -> Option<f32> {
    if values.is_empty() {
        return None;
    }
    Some(to_array(values).var(0.0).max(0.0) as f32)
}

/// 逐次累加的均值与总体方差（Welford 算法），各分量相互独立
///
/// 只保存均值与二阶中心矩的累加量，内存与观测次数无关。
#[derive(Debug, Clone)]
pub(crate) struct RunningMoments {
    count: usize,
    mean: Array1<f64>,
    m2: Array1<f64>,
}

impl RunningMoments {
    pub(crate) fn new(len: usize) -> Self {
        Self {
            count: 0,
            mean: Array1::zeros(len),
            m2: Array1::zeros(len),
        }
    }

    /// 加入一次观测，长度须与`new`时给定的一致
    pub(crate) fn push(&mut self, values: &[f32]) {
        let x = to_array(values);
        self.count += 1;
        let delta = &x - &self.mean;
        self.mean.scaled_add(1.0 / self.count as f64, &delta);
        self.m2 += &(&delta * &(&x - &self.mean));
    }

    /// (均值, 总体方差)；尚无观测时返回None
    pub(crate) fn finish(&self) -> Option<(Vec<f32>, Vec<f32>)> {
        if self.count == 0 {
            return None;
        }
        let n = self.count as f64;
        let mean = self.mean.iter().map(|&m| m as f32).collect();
        let variance = self.m2.iter().map(|&m| (m / n).max(0.0) as f32).collect();
        Some((mean, variance))
    }
}
