//! 由真实值导出的两个基线预测器

use rand::RngCore;

use super::stats::{mean, population_variance};
use crate::tensor::Tensor;

/// 随机基线：从`Normal(mean(G), |std(G)|)`中独立采样，长度与真实值相同
pub fn random_baseline(ground_truth: &[f32], rng: &mut dyn RngCore) -> Vec<f32> {
    let (Some(mean), Some(variance)) = (mean(ground_truth), population_variance(ground_truth))
    else {
        return Vec::new();
    };
    Tensor::new_normal(mean, variance.sqrt().abs(), &[ground_truth.len()], rng).to_vec()
}

/// 常数基线：每个样本都预测真实值的均值
pub fn constant_baseline(ground_truth: &[f32]) -> Vec<f32> {
    mean(ground_truth)
        .map(|mean| vec![mean; ground_truth.len()])
        .unwrap_or_default()
}
