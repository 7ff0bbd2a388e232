/*
 * @Author       : 老董
 * @Date         : 2026-03-07
 * @Description  : 预测聚合：逐批次得到模型预测与真实值
 *
 * - 标准模式：每个批次一次确定性前向
 * - MCDO 模式：每个批次 T 次随机前向（dropout 保持开启），
 *   对每个样本取 T 次结果的均值作为预测值、总体方差（除以 T）作为认知不确定性，
 *   均值与方差逐次累加，不保留 T 次前向的全部输出
 */

use std::num::NonZeroUsize;

use log::debug;
use rand::RngCore;

use super::stats::RunningMoments;
use crate::data::{DataLoader, Dataset};
use crate::errors::EvalError;
use crate::nn::{Device, ForwardMode, ModelError, SteeringModel};
use crate::tensor::Tensor;

/// 预测模式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PredictionMode {
    /// 一次确定性前向，不给出方差
    Standard,
    /// 蒙特卡洛 Dropout：`samples`次随机前向
    McDropout { samples: NonZeroUsize },
}

impl PredictionMode {
    /// 每个批次的前向次数
    pub fn passes(&self) -> usize {
        match self {
            PredictionMode::Standard => 1,
            PredictionMode::McDropout { samples } => samples.get(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AggregatorConfig {
    pub mode: PredictionMode,
    pub device: Device,
}

/// 与数据集顺序一致、长度相同的预测值、真实值和（可选的）认知方差
#[derive(Debug, Clone, PartialEq)]
pub struct Predictions {
    pub predictions: Vec<f32>,
    pub ground_truth: Vec<f32>,
    /// 仅 MCDO 模式下存在，每个元素都非负
    pub epistemic_variance: Option<Vec<f32>>,
}

impl Predictions {
    pub fn len(&self) -> usize {
        self.predictions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.predictions.is_empty()
    }
}

/// 在整个数据集上计算预测值与真实值
///
/// 模型只以不可变引用借用，批次之间不共享任何可变状态。
/// 批次解码失败时返回`EvalError::Data`，模型前向失败时返回`EvalError::Model`。
pub fn compute_predictions_and_gt<M: SteeringModel + ?Sized, D: Dataset>(
    model: &M,
    loader: &DataLoader<D>,
    config: &AggregatorConfig,
    rng: &mut dyn RngCore,
) -> Result<Predictions, EvalError> {
    let mut predictions = Vec::with_capacity(loader.len());
    let mut ground_truth = Vec::with_capacity(loader.len());
    let mut variances = match config.mode {
        PredictionMode::Standard => None,
        PredictionMode::McDropout { .. } => Some(Vec::with_capacity(loader.len())),
    };

    for (batch_index, batch) in loader.iter().enumerate() {
        let (images, labels) = batch?;
        let batch_size = images.shape()[0];
        debug!(
            "批次{}/{}：{}个样本，{}次前向（{}）",
            batch_index + 1,
            loader.num_batches(),
            batch_size,
            config.mode.passes(),
            config.device
        );

        match config.mode {
            PredictionMode::Standard => {
                let output = model.forward(&images, ForwardMode::Deterministic, rng)?;
                predictions.extend(flatten_output(&output, batch_size)?);
            }
            PredictionMode::McDropout { samples } => {
                let mut moments = RunningMoments::new(batch_size);
                for _ in 0..samples.get() {
                    let output = model.forward(&images, ForwardMode::Stochastic, rng)?;
                    moments.push(&flatten_output(&output, batch_size)?);
                }
                let Some((mean, variance)) = moments.finish() else {
                    return Err(ModelError::ShapeMismatch {
                        expected: vec![1],
                        got: vec![0],
                        message: "至少需要一次前向".to_string(),
                    }
                    .into());
                };
                predictions.extend(mean);
                if let Some(variances) = variances.as_mut() {
                    variances.extend(variance);
                }
            }
        }
        ground_truth.extend(labels.to_vec());
    }

    Ok(Predictions {
        predictions,
        ground_truth,
        epistemic_variance: variances,
    })
}

/// 模型输出须为 [batch, 1] 或 [batch]
fn flatten_output(output: &Tensor, batch_size: usize) -> Result<Vec<f32>, ModelError> {
    match output.shape() {
        [b, 1] | [b] if *b == batch_size => Ok(output.to_vec()),
        other => Err(ModelError::ShapeMismatch {
            expected: vec![batch_size, 1],
            got: other.to_vec(),
            message: "转向角模型的输出必须是 [batch, 1]".to_string(),
        }),
    }
}
