/*
 * @Author       : 老董
 * @Date         : 2026-03-07
 * @Description  : 回归评估报告：解释方差、RMSE、残差与误差最大的样本
 */

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use log::info;
use serde::Serialize;

use super::stats::population_variance;
use crate::errors::EvalError;

/// 报告中列出的最大误差样本数
pub const HIGHEST_ERRORS: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HighestError {
    pub index: usize,
    /// 预测值 - 真实值
    pub residual: f32,
}

/// 一组预测相对于真实值的回归统计
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegressionReport {
    /// 解释方差 `1 - Var(G - P) / Var(G)`；真实值方差为0时无定义（JSON 中为 null）
    pub evas: Option<f32>,
    /// 均方根误差；没有样本时为0
    pub rmse: f32,
    /// 每个样本的残差`P - G`，顺序与数据集一致
    pub residuals: Vec<f32>,
    /// 按|残差|降序（相同时下标小者在前）的前`HIGHEST_ERRORS`个样本
    pub highest_errors: Vec<HighestError>,
}

impl RegressionReport {
    pub fn compute(predictions: &[f32], ground_truth: &[f32]) -> Result<Self, EvalError> {
        if predictions.len() != ground_truth.len() {
            return Err(EvalError::LengthMismatch {
                predictions: predictions.len(),
                ground_truth: ground_truth.len(),
            });
        }

        let residuals: Vec<f32> = predictions
            .iter()
            .zip(ground_truth)
            .map(|(p, g)| p - g)
            .collect();

        let evas = match (
            population_variance(ground_truth),
            population_variance(&residuals),
        ) {
            (Some(var_gt), Some(var_res)) if var_gt > 0.0 => Some(1.0 - var_res / var_gt),
            _ => None,
        };

        let rmse = if residuals.is_empty() {
            0.0
        } else {
            let mse = residuals
                .iter()
                .map(|&r| f64::from(r) * f64::from(r))
                .sum::<f64>()
                / residuals.len() as f64;
            mse.sqrt() as f32
        };

        let mut order: Vec<usize> = (0..residuals.len()).collect();
        // 稳定排序，|残差|相同时保持下标升序
        order.sort_by(|&a, &b| residuals[b].abs().total_cmp(&residuals[a].abs()));
        let highest_errors = order
            .into_iter()
            .take(HIGHEST_ERRORS)
            .map(|index| HighestError {
                index,
                residual: residuals[index],
            })
            .collect();

        Ok(Self {
            evas,
            rmse,
            residuals,
            highest_errors,
        })
    }
}

/// 计算回归报告并写入`path`（覆盖已有文件）
///
/// 父目录不存在时返回 I/O 错误，由调用方负责创建。
pub fn evaluate_regression(
    predictions: &[f32],
    ground_truth: &[f32],
    path: &Path,
) -> Result<RegressionReport, EvalError> {
    let report = RegressionReport::compute(predictions, ground_truth)?;
    write_to_file(&report, path)?;
    match report.evas {
        Some(evas) => info!(
            "`{}`：解释方差{evas:.4}，RMSE {:.4}",
            path.display(),
            report.rmse
        ),
        None => info!(
            "`{}`：真实值方差为0，解释方差无定义，RMSE {:.4}",
            path.display(),
            report.rmse
        ),
    }
    Ok(report)
}

/// 以带缩进的 JSON 写文件
pub fn write_to_file<T: Serialize + ?Sized>(value: &T, path: &Path) -> Result<(), EvalError> {
    let file = File::create(path).map_err(|e| EvalError::io(path, e))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, value)?;
    writer.flush().map_err(|e| EvalError::io(path, e))?;
    Ok(())
}
