//! 评估模块
//!
//! 在测试集上评估转向角回归模型，可选地使用蒙特卡洛 Dropout（MCDO）估计认知不确定性，
//! 并与随机、常数两个基线对比，结果以 JSON 文档写入磁盘。
//!
//! # 主要组件
//!
//! - [`compute_predictions_and_gt`]: 逐批次前向，得到预测值、真实值与（MCDO 时的）方差
//! - [`random_baseline`] / [`constant_baseline`]: 由真实值导出的两个基线
//! - [`evaluate_regression`]: 回归评估报告（解释方差、RMSE、残差、最大误差）
//! - [`run`]: 完整的评估流程

pub mod aggregator;
pub mod baseline;
pub mod pipeline;
pub mod report;
mod stats;

#[cfg(test)]
mod tests;

pub use aggregator::{AggregatorConfig, PredictionMode, Predictions, compute_predictions_and_gt};
pub use baseline::{constant_baseline, random_baseline};
pub use pipeline::{EvalConfig, EvalPlan, RunSummary, experiment_output_dir, run};
pub use report::{
    HIGHEST_ERRORS, HighestError, RegressionReport, evaluate_regression, write_to_file,
};
