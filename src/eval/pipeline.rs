/*
 * @Author       : 老董
 * @Date         : 2026-03-08
 * @Description  : 评估流程编排
 *
 * 校验配置 → 载入测试集 → 构建模型并载入检查点 → 聚合预测
 * → 随机/常数基线 → 三份回归报告 → （MCDO 时）认知方差 → 预测值与真实值对照
 *
 * 任何一步出错都会立即中止，已写出的文件保留在磁盘上。
 */

use std::fs;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

use log::{debug, info};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;

use super::aggregator::{AggregatorConfig, PredictionMode, compute_predictions_and_gt};
use super::baseline::{constant_baseline, random_baseline};
use super::report::{evaluate_regression, write_to_file};
use crate::data::{DataLoader, ImageTransform, SteeringDataset};
use crate::errors::EvalError;
use crate::nn::{Device, Model, ModelConfig, ModelKind, load_params};
use crate::vision::ImageMode;

pub const TEST_REGRESSION_FILE: &str = "test_regression.json";
pub const RANDOM_REGRESSION_FILE: &str = "random_regression.json";
pub const CONSTANT_REGRESSION_FILE: &str = "constant_regression.json";
pub const EPISTEMIC_VARIANCES_FILE: &str = "epistemic_variances.json";
pub const PREDICTED_AND_REAL_FILE: &str = "predicted_and_real_steerings.json";

/// 转向角是标量
const OUTPUT_DIM: usize = 1;

/// 一次评估的全部配置
///
/// 图像模式、待测模型和设备以字符串保存，由[`EvalConfig::validate`]统一校验，
/// 因此非法取值会在载入任何数据之前就被报告。
#[derive(Debug, Clone, PartialEq)]
pub struct EvalConfig {
    pub test_dir: PathBuf,
    pub experiment_rootdir: PathBuf,
    pub batch_size: usize,
    pub img_width: usize,
    pub img_height: usize,
    pub crop_img_width: usize,
    pub crop_img_height: usize,
    pub img_mode: String,
    pub model_to_test: String,
    pub is_mcdo: bool,
    /// MCDO 的前向次数 T
    pub samples: usize,
    pub dropout_rate: f32,
    pub device: String,
    /// 为None时使用系统熵源
    pub seed: Option<u64>,
}

impl EvalConfig {
    /// 使用默认超参数
    pub fn new(test_dir: impl Into<PathBuf>, experiment_rootdir: impl Into<PathBuf>) -> Self {
        Self {
            test_dir: test_dir.into(),
            experiment_rootdir: experiment_rootdir.into(),
            batch_size: 32,
            img_width: 320,
            img_height: 240,
            crop_img_width: 200,
            crop_img_height: 200,
            img_mode: "grayscale".to_string(),
            model_to_test: "resnet8".to_string(),
            is_mcdo: false,
            samples: 10,
            dropout_rate: 0.5,
            device: "cpu".to_string(),
            seed: None,
        }
    }

    /// 校验配置并解析为强类型的执行计划
    pub fn validate(&self) -> Result<EvalPlan, EvalError> {
        let img_mode = self
            .img_mode
            .parse::<ImageMode>()
            .map_err(EvalError::Config)?;
        let model_kind = self
            .model_to_test
            .parse::<ModelKind>()
            .map_err(|e| EvalError::Config(e.to_string()))?;
        let device = self.device.parse::<Device>().map_err(EvalError::Config)?;

        for (name, value) in [
            ("batch_size", self.batch_size),
            ("img_width", self.img_width),
            ("img_height", self.img_height),
            ("crop_img_width", self.crop_img_width),
            ("crop_img_height", self.crop_img_height),
        ] {
            if value == 0 {
                return Err(EvalError::Config(format!("{name}必须大于0")));
            }
        }
        if !(0.0..1.0).contains(&self.dropout_rate) {
            return Err(EvalError::Config(format!(
                "dropout_rate 须在[0, 1)内，实际为{}",
                self.dropout_rate
            )));
        }

        let prediction_mode = if self.is_mcdo {
            let samples = NonZeroUsize::new(self.samples)
                .ok_or_else(|| EvalError::Config("MCDO 的前向次数 T 必须大于0".to_string()))?;
            PredictionMode::McDropout { samples }
        } else {
            PredictionMode::Standard
        };

        Ok(EvalPlan {
            transform: ImageTransform {
                mode: img_mode,
                target_size: (self.img_width, self.img_height),
                crop_size: (self.crop_img_width, self.crop_img_height),
            },
            model_kind,
            model_config: ModelConfig {
                img_channels: img_mode.channels(),
                height: self.crop_img_height,
                width: self.crop_img_width,
                output_dim: OUTPUT_DIM,
                dropout_rate: self.dropout_rate,
            },
            aggregator: AggregatorConfig {
                mode: prediction_mode,
                device,
            },
            output_dir: experiment_output_dir(&self.experiment_rootdir, &prediction_mode),
        })
    }
}

/// 校验后的执行计划
#[derive(Debug, Clone, PartialEq)]
pub struct EvalPlan {
    pub transform: ImageTransform,
    pub model_kind: ModelKind,
    pub model_config: ModelConfig,
    pub aggregator: AggregatorConfig,
    pub output_dir: PathBuf,
}

/// 一次评估的结果摘要
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub output_dir: PathBuf,
    pub num_samples: usize,
    /// 模型预测的解释方差
    pub explained_variance: Option<f32>,
    pub rmse: f32,
}

/// `<experiment_rootdir>/MCDO_T<T>` 或 `<experiment_rootdir>/standard`
pub fn experiment_output_dir(experiment_rootdir: &Path, mode: &PredictionMode) -> PathBuf {
    match mode {
        PredictionMode::Standard => experiment_rootdir.join("standard"),
        PredictionMode::McDropout { samples } => {
            experiment_rootdir.join(format!("MCDO_T{samples}"))
        }
    }
}

#[derive(Serialize)]
struct EpistemicVariances<'a> {
    epistemic_variances: &'a [f32],
}

#[derive(Serialize)]
struct PredictedAndReal<'a> {
    pred_steerings: &'a [f32],
    real_steerings: &'a [f32],
}

/// 执行完整的评估流程
pub fn run(config: &EvalConfig) -> Result<RunSummary, EvalError> {
    let plan = config.validate()?;
    info!(
        "评估模型{}（{}，{}）",
        plan.model_kind,
        match plan.aggregator.mode {
            PredictionMode::Standard => "标准推理".to_string(),
            PredictionMode::McDropout { samples } => format!("MCDO，T={samples}"),
        },
        plan.aggregator.device
    );

    info!("载入测试集`{}`", config.test_dir.display());
    let dataset = SteeringDataset::load(&config.test_dir, &plan.transform)?;
    let num_samples = dataset.len();
    if let Some(first) = dataset.image_paths().first() {
        debug!("首个样本`{}`", first.display());
    }
    let loader = DataLoader::new(dataset, config.batch_size);
    info!(
        "共{}个样本，批大小{}，{}个批次",
        num_samples,
        loader.batch_size(),
        loader.num_batches()
    );

    let checkpoint = plan.model_kind.checkpoint_path(&config.experiment_rootdir);
    fs::metadata(&checkpoint).map_err(|e| EvalError::io(&checkpoint, e))?;

    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut model = Model::build(plan.model_kind, &plan.model_config, &mut rng)?;
    load_params(&mut model, &checkpoint)?;
    info!("已载入检查点`{}`", checkpoint.display());

    let predictions = compute_predictions_and_gt(&model, &loader, &plan.aggregator, &mut rng)?;
    let ground_truth = &predictions.ground_truth;

    let random_steerings = random_baseline(ground_truth, &mut rng);
    let constant_steerings = constant_baseline(ground_truth);

    fs::create_dir_all(&plan.output_dir).map_err(|e| EvalError::io(&plan.output_dir, e))?;
    info!("输出目录`{}`", plan.output_dir.display());

    let report = evaluate_regression(
        &predictions.predictions,
        ground_truth,
        &plan.output_dir.join(TEST_REGRESSION_FILE),
    )?;
    evaluate_regression(
        &random_steerings,
        ground_truth,
        &plan.output_dir.join(RANDOM_REGRESSION_FILE),
    )?;
    evaluate_regression(
        &constant_steerings,
        ground_truth,
        &plan.output_dir.join(CONSTANT_REGRESSION_FILE),
    )?;

    if let Some(variances) = &predictions.epistemic_variance {
        write_to_file(
            &EpistemicVariances {
                epistemic_variances: variances,
            },
            &plan.output_dir.join(EPISTEMIC_VARIANCES_FILE),
        )?;
    }
    write_to_file(
        &PredictedAndReal {
            pred_steerings: &predictions.predictions,
            real_steerings: ground_truth,
        },
        &plan.output_dir.join(PREDICTED_AND_REAL_FILE),
    )?;

    Ok(RunSummary {
        output_dir: plan.output_dir,
        num_samples,
        explained_variance: report.evas,
        rmse: report.rmse,
    })
}
