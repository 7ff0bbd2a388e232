//! 命令行参数
//!
//! 长参数名沿用下划线风格（如`--batch_size`、`--is_MCDO`、`--T`），与训练脚本的参数保持一致，
//! 解析后转换为库层的[`EvalConfig`]。

use std::path::PathBuf;

use clap::{Parser, ValueHint};

use crate::eval::EvalConfig;

#[derive(Debug, Clone, Parser)]
#[command(
    name = "steer_eval",
    version,
    about = "评估转向角回归模型（可选蒙特卡洛 Dropout），输出 JSON 评估报告"
)]
pub struct EvalFlags {
    /// 批大小
    #[arg(
        long = "batch_size",
        default_value_t = 32,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub batch_size: u64,

    /// 测试集根目录（其下每个子目录为一个实验）
    #[arg(long = "test_dir", value_hint = ValueHint::DirPath)]
    pub test_dir: PathBuf,

    /// 缩放后的图像宽度
    #[arg(long = "img_width", default_value_t = 320)]
    pub img_width: usize,

    /// 缩放后的图像高度
    #[arg(long = "img_height", default_value_t = 240)]
    pub img_height: usize,

    /// 裁剪后的图像宽度
    #[arg(long = "crop_img_width", default_value_t = 200)]
    pub crop_img_width: usize,

    /// 裁剪后的图像高度
    #[arg(long = "crop_img_height", default_value_t = 200)]
    pub crop_img_height: usize,

    /// 图像模式：grayscale 或 rgb
    #[arg(long = "img_mode", default_value = "grayscale")]
    pub img_mode: String,

    /// 待测模型：resnet8 或 resnet8_MCDO
    #[arg(long = "model_to_test", default_value = "resnet8")]
    pub model_to_test: String,

    /// 是否使用蒙特卡洛 Dropout
    #[arg(long = "is_MCDO")]
    pub is_mcdo: bool,

    /// MCDO 的前向次数
    #[arg(long = "T", default_value_t = 10)]
    pub samples: usize,

    /// dropout 比例
    #[arg(long = "dropout_rate", default_value_t = 0.5)]
    pub dropout_rate: f32,

    /// 实验根目录：检查点所在处，结果也写在其下
    #[arg(long = "experiment_rootdir", value_hint = ValueHint::DirPath)]
    pub experiment_rootdir: PathBuf,

    /// 计算设备
    #[arg(long = "device", default_value = "cpu")]
    pub device: String,

    /// 随机种子（影响 MCDO 的 dropout 掩码与随机基线）；不指定时使用系统熵源
    #[arg(long = "seed")]
    pub seed: Option<u64>,
}

impl From<EvalFlags> for EvalConfig {
    fn from(flags: EvalFlags) -> Self {
        Self {
            test_dir: flags.test_dir,
            experiment_rootdir: flags.experiment_rootdir,
            batch_size: flags.batch_size as usize,
            img_width: flags.img_width,
            img_height: flags.img_height,
            crop_img_width: flags.crop_img_width,
            crop_img_height: flags.crop_img_height,
            img_mode: flags.img_mode,
            model_to_test: flags.model_to_test,
            is_mcdo: flags.is_mcdo,
            samples: flags.samples,
            dropout_rate: flags.dropout_rate,
            device: flags.device,
            seed: flags.seed,
        }
    }
}
