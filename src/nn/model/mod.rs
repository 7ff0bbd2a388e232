/*
 * @Author       : 老董
 * @Date         : 2026-03-05
 * @Description  : 转向角回归模型：统一的 SteeringModel trait 与按名称选择的模型变体
 */

mod resnet8;

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use enum_dispatch::enum_dispatch;
use rand::RngCore;

use crate::nn::{ForwardMode, Module, ModelError};
use crate::tensor::Tensor;

pub use resnet8::{RESNET8_FILTERS, ResNet8, ResNet8Backbone, ResNet8Mcdo};

/// 将一批图像映射为标量（转向角）预测的模型
///
/// 随机行为（dropout）完全由`mode`参数决定，模型本身不持有任何 train/eval 状态，
/// 因此`forward`只需要`&self`，同一个模型可被安全地重复调用。
#[enum_dispatch]
pub trait SteeringModel: Module {
    /// - `images`: [batch, C, H, W]
    /// - 返回: [batch, output_dim]
    fn forward(
        &self,
        images: &Tensor,
        mode: ForwardMode,
        rng: &mut dyn RngCore,
    ) -> Result<Tensor, ModelError>;

    /// 模型期望的单张图像形状 [C, H, W]
    fn input_shape(&self) -> [usize; 3];
}

/// 可被评估的模型变体
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelKind {
    /// 仅在全连接层前有一个 dropout
    ResNet8,
    /// 每个残差块之后也有 dropout，专为蒙特卡洛 Dropout 设计
    ResNet8Mcdo,
}

impl ModelKind {
    pub const fn name(&self) -> &'static str {
        match self {
            ModelKind::ResNet8 => "resnet8",
            ModelKind::ResNet8Mcdo => "resnet8_MCDO",
        }
    }

    /// 该模型在实验根目录下的检查点路径：`<experiment_root>/<model_name>.pt`
    pub fn checkpoint_path(&self, experiment_root: &Path) -> PathBuf {
        experiment_root.join(format!("{}.pt", self.name()))
    }
}

impl FromStr for ModelKind {
    type Err = ModelError;

    /// 严格匹配，任何其他名称都会报错（不会回退到 resnet8）
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "resnet8" => Ok(ModelKind::ResNet8),
            "resnet8_MCDO" => Ok(ModelKind::ResNet8Mcdo),
            other => Err(ModelError::UnknownModel(other.to_string())),
        }
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// 构建模型所需的超参数
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelConfig {
    pub img_channels: usize,
    pub height: usize,
    pub width: usize,
    pub output_dim: usize,
    pub dropout_rate: f32,
}

#[enum_dispatch(SteeringModel)]
#[derive(Debug, Clone)]
pub enum Model {
    ResNet8,
    ResNet8Mcdo,
}

impl Model {
    /// 按变体构建模型（参数随机初始化，随后通常会从检查点载入）
    pub fn build(
        kind: ModelKind,
        config: &ModelConfig,
        rng: &mut dyn RngCore,
    ) -> Result<Self, ModelError> {
        Ok(match kind {
            ModelKind::ResNet8 => ResNet8::new(config, rng)?.into(),
            ModelKind::ResNet8Mcdo => ResNet8Mcdo::new(config, rng)?.into(),
        })
    }

    pub fn kind(&self) -> ModelKind {
        match self {
            Model::ResNet8(_) => ModelKind::ResNet8,
            Model::ResNet8Mcdo(_) => ModelKind::ResNet8Mcdo,
        }
    }
}

impl Module for Model {
    fn named_parameters(&self) -> Vec<(String, &Tensor)> {
        match self {
            Model::ResNet8(model) => model.named_parameters(),
            Model::ResNet8Mcdo(model) => model.named_parameters(),
        }
    }

    fn named_parameters_mut(&mut self) -> Vec<(String, &mut Tensor)> {
        match self {
            Model::ResNet8(model) => model.named_parameters_mut(),
            Model::ResNet8Mcdo(model) => model.named_parameters_mut(),
        }
    }
}
