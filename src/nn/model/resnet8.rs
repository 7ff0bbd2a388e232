/*
 * @Author       : 老董
 * @Date         : 2026-03-05
 * @Description  : ResNet8（DroNet 结构）及其 MCDO 变体
 *
 * 结构：
 *   conv 5x5/2 (32) → maxpool 3/2
 *   → 3 个残差块（32、64、128 通道），每块：
 *        主路径 BN → ReLU → conv 3x3/2 → BN → ReLU → conv 3x3/1
 *        旁路   conv 1x1/2
 *        输出 = 主路径 + 旁路
 *   → flatten → ReLU → dropout → linear(output_dim)
 *
 * MCDO 变体在每个残差块之后再加一个 dropout。
 */

use rand::RngCore;

use crate::nn::layer::{BatchNorm2d, Conv2d, Dropout, Linear, MaxPool2d, relu};
use crate::nn::model::{ModelConfig, SteeringModel};
use crate::nn::module::prefixed;
use crate::nn::{ForwardMode, Module, ModelError};
use crate::tensor::Tensor;

/// 三个残差块的输出通道数
pub const RESNET8_FILTERS: [usize; 3] = [32, 64, 128];

#[derive(Debug, Clone)]
struct ResidualBlock {
    bn1: BatchNorm2d,
    conv1: Conv2d,
    bn2: BatchNorm2d,
    conv2: Conv2d,
    shortcut: Conv2d,
}

impl ResidualBlock {
    fn new(in_channels: usize, out_channels: usize, rng: &mut dyn RngCore) -> Self {
        Self {
            bn1: BatchNorm2d::new(in_channels),
            conv1: Conv2d::new(in_channels, out_channels, (3, 3), (2, 2), (1, 1), rng),
            bn2: BatchNorm2d::new(out_channels),
            conv2: Conv2d::new(out_channels, out_channels, (3, 3), (1, 1), (1, 1), rng),
            shortcut: Conv2d::new(in_channels, out_channels, (1, 1), (2, 2), (0, 0), rng),
        }
    }

    fn output_size(&self, size: (usize, usize)) -> Option<(usize, usize)> {
        self.conv2.output_size(self.conv1.output_size(size)?)
    }

    fn forward(&self, x: &Tensor) -> Result<Tensor, ModelError> {
        let main = self.conv1.forward(&relu(&self.bn1.forward(x)?))?;
        let main = self.conv2.forward(&relu(&self.bn2.forward(&main)?))?;
        let shortcut = self.shortcut.forward(x)?;
        Ok(&main + &shortcut)
    }
}

impl Module for ResidualBlock {
    fn named_parameters(&self) -> Vec<(String, &Tensor)> {
        [
            prefixed("bn1", self.bn1.named_parameters()),
            prefixed("conv1", self.conv1.named_parameters()),
            prefixed("bn2", self.bn2.named_parameters()),
            prefixed("conv2", self.conv2.named_parameters()),
            prefixed("shortcut", self.shortcut.named_parameters()),
        ]
        .concat()
    }

    fn named_parameters_mut(&mut self) -> Vec<(String, &mut Tensor)> {
        let mut params = prefixed("bn1", self.bn1.named_parameters_mut());
        params.extend(prefixed("conv1", self.conv1.named_parameters_mut()));
        params.extend(prefixed("bn2", self.bn2.named_parameters_mut()));
        params.extend(prefixed("conv2", self.conv2.named_parameters_mut()));
        params.extend(prefixed("shortcut", self.shortcut.named_parameters_mut()));
        params
    }
}

/// ResNet8 的卷积部分（两个变体共享）
#[derive(Debug, Clone)]
pub struct ResNet8Backbone {
    conv1: Conv2d,
    pool: MaxPool2d,
    blocks: [ResidualBlock; 3],
    input_shape: [usize; 3],
    flat_features: usize,
}

impl ResNet8Backbone {
    /// 输入过小、无法通过全部下采样时返回`ModelError::InputTooSmall`
    pub fn new(
        img_channels: usize,
        height: usize,
        width: usize,
        rng: &mut dyn RngCore,
    ) -> Result<Self, ModelError> {
        let conv1 = Conv2d::new(img_channels, RESNET8_FILTERS[0], (5, 5), (2, 2), (2, 2), rng);
        let pool = MaxPool2d::new((3, 3), Some((2, 2)));
        let blocks = [
            ResidualBlock::new(RESNET8_FILTERS[0], RESNET8_FILTERS[0], rng),
            ResidualBlock::new(RESNET8_FILTERS[0], RESNET8_FILTERS[1], rng),
            ResidualBlock::new(RESNET8_FILTERS[1], RESNET8_FILTERS[2], rng),
        ];

        let too_small = |layer| ModelError::InputTooSmall {
            layer,
            height,
            width,
        };
        let size = conv1
            .output_size((height, width))
            .ok_or_else(|| too_small("conv1"))?;
        let mut size = pool.output_size(size).ok_or_else(|| too_small("maxpool"))?;
        for block in &blocks {
            size = block
                .output_size(size)
                .ok_or_else(|| too_small("残差块"))?;
        }

        Ok(Self {
            conv1,
            pool,
            blocks,
            input_shape: [img_channels, height, width],
            flat_features: RESNET8_FILTERS[2] * size.0 * size.1,
        })
    }

    /// 展平后送入全连接层的特征数
    pub fn flat_features(&self) -> usize {
        self.flat_features
    }

    pub fn input_shape(&self) -> [usize; 3] {
        self.input_shape
    }

    /// 返回 ReLU 之后的展平特征 [batch, flat_features]
    ///
    /// `block_dropout`不为None时，在每个残差块之后按`mode`施加 dropout
    pub fn forward(
        &self,
        images: &Tensor,
        block_dropout: Option<&Dropout>,
        mode: ForwardMode,
        rng: &mut dyn RngCore,
    ) -> Result<Tensor, ModelError> {
        let shape = images.shape();
        if shape.len() != 4 || shape[1..] != self.input_shape {
            let mut expected = vec![0]; // 首维为batch
            expected.extend_from_slice(&self.input_shape);
            return Err(ModelError::ShapeMismatch {
                expected,
                got: shape.to_vec(),
                message: "ResNet8 输入图像形状不匹配".to_string(),
            });
        }
        let batch_size = shape[0];

        let mut x = self.pool.forward(&self.conv1.forward(images)?)?;
        for block in &self.blocks {
            x = block.forward(&x)?;
            if let Some(dropout) = block_dropout {
                x = dropout.forward(&x, mode, rng);
            }
        }
        Ok(relu(&x.reshape(&[batch_size, self.flat_features])))
    }
}

impl Module for ResNet8Backbone {
    fn named_parameters(&self) -> Vec<(String, &Tensor)> {
        let mut params = prefixed("conv1", self.conv1.named_parameters());
        for (i, block) in self.blocks.iter().enumerate() {
            params.extend(prefixed(&format!("block{}", i + 1), block.named_parameters()));
        }
        params
    }

    fn named_parameters_mut(&mut self) -> Vec<(String, &mut Tensor)> {
        let mut params = prefixed("conv1", self.conv1.named_parameters_mut());
        for (i, block) in self.blocks.iter_mut().enumerate() {
            params.extend(prefixed(
                &format!("block{}", i + 1),
                block.named_parameters_mut(),
            ));
        }
        params
    }
}

/// ResNet8：仅在全连接层前有 dropout
#[derive(Debug, Clone)]
pub struct ResNet8 {
    backbone: ResNet8Backbone,
    dropout: Dropout,
    head: Linear,
}

impl ResNet8 {
    pub fn new(config: &ModelConfig, rng: &mut dyn RngCore) -> Result<Self, ModelError> {
        let backbone = ResNet8Backbone::new(config.img_channels, config.height, config.width, rng)?;
        let head = Linear::new(backbone.flat_features(), config.output_dim, rng);
        Ok(Self {
            backbone,
            dropout: Dropout::new(config.dropout_rate)?,
            head,
        })
    }
}

impl SteeringModel for ResNet8 {
    fn forward(
        &self,
        images: &Tensor,
        mode: ForwardMode,
        rng: &mut dyn RngCore,
    ) -> Result<Tensor, ModelError> {
        let features = self.backbone.forward(images, None, mode, rng)?;
        self.head.forward(&self.dropout.forward(&features, mode, rng))
    }

    fn input_shape(&self) -> [usize; 3] {
        self.backbone.input_shape()
    }
}

impl Module for ResNet8 {
    fn named_parameters(&self) -> Vec<(String, &Tensor)> {
        let mut params = self.backbone.named_parameters();
        params.extend(prefixed("head", self.head.named_parameters()));
        params
    }

    fn named_parameters_mut(&mut self) -> Vec<(String, &mut Tensor)> {
        let mut params = self.backbone.named_parameters_mut();
        params.extend(prefixed("head", self.head.named_parameters_mut()));
        params
    }
}

/// ResNet8 的 MCDO 变体：每个残差块之后也有 dropout
#[derive(Debug, Clone)]
pub struct ResNet8Mcdo {
    backbone: ResNet8Backbone,
    dropout: Dropout,
    head: Linear,
}

impl ResNet8Mcdo {
    pub fn new(config: &ModelConfig, rng: &mut dyn RngCore) -> Result<Self, ModelError> {
        let backbone = ResNet8Backbone::new(config.img_channels, config.height, config.width, rng)?;
        let head = Linear::new(backbone.flat_features(), config.output_dim, rng);
        Ok(Self {
            backbone,
            dropout: Dropout::new(config.dropout_rate)?,
            head,
        })
    }
}

impl SteeringModel for ResNet8Mcdo {
    fn forward(
        &self,
        images: &Tensor,
        mode: ForwardMode,
        rng: &mut dyn RngCore,
    ) -> Result<Tensor, ModelError> {
        let features = self
            .backbone
            .forward(images, Some(&self.dropout), mode, rng)?;
        self.head.forward(&self.dropout.forward(&features, mode, rng))
    }

    fn input_shape(&self) -> [usize; 3] {
        self.backbone.input_shape()
    }
}

impl Module for ResNet8Mcdo {
    fn named_parameters(&self) -> Vec<(String, &Tensor)> {
        let mut params = self.backbone.named_parameters();
        params.extend(prefixed("head", self.head.named_parameters()));
        params
    }

    fn named_parameters_mut(&mut self) -> Vec<(String, &mut Tensor)> {
        let mut params = self.backbone.named_parameters_mut();
        params.extend(prefixed("head", self.head.named_parameters_mut()));
        params
    }
}
