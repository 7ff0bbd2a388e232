/*
 * @Author       : 老董
 * @Date         : 2025-12-22
 * @Description  : Linear (全连接) 层 - PyTorch 风格 API，仅推理
 *
 * 输入：[batch_size, in_features]
 * 输出：[batch_size, out_features]
 * 计算：output = x · Wᵀ + b（W 的形状为 [out_features, in_features]，与 PyTorch 一致）
 */

use ndarray::{Ix1, Ix2};
use rand::RngCore;

use crate::nn::{Module, ModelError};
use crate::tensor::Tensor;

#[derive(Debug, Clone)]
pub struct Linear {
    /// 权重 [out_features, in_features]
    weight: Tensor,
    /// 偏置 [out_features]
    bias: Tensor,
}

impl Linear {
    /// 创建新的 Linear 层，权重按 Kaiming 正态分布初始化，偏置为0
    pub fn new(in_features: usize, out_features: usize, rng: &mut dyn RngCore) -> Self {
        let std_dev = (2.0 / in_features as f32).sqrt();
        Self {
            weight: Tensor::new_normal(0.0, std_dev, &[out_features, in_features], rng),
            bias: Tensor::zeros(&[out_features]),
        }
    }

    pub fn in_features(&self) -> usize {
        self.weight.shape()[1]
    }

    pub fn out_features(&self) -> usize {
        self.weight.shape()[0]
    }

    pub fn forward(&self, input: &Tensor) -> Result<Tensor, ModelError> {
        let x = input
            .view()
            .into_dimensionality::<Ix2>()
            .ok()
            .filter(|x| x.ncols() == self.in_features())
            .ok_or_else(|| ModelError::ShapeMismatch {
                expected: vec![0, self.in_features()], // 首维为batch
                got: input.shape().to_vec(),
                message: "Linear 输入必须是 [batch, in_features]".to_string(),
            })?;
        let weight = self.weight.view().into_dimensionality::<Ix2>()?;
        let bias = self.bias.view().into_dimensionality::<Ix1>()?;

        let mut output = x.dot(&weight.t());
        output += &bias;
        Ok(Tensor::from_array(output.into_dyn()))
    }
}

impl Module for Linear {
    fn named_parameters(&self) -> Vec<(String, &Tensor)> {
        vec![
            ("weight".to_string(), &self.weight),
            ("bias".to_string(), &self.bias),
        ]
    }

    fn named_parameters_mut(&mut self) -> Vec<(String, &mut Tensor)> {
        vec![
            ("weight".to_string(), &mut self.weight),
            ("bias".to_string(), &mut self.bias),
        ]
    }
}
