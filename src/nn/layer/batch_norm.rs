/*
 * @Author       : 老董
 * @Date         : 2026-03-04
 * @Description  : BatchNorm2d 层（仅推理）
 *
 * 推理时使用训练阶段累积的滑动统计量：
 * y = (x - running_mean) / sqrt(running_var + eps) * weight + bias
 */

use ndarray::Axis;

use super::as_nchw;
use crate::nn::{Module, ModelError};
use crate::tensor::Tensor;

const BATCH_NORM_EPS: f32 = 1e-5;

#[derive(Debug, Clone)]
pub struct BatchNorm2d {
    /// 缩放系数 gamma [C]
    weight: Tensor,
    /// 平移系数 beta [C]
    bias: Tensor,
    running_mean: Tensor,
    running_var: Tensor,
    eps: f32,
}

impl BatchNorm2d {
    /// 以恒等变换初始化（gamma=1，beta=0，均值0，方差1）
    pub fn new(num_features: usize) -> Self {
        Self {
            weight: Tensor::new_full(1.0, &[num_features]),
            bias: Tensor::zeros(&[num_features]),
            running_mean: Tensor::zeros(&[num_features]),
            running_var: Tensor::new_full(1.0, &[num_features]),
            eps: BATCH_NORM_EPS,
        }
    }

    pub fn num_features(&self) -> usize {
        self.weight.size()
    }

    pub fn forward(&self, input: &Tensor) -> Result<Tensor, ModelError> {
        let x = as_nchw(input, "BatchNorm2d")?;
        let channels = x.dim().1;
        if channels != self.num_features() {
            return Err(ModelError::ShapeMismatch {
                expected: vec![self.num_features()],
                got: vec![channels],
                message: "BatchNorm2d 输入通道数不匹配".to_string(),
            });
        }

        let gamma = self.weight.to_vec();
        let beta = self.bias.to_vec();
        let mean = self.running_mean.to_vec();
        let var = self.running_var.to_vec();

        let mut output = x.to_owned();
        for (c, mut channel) in output.axis_iter_mut(Axis(1)).enumerate() {
            let scale = gamma[c] / (var[c] + self.eps).sqrt();
            let shift = beta[c] - mean[c] * scale;
            channel.mapv_inplace(|v| v * scale + shift);
        }
        Ok(Tensor::from_array(output.into_dyn()))
    }
}

impl Module for BatchNorm2d {
    fn named_parameters(&self) -> Vec<(String, &Tensor)> {
        vec![
            ("weight".to_string(), &self.weight),
            ("bias".to_string(), &self.bias),
            ("running_mean".to_string(), &self.running_mean),
            ("running_var".to_string(), &self.running_var),
        ]
    }

    fn named_parameters_mut(&mut self) -> Vec<(String, &mut Tensor)> {
        vec![
            ("weight".to_string(), &mut self.weight),
            ("bias".to_string(), &mut self.bias),
            ("running_mean".to_string(), &mut self.running_mean),
            ("running_var".to_string(), &mut self.running_var),
        ]
    }
}
