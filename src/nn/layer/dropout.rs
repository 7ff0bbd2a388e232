/*
 * @Author       : 老董
 * @Date         : 2026-03-04
 * @Description  : Dropout 层（inverted dropout）
 *
 * - `ForwardMode::Deterministic`：恒等映射
 * - `ForwardMode::Stochastic`：每个元素以概率 p 置零，其余元素乘以 1/(1-p)，保持期望不变
 *
 * 蒙特卡洛 Dropout 即在推理时以 Stochastic 模式重复前向 T 次。
 */

use rand::{Rng, RngCore};

use crate::nn::{ForwardMode, ModelError};
use crate::tensor::Tensor;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dropout {
    rate: f32,
}

impl Dropout {
    /// `rate`为置零概率，须在[0, 1)内
    pub fn new(rate: f32) -> Result<Self, ModelError> {
        if !(0.0..1.0).contains(&rate) {
            return Err(ModelError::InvalidDropoutRate(rate));
        }
        Ok(Self { rate })
    }

    pub fn forward(&self, input: &Tensor, mode: ForwardMode, rng: &mut dyn RngCore) -> Tensor {
        if !mode.is_stochastic() || self.rate == 0.0 {
            return input.clone();
        }
        let keep = 1.0 - self.rate;
        let scale = 1.0 / keep;
        Tensor::from_array(input.as_array().mapv(|x| {
            if rng.gen_bool(f64::from(keep)) {
                x * scale
            } else {
                0.0
            }
        }))
    }
}
