/*
 * @Author       : 老董
 * @Date         : 2025-12-22
 * @Description  : MaxPool2d (2D 最大池化) 层
 *
 * - 输入格式：[batch_size, channels, H, W]
 * - 输出格式：[batch_size, channels, H', W']
 * - 无填充，向下取整：H' = (H - kernel_h) / stride_h + 1
 *
 * 等价于 PyTorch 的 nn.MaxPool2d(kernel_size, stride)
 */

use ndarray::Array4;

use super::{as_nchw, window_output_size};
use crate::nn::ModelError;
use crate::tensor::Tensor;

/// 池化层没有可学习参数
#[derive(Debug, Clone, Copy)]
pub struct MaxPool2d {
    kernel_size: (usize, usize),
    stride: (usize, usize),
}

impl MaxPool2d {
    /// `stride`为None时默认等于`kernel_size`
    pub fn new(kernel_size: (usize, usize), stride: Option<(usize, usize)>) -> Self {
        Self {
            kernel_size,
            stride: stride.unwrap_or(kernel_size),
        }
    }

    /// 给定输入的 (H, W)，返回输出的 (H', W')；输入比池化窗口还小时返回None
    pub fn output_size(&self, (height, width): (usize, usize)) -> Option<(usize, usize)> {
        Some((
            window_output_size(height, self.kernel_size.0, self.stride.0, 0)?,
            window_output_size(width, self.kernel_size.1, self.stride.1, 0)?,
        ))
    }

    pub fn forward(&self, input: &Tensor) -> Result<Tensor, ModelError> {
        let x = as_nchw(input, "MaxPool2d")?;
        let (batch_size, channels, height, width) = x.dim();
        let (output_h, output_w) = self
            .output_size((height, width))
            .ok_or(ModelError::InputTooSmall {
                layer: "MaxPool2d",
                height,
                width,
            })?;
        let (kernel_h, kernel_w) = self.kernel_size;
        let (stride_h, stride_w) = self.stride;

        let mut output =
            Array4::<f32>::from_elem((batch_size, channels, output_h, output_w), f32::MIN);
        for ((b, c, oi, oj), value) in output.indexed_iter_mut() {
            for ki in 0..kernel_h {
                for kj in 0..kernel_w {
                    *value = value.max(x[[b, c, oi * stride_h + ki, oj * stride_w + kj]]);
                }
            }
        }
        Ok(Tensor::from_array(output.into_dyn()))
    }
}
