/*
 * @Author       : 老董
 * @Date         : 2025-12-22
 * @Description  : Conv2d (2D 卷积) 层 - PyTorch 风格 API，仅推理
 *
 * 输入/输出形状：
 * - 输入：[batch_size, in_channels, H, W]
 * - 输出：[batch_size, out_channels, H', W']
 *
 * 输出尺寸计算：
 * H' = (H + 2*padding_h - kernel_h) / stride_h + 1
 * W' = (W + 2*padding_w - kernel_w) / stride_w + 1
 *
 * 计算：对每个样本先做 im2col，再与展平的卷积核做一次矩阵乘法，output = K · cols + b
 */

use ndarray::{Array2, Array4, Axis, s};
use rand::RngCore;

use super::{as_nchw, window_output_size};
use crate::nn::{Module, ModelError};
use crate::tensor::Tensor;

/// Conv2d (2D 卷积) 层
///
/// # 使用示例
/// ```ignore
/// let conv = Conv2d::new(1, 32, (5, 5), (2, 2), (2, 2), &mut rng);
/// let h = relu(&conv.forward(&x)?);
/// ```
#[derive(Debug, Clone)]
pub struct Conv2d {
    /// 卷积核参数 [out_channels, in_channels, kernel_h, kernel_w]
    weight: Tensor,
    /// 偏置参数 [out_channels]
    bias: Tensor,
    /// 步长 (stride_h, stride_w)
    stride: (usize, usize),
    /// 填充 (padding_h, padding_w)
    padding: (usize, usize),
}

impl Conv2d {
    /// 创建新的 Conv2d 层，卷积核按 Kaiming 正态分布初始化，偏置为0
    ///
    /// # 参数
    /// - `in_channels`: 输入通道数
    /// - `out_channels`: 输出通道数
    /// - `kernel_size`: 卷积核大小 (kH, kW)
    /// - `stride`: 步长 (sH, sW)
    /// - `padding`: 填充 (pH, pW)
    pub fn new(
        in_channels: usize,
        out_channels: usize,
        kernel_size: (usize, usize),
        stride: (usize, usize),
        padding: (usize, usize),
        rng: &mut dyn RngCore,
    ) -> Self {
        let fan_in = in_channels * kernel_size.0 * kernel_size.1;
        let std_dev = (2.0 / fan_in as f32).sqrt();
        Self {
            weight: Tensor::new_normal(
                0.0,
                std_dev,
                &[out_channels, in_channels, kernel_size.0, kernel_size.1],
                rng,
            ),
            bias: Tensor::zeros(&[out_channels]),
            stride,
            padding,
        }
    }

    pub fn in_channels(&self) -> usize {
        self.weight.shape()[1]
    }

    pub fn out_channels(&self) -> usize {
        self.weight.shape()[0]
    }

    pub fn kernel_size(&self) -> (usize, usize) {
        (self.weight.shape()[2], self.weight.shape()[3])
    }

    /// 给定输入的 (H, W)，返回输出的 (H', W')；输入过小时返回None
    pub fn output_size(&self, (height, width): (usize, usize)) -> Option<(usize, usize)> {
        let (kernel_h, kernel_w) = self.kernel_size();
        Some((
            window_output_size(height, kernel_h, self.stride.0, self.padding.0)?,
            window_output_size(width, kernel_w, self.stride.1, self.padding.1)?,
        ))
    }

    pub fn forward(&self, input: &Tensor) -> Result<Tensor, ModelError> {
        let x = as_nchw(input, "Conv2d")?;
        let (batch_size, channels, height, width) = x.dim();
        let in_channels = self.in_channels();
        let out_channels = self.out_channels();
        if channels != in_channels {
            return Err(ModelError::ShapeMismatch {
                expected: vec![in_channels],
                got: vec![channels],
                message: "Conv2d 输入通道数与卷积核输入通道数不匹配".to_string(),
            });
        }

        let (output_h, output_w) = self
            .output_size((height, width))
            .ok_or(ModelError::InputTooSmall {
                layer: "Conv2d",
                height,
                width,
            })?;
        let (kernel_h, kernel_w) = self.kernel_size();
        let (stride_h, stride_w) = self.stride;
        let (pad_h, pad_w) = self.padding;

        let kernel = self
            .weight
            .view()
            .into_shape((out_channels, in_channels * kernel_h * kernel_w))?;
        let bias = self.bias.to_vec();

        let mut cols =
            Array2::<f32>::zeros((in_channels * kernel_h * kernel_w, output_h * output_w));
        let mut output = Array4::<f32>::zeros((batch_size, out_channels, output_h, output_w));

        for b in 0..batch_size {
            // im2col：每一行对应卷积核中的一个位置，每一列对应一个输出像素；填充区域保持为0
            cols.fill(0.0);
            for c in 0..in_channels {
                for ki in 0..kernel_h {
                    for kj in 0..kernel_w {
                        let row = (c * kernel_h + ki) * kernel_w + kj;
                        for oi in 0..output_h {
                            let Some(i) = (oi * stride_h + ki).checked_sub(pad_h) else {
                                continue;
                            };
                            if i >= height {
                                continue;
                            }
                            for oj in 0..output_w {
                                let Some(j) = (oj * stride_w + kj).checked_sub(pad_w) else {
                                    continue;
                                };
                                if j >= width {
                                    continue;
                                }
                                cols[[row, oi * output_w + oj]] = x[[b, c, i, j]];
                            }
                        }
                    }
                }
            }

            let mut result = kernel.dot(&cols);
            for (o, mut row) in result.axis_iter_mut(Axis(0)).enumerate() {
                row.mapv_inplace(|v| v + bias[o]);
            }
            output
                .slice_mut(s![b, .., .., ..])
                .assign(&result.into_shape((out_channels, output_h, output_w))?);
        }

        Ok(Tensor::from_array(output.into_dyn()))
    }
}

impl Module for Conv2d {
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
