/*
 * @Author       : 老董
 * @Date         : 2025-12-22
 * @Description  : Layer 模块 - 只用于推理的常见网络层（Batch-First，输入均为 [batch, ...]）
 *
 * 参数命名与 PyTorch 保持一致（weight / bias / running_mean / running_var），
 * 便于从其他框架导出的权重转换到本crate的检查点格式。
 */

mod activation;
mod batch_norm;
mod conv2d;
mod dropout;
mod linear;
mod max_pool2d;

pub use activation::relu;
pub use batch_norm::BatchNorm2d;
pub use conv2d::Conv2d;
pub use dropout::Dropout;
pub use linear::Linear;
pub use max_pool2d::MaxPool2d;

use crate::nn::ModelError;
use crate::tensor::Tensor;
use ndarray::{ArrayView4, Ix4};

/// 将输入视为 `[batch, C, H, W]`，否则报形状错误
pub(crate) fn as_nchw<'a>(
    input: &'a Tensor,
    layer: &str,
) -> Result<ArrayView4<'a, f32>, ModelError> {
    input
        .view()
        .into_dimensionality::<Ix4>()
        .map_err(|_| ModelError::ShapeMismatch {
            expected: vec![0, 0, 0, 0], // 占位
            got: input.shape().to_vec(),
            message: format!("{layer} 输入必须是 4D [batch, C, H, W]"),
        })
}

/// 滑动窗口的输出尺寸：`(size + 2*padding - kernel) / stride + 1`，放不下一个窗口时返回None
pub(crate) const fn window_output_size(
    size: usize,
    kernel: usize,
    stride: usize,
    padding: usize,
) -> Option<usize> {
    if size + 2 * padding < kernel || stride == 0 {
        None
    } else {
        Some((size + 2 * padding - kernel) / stride + 1)
    }
}
