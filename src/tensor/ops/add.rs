/*
 * @Author       : 老董
 * @Date         : 2023-08-17 17:24:24
 * @LastEditors  : 老董
 * @LastEditTime : 2026-03-02 10:40:05
 * @Description  : 张量的加法，实现了两个形状严格一致的张量“逐元素”相加的运算，并返回一个新的张量。
 *                 残差块中主路径与旁路（shortcut）的合并即用此运算。
 */

use crate::errors::TensorError;
use crate::tensor::Tensor;
use std::ops::Add;

impl Add for &Tensor {
    type Output = Tensor;

    fn add(self, other: &Tensor) -> Tensor {
        assert!(
            self.is_same_shape(other),
            "{}",
            TensorError::AddShapeMismatch {
                tensor1_shape: self.shape().to_vec(),
                tensor2_shape: other.shape().to_vec(),
            }
        );
        Tensor {
            data: &self.data + &other.data,
        }
    }
}

impl Add for Tensor {
    type Output = Tensor;

    fn add(self, other: Tensor) -> Tensor {
        &self + &other
    }
}
