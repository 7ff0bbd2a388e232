use ndarray::{Array, ArrayD, IxDyn};
use rand::RngCore;
use rand::distributions::{Distribution, Uniform};

use crate::errors::TensorError;

mod ops {
    pub mod add;
}

mod index;
mod property;
mod shape;

#[cfg(test)]
mod tests;

/// 定义张量的结构体。其可以是标量、向量、矩阵或更高维度的数组。
/// 注：只要通Tensor初始化的都是张量（即使标量也是张量）；
/// 而通常意义上的数字（类型为usize、i32、f64等）就只是纯数（number），在这里不被认为是张量。
///
/// 本crate中常见的形状约定：
/// - 一批图像：`[batch, C, H, W]`；
/// - 一批标签/预测值：`[batch, 1]`。
#[derive(Debug, Clone, PartialEq)]
pub struct Tensor {
    data: Array<f32, IxDyn>,
}

impl Tensor {
    /// 创建一个张量，若为标量，`shape`可以是[]、[1]、[1,1]、[1,1,1]...
    /// 若为向量，`shape`可以是[n]、[1,n]、[n,1]；
    /// 若为矩阵，`shape`可以是[n,m]；
    /// 若为更高维度的数组，`shape`可以是[c,n,m,...]；
    /// 注：`data`的长度必须和`shape`中所有元素的乘积相等（`shape`为`[]`时乘积为1），否则会panic。
    pub fn new(data: &[f32], shape: &[usize]) -> Tensor {
        Self::from_vec(data.to_vec(), shape)
    }

    /// 与`new`相同，但直接接管`data`的所有权而不复制
    pub fn from_vec(data: Vec<f32>, shape: &[usize]) -> Tensor {
        let data_len = data.len();
        let expected = shape.iter().product::<usize>();
        match Array::from_shape_vec(IxDyn(shape), data) {
            Ok(data) => Tensor { data },
            Err(_) => panic!(
                "{}",
                TensorError::DataShapeMismatch {
                    data_len,
                    shape: shape.to_vec(),
                    expected,
                }
            ),
        }
    }

    /// 创建一个所有元素均为`value`的张量
    pub fn new_full(value: f32, shape: &[usize]) -> Tensor {
        Tensor {
            data: Array::from_elem(IxDyn(shape), value),
        }
    }

    /// 创建一个全零张量
    pub fn zeros(shape: &[usize]) -> Tensor {
        Self::new_full(0.0, shape)
    }

    /// 创建一个随机张量，其值在[min, max]的闭区间
    pub fn new_random(min: f32, max: f32, shape: &[usize], rng: &mut dyn RngCore) -> Tensor {
        let uniform = Uniform::from(min..=max);
        let data = (0..shape.iter().product::<usize>())
            .map(|_| uniform.sample(rng))
            .collect::<Vec<_>>();
        Tensor::from_vec(data, shape)
    }

    /// 创建一个服从正态分布`N(mean, std_dev²)`的随机张量（Box-Muller变换）。
    /// 随机数发生器由调用方传入，以便在固定种子时结果可复现。
    pub fn new_normal(mean: f32, std_dev: f32, shape: &[usize], rng: &mut dyn RngCore) -> Tensor {
        let data_len = shape.iter().product::<usize>();
        let mut data = Vec::with_capacity(data_len);
        // 取(0,1]而非[0,1)，避免ln(0)
        let unit = Uniform::from(f32::EPSILON..=1.0);

        while data.len() < data_len {
            let u1 = unit.sample(rng);
            let u2 = unit.sample(rng);
            let r = (-2.0 * u1.ln()).sqrt();
            let theta = 2.0 * std::f32::consts::PI * u2;
            let z0 = mean + std_dev * r * theta.cos();
            let z1 = mean + std_dev * r * theta.sin();

            if z0.is_finite() {
                data.push(z0);
            }
            if data.len() < data_len && z1.is_finite() {
                data.push(z1);
            }
        }

        Tensor::from_vec(data, shape)
    }

    /// 直接由`ndarray`数组构造张量（供crate内部的层计算使用）
    pub(crate) fn from_array(data: ArrayD<f32>) -> Tensor {
        Tensor { data }
    }
}
