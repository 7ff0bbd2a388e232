use super::Tensor;
use crate::errors::TensorError;
use ndarray::{Axis, Slice};

impl Tensor {
    pub fn reshape(&self, shape: &[usize]) -> Self {
        let new_total_elements: usize = shape.iter().product();
        assert!(
            self.size() == new_total_elements,
            "{}",
            TensorError::DataShapeMismatch {
                data_len: self.size(),
                shape: shape.to_vec(),
                expected: new_total_elements,
            }
        );
        Self::from_vec(self.to_vec(), shape)
    }

    /// 将多个形状相同的张量沿新增的首个维度堆叠起来，返回一个新的张量。
    /// 如：n个形状为`[C, H, W]`的图像张量堆叠后形状为`[n, C, H, W]`。
    pub fn stack(tensors: &[&Self]) -> Self {
        assert!(!tensors.is_empty(), "{}", TensorError::EmptyList);

        let first_shape = tensors[0].shape();
        assert!(
            tensors.iter().all(|t| t.shape() == first_shape),
            "{}",
            TensorError::InconsistentShape
        );

        // 只复制一次：各张量的视图直接写入新数组
        let views = tensors.iter().map(|t| t.data.view()).collect::<Vec<_>>();
        match ndarray::stack(Axis(0), &views) {
            Ok(data) => Self { data },
            Err(_) => panic!("{}", TensorError::InconsistentShape),
        }
    }

    /// 沿首个维度截取`[start, end)`区间（克隆），如从`[N, C, H, W]`中取出`[end-start, C, H, W]`
    pub fn slice_first(&self, start: usize, end: usize) -> Self {
        Self {
            data: self
                .data
                .slice_axis(Axis(0), Slice::from(start..end))
                .to_owned(),
        }
    }
}
