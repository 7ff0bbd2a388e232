use crate::tensor::Tensor;

/// 逐元素 ReLU：`max(x, 0)`
pub fn relu(input: &Tensor) -> Tensor {
    Tensor::from_array(input.as_array().mapv(|x| x.max(0.0)))
}
