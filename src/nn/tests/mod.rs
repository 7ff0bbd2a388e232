mod layer_conv2d;
mod layer_misc;
mod save_load;

use crate::nn::Module;
use crate::tensor::Tensor;

/// 按名称覆盖模块中的某个参数
fn set_param<M: Module + ?Sized>(module: &mut M, name: &str, value: Tensor) {
    let mut params = module.named_parameters_mut();
    let (_, tensor) = params
        .iter_mut()
        .find(|(n, _)| n == name)
        .unwrap_or_else(|| panic!("参数{name}不存在"));
    assert_eq!(tensor.shape(), value.shape());
    **tensor = value;
}
