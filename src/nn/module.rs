/*
 * @Author       : 老董
 * @Date         : 2026-01-09
 * @Description  : Module trait 定义
 */

use crate::tensor::Tensor;

/// 模块 trait：所有持有参数的层与模型都实现它
///
/// # 设计原则
/// - `forward()` **不是** trait 方法（签名各异）
/// - `new()` **不是** trait 方法（参数各异）
/// - 参数以 `PyTorch` 风格的点分名称暴露（如 `block1.conv1.weight`），用于检查点的保存/载入
///
/// # 使用示例
///
/// ```ignore
/// struct Head {
///     fc: Linear,
/// }
///
/// impl Module for Head {
///     fn named_parameters(&self) -> Vec<(String, &Tensor)> {
///         prefixed("fc", self.fc.named_parameters())
///     }
///
///     fn named_parameters_mut(&mut self) -> Vec<(String, &mut Tensor)> {
///         prefixed("fc", self.fc.named_parameters_mut())
///     }
/// }
/// ```
pub trait Module {
    /// 获取所有参数（含 BatchNorm 的滑动统计量）
    fn named_parameters(&self) -> Vec<(String, &Tensor)>;

    /// 获取所有参数的可变引用（载入检查点时使用）
    fn named_parameters_mut(&mut self) -> Vec<(String, &mut Tensor)>;

    /// 获取参数张量数量
    fn num_params(&self) -> usize {
        self.named_parameters().len()
    }

    /// 获取标量参数总数
    fn num_elements(&self) -> usize {
        self.named_parameters().iter().map(|(_, t)| t.size()).sum()
    }
}

/// 给一组参数名加上`prefix.`前缀
pub fn prefixed<T>(prefix: &str, params: Vec<(String, T)>) -> Vec<(String, T)> {
    params
        .into_iter()
        .map(|(name, tensor)| (format!("{prefix}.{name}"), tensor))
        .collect()
}
