/*
 * @Author       : 老董
 * @Date         : 2026-03-04
 * @Description  : 前向计算模式
 *
 * 与训练时的全局 train/eval 开关不同，这里的模式作为参数显式传给每一次前向计算，
 * 随机正则层（dropout）只在被要求时才生效，不会泄漏到其他调用中。
 */

/// 前向计算模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ForwardMode {
    /// 常规推理：dropout 关闭，结果确定
    #[default]
    Deterministic,
    /// 蒙特卡洛 Dropout：推理时仍保持 dropout 开启，每次前向结果不同
    Stochastic,
}

impl ForwardMode {
    pub const fn is_stochastic(&self) -> bool {
        matches!(self, ForwardMode::Stochastic)
    }
}
