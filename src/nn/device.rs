//! 计算设备
//!
//! 设备作为显式的配置值传入预测流程，生命周期限定在单次评估内，而不是进程级的全局单例。

use std::fmt;
use std::str::FromStr;

/// 计算设备（当前所有张量运算均在 CPU 上同步完成）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Device {
    #[default]
    Cpu,
}

impl FromStr for Device {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cpu" => Ok(Device::Cpu),
            "cuda" | "gpu" | "mps" => Err(format!("当前构建只提供 CPU 算子，无法使用设备`{s}`")),
            other => Err(format!("无法识别的设备`{other}`：请使用'cpu'")),
        }
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Device::Cpu => write!(f, "cpu"),
        }
    }
}
