//! 内置数据集
//!
//! - Steering：按实验目录组织的转向角回归测试集（DroNet 风格目录结构）

mod steering;

pub use steering::{STEERING_LABEL_FILE, SteeringDataset};
