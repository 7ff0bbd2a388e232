//! 数据加载模块
//!
//! 提供测试集加载、图像预处理和顺序批处理功能。
//!
//! # 主要组件
//!
//! - [`DataLoader`]: `PyTorch` 风格的数据批量加载器（评估用，从不打乱）
//! - [`Dataset`]: 按区间取批次的数据集抽象
//! - [`TensorDataset`]: 持有特征和标签的内存数据集
//! - [`SteeringDataset`]: 转向角回归测试集（按批次延迟解码图像）
//! - [`transforms`]: 图像变换（缩放、裁剪、归一化）
//! - [`DataError`]: 数据加载错误类型
//!
//! # 使用示例
//!
//! ```ignore
//! use steer_eval::data::{DataLoader, SteeringDataset, ImageTransform};
//!
//! let dataset = SteeringDataset::load(test_dir, &transform)?;
//! let loader = DataLoader::new(dataset, 32);
//!
//! for batch in loader.iter() {
//!     let (images, steerings) = batch?;
//!     // images: [B, C, H, W]，steerings: [B, 1]
//! }
//! ```

mod dataloader;
pub mod datasets;
pub mod error;
pub mod transforms;


// Re-exports
pub use dataloader::{DataLoader, DataLoaderIterator, Dataset, TensorDataset};
pub use datasets::{STEERING_LABEL_FILE, SteeringDataset};
pub use error::DataError;
pub use transforms::ImageTransform;
