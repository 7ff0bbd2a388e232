/*
 * @Author       : 老董
 * @Date         : 2024-01-31 20:23:53
 * @LastEditors  : 老董
 * @LastEditTime : 2026-03-06 09:12:40
 * @Description  : 负责推理网络（neural network）的构建：层、转向角模型与参数检查点
 */

pub mod device;
mod error;
pub mod layer;
mod mode;
pub mod model;
mod module;
pub mod serialization;

pub use device::Device;
pub use error::ModelError;
pub use mode::ForwardMode;
pub use model::{Model, ModelConfig, ModelKind, ResNet8, ResNet8Mcdo, SteeringModel};
pub use module::{Module, prefixed};
pub use serialization::{load_params, save_params};

#[cfg(test)]
mod tests;
