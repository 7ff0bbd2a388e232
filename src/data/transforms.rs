//! 数据变换函数
//!
//! 提供测试图像的预处理：缩放、中心裁剪、灰度/彩色转换与像素归一化。

use std::path::Path;

use crate::data::error::DataError;
use crate::tensor::Tensor;
use crate::vision::{ImageMode, Vision};

/// 将 0-255 像素值归一化到 0-1
///
/// # 参数
/// - `tensor`: 输入 Tensor，值范围 [0, 255]
///
/// # 返回
/// 归一化后的 Tensor，值范围 [0, 1]
pub fn normalize_pixels(tensor: &Tensor) -> Tensor {
    Tensor::from_array(tensor.as_array().mapv(|x| x / 255.0))
}

/// 单张测试图像的预处理流程
///
/// 载入 → 缩放到 `target_size`（尺寸不同时）→ 底部居中裁剪到 `crop_size`
/// → 按 `mode` 转为 `[C, H, W]` → 像素归一化到 [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageTransform {
    /// 图像模式（灰度/彩色）
    pub mode: ImageMode,
    /// 缩放目标尺寸 (宽, 高)
    pub target_size: (usize, usize),
    /// 裁剪尺寸 (宽, 高)
    pub crop_size: (usize, usize),
}

impl ImageTransform {
    /// 变换后单张图像张量的形状 `[C, H, W]`
    pub const fn output_shape(&self) -> [usize; 3] {
        [self.mode.channels(), self.crop_size.1, self.crop_size.0]
    }

    /// 载入并预处理一张图像
    pub fn load(&self, path: &Path) -> Result<Tensor, DataError> {
        let image = Vision::open_image(path)?;
        let image = Vision::resize_image(image, self.target_size.0, self.target_size.1);
        let image = Vision::central_crop(&image, self.crop_size.0, self.crop_size.1)?;
        Ok(normalize_pixels(&Vision::to_chw_tensor(&image, self.mode)))
    }
}
