/*
 * @Author       : 老董
 * @Date         : 2023-08-30 19:16:48
 * @LastEditors  : 老董
 * @LastEditTime : 2026-03-03 09:21:47
 * @Description  : 本模块提供计算机视觉相关的功能：图像载入、灰度/彩色转换、缩放与裁剪，
 *                 以及转为`[C, H, W]`格式的张量。
 *                 在本模块中，不严谨地说：
 *                 1. 所谓的image/图像是指RGB格式的图像；
 *                 2. “灰度”（图）等同于英文中luma、luminance、grey、gray的概念。
 */

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use image::{DynamicImage, GenericImageView};

use crate::data::DataError;
use crate::tensor::Tensor;


/// 图像模式（决定模型输入的通道数）
#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub enum ImageMode {
    Rgb,
    Grayscale,
}

impl ImageMode {
    /// 该模式下图像张量的通道数
    pub const fn channels(&self) -> usize {
        match self {
            ImageMode::Rgb => 3,
            ImageMode::Grayscale => 1,
        }
    }
}

impl FromStr for ImageMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "rgb" => Ok(ImageMode::Rgb),
            "grayscale" => Ok(ImageMode::Grayscale),
            other => Err(format!(
                "无法识别的图像模式`{other}`：请使用'grayscale'或'rgb'"
            )),
        }
    }
}

impl fmt::Display for ImageMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ImageMode::Rgb => "rgb",
            ImageMode::Grayscale => "grayscale",
        };
        write!(f, "{name}")
    }
}

pub struct Vision;

impl Vision {
    /// 将本地的图像载入为`DynamicImage`
    pub fn open_image(path: &Path) -> Result<DynamicImage, DataError> {
        if !path.is_file() {
            return Err(DataError::FileNotFound(path.to_path_buf()));
        }
        image::open(path).map_err(|source| DataError::Image {
            path: path.to_path_buf(),
            source,
        })
    }

    /// 调整图像大小（基于整幅图像的缩放）；尺寸已相同时原样返回
    /// * `width` - 调整后的宽度
    /// * `height` - 调整后的高度
    ///
    /// 这里特意用`resize`而不是`reshape`，只为强调其只会改变尺寸，而不会改变张量本身的维度。
    pub fn resize_image(image: DynamicImage, width: usize, height: usize) -> DynamicImage {
        let (w, h) = image.dimensions();
        if w as usize == width && h as usize == height {
            return image;
        }
        image.resize_exact(
            width as u32,
            height as u32,
            image::imageops::FilterType::Triangle,
        )
    }

    /// 中心裁剪：水平方向居中，垂直方向贴紧图像底部（道路所在区域）
    /// * `crop_width` - 裁剪后的宽度
    /// * `crop_height` - 裁剪后的高度
    pub fn central_crop(
        image: &DynamicImage,
        crop_width: usize,
        crop_height: usize,
    ) -> Result<DynamicImage, DataError> {
        let (width, height) = image.dimensions();
        let (width, height) = (width as usize, height as usize);
        if crop_width > width || crop_height > height {
            return Err(DataError::CropTooLarge {
                crop: (crop_width, crop_height),
                image: (width, height),
            });
        }
        let x = width / 2 - crop_width / 2;
        let y = height - crop_height;
        Ok(image.crop_imm(x as u32, y as u32, crop_width as u32, crop_height as u32))
    }

    /// 按给定图像模式将图像转为`[C, H, W]`格式的张量，像素值保持在[0, 255]
    pub fn to_chw_tensor(image: &DynamicImage, mode: ImageMode) -> Tensor {
        let (width, height) = image.dimensions();
        let (width, height) = (width as usize, height as usize);
        let channels = mode.channels();
        // `image`库的原始缓冲区是HWC（交错）布局
        let hwc = match mode {
            ImageMode::Grayscale => image.to_luma8().into_raw(),
            ImageMode::Rgb => image.to_rgb8().into_raw(),
        };

        let mut chw = vec![0.0; channels * height * width];
        for y in 0..height {
            for x in 0..width {
                for c in 0..channels {
                    chw[(c * height + y) * width + x] = hwc[(y * width + x) * channels + c] as f32;
                }
            }
        }
        Tensor::new(&chw, &[channels, height, width])
    }
}
