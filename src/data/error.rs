//! 数据加载错误类型定义

use std::path::PathBuf;
use thiserror::Error;

/// 数据加载相关错误
#[derive(Debug, Error)]
pub enum DataError {
    /// 文件未找到
    #[error("文件未找到: {0}")]
    FileNotFound(PathBuf),

    /// IO 错误
    #[error("IO 错误: {0}")]
    IoError(#[from] std::io::Error),

    /// 图像解码错误
    #[error("图像 {path} 解码失败: {source}")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// 格式错误（如标签文件中出现无法解析的数值）
    #[error("格式错误: {0}")]
    FormatError(String),

    /// 某个实验目录中图像与标签数量不一致
    #[error("{experiment} 中图像数量 {images} 与标签数量 {labels} 不一致")]
    LabelCountMismatch {
        experiment: PathBuf,
        images: usize,
        labels: usize,
    },

    /// 裁剪尺寸超过了图像尺寸，(宽, 高)
    #[error("裁剪尺寸 {crop:?} 超过了图像尺寸 {image:?}")]
    CropTooLarge {
        crop: (usize, usize),
        image: (usize, usize),
    },

    /// 形状不匹配
    #[error("形状不匹配: 期望 {expected:?}, 实际 {got:?}")]
    ShapeMismatch {
        expected: Vec<usize>,
        got: Vec<usize>,
    },

    /// 数据集中没有任何样本
    #[error("数据集为空: {0}")]
    EmptyDataset(PathBuf),
}
