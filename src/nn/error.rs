/*
 * @Author       : 老董
 * @Date         : 2026-03-04
 * @Description  : 推理网络（层、模型、检查点）的错误类型
 */

use std::path::PathBuf;

use thiserror::Error;

/// 模型构建、检查点载入与前向计算中的错误
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("未知模型`{0}`：待测模型只能是'resnet8'或'resnet8_MCDO'")]
    UnknownModel(String),

    #[error("dropout 比例须在[0, 1)内，实际为{0}")]
    InvalidDropoutRate(f32),

    #[error("输入尺寸{height}x{width}过小，无法通过{layer}")]
    InputTooSmall {
        layer: &'static str,
        height: usize,
        width: usize,
    },

    #[error("{message}：期望{expected:?}，实际{got:?}")]
    ShapeMismatch {
        expected: Vec<usize>,
        got: Vec<usize>,
        message: String,
    },

    #[error("张量布局错误：{0}")]
    Layout(#[from] ndarray::ShapeError),

    #[error("检查点`{path}`读写失败：{source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("无效的检查点`{path}`：{message}")]
    InvalidCheckpoint { path: PathBuf, message: String },

    #[error("检查点中缺少参数`{0}`")]
    MissingParameter(String),

    #[error("参数`{name}`形状不匹配：模型为{expected:?}，检查点为{got:?}")]
    ParameterShapeMismatch {
        name: String,
        expected: Vec<usize>,
        got: Vec<usize>,
    },
}
