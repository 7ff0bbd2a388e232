/*
 * @Author       : 老董
 * @Date         : 2026-03-02
 * @Description  : 全局错误类型：张量错误（程序性错误，直接panic）与评估流程错误（向上传播）
 */

use std::path::PathBuf;

use thiserror::Error;

use crate::data::DataError;
use crate::nn::ModelError;

/// 张量相关的错误。这类错误属于调用方的编程错误，张量本身以`panic!`的方式抛出
#[derive(Error, Debug, PartialEq, Eq)]
pub enum TensorError {
    #[error("数据长度{data_len}与形状{shape:?}所需的元素个数{expected}不一致")]
    DataShapeMismatch {
        data_len: usize,
        shape: Vec<usize>,
        expected: usize,
    },
    #[error("形状不一致，故无法相加：第一个张量的形状为{tensor1_shape:?}，第二个张量的形状为{tensor2_shape:?}")]
    AddShapeMismatch {
        tensor1_shape: Vec<usize>,
        tensor2_shape: Vec<usize>,
    },
    #[error("张量列表为空")]
    EmptyList,
    #[error("张量形状不一致")]
    InconsistentShape,
}

/// 评估流程中可能出现的所有错误
///
/// 分类：
/// - `Config`：配置（命令行参数）不合法，在加载任何数据或模型之前就会报出；
/// - `Io`：路径不存在、无法创建输出目录、无法写文件等；
/// - `Data`/`Model`：数据集或模型（检查点）相关的错误；
/// - `LengthMismatch`：预测值与真实值的数量不一致。
///
/// 任何一步出错都会中止整个评估，已经写出的文件不会被回滚。
#[derive(Error, Debug)]
pub enum EvalError {
    #[error("配置错误：{0}")]
    Config(String),

    #[error("路径`{path}`读写失败：{source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Data(#[from] DataError),

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error("长度不一致：预测值{predictions}个，真实值{ground_truth}个")]
    LengthMismatch {
        predictions: usize,
        ground_truth: usize,
    },

    #[error("JSON 序列化失败：{0}")]
    Json(#[from] serde_json::Error),
}

impl EvalError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
