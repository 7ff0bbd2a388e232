//! 转向角回归测试数据集
//!
//! 目录结构（每个子目录是一次录制/实验）：
//! ```text
//! <test_dir>/
//! ├── <experiment_a>/
//! │   ├── images/            # *.png / *.jpg / *.jpeg
//! │   └── sync_steering.txt  # 每行一个转向角，与按文件名排序后的图像一一对应
//! └── <experiment_b>/
//!     └── ...
//! ```
//!
//! 实验目录按名称排序遍历，实验内图像按文件名排序，因此样本顺序在每次运行中都是确定的。

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, warn};

use crate::data::dataloader::Dataset;
use crate::data::error::DataError;
use crate::data::transforms::ImageTransform;
use crate::tensor::Tensor;

/// 转向角标签文件名
pub const STEERING_LABEL_FILE: &str = "sync_steering.txt";

const IMAGE_DIR: &str = "images";
const IMAGE_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

/// 转向角测试数据集
///
/// 载入时只收集图像路径和标签，图像在取批次时才解码，内存占用与批大小成正比。
#[derive(Debug, Clone)]
pub struct SteeringDataset {
    /// 每个样本对应的图像路径
    image_paths: Vec<PathBuf>,
    /// 转向角，与`image_paths`一一对应
    steerings: Vec<f32>,
    transform: ImageTransform,
}

impl SteeringDataset {
    /// 从`root`下的所有实验目录载入测试集
    ///
    /// 缺少`images/`或`sync_steering.txt`的子目录会被跳过（并给出警告）。
    /// 第一张图像会被立即解码一次，以便尽早发现预处理参数与图像尺寸不符。
    pub fn load(root: &Path, transform: &ImageTransform) -> Result<Self, DataError> {
        if !root.is_dir() {
            return Err(DataError::FileNotFound(root.to_path_buf()));
        }

        let mut experiments = fs::read_dir(root)?
            .map(|entry| entry.map(|e| e.path()))
            .collect::<Result<Vec<_>, _>>()?;
        experiments.retain(|p| p.is_dir());
        experiments.sort();

        let mut steerings = Vec::new();
        let mut image_paths = Vec::new();

        for experiment in &experiments {
            let label_path = experiment.join(STEERING_LABEL_FILE);
            let image_dir = experiment.join(IMAGE_DIR);
            if !label_path.is_file() || !image_dir.is_dir() {
                warn!(
                    "跳过实验目录 {}：缺少 {IMAGE_DIR}/ 或 {STEERING_LABEL_FILE}",
                    experiment.display()
                );
                continue;
            }

            let labels = parse_steering_file(&label_path)?;
            let paths = list_images(&image_dir)?;
            if labels.len() != paths.len() {
                return Err(DataError::LabelCountMismatch {
                    experiment: experiment.clone(),
                    images: paths.len(),
                    labels: labels.len(),
                });
            }
            debug!("实验 {}：{} 个样本", experiment.display(), paths.len());

            image_paths.extend(paths);
            steerings.extend(labels);
        }

        let Some(first) = image_paths.first() else {
            return Err(DataError::EmptyDataset(root.to_path_buf()));
        };
        transform.load(first)?;

        Ok(Self {
            image_paths,
            steerings,
            transform: *transform,
        })
    }

    /// 获取样本数量
    pub fn len(&self) -> usize {
        self.image_paths.len()
    }

    /// 检查数据集是否为空
    pub fn is_empty(&self) -> bool {
        self.image_paths.is_empty()
    }

    /// 每个样本对应的图像路径（与样本顺序一致）
    pub fn image_paths(&self) -> &[PathBuf] {
        &self.image_paths
    }

    /// 转向角（与样本顺序一致）
    pub fn steerings(&self) -> &[f32] {
        &self.steerings
    }
}

impl Dataset for SteeringDataset {
    fn len(&self) -> usize {
        SteeringDataset::len(self)
    }

    /// 解码`[start, end)`范围内的图像，返回 ([n, C, H, W], [n, 1])
    fn batch(&self, start: usize, end: usize) -> Result<(Tensor, Tensor), DataError> {
        let images = self.image_paths[start..end]
            .iter()
            .map(|path| self.transform.load(path))
            .collect::<Result<Vec<_>, _>>()?;
        let image_refs = images.iter().collect::<Vec<_>>();
        let steerings = Tensor::from_vec(self.steerings[start..end].to_vec(), &[end - start, 1]);
        Ok((Tensor::stack(&image_refs), steerings))
    }
}

/// 解析`sync_steering.txt`：每个非空行取第一个（逗号或空白分隔的）字段为转向角，`#`开头的行视为注释
///
/// 第一个内容行若不是数字则视为 CSV 表头跳过；之后的行必须都能解析。
fn parse_steering_file(path: &Path) -> Result<Vec<f32>, DataError> {
    let content = fs::read_to_string(path)?;
    let mut steerings = Vec::new();
    let mut first_line = true;

    for (i, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let field = line
            .split(|c: char| c == ',' || c.is_whitespace())
            .next()
            .unwrap_or(line);
        match field.parse::<f32>() {
            Ok(value) => steerings.push(value),
            Err(_) if first_line => {
                debug!("{} 第 1 个内容行视为表头：`{line}`", path.display());
            }
            Err(e) => {
                return Err(DataError::FormatError(format!(
                    "{} 第 {} 行无法解析为转向角 `{field}`: {e}",
                    path.display(),
                    i + 1
                )));
            }
        }
        first_line = false;
    }

    Ok(steerings)
}

/// 列出目录下的所有图像文件（按文件名排序）
fn list_images(dir: &Path) -> Result<Vec<PathBuf>, DataError> {
    let mut paths = fs::read_dir(dir)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<Result<Vec<_>, _>>()?;
    paths.retain(|p| {
        p.is_file()
            && p.extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
    });
    paths.sort();
    Ok(paths)
}
