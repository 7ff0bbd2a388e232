/*
 * @Author       : 老董
 * @Date         : 2025-01-21
 * @LastEditors  : 老董
 * @LastEditTime : 2026-03-03 15:02:11
 * @Description  : 顺序批处理：评估时按数据集原有顺序逐批取出 (图像, 转向角)
 *
 * 与训练用的 DataLoader 不同，这里从不打乱，预测值与真实值因此能逐一对齐。
 * 数据集只在取批次时才产出张量，磁盘上的图像可以按批解码，不必整体驻留内存。
 */

use crate::data::error::DataError;
use crate::tensor::Tensor;

/// 可按下标区间取出批次的数据集
pub trait Dataset {
    /// 样本数量
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 取出`[start, end)`区间的样本，返回 (特征 [B, ...], 标签 [B, ...])
    fn batch(&self, start: usize, end: usize) -> Result<(Tensor, Tensor), DataError>;
}

/// 首维对齐的一对张量：`features`为 [N, ...]，`labels`为 [N, ...]
#[derive(Debug, Clone)]
pub struct TensorDataset {
    features: Tensor,
    labels: Tensor,
}

impl TensorDataset {
    /// 两个张量的首维（样本数）不一致时panic
    pub fn new(features: Tensor, labels: Tensor) -> Self {
        let (n_features, n_labels) = (features.shape()[0], labels.shape()[0]);
        assert!(
            n_features == n_labels,
            "TensorDataset: 图像与标签的样本数必须一致，得到 {n_features} vs {n_labels}"
        );
        Self { features, labels }
    }

    pub fn len(&self) -> usize {
        self.features.shape()[0]
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn features(&self) -> &Tensor {
        &self.features
    }

    pub fn labels(&self) -> &Tensor {
        &self.labels
    }
}

impl Dataset for TensorDataset {
    fn len(&self) -> usize {
        TensorDataset::len(self)
    }

    fn batch(&self, start: usize, end: usize) -> Result<(Tensor, Tensor), DataError> {
        Ok((
            self.features.slice_first(start, end),
            self.labels.slice_first(start, end),
        ))
    }
}

/// 顺序、不打乱的批量加载器；最后一个批次可以不满`batch_size`
///
/// ```ignore
/// let loader = DataLoader::new(dataset, 32);
/// for batch in loader.iter() {
///     let (images, steerings) = batch?;
///     let outputs = model.forward(&images, ForwardMode::Deterministic, &mut rng)?;
/// }
/// ```
#[derive(Debug, Clone)]
pub struct DataLoader<D = TensorDataset> {
    dataset: D,
    batch_size: usize,
}

impl<D: Dataset> DataLoader<D> {
    pub fn new(dataset: D, batch_size: usize) -> Self {
        assert!(batch_size > 0, "DataLoader: batch_size 必须大于 0");
        Self {
            dataset,
            batch_size,
        }
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    pub fn num_batches(&self) -> usize {
        self.dataset.len().div_ceil(self.batch_size)
    }

    /// 样本总数
    pub fn len(&self) -> usize {
        self.dataset.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dataset.is_empty()
    }

    pub fn iter(&self) -> DataLoaderIterator<'_, D> {
        DataLoaderIterator {
            dataset: &self.dataset,
            batch_size: self.batch_size,
            offset: 0,
        }
    }
}

/// 逐批产出 `(images, labels)`；数据集取批次失败时产出对应的错误
pub struct DataLoaderIterator<'a, D = TensorDataset> {
    dataset: &'a D,
    batch_size: usize,
    /// 下一个批次的首个样本下标
    offset: usize,
}

impl<D: Dataset> Iterator for DataLoaderIterator<'_, D> {
    type Item = Result<(Tensor, Tensor), DataError>;

    fn next(&mut self) -> Option<Self::Item> {
        let len = self.dataset.len();
        if self.offset >= len {
            return None;
        }
        let (start, end) = (self.offset, (self.offset + self.batch_size).min(len));
        self.offset = end;
        Some(self.dataset.batch(start, end))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self
            .dataset
            .len()
            .saturating_sub(self.offset)
            .div_ceil(self.batch_size);
        (remaining, Some(remaining))
    }
}

impl<D: Dataset> ExactSizeIterator for DataLoaderIterator<'_, D> {}
