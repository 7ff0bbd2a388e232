/*
 * @Author       : 老董
 * @Date         : 2026-03-06
 * @Description  : 参数检查点 save_params / load_params 单元测试
 */

use std::fs;

use crate::nn::layer::Linear;
use crate::nn::serialization::PARAMS_MAGIC;
use crate::nn::{
    ForwardMode, Model, ModelConfig, ModelError, ModelKind, Module, SteeringModel, load_params,
    save_params,
};
use crate::tensor::Tensor;
use rand::SeedableRng;
use rand::rngs::StdRng;

fn config() -> ModelConfig {
    ModelConfig {
        img_channels: 1,
        height: 16,
        width: 16,
        output_dim: 1,
        dropout_rate: 0.5,
    }
}

/// 除 Linear 的参数外还多带一个无关参数
struct LinearWithExtra {
    linear: Linear,
    extra: Tensor,
}

impl Module for LinearWithExtra {
    fn named_parameters(&self) -> Vec<(String, &Tensor)> {
        let mut params = self.linear.named_parameters();
        params.push(("extra".to_string(), &self.extra));
        params
    }

    fn named_parameters_mut(&mut self) -> Vec<(String, &mut Tensor)> {
        let mut params = self.linear.named_parameters_mut();
        params.push(("extra".to_string(), &mut self.extra));
        params
    }
}

#[test]
fn test_save_load_roundtrip_restores_outputs() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("resnet8_MCDO.pt");

    let mut rng = StdRng::seed_from_u64(10);
    let saved = Model::build(ModelKind::ResNet8Mcdo, &config(), &mut rng).unwrap();
    save_params(&saved, &path).unwrap();

    let mut rng = StdRng::seed_from_u64(20);
    let mut loaded = Model::build(ModelKind::ResNet8Mcdo, &config(), &mut rng).unwrap();
    assert_ne!(saved.named_parameters(), loaded.named_parameters());
    load_params(&mut loaded, &path).unwrap();
    assert_eq!(saved.named_parameters(), loaded.named_parameters());

    let x = Tensor::new_random(0.0, 1.0, &[2, 1, 16, 16], &mut rng);
    assert_eq!(
        saved.forward(&x, ForwardMode::Deterministic, &mut rng).unwrap(),
        loaded.forward(&x, ForwardMode::Deterministic, &mut rng).unwrap()
    );
}

#[test]
fn test_file_starts_with_magic() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("linear.pt");
    let mut rng = StdRng::seed_from_u64(0);
    save_params(&Linear::new(2, 1, &mut rng), &path).unwrap();

    let bytes = fs::read(&path).unwrap();
    assert_eq!(&bytes[..4], PARAMS_MAGIC);
    assert_eq!(u32::from_le_bytes(bytes[4..8].try_into().unwrap()), 1);
    assert_eq!(u32::from_le_bytes(bytes[8..12].try_into().unwrap()), 2);
}

#[test]
fn test_load_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let mut rng = StdRng::seed_from_u64(0);
    let mut linear = Linear::new(2, 1, &mut rng);
    let result = load_params(&mut linear, &dir.path().join("nope.pt"));
    assert!(matches!(result, Err(ModelError::Io { .. })));
}

#[test]
fn test_load_missing_parameter() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("linear.pt");
    let mut rng = StdRng::seed_from_u64(0);
    save_params(&Linear::new(2, 1, &mut rng), &path).unwrap();

    let mut model = Model::build(ModelKind::ResNet8, &config(), &mut rng).unwrap();
    let result = load_params(&mut model, &path);
    assert!(matches!(
        result,
        Err(ModelError::MissingParameter(name)) if name == "conv1.weight"
    ));
}

#[test]
fn test_load_shape_mismatch_leaves_module_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("linear.pt");
    let mut rng = StdRng::seed_from_u64(0);
    save_params(&Linear::new(3, 1, &mut rng), &path).unwrap();

    let mut linear = Linear::new(2, 1, &mut rng);
    let before = linear.clone();
    let result = load_params(&mut linear, &path);
    assert!(matches!(
        result,
        Err(ModelError::ParameterShapeMismatch { name, .. }) if name == "weight"
    ));
    assert_eq!(before.named_parameters(), linear.named_parameters());
}

#[test]
fn test_load_ignores_unknown_entries() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("extra.pt");
    let mut rng = StdRng::seed_from_u64(0);
    let with_extra = LinearWithExtra {
        linear: Linear::new(2, 1, &mut rng),
        extra: Tensor::new(&[1.0, 2.0], &[2]),
    };
    save_params(&with_extra, &path).unwrap();

    let mut linear = Linear::new(2, 1, &mut rng);
    load_params(&mut linear, &path).unwrap();
    assert_eq!(
        linear.named_parameters(),
        with_extra.linear.named_parameters()
    );
}

#[test]
fn test_load_bad_magic() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.pt");
    fs::write(&path, b"PK\x03\x04 not a steer_eval checkpoint").unwrap();

    let mut rng = StdRng::seed_from_u64(0);
    let mut linear = Linear::new(2, 1, &mut rng);
    let result = load_params(&mut linear, &path);
    assert!(matches!(
        result,
        Err(ModelError::InvalidCheckpoint { message, .. }) if message.contains("转换")
    ));
}

#[test]
fn test_load_unsupported_version() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("v2.pt");
    let mut bytes = PARAMS_MAGIC.to_vec();
    bytes.extend_from_slice(&2u32.to_le_bytes());
    bytes.extend_from_slice(&0u32.to_le_bytes());
    fs::write(&path, bytes).unwrap();

    let mut rng = StdRng::seed_from_u64(0);
    let mut linear = Linear::new(2, 1, &mut rng);
    let result = load_params(&mut linear, &path);
    assert!(matches!(
        result,
        Err(ModelError::InvalidCheckpoint { message, .. }) if message.contains("版本")
    ));
}

#[test]
fn test_load_truncated_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("linear.pt");
    let mut rng = StdRng::seed_from_u64(0);
    save_params(&Linear::new(4, 2, &mut rng), &path).unwrap();

    let bytes = fs::read(&path).unwrap();
    fs::write(&path, &bytes[..bytes.len() - 3]).unwrap();

    let mut linear = Linear::new(4, 2, &mut rng);
    let result = load_params(&mut linear, &path);
    assert!(matches!(result, Err(ModelError::InvalidCheckpoint { .. })));
}

/// 只含一个参数头（名称、维数、各维大小）而没有数据的检查点
fn checkpoint_header(name: &str, shape: &[u32]) -> Vec<u8> {
    let mut bytes = PARAMS_MAGIC.to_vec();
    bytes.extend_from_slice(&1u32.to_le_bytes());
    bytes.extend_from_slice(&1u32.to_le_bytes());
    bytes.extend_from_slice(&(name.len() as u32).to_le_bytes());
    bytes.extend_from_slice(name.as_bytes());
    bytes.extend_from_slice(&(shape.len() as u32).to_le_bytes());
    for dim in shape {
        bytes.extend_from_slice(&dim.to_le_bytes());
    }
    bytes
}

#[test]
fn test_load_overflowing_shape() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("overflow.pt");
    fs::write(&path, checkpoint_header("w", &[u32::MAX; 3])).unwrap();

    let mut rng = StdRng::seed_from_u64(0);
    let mut linear = Linear::new(2, 1, &mut rng);
    let before = linear.clone();
    let result = load_params(&mut linear, &path);
    assert!(matches!(
        result,
        Err(ModelError::InvalidCheckpoint { message, .. }) if message.contains("溢出")
    ));
    assert_eq!(before.named_parameters(), linear.named_parameters());
}

#[test]
fn test_load_excessive_rank() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("rank.pt");
    fs::write(&path, checkpoint_header("w", &[1; 100])).unwrap();

    let mut rng = StdRng::seed_from_u64(0);
    let mut linear = Linear::new(2, 1, &mut rng);
    let result = load_params(&mut linear, &path);
    assert!(matches!(
        result,
        Err(ModelError::InvalidCheckpoint { message, .. }) if message.contains("维数")
    ));
}
