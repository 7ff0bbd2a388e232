/*
 * @Author       : 老董
 * @Date         : 2026-03-08
 * @Description  : 评估流程的配置校验与输出目录单元测试
 */

use std::num::NonZeroUsize;
use std::path::Path;

use crate::errors::EvalError;
use crate::eval::{EvalConfig, PredictionMode, experiment_output_dir, run};
use crate::nn::{Device, ModelKind};
use crate::vision::ImageMode;

fn config() -> EvalConfig {
    EvalConfig::new("/nonexistent/test_dir", "/nonexistent/experiment")
}

#[test]
fn test_default_plan() {
    let plan = config().validate().unwrap();
    assert_eq!(plan.transform.mode, ImageMode::Grayscale);
    assert_eq!(plan.transform.target_size, (320, 240));
    assert_eq!(plan.transform.crop_size, (200, 200));
    assert_eq!(plan.model_kind, ModelKind::ResNet8);
    assert_eq!(plan.model_config.img_channels, 1);
    assert_eq!(plan.model_config.output_dim, 1);
    assert_eq!(plan.aggregator.mode, PredictionMode::Standard);
    assert_eq!(plan.aggregator.device, Device::Cpu);
    assert_eq!(plan.output_dir, Path::new("/nonexistent/experiment/standard"));
}

#[test]
fn test_mcdo_plan() {
    let plan = EvalConfig {
        is_mcdo: true,
        samples: 20,
        model_to_test: "resnet8_MCDO".to_string(),
        img_mode: "rgb".to_string(),
        ..config()
    }
    .validate()
    .unwrap();
    assert_eq!(plan.model_kind, ModelKind::ResNet8Mcdo);
    assert_eq!(plan.model_config.img_channels, 3);
    assert_eq!(plan.aggregator.mode.passes(), 20);
    assert_eq!(
        plan.output_dir,
        Path::new("/nonexistent/experiment/MCDO_T20")
    );
}

#[test]
fn test_output_dirs_are_distinct() {
    let root = Path::new("exp");
    let mcdo = experiment_output_dir(
        root,
        &PredictionMode::McDropout {
            samples: NonZeroUsize::new(20).unwrap(),
        },
    );
    let standard = experiment_output_dir(root, &PredictionMode::Standard);
    assert_eq!(mcdo, root.join("MCDO_T20"));
    assert_eq!(standard, root.join("standard"));
    assert_ne!(mcdo, standard);
}

/// 非法配置在读取任何文件之前就会报错（测试目录并不存在）
#[test]
fn test_config_errors_before_loading() {
    let cases = [
        EvalConfig {
            img_mode: "cmyk".to_string(),
            ..config()
        },
        EvalConfig {
            model_to_test: "resnet50".to_string(),
            ..config()
        },
        EvalConfig {
            model_to_test: "resnet8_mcdo".to_string(),
            ..config()
        },
        EvalConfig {
            device: "cuda".to_string(),
            ..config()
        },
        EvalConfig {
            is_mcdo: true,
            samples: 0,
            ..config()
        },
        EvalConfig {
            batch_size: 0,
            ..config()
        },
        EvalConfig {
            dropout_rate: 1.0,
            ..config()
        },
    ];
    for case in cases {
        let result = run(&case);
        assert!(
            matches!(result, Err(EvalError::Config(_))),
            "{case:?} 应当是配置错误，实际为{result:?}"
        );
    }
}

#[test]
fn test_cmyk_message() {
    let result = EvalConfig {
        img_mode: "cmyk".to_string(),
        ..config()
    }
    .validate();
    match result {
        Err(EvalError::Config(message)) => assert!(message.contains("cmyk")),
        other => panic!("应当是配置错误，实际为{other:?}"),
    }
}

#[test]
fn test_samples_ignored_in_standard_mode() {
    let plan = EvalConfig {
        samples: 0,
        ..config()
    }
    .validate()
    .unwrap();
    assert_eq!(plan.aggregator.mode, PredictionMode::Standard);
}

#[test]
fn test_missing_test_dir_is_data_error() {
    let result = run(&config());
    assert!(matches!(result, Err(EvalError::Data(_))));
}
