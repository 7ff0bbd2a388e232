//! MaxPool2d / BatchNorm2d / Linear / Dropout / ReLU 单元测试

use super::set_param;
use crate::nn::ForwardMode;
use crate::nn::layer::{BatchNorm2d, Dropout, Linear, MaxPool2d, relu};
use crate::nn::{Module, ModelError};
use crate::tensor::Tensor;
use approx::assert_abs_diff_eq;
use rand::SeedableRng;
use rand::rngs::StdRng;

#[test]
fn test_max_pool2d_forward() {
    let data: Vec<f32> = (1..=16).map(|x| x as f32).collect();
    let x = Tensor::new(&data, &[1, 1, 4, 4]);
    let pool = MaxPool2d::new((2, 2), None);
    let y = pool.forward(&x).unwrap();
    assert_eq!(y.shape(), &[1, 1, 2, 2]);
    assert_eq!(y.to_vec(), vec![6.0, 8.0, 14.0, 16.0]);
}

#[test]
fn test_max_pool2d_overlapping_window() {
    // 3x3 窗口、步长2，在5x5上得到2x2
    let data: Vec<f32> = (0..25).map(|x| -(x as f32)).collect();
    let x = Tensor::new(&data, &[1, 1, 5, 5]);
    let pool = MaxPool2d::new((3, 3), Some((2, 2)));
    assert_eq!(pool.output_size((5, 5)), Some((2, 2)));
    assert_eq!(pool.output_size((2, 2)), None);
    let y = pool.forward(&x).unwrap();
    // 每个窗口的最大值是其左上角（负数越小越大）
    assert_eq!(y.to_vec(), vec![0.0, -2.0, -10.0, -12.0]);
}

#[test]
fn test_batch_norm_identity_init() {
    let bn = BatchNorm2d::new(3);
    assert_eq!(bn.num_features(), 3);
    assert_eq!(bn.num_params(), 4);
    let x = Tensor::new(&[1.0, -2.0, 3.0], &[1, 3, 1, 1]);
    let y = bn.forward(&x).unwrap();
    for (got, want) in y.to_vec().iter().zip([1.0, -2.0, 3.0]) {
        assert_abs_diff_eq!(*got, want, epsilon = 1e-4);
    }
}

#[test]
fn test_batch_norm_running_stats() {
    let mut bn = BatchNorm2d::new(1);
    set_param(&mut bn, "running_mean", Tensor::new(&[1.0], &[1]));
    set_param(&mut bn, "running_var", Tensor::new(&[4.0], &[1]));
    set_param(&mut bn, "weight", Tensor::new(&[2.0], &[1]));
    set_param(&mut bn, "bias", Tensor::new(&[0.5], &[1]));

    let x = Tensor::new(&[3.0, 1.0], &[1, 1, 1, 2]);
    let y = bn.forward(&x).unwrap();
    // (3 - 1) / 2 * 2 + 0.5 = 2.5；(1 - 1) / 2 * 2 + 0.5 = 0.5
    assert_abs_diff_eq!(y.to_vec()[0], 2.5, epsilon = 1e-4);
    assert_abs_diff_eq!(y.to_vec()[1], 0.5, epsilon = 1e-4);
}

#[test]
fn test_batch_norm_channel_mismatch() {
    let bn = BatchNorm2d::new(2);
    let result = bn.forward(&Tensor::zeros(&[1, 3, 2, 2]));
    assert!(matches!(result, Err(ModelError::ShapeMismatch { .. })));
}

#[test]
fn test_linear_forward() {
    let mut rng = StdRng::seed_from_u64(0);
    let mut linear = Linear::new(2, 2, &mut rng);
    assert_eq!(linear.in_features(), 2);
    assert_eq!(linear.out_features(), 2);
    set_param(&mut linear, "weight", Tensor::new(&[1.0, 2.0, 3.0, 4.0], &[2, 2]));
    set_param(&mut linear, "bias", Tensor::new(&[0.5, -0.5], &[2]));

    let x = Tensor::new(&[1.0, 1.0, 0.0, 2.0], &[2, 2]);
    let y = linear.forward(&x).unwrap();
    assert_eq!(y.shape(), &[2, 2]);
    assert_eq!(y.to_vec(), vec![3.5, 6.5, 4.5, 7.5]);
}

#[test]
fn test_linear_wrong_input() {
    let mut rng = StdRng::seed_from_u64(0);
    let linear = Linear::new(4, 1, &mut rng);
    assert!(matches!(
        linear.forward(&Tensor::zeros(&[2, 3])),
        Err(ModelError::ShapeMismatch { .. })
    ));
    assert!(matches!(
        linear.forward(&Tensor::zeros(&[4])),
        Err(ModelError::ShapeMismatch { .. })
    ));
}

#[test]
fn test_relu() {
    let x = Tensor::new(&[-1.0, 0.0, 2.5], &[3]);
    assert_eq!(relu(&x).to_vec(), vec![0.0, 0.0, 2.5]);
}

#[test]
fn test_dropout_rate_validation() {
    assert!(Dropout::new(0.0).is_ok());
    assert!(Dropout::new(0.5).is_ok());
    assert!(matches!(
        Dropout::new(1.0),
        Err(ModelError::InvalidDropoutRate(_))
    ));
    assert!(Dropout::new(-0.1).is_err());
}

#[test]
fn test_dropout_deterministic_is_identity() {
    let mut rng = StdRng::seed_from_u64(42);
    let dropout = Dropout::new(0.5).unwrap();
    let x = Tensor::new_full(1.0, &[4, 8]);
    assert_eq!(dropout.forward(&x, ForwardMode::Deterministic, &mut rng), x);
}

#[test]
fn test_dropout_stochastic_inverted_scaling() {
    let mut rng = StdRng::seed_from_u64(42);
    let dropout = Dropout::new(0.5).unwrap();
    let x = Tensor::new_full(1.0, &[1000]);
    let y = dropout.forward(&x, ForwardMode::Stochastic, &mut rng);

    // 每个元素要么被置零，要么放大为 1/(1-p) = 2
    assert!(y.to_vec().iter().all(|&v| v == 0.0 || v == 2.0));
    let kept = y.to_vec().iter().filter(|&&v| v != 0.0).count();
    assert!((350..650).contains(&kept), "保留了{kept}个");

    // 同一个 rng 继续采样，掩码应当不同
    let y2 = dropout.forward(&x, ForwardMode::Stochastic, &mut rng);
    assert_ne!(y, y2);
}

#[test]
fn test_dropout_zero_rate_is_identity() {
    let mut rng = StdRng::seed_from_u64(0);
    let dropout = Dropout::new(0.0).unwrap();
    let x = Tensor::new(&[1.0, -2.0], &[2]);
    assert_eq!(dropout.forward(&x, ForwardMode::Stochastic, &mut rng), x);
}
