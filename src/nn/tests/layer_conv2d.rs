/*
 * @Author       : 老董
 * @Date         : 2026-03-05
 * @Description  : Conv2d 层单元测试（仅推理）
 */

use super::set_param;
use crate::nn::layer::Conv2d;
use crate::nn::{Module, ModelError};
use crate::tensor::Tensor;
use approx::assert_abs_diff_eq;
use rand::SeedableRng;
use rand::rngs::StdRng;

#[test]
fn test_conv2d_shapes_and_params() {
    let mut rng = StdRng::seed_from_u64(0);
    let conv = Conv2d::new(1, 32, (5, 5), (2, 2), (2, 2), &mut rng);
    assert_eq!(conv.in_channels(), 1);
    assert_eq!(conv.out_channels(), 32);
    assert_eq!(conv.kernel_size(), (5, 5));
    assert_eq!(conv.output_size((16, 16)), Some((8, 8)));
    assert_eq!(conv.output_size((200, 200)), Some((100, 100)));

    let names: Vec<_> = conv.named_parameters().into_iter().map(|(n, _)| n).collect();
    assert_eq!(names, ["weight", "bias"]);
    assert_eq!(conv.num_elements(), 32 * 25 + 32);

    let x = Tensor::zeros(&[2, 1, 16, 16]);
    assert_eq!(conv.forward(&x).unwrap().shape(), &[2, 32, 8, 8]);
}

#[test]
fn test_conv2d_forward_with_padding() {
    let mut rng = StdRng::seed_from_u64(0);
    let mut conv = Conv2d::new(1, 1, (3, 3), (1, 1), (1, 1), &mut rng);
    set_param(&mut conv, "weight", Tensor::new_full(1.0, &[1, 1, 3, 3]));
    set_param(&mut conv, "bias", Tensor::new(&[0.5], &[1]));

    // 全1输入，3x3 全1卷积核：角落覆盖4个像素，边上6个，中心9个
    let x = Tensor::new_full(1.0, &[1, 1, 3, 3]);
    let y = conv.forward(&x).unwrap();
    assert_eq!(y.shape(), &[1, 1, 3, 3]);
    let expected = [4.5, 6.5, 4.5, 6.5, 9.5, 6.5, 4.5, 6.5, 4.5];
    for (got, want) in y.to_vec().iter().zip(expected) {
        assert_abs_diff_eq!(*got, want, epsilon = 1e-6);
    }
}

#[test]
fn test_conv2d_stride_multi_channel() {
    let mut rng = StdRng::seed_from_u64(0);
    let mut conv = Conv2d::new(2, 1, (1, 1), (2, 2), (0, 0), &mut rng);
    // 1x1 卷积：输出 = 通道0 + 2 * 通道1
    set_param(&mut conv, "weight", Tensor::new(&[1.0, 2.0], &[1, 2, 1, 1]));

    let data: Vec<f32> = (0..32).map(|x| x as f32).collect();
    let x = Tensor::new(&data, &[1, 2, 4, 4]);
    let y = conv.forward(&x).unwrap();
    assert_eq!(y.shape(), &[1, 1, 2, 2]);
    // 取 (0,0) (0,2) (2,0) (2,2) 四个位置
    let expected = [32.0, 38.0, 56.0, 62.0];
    for (got, want) in y.to_vec().iter().zip(expected) {
        assert_abs_diff_eq!(*got, want, epsilon = 1e-6);
    }
}

#[test]
fn test_conv2d_channel_mismatch() {
    let mut rng = StdRng::seed_from_u64(0);
    let conv = Conv2d::new(3, 8, (3, 3), (1, 1), (1, 1), &mut rng);
    let result = conv.forward(&Tensor::zeros(&[1, 1, 8, 8]));
    assert!(matches!(result, Err(ModelError::ShapeMismatch { .. })));
}

#[test]
fn test_conv2d_requires_4d_input() {
    let mut rng = StdRng::seed_from_u64(0);
    let conv = Conv2d::new(1, 1, (3, 3), (1, 1), (1, 1), &mut rng);
    let result = conv.forward(&Tensor::zeros(&[1, 8, 8]));
    assert!(matches!(result, Err(ModelError::ShapeMismatch { .. })));
}

#[test]
fn test_conv2d_input_too_small() {
    let mut rng = StdRng::seed_from_u64(0);
    let conv = Conv2d::new(1, 1, (5, 5), (1, 1), (0, 0), &mut rng);
    assert_eq!(conv.output_size((4, 4)), None);
    let result = conv.forward(&Tensor::zeros(&[1, 1, 4, 4]));
    assert!(matches!(
        result,
        Err(ModelError::InputTooSmall {
            layer: "Conv2d",
            ..
        })
    ));
}
