use crate::tensor::Tensor;

#[test]
fn test_reshape() {
    let tensor = Tensor::new(&[1., 2., 3., 4., 5., 6.], &[2, 3]);
    let reshaped = tensor.reshape(&[3, 2]);
    assert_eq!(reshaped.shape(), &[3, 2]);
    assert_eq!(reshaped.to_vec(), tensor.to_vec());
}

#[test]
#[should_panic]
fn test_reshape_incompatible() {
    let tensor = Tensor::new(&[1., 2., 3., 4., 5., 6.], &[2, 3]);
    let _ = tensor.reshape(&[4, 2]);
}

#[test]
fn test_stack_images() {
    let image1 = Tensor::new(&[1., 2., 3., 4.], &[1, 2, 2]);
    let image2 = Tensor::new(&[5., 6., 7., 8.], &[1, 2, 2]);
    let stacked = Tensor::stack(&[&image1, &image2]);
    assert_eq!(stacked.shape(), &[2, 1, 2, 2]);
    assert_eq!(stacked.to_vec(), vec![1., 2., 3., 4., 5., 6., 7., 8.]);
}

#[test]
#[should_panic]
fn test_stack_inconsistent_shape() {
    let image1 = Tensor::new(&[1., 2., 3., 4.], &[1, 2, 2]);
    let image2 = Tensor::new(&[5., 6.], &[1, 1, 2]);
    let _ = Tensor::stack(&[&image1, &image2]);
}

#[test]
#[should_panic]
fn test_stack_empty() {
    let _ = Tensor::stack(&[]);
}

#[test]
fn test_slice_first() {
    let tensor = Tensor::new(&(0..10).map(|x| x as f32).collect::<Vec<_>>(), &[5, 2]);
    let sliced = tensor.slice_first(1, 3);
    assert_eq!(sliced.shape(), &[2, 2]);
    assert_eq!(sliced.to_vec(), vec![2., 3., 4., 5.]);

    // 末尾不完整的批次
    let sliced = tensor.slice_first(4, 5);
    assert_eq!(sliced.shape(), &[1, 2]);
    assert_eq!(sliced.to_vec(), vec![8., 9.]);
}
