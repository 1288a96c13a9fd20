use crate::nn::{Flatten, Linear, Module, ReLU, Sequential};
use crate::tensor::Tensor;

#[test]
fn test_sequential_children_names() {
    let seq = Sequential::new(vec![Linear::new(2, 2, true).unwrap(), ReLU::new()]).unwrap();
    let names: Vec<_> = seq.named_children().into_keys().collect();
    assert_eq!(names, ["0", "1"]);
    let keys: Vec<_> = seq.named_parameters().into_keys().collect();
    assert_eq!(keys, ["0.weight", "0.bias"]);
}

#[test]
fn test_sequential_forward() {
    let fc = Linear::new(4, 2, true).unwrap();
    fc.get_parameter("weight")
        .unwrap()
        .copy_from(&Tensor::new(&[1., 1., 1., 1., -1., -1., -1., -1.], &[2, 4]))
        .unwrap();
    fc.get_parameter("bias").unwrap().copy_from(&Tensor::zeros(&[2])).unwrap();
    let seq = Sequential::new(vec![Flatten::new(), fc, ReLU::new()]).unwrap();

    let x = Tensor::new(&[1., 2., 3., 4.], &[1, 2, 2]);
    let y = seq.forward(&x).unwrap();
    assert_eq!(y.shape(), &[1, 2]);
    assert_eq!(y.to_vec(), vec![10., 0.]);
}

#[test]
fn test_empty_sequential_is_identity() {
    let seq = Sequential::new(Vec::<Module>::new()).unwrap();
    let x = Tensor::new(&[1., 2.], &[2]);
    assert_eq!(seq.forward(&x).unwrap(), x);
}
