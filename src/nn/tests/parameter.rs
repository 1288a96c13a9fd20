use crate::assert_err;
use crate::errors::{Operator, TensorError};
use crate::nn::Parameter;
use crate::tensor::{DType, Tensor};

#[test]
fn test_new_parameter() {
    let x = Tensor::ones(&[2]).with_requires_grad(true).unwrap();
    let param = Parameter::new(&x * 2., true).unwrap();
    assert!(param.requires_grad());
    assert!(param.data().is_leaf());
    assert_eq!(param.shape(), vec![2]);
    assert_eq!(param.dtype(), DType::F32);
    assert!(param.grad().is_none());

    let frozen = Parameter::new(Tensor::ones(&[2]), false).unwrap();
    assert!(!frozen.requires_grad());

    assert_err!(
        Parameter::new(Tensor::full(0., &[1], DType::I64), true),
        TensorError::RequiresGradOnNonFloat(DType::I64)
    );
}

#[test]
fn test_parameter_handles_share_state() {
    let param = Parameter::new(Tensor::zeros(&[2]), true).unwrap();
    let handle = param.clone();
    assert!(handle.ptr_eq(&param));

    handle.set_requires_grad(false).unwrap();
    assert!(!param.requires_grad());

    handle.copy_from(&Tensor::new(&[1., 2.], &[2])).unwrap();
    assert_eq!(param.data().to_vec(), vec![1., 2.]);

    let other = Parameter::new(param.data(), false).unwrap();
    assert!(!other.ptr_eq(&param));
}

#[test]
fn test_copy_from_keeps_requires_grad() {
    // 梯度追踪开启时也能修改需要梯度的参数
    let param = Parameter::new(Tensor::zeros(&[2]), true).unwrap();
    param.copy_from(&Tensor::new(&[3., 4.], &[2])).unwrap();
    assert_eq!(param.data().to_vec(), vec![3., 4.]);
    assert!(param.requires_grad());
    assert!(param.data().is_leaf());

    assert_err!(
        param.copy_from(&Tensor::zeros(&[3])),
        TensorError::OperatorError {
            operator: Operator::Copy,
            ..
        }
    );
}

#[test]
fn test_grad_and_zero_grad() {
    let param = Parameter::new(Tensor::zeros(&[2]), true).unwrap();
    // 没有梯度时什么都不做
    param.zero_grad().unwrap();
    assert!(param.grad().is_none());

    assert_err!(
        param.set_grad(Some(Tensor::ones(&[3]))),
        TensorError::OperatorError { .. }
    );

    let x = Tensor::ones(&[2]).with_requires_grad(true).unwrap();
    param.set_grad(Some(&x * 5.)).unwrap();
    assert!(param.grad().unwrap().requires_grad());

    param.zero_grad().unwrap();
    let grad = param.grad().unwrap();
    assert_eq!(grad.to_vec(), vec![0., 0.]);
    assert!(!grad.requires_grad());
    assert!(grad.is_leaf());

    param.set_grad(None).unwrap();
    assert!(param.grad().is_none());
}

#[test]
fn test_parameter_display() {
    let param = Parameter::new(Tensor::new(&[1., 2.], &[2]), true).unwrap();
    assert_eq!(
        param.to_string(),
        "Parameter containing:\n[  1.0000, \n   2.0000]\n形状: [2]，类型: float32，requires_grad=true\n"
    );
}
