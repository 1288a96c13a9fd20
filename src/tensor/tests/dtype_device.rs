use std::str::FromStr;

use crate::assert_err;
use crate::errors::TensorError;
use crate::tensor::{DType, Device, Tensor};

#[test]
fn test_dtype_from_str() {
    assert_eq!(DType::from_str("float16").unwrap(), DType::F16);
    assert_eq!(DType::from_str("half").unwrap(), DType::F16);
    assert_eq!(DType::from_str("BF16").unwrap(), DType::BF16);
    assert_eq!(DType::from_str("float").unwrap(), DType::F32);
    assert_eq!(DType::from_str("double").unwrap(), DType::F64);
    assert_eq!(DType::from_str("long").unwrap(), DType::I64);
    assert_err!(DType::from_str("complex64"), TensorError::UnknownDType("complex64"));

    assert_eq!(DType::default(), DType::F32);
    assert_eq!(DType::F16.to_string(), "float16");
    assert!(DType::BF16.is_floating_point());
    assert!(!DType::I64.is_floating_point());
}

#[test]
fn test_dtype_round() {
    // float16 只有约3位有效数字
    assert_eq!(DType::F16.round(1.0001), 1.);
    assert_eq!(DType::F32.round(0.1), 0.1f32 as f64);
    assert_eq!(DType::F64.round(0.1), 0.1);
    assert_eq!(DType::I64.round(2.9), 2.);
    assert_eq!(DType::I64.round(-2.9), -2.);
}

#[test]
fn test_dtype_promote() {
    assert_eq!(DType::F32.promote(DType::F32), DType::F32);
    assert_eq!(DType::I64.promote(DType::F16), DType::F16);
    assert_eq!(DType::F16.promote(DType::F64), DType::F64);
    assert_eq!(DType::F16.promote(DType::BF16), DType::F32);
    assert_eq!(DType::F16.promote(DType::F32), DType::F32);
}

#[test]
fn test_device_from_str() {
    assert_eq!(Device::from_str("cpu").unwrap(), Device::Cpu);
    assert_eq!(Device::from_str("CUDA").unwrap(), Device::Cuda(0));
    assert_eq!(Device::from_str("cuda:1").unwrap(), Device::Cuda(1));
    assert_err!(Device::from_str("cuda:x"), TensorError::UnknownDevice("cuda:x"));
    assert_err!(Device::from_str("tpu"), TensorError::UnknownDevice("tpu"));

    assert_eq!(Device::Cuda(2).to_string(), "cuda:2");
    assert_eq!(Device::default().to_string(), "cpu");
}

#[test]
fn test_new_with_dtype_rounds_values() {
    let tensor = Tensor::new_with_dtype(&[1.7, -0.2], &[2], DType::I64);
    assert_eq!(tensor.dtype(), DType::I64);
    assert_eq!(tensor.to_vec(), vec![1., 0.]);

    let tensor = Tensor::full(1. / 3., &[2, 2], DType::F16);
    assert_eq!(tensor.to_vec(), vec![DType::F16.round(1. / 3.); 4]);
}
