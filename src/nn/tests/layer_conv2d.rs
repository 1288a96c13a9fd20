use approx::assert_abs_diff_eq;

use crate::assert_err;
use crate::nn::{Conv2d, Conv2dConfig, ModuleError};
use crate::tensor::{Device, Tensor};

fn input_3x3() -> Tensor {
    Tensor::new(&[1., 2., 3., 4., 5., 6., 7., 8., 9.], &[1, 1, 3, 3])
}

#[test]
fn test_conv2d_parameters() {
    let conv = Conv2d::new(Conv2dConfig::new(3, 8, 5)).unwrap();
    let params = conv.named_parameters();
    assert_eq!(params["weight"].shape(), vec![8, 3, 5, 5]);
    assert_eq!(params["bias"].shape(), vec![8]);

    let conv = Conv2d::new(Conv2dConfig::new(3, 8, 5).bias(false)).unwrap();
    assert_eq!(conv.num_params(), 1);

    assert_err!(
        Conv2d::new(Conv2dConfig::new(1, 1, 3).stride([0, 1])),
        ModuleError::ShapeMismatch { .. }
    );
}

#[test]
fn test_conv2d_forward() {
    let conv = Conv2d::new(Conv2dConfig::new(1, 1, 2)).unwrap();
    conv.get_parameter("weight").unwrap().copy_from(&Tensor::ones(&[1, 1, 2, 2])).unwrap();
    conv.get_parameter("bias").unwrap().copy_from(&Tensor::new(&[0.5], &[1])).unwrap();

    let y = conv.forward(&input_3x3()).unwrap();
    assert_eq!(y.shape(), &[1, 1, 2, 2]);
    assert_abs_diff_eq!(y, Tensor::new(&[12.5, 16.5, 24.5, 28.5], &[1, 1, 2, 2]));
}

#[test]
fn test_conv2d_forward_with_stride_and_padding() {
    let config = Conv2dConfig::new(1, 1, 2).stride([2, 2]).padding([1, 1]).bias(false);
    let conv = Conv2d::new(config).unwrap();
    conv.get_parameter("weight").unwrap().copy_from(&Tensor::ones(&[1, 1, 2, 2])).unwrap();
    conv.cuda().unwrap();

    let y = conv.forward(&input_3x3().to_device(Device::Cuda(0))).unwrap();
    assert_eq!(y.device(), Device::Cuda(0));
    assert_eq!(y.to_vec(), vec![1., 5., 11., 28.]);
}

#[test]
fn test_conv2d_forward_device_mismatch() {
    let conv = Conv2d::new(Conv2dConfig::new(1, 1, 2)).unwrap();
    conv.cuda().unwrap();
    assert_err!(
        conv.forward(&input_3x3()),
        ModuleError::DeviceMismatch { tensor, expected: Device::Cuda(0), got: Device::Cpu }
            if tensor == "weight"
    );
}

#[test]
fn test_conv2d_input_check() {
    let conv = Conv2d::new(Conv2dConfig::new(2, 1, 3)).unwrap();
    assert_err!(
        conv.forward(&Tensor::ones(&[2, 3, 3])),
        ModuleError::InvalidInputDimension("4D", 3)
    );
    // 通道数不符
    assert_err!(
        conv.forward(&Tensor::ones(&[1, 1, 3, 3])),
        ModuleError::ShapeMismatch { .. }
    );
    // 输入比卷积核小
    assert_err!(
        conv.forward(&Tensor::ones(&[1, 2, 2, 2])),
        ModuleError::ShapeMismatch { .. }
    );
}

#[test]
fn test_conv2d_config_from_json() {
    let config: Conv2dConfig =
        serde_json::from_str(r#"{"in_channels": 3, "out_channels": 8, "kernel_size": [5, 5]}"#)
            .unwrap();
    assert_eq!(config, Conv2dConfig::new(3, 8, 5));
    assert_eq!(config.stride, [1, 1]);
    assert!(config.bias);
}
