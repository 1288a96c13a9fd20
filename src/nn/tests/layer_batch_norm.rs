use approx::assert_abs_diff_eq;

use crate::assert_err;
use crate::nn::{BatchNorm, BatchNormConfig, ModuleError};
use crate::tensor::{DType, Tensor};

#[test]
fn test_batch_norm_registration() {
    let bn = BatchNorm::new_2d(BatchNormConfig::new(3)).unwrap();
    assert_eq!(bn.type_name(), "BatchNorm2d");
    let keys: Vec<_> = bn.state_dict().into_keys().collect();
    assert_eq!(
        keys,
        ["weight", "bias", "running_mean", "running_var", "num_batches_tracked"]
    );
    assert_eq!(bn.get_buffer("running_var").unwrap(), Tensor::ones(&[3]));
    let counter = bn.get_buffer("num_batches_tracked").unwrap();
    assert_eq!(counter.dtype(), DType::I64);
    assert_eq!(counter.number(), Some(0.));

    let config = BatchNormConfig {
        affine: false,
        track_running_stats: false,
        ..BatchNormConfig::new(3)
    };
    let bn = BatchNorm::new_1d(config).unwrap();
    assert_eq!(bn.type_name(), "BatchNorm1d");
    assert!(bn.state_dict().is_empty());
}

#[test]
fn test_batch_norm_input_dim() {
    let bn2d = BatchNorm::new_2d(BatchNormConfig::new(2)).unwrap();
    assert_err!(
        bn2d.forward(&Tensor::ones(&[2, 2, 3])),
        ModuleError::InvalidInputDimension("4D", 3)
    );
    let bn1d = BatchNorm::new_1d(BatchNormConfig::new(2)).unwrap();
    assert_err!(
        bn1d.forward(&Tensor::ones(&[2, 2, 3, 3])),
        ModuleError::InvalidInputDimension("2D or 3D", 4)
    );
    assert_err!(
        bn1d.forward(&Tensor::ones(&[4, 3])),
        ModuleError::ShapeMismatch { .. }
    );
}

#[test]
fn test_batch_norm_train_forward_updates_running_stats() {
    let bn = BatchNorm::new_1d(BatchNormConfig::new(1)).unwrap();
    let x = Tensor::new(&[1., 2., 3., 4.], &[4, 1]);
    let y = bn.forward(&x).unwrap();

    // 均值2.5，有偏方差1.25
    let std = (1.25f64 + 1e-5).sqrt();
    let expected: Vec<f64> = [1., 2., 3., 4.].iter().map(|v| (v - 2.5) / std).collect();
    for (got, want) in y.to_vec().iter().zip(&expected) {
        assert_abs_diff_eq!(*got, *want, epsilon = 1e-5);
    }

    // 滑动统计量使用无偏方差 5/3
    let running_mean = bn.get_buffer("running_mean").unwrap().to_vec();
    let running_var = bn.get_buffer("running_var").unwrap().to_vec();
    assert_abs_diff_eq!(running_mean[0], 0.25, epsilon = 1e-6);
    assert_abs_diff_eq!(running_var[0], 0.9 + 0.1 * 5. / 3., epsilon = 1e-6);
    let counter = bn.get_buffer("num_batches_tracked").unwrap();
    assert_eq!(counter.number(), Some(1.));
    assert_eq!(counter.dtype(), DType::I64);
}

#[test]
fn test_batch_norm_eval_uses_running_stats() {
    let bn = BatchNorm::new_2d(BatchNormConfig::new(2)).unwrap();
    bn.set_buffer("running_mean", Tensor::new(&[1., -1.], &[2])).unwrap();
    bn.set_buffer("running_var", Tensor::new(&[4., 1.], &[2])).unwrap();
    bn.get_parameter("bias").unwrap().copy_from(&Tensor::new(&[0., 10.], &[2])).unwrap();
    bn.eval();

    let x = Tensor::new(&[3., -1.], &[1, 2, 1, 1]);
    let y = bn.forward(&x).unwrap();
    let y = y.to_vec();
    assert_abs_diff_eq!(y[0], 2. / (4f64 + 1e-5).sqrt(), epsilon = 1e-5);
    assert_abs_diff_eq!(y[1], 10., epsilon = 1e-5);
    // 评估模式不更新统计量
    assert_eq!(bn.get_buffer("num_batches_tracked").unwrap().number(), Some(0.));
}

#[test]
fn test_batch_norm_train_requires_more_than_one_value() {
    let bn = BatchNorm::new_1d(BatchNormConfig::new(2)).unwrap();
    assert_err!(
        bn.forward(&Tensor::ones(&[1, 2])),
        ModuleError::ShapeMismatch { .. }
    );
}

#[test]
fn test_batch_norm_config_from_json() {
    let config: BatchNormConfig =
        serde_json::from_str(r#"{"num_features": 16, "momentum": 0.01}"#).unwrap();
    assert_eq!(config.num_features, 16);
    assert_eq!(config.momentum, 0.01);
    assert_eq!(config.eps, 1e-5);
    assert!(config.affine);
    assert!(config.track_running_stats);
}
