use std::fs;

use super::fc_bn_net;
use crate::assert_err;
use crate::nn::serialization::{load_state_dict, save_state_dict};
use crate::nn::{ModuleError, StateDict};
use crate::tensor::{DType, Device, Tensor};

#[test]
fn test_save_load_state_dict() {
    let path = "test_save_load_state_dict.bin";
    let mut dict = StateDict::new();
    dict.insert("z.weight".to_string(), Tensor::new(&[1., 2.], &[2]).half());
    dict.insert("a.count".to_string(), Tensor::full(3., &[], DType::I64));
    dict.insert(
        "m.mean".to_string(),
        Tensor::zeros(&[2, 2]).to_device(Device::Cuda(1)),
    );
    save_state_dict(&dict, path).unwrap();

    let loaded = load_state_dict(path).unwrap();
    fs::remove_file(path).unwrap();

    // 保持保存时的顺序、类型与设备
    let keys: Vec<_> = loaded.keys().cloned().collect();
    assert_eq!(keys, ["z.weight", "a.count", "m.mean"]);
    assert_eq!(loaded, dict);
    assert_eq!(loaded["z.weight"].dtype(), DType::F16);
    assert_eq!(loaded["m.mean"].device(), Device::Cuda(1));
}

#[test]
fn test_load_invalid_file() {
    let path = "test_load_invalid_state_dict.bin";
    fs::write(path, b"OTPR\x01\x00\x00\x00").unwrap();
    let result = load_state_dict(path);
    fs::remove_file(path).unwrap();
    assert_err!(result, ModuleError::Serialization(_));

    assert_err!(
        load_state_dict("a_file_that_does_not_exist.bin"),
        ModuleError::Io(_)
    );
}

#[test]
fn test_module_save_load() {
    let path = "test_module_save_load.bin";
    let source = fc_bn_net();
    let bn = source.get_child("bn").unwrap();
    bn.set_buffer("running_mean", Tensor::new(&[0.3, 0.7], &[2])).unwrap();
    source.save(path).unwrap();

    let target = fc_bn_net();
    let report = target.load(path).unwrap();
    fs::remove_file(path).unwrap();

    assert!(report.is_complete());
    assert_eq!(target.state_dict(), source.state_dict());
}
