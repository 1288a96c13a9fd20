use super::fc_bn_net;
use crate::nn::{ModuleDescriptor, Sequential};
use crate::tensor::{DType, Device};

#[test]
fn test_descriptor_structure() {
    let net = fc_bn_net();
    net.eval();
    let desc = net.descriptor();

    assert_eq!(desc.type_name, "Net");
    assert_eq!(desc.extra_repr, "");
    assert!(!desc.training);
    assert!(desc.parameters.is_empty());
    let children: Vec<_> = desc.children.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(children, ["fc", "bn"]);

    let fc = &desc.children[0].module;
    assert_eq!(fc.type_name, "Linear");
    assert_eq!(fc.parameters[0].name, "weight");
    assert_eq!(fc.parameters[0].shape, vec![2, 3]);
    assert!(fc.parameters[0].requires_grad);

    let bn = &desc.children[1].module;
    let counter = &bn.buffers[2];
    assert_eq!(counter.name, "num_batches_tracked");
    assert_eq!(counter.dtype, DType::I64);
    assert_eq!(counter.device, Device::Cpu);

    // fc: 2*3+2，bn: 2+2
    assert_eq!(desc.total_params(), 12);
}

#[test]
fn test_descriptor_json() {
    let seq = Sequential::new(vec![fc_bn_net()]).unwrap();
    let desc = seq.descriptor();
    let json = desc.to_json().unwrap();
    assert!(json.contains("\"type_name\": \"Sequential\""));
    assert!(json.contains("\"name\": \"running_mean\""));
    // 空的额外描述不写入 JSON
    assert!(!json.contains("\"extra_repr\": \"\""));

    let parsed = ModuleDescriptor::from_json(&json).unwrap();
    assert_eq!(parsed, desc);
}
