mod descriptor;
mod layer_batch_norm;
mod layer_conv2d;
mod layer_sequential;
mod parameter;
mod serialization;

use crate::nn::{BatchNorm, BatchNormConfig, Conv2d, Conv2dConfig, Linear, Module};

/// net{conv1{weight,bias}, fc1{weight,bias}}
fn conv_fc_net() -> Module {
    let net = Module::new("Net");
    net.add_module("conv1", &Conv2d::new(Conv2dConfig::new(1, 2, 3)).unwrap())
        .unwrap()
        .add_module("fc1", &Linear::new(4, 2, true).unwrap())
        .unwrap();
    net
}

/// net{fc{weight,bias}, bn{weight,bias | running_mean,running_var,num_batches_tracked}}
fn fc_bn_net() -> Module {
    let net = Module::new("Net");
    net.add_module("fc", &Linear::new(3, 2, true).unwrap())
        .unwrap()
        .add_module("bn", &BatchNorm::new_1d(BatchNormConfig::new(2)).unwrap())
        .unwrap();
    net
}
