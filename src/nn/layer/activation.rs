/*
 * @Date         : 2026-03-05
 * @Description  : 无参数的逐元素/形状层：ReLU、Flatten
 */

use super::Layer;
use crate::nn::{Module, ModuleError};
use crate::tensor::Tensor;

/// ReLU 激活：`max(x, 0)`
pub struct ReLU;

impl ReLU {
    #[allow(clippy::new_ret_no_self)]
    pub fn new() -> Module {
        Module::from_layer(Self)
    }
}

impl Layer for ReLU {
    fn type_name(&self) -> &str {
        "ReLU"
    }

    fn forward(&self, _module: &Module, input: &Tensor) -> Result<Tensor, ModuleError> {
        Ok(input.relu())
    }
}

/// 把除第一维（batch）外的所有维展平：[N, d1, d2, ...] -> [N, d1*d2*...]
pub struct Flatten;

impl Flatten {
    #[allow(clippy::new_ret_no_self)]
    pub fn new() -> Module {
        Module::from_layer(Self)
    }
}

impl Layer for Flatten {
    fn type_name(&self) -> &str {
        "Flatten"
    }

    fn check_input_dim(&self, input: &Tensor) -> Result<(), ModuleError> {
        if input.dimension() == 0 {
            return Err(ModuleError::InvalidInputDimension {
                expected: "至少1D".to_string(),
                got: 0,
            });
        }
        Ok(())
    }

    fn forward(&self, _module: &Module, input: &Tensor) -> Result<Tensor, ModuleError> {
        let batch = input.shape()[0];
        let rest = input.shape()[1..].iter().product();
        Ok(input.reshape(&[batch, rest]))
    }
}
