/*
 * @Date         : 2026-03-05
 * @Description  : Layer 模块 - 模块的层行为（前向计算、类型名、额外描述）
 *
 * 模块树只负责记账，每个模块“是什么层”由这里的 `Layer` 决定：
 * - 内置层通过 `LayerKind` 枚举静态分发
 * - 用户自定义层装箱后作为 `LayerKind::CustomLayer` 动态分发
 * 层不持有张量：参数与缓冲区都登记在模块上，前向时通过 `&Module` 取用。
 */

mod activation;
mod batch_norm;
mod conv2d;
mod linear;
mod sequential;

pub use activation::{Flatten, ReLU};
pub use batch_norm::{BatchNorm, BatchNormConfig};
pub use conv2d::{Conv2d, Conv2dConfig};
pub use linear::Linear;
pub use sequential::Sequential;

use enum_dispatch::enum_dispatch;

use super::module::{Module, ModuleError};
use crate::tensor::Tensor;

#[enum_dispatch]
pub enum LayerKind {
    Container(Container),
    Linear(Linear),
    Conv2d(Conv2d),
    BatchNorm(BatchNorm),
    ReLU(ReLU),
    Flatten(Flatten),
    Sequential(Sequential),
    CustomLayer(CustomLayer),
}

#[enum_dispatch(LayerKind)]
pub trait Layer {
    /// 类型名，用于`describe()`
    fn type_name(&self) -> &str;

    /// `describe()`中括号内的额外描述（如超参数），默认为空
    fn extra_repr(&self) -> String {
        String::new()
    }

    /// 前向前的输入维度校验，默认不校验
    fn check_input_dim(&self, _input: &Tensor) -> Result<(), ModuleError> {
        Ok(())
    }

    /// 前向计算；`module`即该层所属的模块，参数与缓冲区从它上面取
    fn forward(&self, _module: &Module, _input: &Tensor) -> Result<Tensor, ModuleError> {
        Err(ModuleError::NotImplemented(self.type_name().to_string()))
    }
}

/// 只有类型名、没有前向计算的容器（`Module::new`创建的就是它）
pub struct Container {
    type_name: String,
}

impl Container {
    pub fn new(type_name: &str) -> Self {
        Self {
            type_name: type_name.to_string(),
        }
    }
}

impl Layer for Container {
    fn type_name(&self) -> &str {
        &self.type_name
    }
}

/// 用户自定义层
pub struct CustomLayer(Box<dyn Layer>);

impl CustomLayer {
    pub fn new<L: Layer + 'static>(layer: L) -> Self {
        Self(Box::new(layer))
    }
}

impl Layer for CustomLayer {
    fn type_name(&self) -> &str {
        self.0.type_name()
    }

    fn extra_repr(&self) -> String {
        self.0.extra_repr()
    }

    fn check_input_dim(&self, input: &Tensor) -> Result<(), ModuleError> {
        self.0.check_input_dim(input)
    }

    fn forward(&self, module: &Module, input: &Tensor) -> Result<Tensor, ModuleError> {
        self.0.forward(module, input)
    }
}

/// 取出层所需的参数，缺失时报`NotFound`
pub(crate) fn required_parameter(module: &Module, name: &str) -> Result<Tensor, ModuleError> {
    module
        .get_parameter(name)
        .map(|p| p.data())
        .ok_or_else(|| ModuleError::NotFound(format!("{}的参数`{name}`", module.type_name())))
}

/// 取出层所需的缓冲区，缺失时报`NotFound`
pub(crate) fn required_buffer(module: &Module, name: &str) -> Result<Tensor, ModuleError> {
    module
        .get_buffer(name)
        .ok_or_else(|| ModuleError::NotFound(format!("{}的缓冲区`{name}`", module.type_name())))
}
