/*
 * @Date         : 2026-03-03
 * @Description  : 负责神经网络模块树（module tree）的构建与管理
 */

pub mod layer;
mod module;
mod parameter;
pub mod serialization;

pub use layer::{
    BatchNorm, BatchNormConfig, Conv2d, Conv2dConfig, Flatten, Layer, LayerKind, Linear, ReLU,
    Sequential,
};
pub use module::{
    ChildDescriptor, LoadOptions, LoadReport, Module, ModuleDescriptor, ModuleError, ModuleId,
    Namespace, StateDict, TensorDescriptor,
};
pub use parameter::Parameter;

#[cfg(test)]
mod tests;
