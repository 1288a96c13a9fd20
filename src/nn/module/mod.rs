/*
 * @Date         : 2026-03-03
 * @Description  : 模块树（Module Tree）
 *
 * 神经网络模块的层级容器：每个模块登记自己的参数、缓冲区与子模块，
 * 并提供递归遍历、变换、训练模式传播、梯度控制、状态字典存取等能力。
 */

mod apply;
mod descriptor;
mod display;
mod error;
mod handle;
mod inner;
mod register;
mod state_dict;
mod traversal;

pub use descriptor::{ChildDescriptor, ModuleDescriptor, TensorDescriptor};
pub use error::{ModuleError, Namespace};
pub use handle::{Module, ModuleId};
pub use state_dict::{LoadOptions, LoadReport, StateDict};
