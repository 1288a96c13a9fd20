//! # Module Tree
//!
//! `module_tree`用纯rust实现类似[pytorch](https://pytorch.org)`nn.Module`的模块树：
//! 显式登记参数、缓冲区与子模块，并在整棵树上递归完成遍历、设备/类型转换、
//! 训练模式切换、梯度控制，以及状态字典（state dict）的导出、加载与文件存取。
//!
//! 张量能力由`tensor`模块中基于`ndarray`的参考引擎提供。
//!

pub mod errors;
pub mod nn;
pub mod tensor;
pub mod utils;
