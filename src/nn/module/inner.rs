use indexmap::IndexMap;

use super::Module;
use crate::nn::Parameter;
use crate::tensor::Tensor;

/// 模块自身的状态（不含子树）
///
/// 三个映射都保持注册顺序；参数与缓冲区允许登记为空（`None`），
/// 空位在所有遍历中都会被跳过（例如不带仿射变换的 BatchNorm 的 weight/bias）。
pub(super) struct ModuleInner {
    pub(super) training: bool,
    pub(super) parameters: IndexMap<String, Option<Parameter>>,
    pub(super) buffers: IndexMap<String, Option<Tensor>>,
    pub(super) modules: IndexMap<String, Module>,
}

impl ModuleInner {
    pub(super) fn new() -> Self {
        Self {
            training: true,
            parameters: IndexMap::new(),
            buffers: IndexMap::new(),
            modules: IndexMap::new(),
        }
    }
}
