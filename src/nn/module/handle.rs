/*
 * @Date         : 2026-03-03
 * @Description  : Module 句柄（用户级 API）
 */

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use super::error::ModuleError;
use super::inner::ModuleInner;
use crate::nn::Parameter;
use crate::nn::layer::{Container, CustomLayer, Layer, LayerKind};
use crate::tensor::Tensor;

/// 模块的标识（同一个模块的所有句柄共享同一个标识）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ModuleId(pub(super) usize);

/// Module - 模块树节点句柄（PyTorch 风格用户 API）
///
/// # 设计原则
/// - 是 `Rc<RefCell<ModuleInner>>` 的薄封装，外加该模块的层行为（`LayerKind`）
/// - Clone 语义：多个 Module 句柄引用同一个节点
/// - 参数、缓冲区、子模块都必须在构造时显式注册，没有基于反射的自动发现
/// - 非线程安全（`!Send`/`!Sync`），所有修改都在单线程内完成
///
/// 同一个子模块被挂到两个父模块下是不受支持的：遍历会按标识去重，
/// 但两个父模块对它的所有权语义是未定义的。
#[derive(Clone)]
pub struct Module {
    pub(super) inner: Rc<RefCell<ModuleInner>>,
    layer: Rc<LayerKind>,
}

impl Module {
    // ==================== 创建 ====================

    /// 创建一个没有前向计算的容器模块（相当于抽象基类）
    pub fn new(type_name: &str) -> Self {
        Self::from_layer(Container::new(type_name))
    }

    /// 以内置层行为创建模块
    pub fn from_layer<L: Into<LayerKind>>(layer: L) -> Self {
        Self {
            inner: Rc::new(RefCell::new(ModuleInner::new())),
            layer: Rc::new(layer.into()),
        }
    }

    /// 以用户自定义的层行为创建模块
    pub fn custom<L: Layer + 'static>(layer: L) -> Self {
        Self::from_layer(CustomLayer::new(layer))
    }

    // ==================== 标识 ====================

    pub fn id(&self) -> ModuleId {
        ModuleId(Rc::as_ptr(&self.inner) as usize)
    }

    /// 是否是同一个模块（而非结构相同）
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    /// 层类型名，如"Conv2d"
    pub fn type_name(&self) -> &str {
        self.layer.type_name()
    }

    pub fn layer(&self) -> &LayerKind {
        &self.layer
    }

    pub fn is_training(&self) -> bool {
        self.inner.borrow().training
    }

    // ==================== 前向 ====================

    /// 前向计算：先校验输入所在设备与输入维度，再交给层计算
    ///
    /// 容器模块没有前向计算，返回`ModuleError::NotImplemented`
    pub fn forward(&self, input: &Tensor) -> Result<Tensor, ModuleError> {
        self.check_input_device(input)?;
        self.layer.check_input_dim(input)?;
        self.layer.forward(self, input)
    }

    /// 本模块直接登记的参数与缓冲区须与输入在同一设备上（子模块在各自的 forward 中校验）
    fn check_input_device(&self, input: &Tensor) -> Result<(), ModuleError> {
        let inner = self.inner.borrow();
        let params = inner
            .parameters
            .iter()
            .filter_map(|(name, p)| p.as_ref().map(|p| (name, p.device())));
        let buffers = inner
            .buffers
            .iter()
            .filter_map(|(name, b)| b.as_ref().map(|b| (name, b.device())));
        for (name, device) in params.chain(buffers) {
            if device != input.device() {
                return Err(ModuleError::DeviceMismatch {
                    tensor: name.clone(),
                    expected: device,
                    got: input.device(),
                });
            }
        }
        Ok(())
    }

    // ==================== 按名查找 ====================

    /// 本模块直接登记的参数（空位视为不存在）
    pub fn get_parameter(&self, name: &str) -> Option<Parameter> {
        self.inner.borrow().parameters.get(name).cloned().flatten()
    }

    /// 本模块直接登记的缓冲区（空位视为不存在）
    pub fn get_buffer(&self, name: &str) -> Option<Tensor> {
        self.inner.borrow().buffers.get(name).cloned().flatten()
    }

    /// 直接子模块
    pub fn get_child(&self, name: &str) -> Option<Self> {
        self.inner.borrow().modules.get(name).cloned()
    }

    /// 按点分路径查找子树中的模块，空路径即自身
    pub fn get_submodule(&self, path: &str) -> Result<Self, ModuleError> {
        if path.is_empty() {
            return Ok(self.clone());
        }
        path.split('.').try_fold(self.clone(), |module, name| {
            module
                .get_child(name)
                .ok_or_else(|| ModuleError::NotFound(format!("子模块`{path}`")))
        })
    }

    /// 替换已登记的缓冲区（供层在前向中更新统计量）
    pub fn set_buffer(&self, name: &str, tensor: Tensor) -> Result<(), ModuleError> {
        let mut inner = self.inner.borrow_mut();
        let slot = inner
            .buffers
            .get_mut(name)
            .ok_or_else(|| ModuleError::NotFound(format!("缓冲区`{name}`")))?;
        *slot = Some(tensor);
        Ok(())
    }

    /// 本模块直接登记的参数个数（不含空位）
    pub fn num_own_params(&self) -> usize {
        self.inner
            .borrow()
            .parameters
            .values()
            .filter(|p| p.is_some())
            .count()
    }

    /// 子树中的参数个数
    pub fn num_params(&self) -> usize {
        self.parameters().len()
    }
}

impl fmt::Debug for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.describe())
    }
}
