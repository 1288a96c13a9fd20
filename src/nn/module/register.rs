/*
 * @Date         : 2026-03-03
 * @Description  : 参数、缓冲区、子模块的显式注册
 *
 * 同一命名空间内重名会覆盖旧条目；跨命名空间重名、非法名称、成环都会被拒绝。
 */

use super::Module;
use super::error::{ModuleError, Namespace};
use crate::nn::Parameter;
use crate::tensor::Tensor;

impl Module {
    /// 注册参数，传入`None`表示登记一个空位
    pub fn register_parameter(
        &self,
        name: &str,
        param: impl Into<Option<Parameter>>,
    ) -> Result<&Self, ModuleError> {
        self.check_name(name, Namespace::Parameter)?;
        let previous = self
            .inner
            .borrow_mut()
            .parameters
            .insert(name.to_string(), param.into());
        if previous.is_some() {
            log::warn!("{}：覆盖已注册的参数`{name}`", self.type_name());
        }
        Ok(self)
    }

    /// 注册缓冲区，传入`None`表示登记一个空位
    pub fn register_buffer(
        &self,
        name: &str,
        tensor: impl Into<Option<Tensor>>,
    ) -> Result<&Self, ModuleError> {
        self.check_name(name, Namespace::Buffer)?;
        let previous = self
            .inner
            .borrow_mut()
            .buffers
            .insert(name.to_string(), tensor.into());
        if previous.is_some() {
            log::warn!("{}：覆盖已注册的缓冲区`{name}`", self.type_name());
        }
        Ok(self)
    }

    /// 添加子模块。若`child`的子树中已包含本模块（含`child`就是本模块），则拒绝
    pub fn add_module(&self, name: &str, child: &Self) -> Result<&Self, ModuleError> {
        self.check_name(name, Namespace::Module)?;
        if child.named_modules().values().any(|m| m.ptr_eq(self)) {
            return Err(ModuleError::CyclicModule(name.to_string()));
        }
        let previous = self
            .inner
            .borrow_mut()
            .modules
            .insert(name.to_string(), child.clone());
        if previous.is_some() {
            log::warn!("{}：覆盖已注册的子模块`{name}`", self.type_name());
        }
        log::debug!(
            "{}：添加子模块`{name}`（{}）",
            self.type_name(),
            child.type_name()
        );
        Ok(self)
    }

    /// 名称不能为空、不能含`.`（它是路径分隔符），也不能已被另外两个命名空间占用
    fn check_name(&self, name: &str, namespace: Namespace) -> Result<(), ModuleError> {
        if name.is_empty() || name.contains('.') {
            return Err(ModuleError::InvalidName(name.to_string()));
        }
        let inner = self.inner.borrow();
        let existing = [
            (Namespace::Parameter, inner.parameters.contains_key(name)),
            (Namespace::Buffer, inner.buffers.contains_key(name)),
            (Namespace::Module, inner.modules.contains_key(name)),
        ]
        .into_iter()
        .find(|&(ns, taken)| taken && ns != namespace);
        match existing {
            Some((existing, _)) => Err(ModuleError::NameConflict {
                name: name.to_string(),
                existing,
            }),
            None => Ok(()),
        }
    }
}
