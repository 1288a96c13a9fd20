/*
 * @Date         : 2026-03-04
 * @Description  : 对整棵模块树递归施加变换（设备/类型转换、训练模式、梯度控制）
 */

use super::Module;
use super::error::ModuleError;
use crate::nn::Parameter;
use crate::tensor::{DType, Device, Tensor, no_grad};

/// `apply_in_place`中待写回的新张量
enum Replacement {
    Parameter(Parameter),
    Buffer(Tensor),
}

/*↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓张量变换↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓*/
impl Module {
    /// 后序（子模块先于自身）对子树中每个模块的参数、梯度与缓冲区施加`f`，
    /// 每个模块只处理一次
    ///
    /// - 参数：在 no_grad 中计算`f(data)`，包装为新的 Parameter（保留原 requires_grad），
    ///   并替换模块中登记的旧参数；旧句柄不再属于模块
    /// - 梯度：若存在，同样在 no_grad 中变换后挂到新参数上，保留原梯度的 requires_grad
    /// - 缓冲区：直接计算`f(buffer)`并替换
    ///
    /// 先算出整棵树的全部替换结果，再统一写回：任何一个张量出错，模块树都不会被修改。
    pub fn apply_in_place<F>(&self, mut f: F) -> Result<&Self, ModuleError>
    where
        F: FnMut(&Tensor) -> Tensor,
    {
        // 1.计算
        let mut replacements = Vec::new();
        for module in self.modules_post_order() {
            let pending = module.transform_own_tensors(&mut f)?;
            replacements.push((module, pending));
        }

        // 2.写回
        for (module, pending) in replacements {
            let mut inner = module.inner.borrow_mut();
            for (name, replacement) in pending {
                match replacement {
                    Replacement::Parameter(param) => {
                        inner.parameters.insert(name, Some(param));
                    }
                    Replacement::Buffer(buffer) => {
                        inner.buffers.insert(name, Some(buffer));
                    }
                }
            }
        }
        Ok(self)
    }

    /// 只计算本模块直接登记的张量的变换结果，不修改模块
    fn transform_own_tensors<F>(
        &self,
        f: &mut F,
    ) -> Result<Vec<(String, Replacement)>, ModuleError>
    where
        F: FnMut(&Tensor) -> Tensor,
    {
        let (params, buffers): (Vec<(String, Parameter)>, Vec<(String, Tensor)>) = {
            let inner = self.inner.borrow();
            (
                inner
                    .parameters
                    .iter()
                    .filter_map(|(name, p)| p.clone().map(|p| (name.clone(), p)))
                    .collect(),
                inner
                    .buffers
                    .iter()
                    .filter_map(|(name, b)| b.clone().map(|b| (name.clone(), b)))
                    .collect(),
            )
        };

        let mut pending = Vec::with_capacity(params.len() + buffers.len());
        for (name, param) in params {
            let data = no_grad(|| f(&param.data()));
            let new_param = Parameter::new(data, param.requires_grad())?;
            if let Some(grad) = param.grad() {
                let grad_requires_grad = grad.requires_grad();
                let new_grad = no_grad(|| f(&grad))
                    .detach()
                    .with_requires_grad(grad_requires_grad)?;
                new_param.set_grad(Some(new_grad))?;
            }
            pending.push((name, Replacement::Parameter(new_param)));
        }
        for (name, buffer) in buffers {
            pending.push((name, Replacement::Buffer(f(&buffer))));
        }
        Ok(pending)
    }

    pub fn to_device(&self, device: Device) -> Result<&Self, ModuleError> {
        log::debug!("{}：迁移到{device}", self.type_name());
        self.apply_in_place(|t| t.to_device(device))
    }

    pub fn cpu(&self) -> Result<&Self, ModuleError> {
        self.to_device(Device::Cpu)
    }

    pub fn cuda(&self) -> Result<&Self, ModuleError> {
        self.to_device(Device::Cuda(0))
    }

    /// 把所有张量（含整数张量）转换为`dtype`
    pub fn to_dtype(&self, dtype: DType) -> Result<&Self, ModuleError> {
        log::debug!("{}：转换为{dtype}", self.type_name());
        self.apply_in_place(|t| t.to_dtype(dtype))
    }

    /// 只转换浮点张量，整数张量（如 num_batches_tracked）保持不变
    fn floating_to(&self, dtype: DType) -> Result<&Self, ModuleError> {
        self.apply_in_place(|t| {
            if t.is_floating_point() {
                t.to_dtype(dtype)
            } else {
                t.clone()
            }
        })
    }

    pub fn float(&self) -> Result<&Self, ModuleError> {
        self.floating_to(DType::F32)
    }

    pub fn double(&self) -> Result<&Self, ModuleError> {
        self.floating_to(DType::F64)
    }

    pub fn half(&self) -> Result<&Self, ModuleError> {
        self.floating_to(DType::F16)
    }
}
/*↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑张量变换↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑*/

/*↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓模块变换↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓*/
impl Module {
    /// 后序对子树中每个模块调用一次`f`；`f`出错时立即返回
    pub fn apply_to_all<F>(&self, mut f: F) -> Result<&Self, ModuleError>
    where
        F: FnMut(&Self) -> Result<(), ModuleError>,
    {
        for module in self.modules_post_order() {
            f(&module)?;
        }
        Ok(self)
    }

    /// 先设置自身，再递归设置每个子模块
    pub fn train(&self, mode: bool) -> &Self {
        self.inner.borrow_mut().training = mode;
        for child in self.children() {
            child.train(mode);
        }
        self
    }

    pub fn eval(&self) -> &Self {
        self.train(false)
    }

    // ==================== 梯度控制 ====================

    pub fn set_requires_grad(&self, requires_grad: bool) -> Result<&Self, ModuleError> {
        for param in self.parameters() {
            param.set_requires_grad(requires_grad)?;
        }
        Ok(self)
    }

    /// 清零所有已有梯度（先 detach），没有梯度的参数跳过
    pub fn zero_grad(&self) -> Result<(), ModuleError> {
        for param in self.parameters() {
            param.zero_grad()?;
        }
        Ok(())
    }
}
/*↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑模块变换↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑*/
