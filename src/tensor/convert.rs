/*
 * @Date         : 2026-03-02
 * @Description  : 设备/类型转换、梯度标记与原地修改
 *
 * 这些是模块树的“变换”所依赖的全部张量能力：
 * - 非原地：to_device / to_dtype / detach，返回新张量
 * - 原地：copy_mut / zero_mut / detach_mut / set_requires_grad
 */

use super::{DType, Device, Tensor, is_grad_enabled};
use crate::errors::{Operator, TensorError};

/*↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓设备与类型转换↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓*/
impl Tensor {
    /// 迁移到指定设备；若已在该设备上，则原样返回（克隆）
    pub fn to_device(&self, device: Device) -> Self {
        if self.device == device {
            return self.clone();
        }
        self.derive(self.data.clone(), self.dtype, device)
    }

    pub fn cpu(&self) -> Self {
        self.to_device(Device::Cpu)
    }

    pub fn cuda(&self) -> Self {
        self.to_device(Device::Cuda(0))
    }

    /// 转换为指定数据类型；若类型相同，则原样返回（克隆）
    pub fn to_dtype(&self, dtype: DType) -> Self {
        if self.dtype == dtype {
            return self.clone();
        }
        self.derive(self.data.clone(), dtype, self.device)
    }

    pub fn float(&self) -> Self {
        self.to_dtype(DType::F32)
    }

    pub fn double(&self) -> Self {
        self.to_dtype(DType::F64)
    }

    pub fn half(&self) -> Self {
        self.to_dtype(DType::F16)
    }
}
/*↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑设备与类型转换↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑*/

/*↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓梯度标记↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓*/
impl Tensor {
    /// 返回与原张量数值相同、但脱离梯度追踪的叶子张量
    pub fn detach(&self) -> Self {
        let mut detached = self.clone();
        detached.detach_mut();
        detached
    }

    pub fn detach_mut(&mut self) {
        self.requires_grad = false;
        self.is_leaf = true;
    }

    /// 修改 requires_grad 标记。只有叶子张量可以修改，且只有浮点张量可以需要梯度
    pub fn set_requires_grad(&mut self, requires_grad: bool) -> Result<(), TensorError> {
        if !self.is_leaf {
            return Err(TensorError::NonLeafRequiresGrad);
        }
        if requires_grad && !self.is_floating_point() {
            return Err(TensorError::RequiresGradOnNonFloat(self.dtype));
        }
        self.requires_grad = requires_grad;
        Ok(())
    }

    /// `set_requires_grad`的链式写法
    pub fn with_requires_grad(mut self, requires_grad: bool) -> Result<Self, TensorError> {
        self.set_requires_grad(requires_grad)?;
        Ok(self)
    }
}
/*↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑梯度标记↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑*/

/*↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓原地修改↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓*/
impl Tensor {
    /// 将`src`的数值原地复制进来，按自身的数据类型舍入，设备与 requires_grad 标记保持不变
    pub fn copy_mut(&mut self, src: &Self) -> Result<(), TensorError> {
        self.check_in_place()?;
        if !self.is_same_shape(src) {
            return Err(TensorError::OperatorError {
                operator: Operator::Copy,
                tensor1_shape: self.shape().to_vec(),
                tensor2_shape: src.shape().to_vec(),
            });
        }
        let dtype = self.dtype;
        self.data.zip_mut_with(&src.data, |dst, &value| *dst = dtype.round(value));
        // 从需要梯度的张量复制时，本张量成为计算结果
        if is_grad_enabled() && src.requires_grad && self.is_floating_point() {
            self.requires_grad = true;
            self.is_leaf = false;
        }
        Ok(())
    }

    /// 原地清零
    pub fn zero_mut(&mut self) -> Result<(), TensorError> {
        self.check_in_place()?;
        self.data.fill(0.);
        Ok(())
    }
}
/*↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑原地修改↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑*/
