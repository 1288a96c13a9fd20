/*
 * @Date         : 2026-03-03
 * @Description  : Parameter：需要梯度的张量 + 可选的梯度张量
 *
 * Parameter 是 `Rc<RefCell<..>>` 的薄封装（与 Graph 句柄同理）：
 * 从 `named_parameters()` 取出的句柄与模块中登记的是同一个对象，
 * 因此 `zero_grad`、`set_requires_grad`、`load_state_dict` 的原地修改对持有者可见。
 * 而 `apply_in_place` 会用新的 Parameter 替换旧的，旧句柄不再属于模块。
 */

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::errors::TensorError;
use crate::tensor::{DType, Device, Tensor, no_grad};

struct ParameterInner {
    data: Tensor,
    grad: Option<Tensor>,
}

#[derive(Clone)]
pub struct Parameter {
    inner: Rc<RefCell<ParameterInner>>,
}

impl Parameter {
    /// 以`data`的数值创建参数（先 detach 成叶子张量，再设置 requires_grad）
    ///
    /// 非浮点张量不能需要梯度，此时返回错误
    pub fn new(data: Tensor, requires_grad: bool) -> Result<Self, TensorError> {
        let data = data.detach().with_requires_grad(requires_grad)?;
        Ok(Self {
            inner: Rc::new(RefCell::new(ParameterInner { data, grad: None })),
        })
    }

    /// 克隆出当前数值（带 requires_grad 标记）
    pub fn data(&self) -> Tensor {
        self.inner.borrow().data.clone()
    }

    pub fn shape(&self) -> Vec<usize> {
        self.inner.borrow().data.shape().to_vec()
    }

    pub fn dtype(&self) -> DType {
        self.inner.borrow().data.dtype()
    }

    pub fn device(&self) -> Device {
        self.inner.borrow().data.device()
    }

    pub fn requires_grad(&self) -> bool {
        self.inner.borrow().data.requires_grad()
    }

    pub fn set_requires_grad(&self, requires_grad: bool) -> Result<(), TensorError> {
        self.inner.borrow_mut().data.set_requires_grad(requires_grad)
    }

    pub fn grad(&self) -> Option<Tensor> {
        self.inner.borrow().grad.clone()
    }

    /// 设置（或清除）梯度。梯度形状须与参数一致
    pub fn set_grad(&self, grad: Option<Tensor>) -> Result<(), TensorError> {
        let mut inner = self.inner.borrow_mut();
        if let Some(g) = &grad {
            if !g.is_same_shape(&inner.data) {
                return Err(TensorError::OperatorError {
                    operator: crate::errors::Operator::Copy,
                    tensor1_shape: inner.data.shape().to_vec(),
                    tensor2_shape: g.shape().to_vec(),
                });
            }
        }
        inner.grad = grad;
        Ok(())
    }

    /// 在 no_grad 中把`src`的数值原地复制进参数，标识与 requires_grad 不变
    pub fn copy_from(&self, src: &Tensor) -> Result<(), TensorError> {
        no_grad(|| self.inner.borrow_mut().data.copy_mut(src))
    }

    /// 梯度存在时先 detach 再原地清零；没有梯度则什么都不做
    pub fn zero_grad(&self) -> Result<(), TensorError> {
        match self.inner.borrow_mut().grad.as_mut() {
            Some(grad) => {
                grad.detach_mut();
                grad.zero_mut()
            }
            None => Ok(()),
        }
    }

    /// 是否是同一个参数对象（而非数值相等）
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("Parameter")
            .field("data", &inner.data)
            .field("grad", &inner.grad)
            .finish()
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Parameter containing:\n{}", self.inner.borrow().data)
    }
}
