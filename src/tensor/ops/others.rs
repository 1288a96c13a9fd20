use ndarray::{Array2, Ix2, Zip};
use std::ops::Neg;

use crate::errors::{Operator, TensorError};
use crate::tensor::{Tensor, is_grad_enabled};

/// 按 NumPy 规则计算两个形状广播后的形状，不兼容时返回None
fn broadcast_shape(shape_1: &[usize], shape_2: &[usize]) -> Option<Vec<usize>> {
    let rank = shape_1.len().max(shape_2.len());
    let mut shape = vec![0; rank];
    for i in 0..rank {
        // 从右向左对齐维度，缺失的维度视为1
        let dim_1 = shape_1.len().checked_sub(i + 1).map_or(1, |j| shape_1[j]);
        let dim_2 = shape_2.len().checked_sub(i + 1).map_or(1, |j| shape_2[j]);
        shape[rank - i - 1] = match (dim_1, dim_2) {
            (a, b) if a == b => a,
            (1, b) => b,
            (a, 1) => a,
            _ => return None,
        };
    }
    Some(shape)
}

/// 两个张量逐元素运算（支持广播），结果类型按类型提升规则确定
///
/// # Panics
/// 形状无法广播，或两个张量不在同一设备上
pub(in crate::tensor) fn zip_within_tensors<F>(
    tensor_1: &Tensor,
    tensor_2: &Tensor,
    operator: Operator,
    f: F,
) -> Tensor
where
    F: Fn(f64, f64) -> f64,
{
    assert!(
        tensor_1.device == tensor_2.device,
        "张量不在同一设备上：{}与{}",
        tensor_1.device,
        tensor_2.device
    );
    let Some(shape) = broadcast_shape(tensor_1.shape(), tensor_2.shape()) else {
        panic!(
            "{}",
            TensorError::OperatorError {
                operator,
                tensor1_shape: tensor_1.shape().to_vec(),
                tensor2_shape: tensor_2.shape().to_vec(),
            }
        );
    };
    let (Some(lhs), Some(rhs)) = (
        tensor_1.data.broadcast(shape.as_slice()),
        tensor_2.data.broadcast(shape.as_slice()),
    ) else {
        panic!("{}", TensorError::IncompatibleShape);
    };

    let dtype = tensor_1.dtype.promote(tensor_2.dtype);
    let track = is_grad_enabled()
        && (tensor_1.requires_grad || tensor_2.requires_grad)
        && dtype.is_floating_point();
    Tensor {
        data: Zip::from(&lhs)
            .and(&rhs)
            .map_collect(|&x, &y| dtype.round(f(x, y))),
        dtype,
        device: tensor_1.device,
        requires_grad: track,
        is_leaf: !track,
    }
}

impl Tensor {
    /// 逐元素映射，结果保持原类型与设备
    pub(in crate::tensor) fn map_elements<F>(&self, f: F) -> Self
    where
        F: Fn(f64) -> f64,
    {
        self.derive(self.data.mapv(f), self.dtype, self.device)
    }

    /// 二阶张量（矩阵）乘法
    ///
    /// # Panics
    /// 任一张量不是矩阵，或前者的列数不等于后者的行数
    pub fn mat_mul(&self, other: &Self) -> Self {
        let mismatch = || TensorError::OperatorError {
            operator: Operator::MatMul,
            tensor1_shape: self.shape().to_vec(),
            tensor2_shape: other.shape().to_vec(),
        };
        let (Ok(lhs), Ok(rhs)) = (
            self.data.view().into_dimensionality::<Ix2>(),
            other.data.view().into_dimensionality::<Ix2>(),
        ) else {
            panic!("{}", mismatch());
        };
        assert!(lhs.ncols() == rhs.nrows(), "{}", mismatch());

        assert!(
            self.device == other.device,
            "张量不在同一设备上：{}与{}",
            self.device,
            other.device
        );

        let product: Array2<f64> = lhs.dot(&rhs);
        let dtype = self.dtype.promote(other.dtype);
        let track = is_grad_enabled()
            && (self.requires_grad || other.requires_grad)
            && dtype.is_floating_point();
        Self {
            data: product.into_dyn().mapv(|x| dtype.round(x)),
            dtype,
            device: self.device,
            requires_grad: track,
            is_leaf: !track,
        }
    }

    /// 所有元素之和（结果为标量张量）
    pub fn sum(&self) -> Self {
        let total = self.data.sum();
        self.derive(ndarray::arr0(total).into_dyn(), self.dtype, self.device)
    }

    /// 逐元素与0取较大值
    pub fn relu(&self) -> Self {
        self.map_elements(|x| x.max(0.))
    }

    /// 改变形状（元素个数必须不变）
    ///
    /// # Panics
    /// 新旧形状的元素个数不同
    pub fn reshape(&self, shape: &[usize]) -> Self {
        let data = self
            .data
            .to_shape(shape)
            .unwrap_or_else(|_| {
                panic!(
                    "{}",
                    TensorError::OperatorError {
                        operator: Operator::Reshape,
                        tensor1_shape: self.shape().to_vec(),
                        tensor2_shape: shape.to_vec(),
                    }
                )
            })
            .to_owned();
        self.derive(data, self.dtype, self.device)
    }

    /// 转置（反转所有轴的顺序，矩阵即行列互换）
    pub fn transpose(&self) -> Self {
        self.derive(self.data.t().to_owned(), self.dtype, self.device)
    }
}

impl Neg for Tensor {
    type Output = Self;

    fn neg(self) -> Self {
        self.map_elements(|x| -x)
    }
}

impl Neg for &Tensor {
    type Output = Tensor;

    fn neg(self) -> Tensor {
        self.map_elements(|x| -x)
    }
}
