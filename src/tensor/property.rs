/*
 * @Date         : 2026-03-02
 * @Description  : 本类仅包含一些属性方法，不包含任何运算方法，所以不会需要用到mut
 */

use ndarray::ArrayViewD;

use super::{DType, Device, Tensor};

impl Tensor {
    pub fn view(&self) -> ArrayViewD<'_, f64> {
        self.data.view()
    }

    /// 若为向量，`shape`可以是[n]、[1,n]、[n,1]；
    /// 若为矩阵，`shape`可以是[n,m]；
    /// 若为更高维度的数组，`shape`可以是[c,n,m,...]。
    pub fn shape(&self) -> &[usize] {
        self.data.shape()
    }

    /// 张量的维（dim）数、阶（rank）数
    pub fn dimension(&self) -> usize {
        self.data.ndim()
    }

    /// 计算张量中所有元素的数量
    pub fn size(&self) -> usize {
        self.data.len()
    }

    pub const fn dtype(&self) -> DType {
        self.dtype
    }

    pub const fn device(&self) -> Device {
        self.device
    }

    pub const fn requires_grad(&self) -> bool {
        self.requires_grad
    }

    /// 叶子张量：由用户直接创建（或被 detach）的张量，而非某个可追踪运算的结果
    pub const fn is_leaf(&self) -> bool {
        self.is_leaf
    }

    pub const fn is_floating_point(&self) -> bool {
        self.dtype.is_floating_point()
    }

    /// 判断两个张量的形状是否严格一致。如：形状为 [1, 4]，[1, 4]和[4]是不一致的，会返回false
    pub fn is_same_shape(&self, other: &Self) -> bool {
        self.shape() == other.shape()
    }

    /// 判断张量是否为标量
    pub fn is_scalar(&self) -> bool {
        self.shape().is_empty() || self.shape().iter().all(|x| *x == 1)
    }

    /// 转化为纯数（number）。若为标量，则返回Some(number)，否则返回None
    pub fn number(&self) -> Option<f64> {
        if self.is_scalar() {
            self.data.iter().next().copied()
        } else {
            None
        }
    }

    /// 按行优先顺序展开全部元素
    pub fn to_vec(&self) -> Vec<f64> {
        self.data.iter().copied().collect()
    }
}
