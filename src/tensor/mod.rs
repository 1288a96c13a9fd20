/*
 * @Date         : 2026-03-02
 * @Description  : 张量能力层：模块树所依赖的最小张量接口
 *
 * 模块树本身只做“记账”，真正的数值运算由张量引擎提供。
 * 这里是一个基于 ndarray 的参考引擎，提供：
 * - 数据类型（dtype）标记及对应精度的数值舍入
 * - 设备（device）标记（设备迁移只改标记，数据始终在主存）
 * - requires_grad / 叶子标记，以及线程内的 no_grad 上下文
 * - 原地复制、清零、分离（detach）等操作
 * 不包含自动微分图和任何硬件内核。
 */

use ndarray::{ArrayD, IxDyn};
use rand::distributions::{Distribution, Uniform};

use crate::errors::TensorError;

mod convert;
mod device;
mod dtype;
mod grad_mode;
mod print;
mod property;
mod save_load;

mod ops {
    pub mod add;
    pub mod eq;
    pub mod mul;
    pub mod others;
    pub mod sub;
}

pub use device::Device;
pub use dtype::DType;
pub use grad_mode::{NoGradGuard, is_grad_enabled, no_grad};
pub(crate) use save_load::TensorRecord;

#[cfg(test)]
mod tests;

/// 定义张量的结构体。其可以是标量、向量、矩阵或更高维度的数组。
/// 数据统一以 f64 存放，但每次写入都会按`dtype`舍入到该类型能表示的精度，
/// 因此 float16、int64 等类型的张量在数值上与真实存储等价。
#[derive(Debug, Clone)]
pub struct Tensor {
    data: ArrayD<f64>,
    dtype: DType,
    device: Device,
    requires_grad: bool,
    is_leaf: bool,
}

impl Tensor {
    /// 创建一个 float32 张量，若为标量，`shape`可以是[]、[1]、[1,1]...
    /// 注：`data`的长度必须和`shape`中所有元素的乘积相等，否则会panic。
    pub fn new(data: &[f32], shape: &[usize]) -> Self {
        let data = data.iter().map(|&x| f64::from(x)).collect::<Vec<_>>();
        Self::new_with_dtype(&data, shape, DType::F32)
    }

    /// 创建指定数据类型的张量，数值会被舍入到`dtype`的精度
    pub fn new_with_dtype(data: &[f64], shape: &[usize], dtype: DType) -> Self {
        let Ok(data) = ArrayD::from_shape_vec(IxDyn(shape), data.to_vec()) else {
            panic!(
                "{}",
                TensorError::DataLengthMismatch {
                    shape: shape.to_vec(),
                    expected: shape.iter().product(),
                    got: data.len(),
                }
            );
        };
        Self::from_array(data, dtype)
    }

    /// 由 ndarray 数组直接构建（叶子张量、无需梯度、位于CPU）
    pub fn from_array(data: ArrayD<f64>, dtype: DType) -> Self {
        Self {
            data: data.mapv(|x| dtype.round(x)),
            dtype,
            device: Device::Cpu,
            requires_grad: false,
            is_leaf: true,
        }
    }

    pub fn zeros(shape: &[usize]) -> Self {
        Self::full(0., shape, DType::F32)
    }

    pub fn ones(shape: &[usize]) -> Self {
        Self::full(1., shape, DType::F32)
    }

    pub fn full(value: f64, shape: &[usize], dtype: DType) -> Self {
        Self::from_array(ArrayD::from_elem(IxDyn(shape), value), dtype)
    }

    /// 创建一个随机 float32 张量，其值在[min, max]的闭区间
    pub fn new_random(min: f32, max: f32, shape: &[usize]) -> Self {
        let mut rng = rand::thread_rng();
        let uniform = Uniform::from(min..=max);
        let data = (0..shape.iter().product::<usize>())
            .map(|_| uniform.sample(&mut rng))
            .collect::<Vec<_>>();
        Self::new(&data, shape)
    }
}

// 私有方法
impl Tensor {
    /// 由`self`派生出的新张量：梯度追踪开启且`self`需要梯度时，结果为非叶子、需要梯度
    fn derive(&self, data: ArrayD<f64>, dtype: DType, device: Device) -> Self {
        let track = is_grad_enabled() && self.requires_grad && dtype.is_floating_point();
        Self {
            data: data.mapv(|x| dtype.round(x)),
            dtype,
            device,
            requires_grad: track,
            is_leaf: !track,
        }
    }

    /// 原地修改前的检查：需要梯度的叶子张量只能在 no_grad 中被原地修改
    fn check_in_place(&self) -> Result<(), TensorError> {
        if self.is_leaf && self.requires_grad && is_grad_enabled() {
            return Err(TensorError::InPlaceOnLeaf);
        }
        Ok(())
    }
}
