use thiserror::Error;
mod ops;
pub use self::ops::*;

use crate::tensor::DType;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum TensorError {
    // 张量二元运算
    #[error(
        "形状不一致，故无法{operator}：第一个张量的形状为{tensor1_shape:?}，第二个张量的形状为{tensor2_shape:?}"
    )]
    OperatorError {
        operator: Operator,
        tensor1_shape: Vec<usize>,
        tensor2_shape: Vec<usize>,
    },
    #[error("张量形状不兼容")]
    IncompatibleShape,
    #[error("数据长度{got}与形状{shape:?}所需的元素个数{expected}不一致")]
    DataLengthMismatch {
        shape: Vec<usize>,
        expected: usize,
        got: usize,
    },

    // 梯度相关
    #[error("需要梯度的叶子张量不能在梯度追踪开启时做原地修改，请在 no_grad 中进行")]
    InPlaceOnLeaf,
    #[error("只能修改叶子张量的 requires_grad 标记")]
    NonLeafRequiresGrad,
    #[error("只有浮点类型的张量才能需要梯度，当前类型为{0}")]
    RequiresGradOnNonFloat(DType),

    // 解析
    #[error("未知的数据类型：{0}")]
    UnknownDType(String),
    #[error("未知的设备：{0}")]
    UnknownDevice(String),
}
