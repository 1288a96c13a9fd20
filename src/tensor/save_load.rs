use std::io::{Read, Write};

use ndarray::ArrayD;
use serde::{Deserialize, Serialize};

use super::{DType, Device, Tensor};

/// 张量的可序列化形式：保留类型、设备与梯度标记，梯度追踪历史不保存
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct TensorRecord {
    dtype: DType,
    device: Device,
    requires_grad: bool,
    data: ArrayD<f64>,
}

impl From<&Tensor> for TensorRecord {
    fn from(tensor: &Tensor) -> Self {
        Self {
            dtype: tensor.dtype,
            device: tensor.device,
            requires_grad: tensor.requires_grad,
            data: tensor.data.clone(),
        }
    }
}

impl From<TensorRecord> for Tensor {
    fn from(record: TensorRecord) -> Self {
        let mut tensor = Self::from_array(record.data, record.dtype);
        tensor.device = record.device;
        tensor.requires_grad = record.requires_grad && record.dtype.is_floating_point();
        tensor
    }
}

// 保存和加载张量
impl Tensor {
    /// 将单个Tensor写入`writer`
    pub fn save<W: Write>(&self, writer: W) -> bincode::Result<()> {
        bincode::serialize_into(writer, &TensorRecord::from(self))
    }

    /// 从`reader`加载单个Tensor
    pub fn load<R: Read>(reader: R) -> bincode::Result<Self> {
        let record: TensorRecord = bincode::deserialize_from(reader)?;
        Ok(record.into())
    }
}
