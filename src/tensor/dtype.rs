use std::fmt;
use std::str::FromStr;

use half::{bf16, f16};
use serde::{Deserialize, Serialize};

use crate::errors::TensorError;

/// 张量的数据类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DType {
    F16,
    BF16,
    #[default]
    F32,
    F64,
    I64,
}

impl DType {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::F16 => "float16",
            Self::BF16 => "bfloat16",
            Self::F32 => "float32",
            Self::F64 => "float64",
            Self::I64 => "int64",
        }
    }

    pub const fn is_floating_point(&self) -> bool {
        !matches!(self, Self::I64)
    }

    /// 将数值舍入到该类型可表示的精度
    pub fn round(&self, value: f64) -> f64 {
        match self {
            Self::F16 => f16::from_f64(value).to_f64(),
            Self::BF16 => bf16::from_f64(value).to_f64(),
            Self::F32 => value as f32 as f64,
            Self::F64 => value,
            Self::I64 => value as i64 as f64,
        }
    }

    /// 二元运算结果的类型（与 PyTorch 的类型提升规则一致）
    pub(crate) fn promote(self, other: Self) -> Self {
        match (self, other) {
            (a, b) if a == b => a,
            (Self::I64, b) => b,
            (a, Self::I64) => a,
            (Self::F64, _) | (_, Self::F64) => Self::F64,
            // f16 与 bf16 混合时，以及任一方为 f32 时
            _ => Self::F32,
        }
    }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for DType {
    type Err = TensorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "f16" | "float16" | "half" => Ok(Self::F16),
            "bf16" | "bfloat16" => Ok(Self::BF16),
            "f32" | "float32" | "float" => Ok(Self::F32),
            "f64" | "float64" | "double" => Ok(Self::F64),
            "i64" | "int64" | "long" => Ok(Self::I64),
            _ => Err(TensorError::UnknownDType(s.to_string())),
        }
    }
}
