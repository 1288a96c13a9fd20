/*
 * @Date         : 2026-03-05
 * @Description  : 模块描述符（Module Descriptor）
 *                 模块树结构的可序列化摘要，用于调试输出与 JSON 导出（不含张量数值）
 */

use serde::{Deserialize, Serialize};

use super::Module;
use crate::nn::layer::Layer;
use crate::tensor::{DType, Device, Tensor};

/// 模块树的可序列化描述
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleDescriptor {
    /// 格式版本（用于向后兼容）
    pub version: String,
    /// 层类型名
    pub type_name: String,
    /// 层的额外描述（如超参数）
    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub extra_repr: String,
    pub training: bool,
    pub parameters: Vec<TensorDescriptor>,
    pub buffers: Vec<TensorDescriptor>,
    pub children: Vec<ChildDescriptor>,
}

/// 参数或缓冲区的描述
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TensorDescriptor {
    pub name: String,
    pub shape: Vec<usize>,
    pub dtype: DType,
    pub device: Device,
    pub requires_grad: bool,
}

/// 具名子模块
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChildDescriptor {
    pub name: String,
    pub module: ModuleDescriptor,
}

impl ModuleDescriptor {
    /// 子树中的参数元素总数
    pub fn total_params(&self) -> usize {
        let own: usize = self
            .parameters
            .iter()
            .map(|p| p.shape.iter().product::<usize>())
            .sum();
        own + self
            .children
            .iter()
            .map(|c| c.module.total_params())
            .sum::<usize>()
    }

    /// 转换为 JSON 字符串
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// 从 JSON 字符串解析
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl TensorDescriptor {
    fn new(name: &str, tensor: &Tensor) -> Self {
        Self {
            name: name.to_string(),
            shape: tensor.shape().to_vec(),
            dtype: tensor.dtype(),
            device: tensor.device(),
            requires_grad: tensor.requires_grad(),
        }
    }
}

impl Module {
    /// 生成本模块（递归含子模块）的描述符
    pub fn descriptor(&self) -> ModuleDescriptor {
        ModuleDescriptor {
            version: env!("CARGO_PKG_VERSION").to_string(),
            type_name: self.type_name().to_string(),
            extra_repr: self.layer().extra_repr(),
            training: self.is_training(),
            parameters: self
                .named_parameters_with("", false)
                .iter()
                .map(|(name, p)| TensorDescriptor::new(name, &p.data()))
                .collect(),
            buffers: self
                .named_buffers()
                .iter()
                .map(|(name, b)| TensorDescriptor::new(name, b))
                .collect(),
            children: self
                .named_children()
                .into_iter()
                .map(|(name, child)| ChildDescriptor {
                    name,
                    module: child.descriptor(),
                })
                .collect(),
        }
    }
}
