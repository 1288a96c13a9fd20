/*
 * @Date         : 2026-03-03
 * @Description  : 模块树的错误类型
 */

use std::fmt::{self, Display};

use thiserror::Error;

use crate::errors::TensorError;
use crate::tensor::Device;

/// 模块内的三个命名空间
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Namespace {
    Parameter,
    Buffer,
    Module,
}

impl Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Parameter => "参数",
            Self::Buffer => "缓冲区",
            Self::Module => "子模块",
        };
        write!(f, "{name}")
    }
}

/// 模块树操作错误类型
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ModuleError {
    // load_state_dict
    #[error("未知模块：{0}")]
    UnknownModule(String),
    #[error("模块`{module}`中不存在参数`{name}`")]
    UnknownParameter { name: String, module: String },

    // 查找
    #[error("找不到：{0}")]
    NotFound(String),

    // forward
    #[error("{0}没有实现forward")]
    NotImplemented(String),
    #[error("期望{expected}输入（实际为{got}D输入）")]
    InvalidInputDimension { expected: String, got: usize },
    #[error("输入在{got}上，而`{tensor}`在{expected}上")]
    DeviceMismatch {
        tensor: String,
        expected: Device,
        got: Device,
    },
    #[error("{message}：期望形状{expected:?}，实际形状{got:?}")]
    ShapeMismatch {
        expected: Vec<usize>,
        got: Vec<usize>,
        message: String,
    },

    // 注册
    #[error("非法名称`{0}`：名称不能为空，也不能包含`.`")]
    InvalidName(String),
    #[error("名称`{name}`已被{existing}占用")]
    NameConflict { name: String, existing: Namespace },
    #[error("添加子模块`{0}`会在模块树中形成环")]
    CyclicModule(String),

    #[error(transparent)]
    Tensor(#[from] TensorError),

    // 持久化
    #[error("序列化失败：{0}")]
    Serialization(String),
    #[error("读写文件失败：{0}")]
    Io(String),
}
