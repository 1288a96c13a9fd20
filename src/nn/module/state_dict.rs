/*
 * @Date         : 2026-03-04
 * @Description  : 状态字典的导出与加载，以及基于它的文件存取
 *
 * 键为点分路径，例如`seq.1.running_mean`。加载时按第一个`.`切分为模块名与余下部分：
 * 模块名按直接子模块查找（与`state_dict()`一样沿树路径，不按标识去重），
 * 余下部分在该子模块的（递归）参数与缓冲区中查找。不含`.`的键直接在根模块上查找。
 */

use std::path::Path;

use indexmap::IndexMap;

use super::Module;
use super::error::ModuleError;
use crate::nn::{Parameter, serialization};
use crate::tensor::{Tensor, no_grad};

/// 有序的“点分路径 → 张量”映射
pub type StateDict = IndexMap<String, Tensor>;

/// 加载选项
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadOptions {
    /// 为真时，字典中无法解析的键视为错误；否则跳过并记录在`LoadReport::unexpected_keys`中
    pub strict: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self { strict: true }
    }
}

/// 加载结果：模块中有但字典中没有的键，以及被跳过的键
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub missing_keys: Vec<String>,
    pub unexpected_keys: Vec<String>,
}

impl LoadReport {
    pub fn is_complete(&self) -> bool {
        self.missing_keys.is_empty() && self.unexpected_keys.is_empty()
    }
}

/// 一个已解析的加载目标
enum Target {
    Parameter(Parameter),
    Buffer { owner: Module, name: String },
}

impl Target {
    fn current(&self) -> Option<Tensor> {
        match self {
            Self::Parameter(param) => Some(param.data()),
            Self::Buffer { owner, name } => owner.get_buffer(name),
        }
    }
}

impl Module {
    /// 子树中所有参数与缓冲区的快照（已 detach），子模块在前；同一节点内参数在前、缓冲区在后
    pub fn state_dict(&self) -> StateDict {
        self.state_dict_with_prefix("")
    }

    fn state_dict_with_prefix(&self, prefix: &str) -> StateDict {
        let mut dict = StateDict::new();
        for (name, child) in self.named_children() {
            dict.extend(child.state_dict_with_prefix(&format!("{prefix}{name}.")));
        }
        for (name, param) in self.named_parameters_with(prefix, false) {
            dict.insert(name, param.data().detach());
        }
        for (name, buffer) in self.named_buffers_with(prefix, false) {
            dict.insert(name, buffer.detach());
        }
        dict
    }

    /// 严格加载，等价于`load_state_dict_with(dict, LoadOptions::default())`
    pub fn load_state_dict(&self, dict: &StateDict) -> Result<LoadReport, ModuleError> {
        self.load_state_dict_with(dict, LoadOptions::default())
    }

    /// 在 no_grad 中把`dict`的数值原地复制进对应的参数与缓冲区
    ///
    /// 参数的标识与 requires_grad 保持不变，数值会转换为目标张量原有的数据类型。
    /// 所有键都先完成解析与形状校验，再统一复制：任何一个键出错，模块树都不会被修改。
    pub fn load_state_dict_with(
        &self,
        dict: &StateDict,
        options: LoadOptions,
    ) -> Result<LoadReport, ModuleError> {
        let mut report = LoadReport::default();
        let mut targets = Vec::with_capacity(dict.len());

        // 1.解析并校验
        for (key, value) in dict {
            let target = match self.resolve_key(key) {
                Ok(target) => target,
                Err(e) if !options.strict => {
                    log::warn!("load_state_dict：跳过无法解析的键`{key}`（{e}）");
                    report.unexpected_keys.push(key.clone());
                    continue;
                }
                Err(e) => return Err(e),
            };
            if let Some(current) = target.current() {
                if !current.is_same_shape(value) {
                    return Err(ModuleError::ShapeMismatch {
                        expected: current.shape().to_vec(),
                        got: value.shape().to_vec(),
                        message: format!("加载`{key}`时形状不符"),
                    });
                }
            }
            targets.push((target, value));
        }

        // 2.复制
        no_grad(|| -> Result<(), ModuleError> {
            for (target, value) in &targets {
                match target {
                    Target::Parameter(param) => param.copy_from(value)?,
                    Target::Buffer { owner, name } => {
                        if let Some(mut buffer) = owner.get_buffer(name) {
                            buffer.copy_mut(value)?;
                            owner.set_buffer(name, buffer)?;
                        }
                    }
                }
            }
            Ok(())
        })?;

        report.missing_keys = self
            .state_dict()
            .into_keys()
            .filter(|k| !dict.contains_key(k))
            .collect();
        log::debug!(
            "{}：载入{}个张量，缺失{}个，跳过{}个",
            self.type_name(),
            targets.len(),
            report.missing_keys.len(),
            report.unexpected_keys.len()
        );
        Ok(report)
    }

    fn resolve_key(&self, key: &str) -> Result<Target, ModuleError> {
        let (module_name, remainder) = key.split_once('.').unwrap_or(("", key));
        let module = if module_name.is_empty() {
            self.clone()
        } else {
            self.get_child(module_name)
                .ok_or_else(|| ModuleError::UnknownModule(module_name.to_string()))?
        };

        if let Some(param) = module.named_parameters().get(remainder) {
            return Ok(Target::Parameter(param.clone()));
        }
        let (path, name) = remainder.rsplit_once('.').unwrap_or(("", remainder));
        if let Ok(owner) = module.get_submodule(path) {
            if owner.get_buffer(name).is_some() {
                return Ok(Target::Buffer {
                    owner,
                    name: name.to_string(),
                });
            }
        }
        Err(ModuleError::UnknownParameter {
            name: remainder.to_string(),
            module: module_name.to_string(),
        })
    }

    // ==================== 文件存取 ====================

    /// 把`state_dict()`写入文件
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ModuleError> {
        serialization::save_state_dict(&self.state_dict(), path)
    }

    /// 从文件读取状态字典并严格加载
    pub fn load<P: AsRef<Path>>(&self, path: P) -> Result<LoadReport, ModuleError> {
        let dict = serialization::load_state_dict(path)?;
        self.load_state_dict(&dict)
    }
}
