/*
 * @Date         : 2026-03-03
 * @Description  : 模块树的遍历与查询
 *
 * - named_children：直接子模块
 * - named_modules：整棵子树（含自身），按标识去重
 * - named_parameters：默认递归，子模块在前、自身在后
 * - named_buffers：默认只含自身（与 named_parameters 不对称，见 DESIGN.md）
 */

use std::collections::HashSet;

use indexmap::IndexMap;

use super::{Module, ModuleId};
use crate::nn::Parameter;
use crate::tensor::Tensor;

impl Module {
    // ==================== 子模块 ====================

    pub fn named_children(&self) -> IndexMap<String, Self> {
        self.inner.borrow().modules.clone()
    }

    pub fn children(&self) -> Vec<Self> {
        self.inner.borrow().modules.values().cloned().collect()
    }

    /// 子树中的全部模块（含自身，路径为""），键为相对本模块的点分路径
    ///
    /// 同一个模块对象即使能经由多条路径到达，也只出现一次（取先遍历到的路径）
    pub fn named_modules(&self) -> IndexMap<String, Self> {
        let mut memo = HashSet::new();
        let mut modules = IndexMap::new();
        self.collect_named_modules(&mut memo, "", &mut modules);
        modules
    }

    pub fn modules(&self) -> Vec<Self> {
        self.named_modules().into_values().collect()
    }

    fn collect_named_modules(
        &self,
        memo: &mut HashSet<ModuleId>,
        prefix: &str,
        modules: &mut IndexMap<String, Self>,
    ) {
        if !memo.insert(self.id()) {
            return;
        }
        modules.insert(prefix.to_string(), self.clone());
        for (name, child) in self.named_children() {
            let child_prefix = if prefix.is_empty() {
                name
            } else {
                format!("{prefix}.{name}")
            };
            child.collect_named_modules(memo, &child_prefix, modules);
        }
    }

    /// 后序（子模块先于自身）列出子树中的全部模块，按标识去重
    pub(super) fn modules_post_order(&self) -> Vec<Self> {
        let mut memo = HashSet::new();
        let mut modules = Vec::new();
        self.collect_post_order(&mut memo, &mut modules);
        modules
    }

    fn collect_post_order(&self, memo: &mut HashSet<ModuleId>, modules: &mut Vec<Self>) {
        if !memo.insert(self.id()) {
            return;
        }
        for child in self.children() {
            child.collect_post_order(memo, modules);
        }
        modules.push(self.clone());
    }

    // ==================== 参数 ====================

    /// 等价于`named_parameters_with("", true)`
    pub fn named_parameters(&self) -> IndexMap<String, Parameter> {
        self.named_parameters_with("", true)
    }

    /// 递归时先按注册顺序深度优先收集各子模块的参数（键加上"子模块名."前缀），
    /// 再追加本模块直接登记的参数；键冲突时后者覆盖前者
    pub fn named_parameters_with(
        &self,
        prefix: &str,
        recurse: bool,
    ) -> IndexMap<String, Parameter> {
        let mut params = IndexMap::new();
        if recurse {
            for (name, child) in self.named_children() {
                params.extend(child.named_parameters_with(&format!("{prefix}{name}."), true));
            }
        }
        let inner = self.inner.borrow();
        for (name, param) in &inner.parameters {
            if let Some(param) = param {
                params.insert(format!("{prefix}{name}"), param.clone());
            }
        }
        params
    }

    pub fn parameters(&self) -> Vec<Parameter> {
        self.named_parameters().into_values().collect()
    }

    // ==================== 缓冲区 ====================

    /// 只含本模块直接登记的缓冲区，不递归
    pub fn named_buffers(&self) -> IndexMap<String, Tensor> {
        self.named_buffers_with("", false)
    }

    /// 与`named_parameters_with`相同的递归规则
    pub fn named_buffers_with(&self, prefix: &str, recurse: bool) -> IndexMap<String, Tensor> {
        let mut buffers = IndexMap::new();
        if recurse {
            for (name, child) in self.named_children() {
                buffers.extend(child.named_buffers_with(&format!("{prefix}{name}."), true));
            }
        }
        let inner = self.inner.borrow();
        for (name, buffer) in &inner.buffers {
            if let Some(buffer) = buffer {
                buffers.insert(format!("{prefix}{name}"), buffer.clone());
            }
        }
        buffers
    }

    pub fn buffers(&self) -> Vec<Tensor> {
        self.named_buffers().into_values().collect()
    }
}
