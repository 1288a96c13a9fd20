/*
 * @Date         : 2026-03-04
 * @Description  : 模块树的文本描述
 *
 * 叶子模块：`Linear(in_features: 4, out_features: 2, bias: true)`
 * 组合模块：
 * ```text
 * Net(
 *   (conv1): Conv2d(1, 6, kernel_size: [3, 3], stride: [1, 1])
 *   (seq): Sequential(
 *     (0): ReLU()
 *   )
 * )
 * ```
 */

use std::fmt;

use super::Module;
use crate::nn::layer::Layer;

impl Module {
    pub fn describe(&self) -> String {
        let extra = self.layer().extra_repr();
        let children = self.named_children();
        if children.is_empty() {
            return format!("{}({extra})", self.type_name());
        }

        let mut lines = vec![format!("{}(", self.type_name())];
        if !extra.is_empty() {
            lines.push(format!("  {extra}"));
        }
        for (name, child) in children {
            // 子模块的多行描述整体缩进两格
            let child_desc = child.describe().replace('\n', "\n  ");
            lines.push(format!("  ({name}): {child_desc}"));
        }
        lines.push(")".to_string());
        lines.join("\n")
    }
}

impl fmt::Display for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.describe())
    }
}
