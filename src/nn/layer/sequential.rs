/*
 * @Date         : 2026-03-05
 * @Description  : Sequential：按顺序串联子模块
 */

use super::Layer;
use crate::nn::{Module, ModuleError};
use crate::tensor::Tensor;

/// 子模块依次命名为"0"、"1"……，前向时按注册顺序逐个调用
///
/// # 使用示例
/// ```ignore
/// let seq = Sequential::new(vec![Linear::new(4, 8, true)?, ReLU::new()])?;
/// let y = seq.forward(&x)?;
/// ```
pub struct Sequential;

impl Sequential {
    pub fn new(layers: Vec<Module>) -> Result<Module, ModuleError> {
        let module = Module::from_layer(Self);
        for (i, layer) in layers.iter().enumerate() {
            module.add_module(&i.to_string(), layer)?;
        }
        Ok(module)
    }
}

impl Layer for Sequential {
    fn type_name(&self) -> &str {
        "Sequential"
    }

    fn forward(&self, module: &Module, input: &Tensor) -> Result<Tensor, ModuleError> {
        module
            .children()
            .iter()
            .try_fold(input.clone(), |x, layer| layer.forward(&x))
    }
}
