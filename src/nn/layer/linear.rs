/*
 * @Date         : 2026-03-05
 * @Description  : Linear (全连接) 层
 */

use super::{Layer, required_parameter};
use crate::nn::{Module, ModuleError, Parameter};
use crate::tensor::Tensor;

/// Linear (全连接) 层：`output = x @ Wᵀ + b`
///
/// # 输入/输出形状
/// - 输入：[batch_size, in_features]
/// - 输出：[batch_size, out_features]
///
/// # 参数
/// - `weight`：[out_features, in_features]
/// - `bias`：[out_features]（可选）
///
/// # 使用示例
/// ```ignore
/// let fc = Linear::new(784, 128, true)?;
/// let h = fc.forward(&x)?.relu();
/// ```
pub struct Linear {
    in_features: usize,
    out_features: usize,
    bias: bool,
}

impl Linear {
    /// 创建 Linear 层模块，权重与偏置均在 ±1/√in_features 内均匀初始化
    pub fn new(in_features: usize, out_features: usize, bias: bool) -> Result<Module, ModuleError> {
        let bound = 1. / (in_features.max(1) as f32).sqrt();
        let module = Module::from_layer(Self {
            in_features,
            out_features,
            bias,
        });
        module.register_parameter(
            "weight",
            Parameter::new(
                Tensor::new_random(-bound, bound, &[out_features, in_features]),
                true,
            )?,
        )?;
        let bias = if bias {
            Some(Parameter::new(
                Tensor::new_random(-bound, bound, &[out_features]),
                true,
            )?)
        } else {
            None
        };
        module.register_parameter("bias", bias)?;
        Ok(module)
    }
}

impl Layer for Linear {
    fn type_name(&self) -> &str {
        "Linear"
    }

    fn extra_repr(&self) -> String {
        format!(
            "in_features: {}, out_features: {}, bias: {}",
            self.in_features, self.out_features, self.bias
        )
    }

    fn check_input_dim(&self, input: &Tensor) -> Result<(), ModuleError> {
        if input.dimension() != 2 {
            return Err(ModuleError::InvalidInputDimension {
                expected: "2D".to_string(),
                got: input.dimension(),
            });
        }
        if input.shape()[1] != self.in_features {
            return Err(ModuleError::ShapeMismatch {
                expected: vec![input.shape()[0], self.in_features],
                got: input.shape().to_vec(),
                message: "Linear输入特征数不符".to_string(),
            });
        }
        Ok(())
    }

    fn forward(&self, module: &Module, input: &Tensor) -> Result<Tensor, ModuleError> {
        let weight = required_parameter(module, "weight")?;
        // [batch, in] @ [in, out] = [batch, out]
        let output = input.mat_mul(&weight.transpose());
        match module.get_parameter("bias") {
            Some(bias) => Ok(output + bias.data()),
            None => Ok(output),
        }
    }
}
