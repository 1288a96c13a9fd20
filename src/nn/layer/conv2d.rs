/*
 * @Date         : 2026-03-05
 * @Description  : Conv2d (2D 卷积) 层
 *
 * 前向为直接按定义逐点累加的朴素实现（NCHW 布局），只追求结果正确。
 */

use ndarray::{Array4, Ix4};
use serde::{Deserialize, Serialize};

use super::{Layer, required_parameter};
use crate::nn::{Module, ModuleError, Parameter};
use crate::tensor::Tensor;

/// Conv2d 的超参数，可从 JSON 读取（缺省字段取默认值）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Conv2dConfig {
    pub in_channels: usize,
    pub out_channels: usize,
    pub kernel_size: [usize; 2],
    pub stride: [usize; 2],
    pub padding: [usize; 2],
    pub bias: bool,
}

impl Default for Conv2dConfig {
    fn default() -> Self {
        Self {
            in_channels: 1,
            out_channels: 1,
            kernel_size: [1, 1],
            stride: [1, 1],
            padding: [0, 0],
            bias: true,
        }
    }
}

impl Conv2dConfig {
    /// 正方形卷积核、步长1、无填充、带偏置
    pub fn new(in_channels: usize, out_channels: usize, kernel_size: usize) -> Self {
        Self {
            in_channels,
            out_channels,
            kernel_size: [kernel_size, kernel_size],
            ..Default::default()
        }
    }

    pub fn stride(mut self, stride: [usize; 2]) -> Self {
        self.stride = stride;
        self
    }

    pub fn padding(mut self, padding: [usize; 2]) -> Self {
        self.padding = padding;
        self
    }

    pub fn bias(mut self, bias: bool) -> Self {
        self.bias = bias;
        self
    }
}

/// Conv2d (2D 卷积) 层
///
/// # 输入/输出形状
/// - 输入：[N, in_channels, H, W]
/// - 输出：[N, out_channels, H_out, W_out]，`H_out = (H + 2*padding - kernel) / stride + 1`
///
/// # 参数
/// - `weight`：[out_channels, in_channels, kh, kw]
/// - `bias`：[out_channels]（可选）
pub struct Conv2d {
    config: Conv2dConfig,
}

impl Conv2d {
    pub fn new(config: Conv2dConfig) -> Result<Module, ModuleError> {
        let Conv2dConfig {
            in_channels,
            out_channels,
            kernel_size: [kh, kw],
            bias,
            ..
        } = config;
        if config.stride.contains(&0) {
            return Err(ModuleError::ShapeMismatch {
                expected: vec![1, 1],
                got: config.stride.to_vec(),
                message: "Conv2d的步长必须为正".to_string(),
            });
        }
        let bound = 1. / ((in_channels * kh * kw).max(1) as f32).sqrt();
        let module = Module::from_layer(Self { config });
        module.register_parameter(
            "weight",
            Parameter::new(
                Tensor::new_random(-bound, bound, &[out_channels, in_channels, kh, kw]),
                true,
            )?,
        )?;
        let bias = if bias {
            Some(Parameter::new(
                Tensor::new_random(-bound, bound, &[out_channels]),
                true,
            )?)
        } else {
            None
        };
        module.register_parameter("bias", bias)?;
        Ok(module)
    }

    fn output_size(&self, size: usize, axis: usize) -> Option<usize> {
        let padded = size + 2 * self.config.padding[axis];
        let kernel = self.config.kernel_size[axis];
        (padded >= kernel).then(|| (padded - kernel) / self.config.stride[axis] + 1)
    }
}

impl Layer for Conv2d {
    fn type_name(&self) -> &str {
        "Conv2d"
    }

    fn extra_repr(&self) -> String {
        let Conv2dConfig {
            in_channels,
            out_channels,
            kernel_size,
            stride,
            padding,
            ..
        } = &self.config;
        let mut repr = format!(
            "{in_channels}, {out_channels}, kernel_size: {kernel_size:?}, stride: {stride:?}"
        );
        if padding.iter().any(|&p| p != 0) {
            repr.push_str(&format!(", padding: {padding:?}"));
        }
        repr
    }

    fn check_input_dim(&self, input: &Tensor) -> Result<(), ModuleError> {
        if input.dimension() != 4 {
            return Err(ModuleError::InvalidInputDimension {
                expected: "4D".to_string(),
                got: input.dimension(),
            });
        }
        let shape = input.shape();
        let too_small =
            self.output_size(shape[2], 0).is_none() || self.output_size(shape[3], 1).is_none();
        if shape[1] != self.config.in_channels || too_small {
            return Err(ModuleError::ShapeMismatch {
                expected: vec![
                    shape[0],
                    self.config.in_channels,
                    shape[2].max(self.config.kernel_size[0]),
                    shape[3].max(self.config.kernel_size[1]),
                ],
                got: shape.to_vec(),
                message: "Conv2d输入通道数或空间尺寸不符".to_string(),
            });
        }
        Ok(())
    }

    fn forward(&self, module: &Module, input: &Tensor) -> Result<Tensor, ModuleError> {
        let weight = required_parameter(module, "weight")?;
        let bias = module.get_parameter("bias").map(|b| b.data());

        let (Ok(x), Ok(w)) = (
            input.view().into_dimensionality::<Ix4>(),
            weight.view().into_dimensionality::<Ix4>(),
        ) else {
            return Err(ModuleError::InvalidInputDimension {
                expected: "4D".to_string(),
                got: input.dimension(),
            });
        };
        let (n, c_in, h, w_in) = x.dim();
        let (c_out, _, kh, kw) = w.dim();
        let [sh, sw] = self.config.stride;
        let [ph, pw] = self.config.padding;
        let (Some(h_out), Some(w_out)) = (self.output_size(h, 0), self.output_size(w_in, 1)) else {
            return Err(ModuleError::ShapeMismatch {
                expected: vec![n, c_in, kh, kw],
                got: input.shape().to_vec(),
                message: "Conv2d输入小于卷积核".to_string(),
            });
        };

        let bias_values = bias.as_ref().map(Tensor::to_vec);
        let mut output = Array4::<f64>::zeros((n, c_out, h_out, w_out));
        for ((b, o, i, j), out) in output.indexed_iter_mut() {
            let mut acc = bias_values.as_ref().map_or(0., |bv| bv[o]);
            for c in 0..c_in {
                for ki in 0..kh {
                    // 填充区域按0处理
                    let Some(y) = (i * sh + ki).checked_sub(ph).filter(|&y| y < h) else {
                        continue;
                    };
                    for kj in 0..kw {
                        let Some(xx) = (j * sw + kj).checked_sub(pw).filter(|&xx| xx < w_in) else {
                            continue;
                        };
                        acc += x[[b, c, y, xx]] * w[[o, c, ki, kj]];
                    }
                }
            }
            *out = acc;
        }

        let dtype = input.dtype().promote(weight.dtype());
        Ok(Tensor::from_array(output.into_dyn(), dtype).to_device(input.device()))
    }
}
