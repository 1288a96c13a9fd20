/*
 * @Date         : 2026-03-05
 * @Description  : BatchNorm1d / BatchNorm2d (批归一化) 层
 *
 * 参数：weight、bias（affine 时）
 * 缓冲区：running_mean、running_var、num_batches_tracked（track_running_stats 时，后者为 int64）
 *
 * 训练模式（或不追踪统计量时）用当前批次的统计量归一化，并更新滑动统计量；
 * 评估模式用滑动统计量。
 */

use ndarray::{Array1, Axis};
use serde::{Deserialize, Serialize};

use super::{Layer, required_buffer};
use crate::nn::{Module, ModuleError, Parameter};
use crate::tensor::{DType, Tensor};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchNormConfig {
    pub num_features: usize,
    pub eps: f64,
    pub momentum: f64,
    pub affine: bool,
    pub track_running_stats: bool,
}

impl Default for BatchNormConfig {
    fn default() -> Self {
        Self {
            num_features: 1,
            eps: 1e-5,
            momentum: 0.1,
            affine: true,
            track_running_stats: true,
        }
    }
}

impl BatchNormConfig {
    pub fn new(num_features: usize) -> Self {
        Self {
            num_features,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Variant {
    /// 输入[N, C]或[N, C, L]
    OneD,
    /// 输入[N, C, H, W]
    TwoD,
}

pub struct BatchNorm {
    config: BatchNormConfig,
    variant: Variant,
}

impl BatchNorm {
    pub fn new_1d(config: BatchNormConfig) -> Result<Module, ModuleError> {
        Self::build(config, Variant::OneD)
    }

    pub fn new_2d(config: BatchNormConfig) -> Result<Module, ModuleError> {
        Self::build(config, Variant::TwoD)
    }

    fn build(config: BatchNormConfig, variant: Variant) -> Result<Module, ModuleError> {
        let n = config.num_features;
        let (affine, track) = (config.affine, config.track_running_stats);
        let module = Module::from_layer(Self { config, variant });

        let (weight, bias) = if affine {
            (
                Some(Parameter::new(Tensor::ones(&[n]), true)?),
                Some(Parameter::new(Tensor::zeros(&[n]), true)?),
            )
        } else {
            (None, None)
        };
        module
            .register_parameter("weight", weight)?
            .register_parameter("bias", bias)?;

        if track {
            module
                .register_buffer("running_mean", Tensor::zeros(&[n]))?
                .register_buffer("running_var", Tensor::ones(&[n]))?
                .register_buffer("num_batches_tracked", Tensor::full(0., &[], DType::I64))?;
        } else {
            module
                .register_buffer("running_mean", None)?
                .register_buffer("running_var", None)?
                .register_buffer("num_batches_tracked", None)?;
        }
        Ok(module)
    }

    /// 每个通道的（均值，有偏方差，无偏方差）
    fn batch_statistics(
        &self,
        input: &Tensor,
    ) -> Result<(Array1<f64>, Array1<f64>, Array1<f64>), ModuleError> {
        let x = input.view();
        let count = input.size() / self.config.num_features;
        if count < 2 {
            return Err(ModuleError::ShapeMismatch {
                expected: vec![2, self.config.num_features],
                got: input.shape().to_vec(),
                message: "训练模式下每个通道需要多于1个值".to_string(),
            });
        }
        let mut mean = Array1::zeros(self.config.num_features);
        let mut var = Array1::zeros(self.config.num_features);
        for (c, lane) in x.axis_iter(Axis(1)).enumerate() {
            let m = lane.sum() / count as f64;
            mean[c] = m;
            var[c] = lane.fold(0., |acc, &v| acc + (v - m) * (v - m)) / count as f64;
        }
        let unbiased = &var * (count as f64 / (count - 1) as f64);
        Ok((mean, var, unbiased))
    }

    fn update_running_stats(
        &self,
        module: &Module,
        mean: &Array1<f64>,
        unbiased_var: &Array1<f64>,
    ) -> Result<(), ModuleError> {
        let momentum = self.config.momentum;
        for (name, batch) in [("running_mean", mean), ("running_var", unbiased_var)] {
            let running = required_buffer(module, name)?;
            let updated = running
                .view()
                .to_owned()
                .into_dimensionality::<ndarray::Ix1>()
                .map_err(|_| ModuleError::ShapeMismatch {
                    expected: vec![self.config.num_features],
                    got: running.shape().to_vec(),
                    message: format!("缓冲区`{name}`形状不符"),
                })?
                * (1. - momentum)
                + batch * momentum;
            module.set_buffer(
                name,
                Tensor::from_array(updated.into_dyn(), running.dtype()).to_device(running.device()),
            )?;
        }
        let tracked = required_buffer(module, "num_batches_tracked")?;
        module.set_buffer("num_batches_tracked", &tracked + 1.)?;
        Ok(())
    }
}

impl Layer for BatchNorm {
    fn type_name(&self) -> &str {
        match self.variant {
            Variant::OneD => "BatchNorm1d",
            Variant::TwoD => "BatchNorm2d",
        }
    }

    fn extra_repr(&self) -> String {
        let BatchNormConfig {
            num_features,
            eps,
            momentum,
            affine,
            track_running_stats,
        } = &self.config;
        format!(
            "{num_features}, eps: {eps}, momentum: {momentum}, affine: {affine}, \
             track_running_stats: {track_running_stats}"
        )
    }

    fn check_input_dim(&self, input: &Tensor) -> Result<(), ModuleError> {
        let (ok, expected) = match self.variant {
            Variant::OneD => (matches!(input.dimension(), 2 | 3), "2D or 3D"),
            Variant::TwoD => (input.dimension() == 4, "4D"),
        };
        if !ok {
            return Err(ModuleError::InvalidInputDimension {
                expected: expected.to_string(),
                got: input.dimension(),
            });
        }
        if input.shape()[1] != self.config.num_features {
            let mut expected_shape = input.shape().to_vec();
            expected_shape[1] = self.config.num_features;
            return Err(ModuleError::ShapeMismatch {
                expected: expected_shape,
                got: input.shape().to_vec(),
                message: format!("{}输入通道数不符", self.type_name()),
            });
        }
        Ok(())
    }

    fn forward(&self, module: &Module, input: &Tensor) -> Result<Tensor, ModuleError> {
        let use_batch_stats = module.is_training() || !self.config.track_running_stats;
        let (mean, var) = if use_batch_stats {
            let (mean, var, unbiased) = self.batch_statistics(input)?;
            if module.is_training() && self.config.track_running_stats {
                self.update_running_stats(module, &mean, &unbiased)?;
            }
            (mean, var)
        } else {
            (
                Array1::from(required_buffer(module, "running_mean")?.to_vec()),
                Array1::from(required_buffer(module, "running_var")?.to_vec()),
            )
        };
        let weight = module.get_parameter("weight").map(|p| p.data().to_vec());
        let bias = module.get_parameter("bias").map(|p| p.data().to_vec());

        let mut output = input.view().to_owned();
        let eps = self.config.eps;
        for (c, mut lane) in output.axis_iter_mut(Axis(1)).enumerate() {
            let scale = weight.as_ref().map_or(1., |w| w[c]) / (var[c] + eps).sqrt();
            let shift = bias.as_ref().map_or(0., |b| b[c]);
            let m = mean[c];
            lane.mapv_inplace(|v| (v - m) * scale + shift);
        }
        Ok(Tensor::from_array(output, input.dtype()).to_device(input.device()))
    }
}
