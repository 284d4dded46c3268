use std::{fs, num::NonZeroUsize, path::Path};

use serde::{Deserialize, Serialize};

use crate::{Result, dataset::Split, initialization::Init};

/// The specification for the `ActFn` enum.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActFnSpec {
    Sigmoid { amp: f32 },
    Relu,
}

/// The specification for the `Layer` enum.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayerSpec {
    Dense {
        dim: (usize, usize),
        act_fn: Option<ActFnSpec>,
    },
}

/// The specification for the `Model` trait.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelSpec {
    Sequential { layers: Vec<LayerSpec> },
}

/// The specification for the `Optimizer` trait.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptimizerSpec {
    Adam {
        learning_rate: f32,
        beta1: f32,
        beta2: f32,
        epsilon: f32,
    },
    GradientDescent {
        learning_rate: f32,
    },
    GradientDescentWithMomentum {
        learning_rate: f32,
        momentum: f32,
    },
}

/// The specification for the `LossFn` trait.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LossFnSpec {
    Mae,
    Mse,
    BceWithLogits,
}

/// The specification for the `Init` enum.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InitSpec {
    Const {
        value: f32,
    },
    Uniform {
        low: f32,
        high: f32,
    },
    Normal {
        mean: f32,
        std_dev: f32,
    },
    #[default]
    FanInUniform,
    XavierUniform,
    Kaiming,
    LeCun,
}

impl From<InitSpec> for Init {
    fn from(spec: InitSpec) -> Self {
        match spec {
            InitSpec::Const { value } => Init::Const { value },
            InitSpec::Uniform { low, high } => Init::Uniform { low, high },
            InitSpec::Normal { mean, std_dev } => Init::Normal { mean, std_dev },
            InitSpec::FanInUniform => Init::FanInUniform,
            InitSpec::XavierUniform => Init::XavierUniform,
            InitSpec::Kaiming => Init::Kaiming,
            InitSpec::LeCun => Init::LeCun,
        }
    }
}

/// The specification for the `Split` struct.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SplitSpec {
    /// The share of each partition, training first.
    pub fractions: Vec<f32>,
    /// Whether the samples are shuffled with the run's generator before slicing.
    #[serde(default)]
    pub shuffle: bool,
}

impl SplitSpec {
    pub fn resolve(&self) -> Result<Split> {
        Split::new(self.fractions.iter().copied())
    }
}

/// The specification for the `Trainer` trait.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainerSpec {
    pub model: ModelSpec,
    pub optimizer: OptimizerSpec,
    pub loss: LossFnSpec,
    #[serde(default)]
    pub init: InitSpec,
    pub epochs: NonZeroUsize,
    #[serde(default)]
    pub batch_size: Option<NonZeroUsize>,
    pub report_every: NonZeroUsize,
    #[serde(default)]
    pub track_accuracy: bool,
    pub seed: Option<u64>,
}

/// A whole experiment: how the samples are partitioned and how the model is trained.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentSpec {
    pub split: SplitSpec,
    pub trainer: TrainerSpec,
}

impl ExperimentSpec {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads an experiment from a JSON file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }
}
