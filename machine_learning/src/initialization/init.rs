use rand::Rng;

use super::{ConstParamGen, ParamGen, RandParamGen};
use crate::Result;

/// How the parameters of a layer are drawn.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub enum Init {
    Const { value: f32 },
    Uniform { low: f32, high: f32 },
    Normal { mean: f32, std_dev: f32 },
    #[default]
    FanInUniform,
    XavierUniform,
    Kaiming,
    LeCun,
}

impl Init {
    /// Builds the generator for a layer of `limit` parameters.
    ///
    /// # Arguments
    /// * `rng` - The run's random number generator.
    /// * `limit` - The amount of parameters of the layer.
    /// * `fan_in` - The amount of inputs of the layer.
    /// * `fan_out` - The amount of outputs of the layer.
    ///
    /// # Returns
    /// An error if the resulting distribution is invalid.
    pub fn generator<'r, R: Rng>(
        &self,
        rng: &'r mut R,
        limit: usize,
        fan_in: usize,
        fan_out: usize,
    ) -> Result<Box<dyn ParamGen + 'r>> {
        let param_gen: Box<dyn ParamGen + 'r> = match *self {
            Init::Const { value } => Box::new(ConstParamGen::new(value, limit)),
            Init::Uniform { low, high } => Box::new(RandParamGen::uniform(rng, limit, low, high)?),
            Init::Normal { mean, std_dev } => {
                Box::new(RandParamGen::normal(rng, limit, mean, std_dev)?)
            }
            Init::FanInUniform => Box::new(RandParamGen::fan_in_uniform(rng, limit, fan_in)?),
            Init::XavierUniform => Box::new(RandParamGen::xavier_uniform(
                rng, limit, fan_in, fan_out,
            )?),
            Init::Kaiming => Box::new(RandParamGen::kaiming(rng, limit, fan_in)?),
            Init::LeCun => Box::new(RandParamGen::lecun(rng, limit, fan_in)?),
        };

        Ok(param_gen)
    }
}
