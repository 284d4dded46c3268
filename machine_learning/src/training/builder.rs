use log::debug;
use rand::{SeedableRng, rngs::StdRng};

use super::{ModelTrainer, Trainer};
use crate::{
    MlErr, Result,
    arch::{
        Model, Sequential,
        activations::ActFn,
        layers::Layer,
        loss::{BceWithLogits, LossFn, Mae, Mse},
    },
    optimization::{Adam, GradientDescent, GradientDescentWithMomentum, Optimizer},
    specs::{ActFnSpec, LayerSpec, LossFnSpec, ModelSpec, OptimizerSpec, TrainerSpec},
};

/// Builds `Trainer`s given a specification.
#[derive(Default)]
pub struct TrainerBuilder;

impl TrainerBuilder {
    /// Creates a new `TrainerBuilder`.
    pub fn new() -> Self {
        Self
    }

    /// Returns the generator a run uses, seeded from `seed` or from the os when there is none.
    pub fn generate_rng(&self, seed: Option<u64>) -> StdRng {
        match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        }
    }

    /// Builds a new `Trainer` following a spec, with a generator seeded from the spec's seed.
    ///
    /// # Arguments
    /// * `spec` - The specification for the trainer.
    ///
    /// # Returns
    /// The trainer and the freshly initialized parameters of its model.
    pub fn build(&self, spec: &TrainerSpec) -> Result<(Box<dyn Trainer>, Vec<f32>)> {
        let rng = self.generate_rng(spec.seed);
        self.build_with_rng(spec, rng)
    }

    /// Same as `build` but takes the run's generator, which may already have been used to
    /// shuffle the samples.
    ///
    /// The parameters are drawn from `rng` before it's handed to the trainer.
    pub fn build_with_rng(
        &self,
        spec: &TrainerSpec,
        rng: StdRng,
    ) -> Result<(Box<dyn Trainer>, Vec<f32>)> {
        self.resolve_model(spec, rng)
    }

    fn resolve_model(
        &self,
        spec: &TrainerSpec,
        rng: StdRng,
    ) -> Result<(Box<dyn Trainer>, Vec<f32>)> {
        match &spec.model {
            ModelSpec::Sequential {
                layers: layer_specs,
            } => {
                check_layers(layer_specs)?;
                let layers = layer_specs.iter().map(|ls| self.resolve_layer(*ls));
                let model = Sequential::new(layers);
                self.resolve_optimizer(spec, model, rng)
            }
        }
    }

    fn resolve_layer(&self, spec: LayerSpec) -> Layer {
        match spec {
            LayerSpec::Dense { dim, act_fn } => {
                let factory = |act_fn| Layer::dense(dim, act_fn);
                self.resolve_act_fn(act_fn, factory)
            }
        }
    }

    fn resolve_act_fn<F>(&self, spec: Option<ActFnSpec>, layer_factory: F) -> Layer
    where
        F: FnOnce(Option<ActFn>) -> Layer,
    {
        let act_fn = spec.map(|act_fn| match act_fn {
            ActFnSpec::Sigmoid { amp } => ActFn::sigmoid(amp),
            ActFnSpec::Relu => ActFn::relu(),
        });

        layer_factory(act_fn)
    }

    fn resolve_optimizer<M>(
        &self,
        spec: &TrainerSpec,
        model: M,
        rng: StdRng,
    ) -> Result<(Box<dyn Trainer>, Vec<f32>)>
    where
        M: Model + 'static,
    {
        match spec.optimizer {
            OptimizerSpec::GradientDescent { learning_rate } => {
                let optimizer = GradientDescent::new(learning_rate);
                self.resolve_loss(spec, model, optimizer, rng)
            }
            OptimizerSpec::GradientDescentWithMomentum {
                learning_rate,
                momentum,
            } => {
                let optimizer =
                    GradientDescentWithMomentum::new(model.size(), learning_rate, momentum);
                self.resolve_loss(spec, model, optimizer, rng)
            }
            OptimizerSpec::Adam {
                learning_rate,
                beta1,
                beta2,
                epsilon,
            } => {
                let optimizer = Adam::new(model.size(), learning_rate, beta1, beta2, epsilon);
                self.resolve_loss(spec, model, optimizer, rng)
            }
        }
    }

    fn resolve_loss<M, O>(
        &self,
        spec: &TrainerSpec,
        model: M,
        optimizer: O,
        rng: StdRng,
    ) -> Result<(Box<dyn Trainer>, Vec<f32>)>
    where
        M: Model + 'static,
        O: Optimizer + 'static,
    {
        match spec.loss {
            LossFnSpec::Mae => self.terminate_build(spec, model, optimizer, Mae, rng),
            LossFnSpec::Mse => self.terminate_build(spec, model, optimizer, Mse::new(), rng),
            LossFnSpec::BceWithLogits => {
                self.terminate_build(spec, model, optimizer, BceWithLogits, rng)
            }
        }
    }

    fn terminate_build<M, O, L>(
        &self,
        spec: &TrainerSpec,
        model: M,
        optimizer: O,
        loss: L,
        mut rng: StdRng,
    ) -> Result<(Box<dyn Trainer>, Vec<f32>)>
    where
        M: Model + 'static,
        O: Optimizer + 'static,
        L: LossFn + 'static,
    {
        let params = model.init_params(spec.init.into(), &mut rng)?;
        debug!(params = params.len(), epochs = spec.epochs.get(); "built trainer");

        let trainer = ModelTrainer::new(model, optimizer, loss, spec.epochs, rng)
            .with_batch_size(spec.batch_size)
            .with_report_every(spec.report_every)
            .with_accuracy(spec.track_accuracy);

        Ok((Box::new(trainer), params))
    }
}

/// Checks the model has layers and that each of them takes as many inputs as the previous one
/// outputs.
fn check_layers(layers: &[LayerSpec]) -> Result<()> {
    if layers.is_empty() {
        return Err(MlErr::InvalidConfig("the model has no layers".into()));
    }

    let dims: Vec<(usize, usize)> = layers
        .iter()
        .map(|layer| match layer {
            LayerSpec::Dense { dim, .. } => *dim,
        })
        .collect();

    if let Some((i, dim)) = dims.iter().enumerate().find(|(_, d)| d.0 == 0 || d.1 == 0) {
        return Err(MlErr::InvalidConfig(format!(
            "layer {i} has an empty dimension {dim:?}"
        )));
    }

    for (i, pair) in dims.windows(2).enumerate() {
        if pair[0].1 != pair[1].0 {
            return Err(MlErr::InvalidConfig(format!(
                "layer {} outputs {} values but layer {} takes {}",
                i,
                pair[0].1,
                i + 1,
                pair[1].0
            )));
        }
    }

    Ok(())
}
