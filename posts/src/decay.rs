use std::{f32::consts::LN_2, num::NonZeroUsize};

use machine_learning::{
    MlErr, Result,
    dataset::Dataset,
    specs::{
        ExperimentSpec, InitSpec, LayerSpec, LossFnSpec, ModelSpec, OptimizerSpec, SplitSpec,
        TrainerSpec,
    },
    training::{History, TrainerBuilder},
};

/// Half-life of the simulated isotope, in the same unit as the sample times.
pub const HALF_LIFE: f32 = 7.13;
/// Amount of simulated measurements.
pub const SAMPLES: usize = 60;
/// Time elapsed between two measurements.
pub const TIME_STEP: f32 = 0.1;
/// Activity at `t = 0`.
pub const INITIAL_ACTIVITY: f32 = 1.;

const EPOCHS: NonZeroUsize = NonZeroUsize::new(200).unwrap();
const REPORT_EVERY: NonZeroUsize = NonZeroUsize::new(20).unwrap();

/// The decay constant `λ = ln 2 / half-life`, the slope `ln A(t)` should be fitted to is `-λ`.
pub fn decay_constant() -> f32 {
    LN_2 / HALF_LIFE
}

/// Simulates the activity measurements `A(t) = A0 · e^(-λt)` and returns them as `(t, ln A)`
/// samples in time order.
pub fn samples() -> Result<Dataset> {
    let lambda = decay_constant();

    let data = (0..SAMPLES)
        .flat_map(|i| {
            let t = i as f32 * TIME_STEP;
            let activity = INITIAL_ACTIVITY * (-lambda * t).exp();
            [t, activity.ln()]
        })
        .collect();

    Dataset::new(data, 1, 1)
}

/// The experiment of the post: `y = w·t + b` fitted with mean absolute error and plain gradient
/// descent over an 80/20 split that keeps the time order.
pub fn decay_spec() -> ExperimentSpec {
    ExperimentSpec {
        split: SplitSpec {
            fractions: vec![0.8, 0.2],
            shuffle: false,
        },
        trainer: TrainerSpec {
            model: ModelSpec::Sequential {
                layers: vec![LayerSpec::Dense {
                    dim: (1, 1),
                    act_fn: None,
                }],
            },
            optimizer: OptimizerSpec::GradientDescent {
                learning_rate: 0.01,
            },
            loss: LossFnSpec::Mae,
            init: InitSpec::FanInUniform,
            epochs: EPOCHS,
            batch_size: None,
            report_every: REPORT_EVERY,
            track_accuracy: false,
            seed: Some(42),
        },
    }
}

/// What came out of fitting the decay samples.
#[derive(Debug, Clone)]
pub struct DecayFit {
    pub weight: f32,
    pub bias: f32,
    /// Held-out MAE of the freshly initialized parameters.
    pub initial_mae: f32,
    /// Held-out MAE after the last pass.
    pub final_mae: f32,
    pub history: History,
    /// The fitted line evaluated at every sample time, in sample order.
    pub predictions: Vec<f32>,
}

/// Fits the linear model of `spec` to `samples`.
///
/// # Returns
/// An error if the split doesn't have exactly a training and a testing partition or the model is
/// not a single `1 → 1` layer.
pub fn run(spec: &ExperimentSpec, samples: &Dataset) -> Result<DecayFit> {
    let builder = TrainerBuilder::new();
    let mut rng = builder.generate_rng(spec.trainer.seed);

    let mut ordered = samples.clone();
    if spec.split.shuffle {
        ordered.shuffle(&mut rng);
    }

    let [train, test] = <[Dataset; 2]>::try_from(spec.split.resolve()?.apply(&ordered))
        .map_err(|parts| {
            MlErr::InvalidConfig(format!(
                "the decay fit needs a train and a test partition, got {}",
                parts.len()
            ))
        })?;

    let (mut trainer, mut params) = builder.build_with_rng(&spec.trainer, rng)?;
    if params.len() != 2 {
        return Err(MlErr::InvalidConfig(format!(
            "the decay fit is a single weight and bias, got {} parameters",
            params.len()
        )));
    }

    let initial_mae = trainer.evaluate(&params, &test)?.loss;
    let history = trainer.fit(&mut params, &train, &test)?;
    let final_mae = trainer.evaluate(&params, &test)?.loss;

    let predictions = trainer.predict(&params, samples.x())?;

    Ok(DecayFit {
        weight: params[0],
        bias: params[1],
        initial_mae,
        final_mae,
        history,
        predictions: predictions.iter().copied().collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn samples_are_log_activity_in_time_order() {
        let samples = samples().unwrap();

        assert_eq!(samples.len(), SAMPLES);
        assert_eq!(samples.x()[[0, 0]], 0.);
        assert_eq!(samples.y()[[0, 0]], 0.);
        assert!((samples.x()[[59, 0]] - 5.9).abs() < 1e-5);
        assert!((samples.y()[[59, 0]] + decay_constant() * 5.9).abs() < 1e-5);
    }

    #[test]
    fn decay_constant_matches_half_life() {
        assert!((decay_constant() - 0.0972).abs() < 1e-4);
    }

    #[test]
    fn default_split_is_forty_eight_twelve() {
        let spec = decay_spec();
        let sizes = spec.split.resolve().unwrap().sizes(SAMPLES);

        assert_eq!(sizes, [48, 12]);
    }

    #[test]
    fn three_partitions_are_rejected() {
        let mut spec = decay_spec();
        spec.split.fractions = vec![0.6, 0.2, 0.2];

        let err = run(&spec, &samples().unwrap()).unwrap_err();
        assert!(matches!(err, MlErr::InvalidConfig(_)));
    }
}
