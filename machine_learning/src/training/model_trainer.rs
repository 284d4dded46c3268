use std::num::NonZeroUsize;

use log::{debug, info};
use ndarray::{Array2, ArrayView2};
use rand::Rng;

use super::{EpochRecord, Evaluation, History, Trainer};
use crate::{
    MlErr, Result,
    arch::{Model, loss::LossFn},
    dataset::Dataset,
    metrics::binary_accuracy,
    optimization::Optimizer,
};

/// A model `Trainer`. Contains the relevant components needed for training a model,
/// including the model itself.
///
/// Every pass is a fixed sequence: forward, loss, zero gradient, backward, update, followed by an
/// evaluation pass over the held-out samples. There is no stopping criterion, a run always lasts
/// `epochs` passes.
pub struct ModelTrainer<M, O, L, R>
where
    M: Model,
    O: Optimizer,
    L: LossFn,
    R: Rng,
{
    model: M,
    optimizer: O,
    loss_fn: L,
    grad: Vec<f32>,

    epochs: NonZeroUsize,
    batch_size: Option<NonZeroUsize>,
    report_every: NonZeroUsize,
    track_accuracy: bool,
    rng: R,
}

impl<M, O, L, R> ModelTrainer<M, O, L, R>
where
    M: Model,
    O: Optimizer,
    L: LossFn,
    R: Rng,
{
    /// Returns a new `ModelTrainer`.
    ///
    /// # Arguments
    /// * `model` - The model that will be trained.
    /// * `optimizer` - The optimizer that dictates how to update the parameters.
    /// * `loss_fn` - The loss function used to measure the difference between a model's output and the expected one.
    /// * `epochs` - The amount of passes over the training samples.
    /// * `rng` - A random number generator, used to shuffle the samples between passes when batching.
    pub fn new(model: M, optimizer: O, loss_fn: L, epochs: NonZeroUsize, rng: R) -> Self {
        Self {
            grad: vec![0.; model.size()],
            model,
            optimizer,
            loss_fn,
            epochs,
            batch_size: None,
            report_every: epochs,
            track_accuracy: false,
            rng,
        }
    }

    /// Splits every pass in shuffled batches of `batch_size` samples instead of a single full
    /// batch.
    pub fn with_batch_size(mut self, batch_size: Option<NonZeroUsize>) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// Logs the progress every `report_every` passes.
    pub fn with_report_every(mut self, report_every: NonZeroUsize) -> Self {
        self.report_every = report_every;
        self
    }

    /// Also measures the binary accuracy of the model's outputs taken as logits.
    pub fn with_accuracy(mut self, track_accuracy: bool) -> Self {
        self.track_accuracy = track_accuracy;
        self
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    fn check_params(&self, params: &[f32]) -> Result<()> {
        if params.len() != self.grad.len() {
            return Err(MlErr::SizeMismatch {
                what: "trainer parameters",
                got: params.len(),
                expected: self.grad.len(),
            });
        }

        Ok(())
    }

    /// Makes a single training pass over `train`.
    ///
    /// # Returns
    /// The loss and accuracy of the parameters the pass started with.
    fn train_epoch(&mut self, params: &mut [f32], train: &mut Dataset) -> Result<Evaluation> {
        let accuracy = if self.track_accuracy {
            let logits = self.model.forward(params, train.x())?;
            Some(binary_accuracy(logits, train.y()))
        } else {
            None
        };

        let loss = match self.batch_size {
            Some(batch_size) => {
                train.shuffle(&mut self.rng);
                self.model.backprop(
                    params,
                    &mut self.grad,
                    &self.loss_fn,
                    &mut self.optimizer,
                    train.batches(batch_size),
                )?
            }
            None => self.model.backprop(
                params,
                &mut self.grad,
                &self.loss_fn,
                &mut self.optimizer,
                train.full_batch(),
            )?,
        };

        Ok(Evaluation { loss, accuracy })
    }
}

impl<M, O, L, R> Trainer for ModelTrainer<M, O, L, R>
where
    M: Model,
    O: Optimizer,
    L: LossFn,
    R: Rng,
{
    fn fit(&mut self, params: &mut [f32], train: &Dataset, eval: &Dataset) -> Result<History> {
        self.check_params(params)?;

        if train.is_empty() {
            return Err(MlErr::EmptyDataset);
        }

        let epochs = self.epochs.get();
        let report_every = self.report_every.get();
        let mut train = train.clone();
        let mut history = History::with_capacity(epochs);

        for epoch in 1..=epochs {
            let train_eval = self.train_epoch(params, &mut train)?;
            let eval_eval = self.evaluate(params, eval)?;

            debug!(epoch, loss = train_eval.loss; "finished pass");

            if epoch % report_every == 0 {
                match (train_eval.accuracy, eval_eval.accuracy) {
                    (Some(train_acc), Some(eval_acc)) => info!(
                        "epoch {epoch}/{epochs}: loss {:.4}, accuracy {:.4}, held-out loss {:.4}, held-out accuracy {:.4}",
                        train_eval.loss, train_acc, eval_eval.loss, eval_acc
                    ),
                    _ => info!(
                        "epoch {epoch}/{epochs}: loss {:.4}, held-out loss {:.4}",
                        train_eval.loss, eval_eval.loss
                    ),
                }
            }

            history.push(EpochRecord {
                epoch,
                train: train_eval,
                eval: eval_eval,
            });
        }

        Ok(history)
    }

    fn evaluate(&mut self, params: &[f32], dataset: &Dataset) -> Result<Evaluation> {
        self.check_params(params)?;

        if dataset.is_empty() {
            return Err(MlErr::EmptyDataset);
        }

        let y_pred = self.model.forward(params, dataset.x())?;
        let loss = self.loss_fn.loss(y_pred, dataset.y());
        let accuracy = self
            .track_accuracy
            .then(|| binary_accuracy(y_pred, dataset.y()));

        Ok(Evaluation { loss, accuracy })
    }

    fn predict(&mut self, params: &[f32], x: ArrayView2<f32>) -> Result<Array2<f32>> {
        self.check_params(params)?;
        self.model.predict(params, x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        arch::{Sequential, layers::Layer, loss::Mse},
        optimization::GradientDescent,
    };
    use rand::{SeedableRng, rngs::StdRng};

    fn line(len: usize) -> Dataset {
        let data = (0..len)
            .flat_map(|i| {
                let x = i as f32 / len as f32;
                [x, 3. * x - 1.]
            })
            .collect();
        Dataset::new(data, 1, 1).unwrap()
    }

    fn trainer(epochs: usize) -> ModelTrainer<Sequential, GradientDescent, Mse, StdRng> {
        ModelTrainer::new(
            Sequential::new([Layer::dense((1, 1), None)]),
            GradientDescent::new(0.5),
            Mse,
            NonZeroUsize::new(epochs).unwrap(),
            StdRng::seed_from_u64(0),
        )
    }

    #[test]
    fn fit_runs_every_epoch() {
        let mut trainer = trainer(25);
        assert_eq!(trainer.model().size(), 2);
        let mut params = vec![0., 0.];

        let history = trainer.fit(&mut params, &line(20), &line(5)).unwrap();

        assert_eq!(history.len(), 25);
        let epochs: Vec<usize> = history.records().iter().map(|r| r.epoch).collect();
        assert_eq!(epochs, (1..=25).collect::<Vec<_>>());
        assert!(history.records().iter().all(|r| r.train.accuracy.is_none()));
    }

    #[test]
    fn fit_reduces_held_out_loss() {
        let mut trainer = trainer(200);
        let mut params = vec![0., 0.];
        let test = line(7);

        let before = trainer.evaluate(&params, &test).unwrap().loss;
        trainer.fit(&mut params, &line(30), &test).unwrap();
        let after = trainer.evaluate(&params, &test).unwrap().loss;

        assert!(after < before / 100., "{after} >= {before} / 100");
        assert!((params[0] - 3.).abs() < 0.1);
        assert!((params[1] + 1.).abs() < 0.1);
    }

    #[test]
    fn batched_fit_is_reproducible() {
        let run = || {
            let mut trainer = trainer(10).with_batch_size(NonZeroUsize::new(4));
            let mut params = vec![0.2, -0.3];
            trainer.fit(&mut params, &line(30), &line(5)).unwrap();
            params
        };

        assert_eq!(run(), run());
    }

    #[test]
    fn wrong_parameter_count_fails() {
        let mut trainer = trainer(1);
        let mut params = vec![0.; 3];

        assert!(trainer.fit(&mut params, &line(4), &line(2)).is_err());
    }
}
