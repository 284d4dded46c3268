use ndarray::{ArrayView2, ArrayViewMut2};
use rand::Rng;

use super::{Model, layers::Layer, loss::LossFn};
use crate::{MlErr, Result, initialization::Init, optimization::Optimizer};

/// A sequential model: information flows forward when computing an output and backward when
/// computing the *deltas* of its layers.
///
/// The parameters live outside of the model in a single flat buffer, each layer takes its
/// `size()` parameters in order.
#[derive(Clone, Debug)]
pub struct Sequential {
    layers: Vec<Layer>,
}

impl Sequential {
    /// Creates a new `Sequential`.
    ///
    /// # Arguments
    /// * `layers` - The layers the sequential is composed of.
    ///
    /// # Returns
    /// A new `Sequential` instance.
    pub fn new<I>(layers: I) -> Self
    where
        I: IntoIterator<Item = Layer>,
    {
        Self {
            layers: layers.into_iter().collect(),
        }
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    fn check_len(&self, what: &'static str, got: usize) -> Result<()> {
        let expected = self.size();

        if got != expected {
            return Err(MlErr::SizeMismatch {
                what,
                got,
                expected,
            });
        }

        Ok(())
    }

    /// Propagates `d`, the derivative of the loss with respect to the output, from the last
    /// layer to the first one writing every layer's gradient.
    fn backward(
        &mut self,
        params: &[f32],
        grad: &mut [f32],
        d_last: ArrayViewMut2<f32>,
    ) -> Result<()> {
        let mut end = params.len();
        let mut d = d_last;

        for layer in self.layers.iter_mut().rev() {
            let start = end - layer.size();
            d = layer.backward(&params[start..end], &mut grad[start..end], d)?;
            end = start;
        }

        Ok(())
    }
}

impl Model for Sequential {
    fn size(&self) -> usize {
        self.layers.iter().map(|layer| layer.size()).sum()
    }

    fn init_params<R: Rng>(&self, init: Init, rng: &mut R) -> Result<Vec<f32>> {
        let mut params = Vec::with_capacity(self.size());

        for layer in &self.layers {
            let size = layer.size();
            let (fan_in, fan_out) = layer.dim();

            let mut param_gen = init.generator(rng, size, fan_in, fan_out)?;
            let drawn = param_gen.sample_exact(size).ok_or_else(|| {
                MlErr::InvalidConfig(format!(
                    "the initializer ran short for a layer of {size} parameters"
                ))
            })?;
            params.extend(drawn);
        }

        Ok(params)
    }

    fn forward<'x>(
        &'x mut self,
        params: &[f32],
        mut x: ArrayView2<'x, f32>,
    ) -> Result<ArrayView2<'x, f32>> {
        self.check_len("model parameters", params.len())?;

        let mut start = 0;

        for layer in self.layers.iter_mut() {
            let end = start + layer.size();
            x = layer.forward(&params[start..end], x)?;
            start = end;
        }

        Ok(x)
    }

    // NOTE: the returned loss is the mean of the batch losses measured before each update, with a
    // single full batch it is exactly the loss of the parameters the pass started with.
    fn backprop<'a, L, O, I>(
        &mut self,
        params: &mut [f32],
        grad: &mut [f32],
        loss_fn: &L,
        optimizer: &mut O,
        batches: I,
    ) -> Result<f32>
    where
        L: LossFn,
        O: Optimizer,
        I: Iterator<Item = (ArrayView2<'a, f32>, ArrayView2<'a, f32>)>,
    {
        self.check_len("model gradient", grad.len())?;

        let mut total_loss = 0.0;
        let mut num_batches = 0;

        for (x, y) in batches {
            grad.fill(0.);

            let y_pred = self.forward(params, x)?;
            if y_pred.dim() != y.dim() {
                return Err(MlErr::SizeMismatch {
                    what: "model outputs",
                    got: y_pred.ncols(),
                    expected: y.ncols(),
                });
            }

            total_loss += loss_fn.loss(y_pred, y);
            num_batches += 1;

            let mut d_last = loss_fn.loss_prime(y_pred, y);
            self.backward(params, grad, d_last.view_mut())?;

            optimizer.update_params(params, grad);
        }

        if num_batches == 0 {
            return Err(MlErr::EmptyDataset);
        }

        Ok(total_loss / num_batches as f32)
    }
}
