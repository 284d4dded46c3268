use ndarray::{Array2, ArrayView2};
use rand::Rng;

use crate::{Result, arch::loss::LossFn, initialization::Init, optimization::Optimizer};

pub trait Model {
    /// Returns the amount of parameters in the model.
    fn size(&self) -> usize;

    /// Draws a fresh parameter buffer for this model.
    ///
    /// # Arguments
    /// * `init` - How the parameters of each layer are drawn.
    /// * `rng` - The run's random number generator.
    fn init_params<R: Rng>(&self, init: Init, rng: &mut R) -> Result<Vec<f32>>;

    /// Makes a forward pass through the model.
    ///
    /// # Arguments
    /// * `params` - The model's parameters.
    /// * `x` - The input data, one sample per row.
    ///
    /// # Returns
    /// The model's raw output for the given input.
    fn forward<'x>(
        &'x mut self,
        params: &[f32],
        x: ArrayView2<'x, f32>,
    ) -> Result<ArrayView2<'x, f32>>;

    /// Same as `forward` but returns an owned output, leaving the model free to be used again.
    fn predict(&mut self, params: &[f32], x: ArrayView2<f32>) -> Result<Array2<f32>> {
        self.forward(params, x).map(|y_pred| y_pred.to_owned())
    }

    /// Computes the gradient of the loss function with respect to the parameters of the model over
    /// the provided batches. **`params` gets updated** for each batch according to the
    /// optimization algorithm.
    ///
    /// # Arguments
    /// * `params` - The model's parameters.
    /// * `grad` - A buffer for writing the computed gradient on each batch pass.
    /// * `loss_fn` - The loss function.
    /// * `optimizer` - The optimizer that dictates how to update the parameters on each gradient calculation.
    /// * `batches` - The batches of data.
    ///
    /// # Returns
    /// The epoch loss.
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
        I: Iterator<Item = (ArrayView2<'a, f32>, ArrayView2<'a, f32>)>;
}
