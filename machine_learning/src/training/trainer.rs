use ndarray::{Array2, ArrayView2};

use super::{Evaluation, History};
use crate::{Result, dataset::Dataset};

/// Something able to fit a set of parameters to a dataset.
pub trait Trainer {
    /// Runs the whole training schedule, updating `params` in place.
    ///
    /// # Arguments
    /// * `params` - The model's parameters.
    /// * `train` - The samples the parameters are fitted to.
    /// * `eval` - The held-out samples measured after every pass.
    ///
    /// # Returns
    /// One record per pass.
    fn fit(&mut self, params: &mut [f32], train: &Dataset, eval: &Dataset) -> Result<History>;

    /// Measures the loss (and accuracy when tracked) of `params` over `dataset`.
    fn evaluate(&mut self, params: &[f32], dataset: &Dataset) -> Result<Evaluation>;

    /// The model's raw output for `x`.
    fn predict(&mut self, params: &[f32], x: ArrayView2<f32>) -> Result<Array2<f32>>;
}
