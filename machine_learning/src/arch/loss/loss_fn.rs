use ndarray::{Array2, ArrayView2};

/// A loss function measuring how far the model's output is from the expected one.
pub trait LossFn {
    /// The mean loss over every element of the batch.
    fn loss(&self, y_pred: ArrayView2<f32>, y: ArrayView2<f32>) -> f32;

    /// The derivative of `loss` with respect to each element of `y_pred`.
    fn loss_prime(&self, y_pred: ArrayView2<f32>, y: ArrayView2<f32>) -> Array2<f32>;
}
