use ndarray::{Array2, ArrayView2, Zip};

use super::LossFn;
use crate::arch::activations::sigmoid;

/// Binary cross-entropy computed from raw outputs (logits).
///
/// The sigmoid is fused into the loss, `max(z, 0) - z·y + ln(1 + e^-|z|)`, so large logits
/// never overflow.
#[derive(Debug, Default, Clone, Copy)]
pub struct BceWithLogits;

impl BceWithLogits {
    /// Returns a new `BceWithLogits`.
    pub fn new() -> Self {
        Self
    }
}

impl LossFn for BceWithLogits {
    fn loss(&self, y_pred: ArrayView2<f32>, y: ArrayView2<f32>) -> f32 {
        if y_pred.is_empty() {
            return 0.;
        }

        let total = Zip::from(&y_pred)
            .and(&y)
            .fold(0., |acc, &z, &t| acc + z.max(0.) - z * t + (-z.abs()).exp().ln_1p());

        total / y_pred.len() as f32
    }

    fn loss_prime(&self, y_pred: ArrayView2<f32>, y: ArrayView2<f32>) -> Array2<f32> {
        let n = y_pred.len() as f32;
        Zip::from(&y_pred)
            .and(&y)
            .map_collect(|&z, &t| (sigmoid(z) - t) / n)
    }
}
