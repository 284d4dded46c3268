use ndarray::{ArrayView2, Zip};
use serde::Serialize;

use crate::arch::activations::sigmoid;

/// Fraction of samples whose rounded probability `σ(z)` matches the label.
///
/// `σ(0) = 0.5` rounds to the negative class, so a sample is predicted positive only for `z > 0`.
pub fn binary_accuracy(logits: ArrayView2<f32>, labels: ArrayView2<f32>) -> f32 {
    BinaryConfusion::from_logits(logits, labels).accuracy()
}

/// Counts of a binary classifier's hits and misses.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BinaryConfusion {
    pub true_pos: usize,
    pub false_pos: usize,
    pub true_neg: usize,
    pub false_neg: usize,
}

impl BinaryConfusion {
    pub fn from_logits(logits: ArrayView2<f32>, labels: ArrayView2<f32>) -> Self {
        let mut confusion = Self::default();

        Zip::from(&logits).and(&labels).for_each(|&z, &y| {
            let predicted = sigmoid(z).round_ties_even() >= 1.;
            let actual = y >= 0.5;

            match (predicted, actual) {
                (true, true) => confusion.true_pos += 1,
                (true, false) => confusion.false_pos += 1,
                (false, false) => confusion.true_neg += 1,
                (false, true) => confusion.false_neg += 1,
            }
        });

        confusion
    }

    pub fn total(&self) -> usize {
        self.true_pos + self.false_pos + self.true_neg + self.false_neg
    }

    pub fn accuracy(&self) -> f32 {
        ratio(self.true_pos + self.true_neg, self.total())
    }

    pub fn precision(&self) -> f32 {
        ratio(self.true_pos, self.true_pos + self.false_pos)
    }

    pub fn recall(&self) -> f32 {
        ratio(self.true_pos, self.true_pos + self.false_neg)
    }
}

fn ratio(num: usize, den: usize) -> f32 {
    if den == 0 {
        return 0.;
    }

    num as f32 / den as f32
}
