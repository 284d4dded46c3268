use super::Dataset;
use crate::{MlErr, Result};

/// Splits a dataset into disjoint, contiguous partitions.
///
/// The first fraction is the training partition: every other partition gets
/// `round(fraction * len)` rows and training keeps whatever is left, so no row is lost to
/// rounding.
#[derive(Debug, Clone, PartialEq)]
pub struct Split {
    fractions: Vec<f32>,
}

impl Split {
    /// Creates a new `Split`.
    ///
    /// # Arguments
    /// * `fractions` - The share of each partition, training first. Must add up to one.
    ///
    /// # Returns
    /// An error if there are no fractions, any of them is not in `(0, 1]` or they don't add up
    /// to one.
    pub fn new<I>(fractions: I) -> Result<Self>
    where
        I: IntoIterator<Item = f32>,
    {
        let fractions: Vec<f32> = fractions.into_iter().collect();

        if fractions.is_empty() {
            return Err(MlErr::InvalidConfig("a split needs at least one partition".into()));
        }

        if let Some(f) = fractions.iter().find(|&&f| !(f > 0. && f <= 1.)) {
            return Err(MlErr::InvalidConfig(format!(
                "split fraction {f} is not in (0, 1]"
            )));
        }

        let total: f32 = fractions.iter().sum();
        if (total - 1.).abs() > 1e-4 {
            return Err(MlErr::InvalidConfig(format!(
                "split fractions add up to {total}, expected 1"
            )));
        }

        Ok(Self { fractions })
    }

    /// The amount of rows of each partition for a dataset of `len` rows.
    pub fn sizes(&self, len: usize) -> Vec<usize> {
        let mut sizes: Vec<usize> = self
            .fractions
            .iter()
            .map(|&f| (f as f64 * len as f64).round() as usize)
            .collect();

        let rest: usize = sizes[1..].iter().sum();
        sizes[0] = len.saturating_sub(rest);
        sizes
    }

    /// Slices `dataset` into consecutive partitions following `sizes`.
    ///
    /// # Returns
    /// One dataset per fraction, in the same order.
    pub fn apply(&self, dataset: &Dataset) -> Vec<Dataset> {
        let mut start = 0;

        self.sizes(dataset.len())
            .into_iter()
            .map(|size| {
                let end = (start + size).min(dataset.len());
                let partition = dataset.rows(start..end);
                start = end;
                partition
            })
            .collect()
    }
}
