use ndarray::{Array1, ArrayView2, Axis};

use super::Dataset;
use crate::{MlErr, Result};

/// Standardizes features to zero mean and unit variance using statistics of a reference set,
/// usually the training partition.
#[derive(Debug, Clone, PartialEq)]
pub struct StandardScaler {
    mean: Array1<f32>,
    std_dev: Array1<f32>,
}

impl StandardScaler {
    /// Learns the per-column mean and population standard deviation of `x`.
    ///
    /// Constant columns get a standard deviation of one so they are only centered.
    pub fn fit(x: ArrayView2<f32>) -> Result<Self> {
        let mean = x.mean_axis(Axis(0)).ok_or(MlErr::EmptyDataset)?;
        let std_dev = x
            .std_axis(Axis(0), 0.)
            .mapv(|s| if s > f32::EPSILON { s } else { 1. });

        Ok(Self { mean, std_dev })
    }

    pub fn mean(&self) -> &Array1<f32> {
        &self.mean
    }

    pub fn std_dev(&self) -> &Array1<f32> {
        &self.std_dev
    }

    /// Standardizes the features of `dataset` in place, labels are left untouched.
    pub fn transform(&self, dataset: &mut Dataset) -> Result<()> {
        if dataset.x_size() != self.mean.len() {
            return Err(MlErr::SizeMismatch {
                what: "scaled features",
                got: dataset.x_size(),
                expected: self.mean.len(),
            });
        }

        let mut x = dataset.x_mut();
        x -= &self.mean;
        x /= &self.std_dev;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fitted_features_are_standardized() {
        let data = vec![
            1., 10., 0., //
            2., 10., 1., //
            3., 10., 0., //
        ];
        let mut dataset = Dataset::new(data, 2, 1).unwrap();

        let scaler = StandardScaler::fit(dataset.x()).unwrap();
        assert_eq!(scaler.mean().to_vec(), [2., 10.]);
        assert!((scaler.std_dev()[0] - (2f32 / 3.).sqrt()).abs() < 1e-6);
        // zero spread is replaced so the column is only centered
        assert_eq!(scaler.std_dev()[1], 1.);
        scaler.transform(&mut dataset).unwrap();

        let x = dataset.x();
        let expected = (1.5f32).sqrt();
        assert!((x[[0, 0]] + expected).abs() < 1e-5);
        assert!(x[[1, 0]].abs() < 1e-6);
        assert!((x[[2, 0]] - expected).abs() < 1e-5);

        // constant column is only centered
        assert!(x.column(1).iter().all(|&v| v == 0.));
        // labels stay as they were
        assert_eq!(dataset.y().column(0).to_vec(), [0., 1., 0.]);
    }

    #[test]
    fn width_mismatch_fails() {
        let train = Dataset::new(vec![1., 2., 0.], 2, 1).unwrap();
        let mut other = Dataset::new(vec![1., 0.], 1, 1).unwrap();

        let scaler = StandardScaler::fit(train.x()).unwrap();
        assert!(scaler.transform(&mut other).is_err());
    }

    #[test]
    fn empty_reference_fails() {
        let empty = Dataset::new(vec![], 2, 1).unwrap();
        assert!(StandardScaler::fit(empty.x()).is_err());
    }
}
