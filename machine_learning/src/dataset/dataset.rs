use std::{iter, num::NonZeroUsize, ops::Range};

use ndarray::{Array2, ArrayView2, ArrayViewMut2, Axis, s};
use rand::{Rng, seq::SliceRandom};

use crate::{MlErr, Result};

/// An in-memory table of samples, one per row: the first `x_size` columns are the features and the
/// following `y_size` columns are the labels.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    x_size: usize,
    y_size: usize,
    data: Array2<f32>,
}

impl Dataset {
    /// Creates a new `Dataset` from a row-major buffer.
    ///
    /// # Arguments
    /// * `data` - The samples, `x_size + y_size` values per row.
    /// * `x_size` - The amount of features per sample.
    /// * `y_size` - The amount of labels per sample.
    ///
    /// # Returns
    /// An error if `data` can't be split into whole rows.
    pub fn new(data: Vec<f32>, x_size: usize, y_size: usize) -> Result<Self> {
        let row_size = x_size + y_size;

        if row_size == 0 {
            return Err(MlErr::InvalidConfig(
                "a dataset row must have at least one column".into(),
            ));
        }

        if data.len() % row_size != 0 {
            return Err(MlErr::SizeMismatch {
                what: "dataset values",
                got: data.len(),
                expected: (data.len() / row_size + 1) * row_size,
            });
        }

        let data = Array2::from_shape_vec((data.len() / row_size, row_size), data)?;
        Ok(Self {
            x_size,
            y_size,
            data,
        })
    }

    /// Creates a new `Dataset` out of separate feature and label matrices with the same rows.
    pub fn from_parts(x: ArrayView2<f32>, y: ArrayView2<f32>) -> Result<Self> {
        if x.nrows() != y.nrows() {
            return Err(MlErr::SizeMismatch {
                what: "dataset label rows",
                got: y.nrows(),
                expected: x.nrows(),
            });
        }

        let data = ndarray::concatenate(Axis(1), &[x, y])?;
        Ok(Self {
            x_size: x.ncols(),
            y_size: y.ncols(),
            data,
        })
    }

    /// The amount of samples.
    pub fn len(&self) -> usize {
        self.data.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn x_size(&self) -> usize {
        self.x_size
    }

    pub fn y_size(&self) -> usize {
        self.y_size
    }

    /// The features, one sample per row.
    pub fn x(&self) -> ArrayView2<'_, f32> {
        self.data.slice(s![.., ..self.x_size])
    }

    /// The labels, one sample per row.
    pub fn y(&self) -> ArrayView2<'_, f32> {
        self.data.slice(s![.., self.x_size..])
    }

    pub(crate) fn x_mut(&mut self) -> ArrayViewMut2<'_, f32> {
        self.data.slice_mut(s![.., ..self.x_size])
    }

    /// A new dataset holding a contiguous range of rows.
    pub fn rows(&self, range: Range<usize>) -> Self {
        Self {
            x_size: self.x_size,
            y_size: self.y_size,
            data: self.data.slice(s![range, ..]).to_owned(),
        }
    }

    /// A new dataset holding the given rows in the given order.
    pub fn select(&self, indices: &[usize]) -> Self {
        Self {
            x_size: self.x_size,
            y_size: self.y_size,
            data: self.data.select(Axis(0), indices),
        }
    }

    /// Shuffles the rows in place.
    pub fn shuffle<R: Rng>(&mut self, rng: &mut R) {
        let mut indices: Vec<usize> = (0..self.len()).collect();
        indices.shuffle(rng);
        self.data = self.data.select(Axis(0), &indices);
    }

    /// The whole dataset as a single batch.
    pub fn full_batch(&self) -> impl Iterator<Item = (ArrayView2<'_, f32>, ArrayView2<'_, f32>)> {
        iter::once((self.x(), self.y()))
    }

    /// Consecutive batches of at most `batch_size` rows, the last one may be smaller.
    pub fn batches(
        &self,
        batch_size: NonZeroUsize,
    ) -> impl Iterator<Item = (ArrayView2<'_, f32>, ArrayView2<'_, f32>)> {
        let (x, y) = (self.x(), self.y());
        let len = self.len();
        let batch_size = batch_size.get();

        (0..len).step_by(batch_size).map(move |start| {
            let end = (start + batch_size).min(len);
            (
                x.slice_move(s![start..end, ..]),
                y.slice_move(s![start..end, ..]),
            )
        })
    }
}
