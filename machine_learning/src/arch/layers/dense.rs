use ndarray::{linalg, prelude::*};

use crate::{MlErr, Result, arch::activations::ActFn};

/// A fully connected layer computing `act_fn(x · W + b)`.
///
/// The layer doesn't own its parameters, it views a slice of the model's flat parameter buffer
/// laid out as `[W (n_in × n_out, row-major), b (n_out)]`.
///
/// Optimizations:
///   1. Find a way to not copy `x` in each `Dense::forward` call.
#[derive(Clone, Debug)]
pub struct Dense {
    dim: (usize, usize),
    act_fn: Option<ActFn>,
    size: usize,

    // Forward metadata
    x: Array2<f32>,
    z: Array2<f32>,
    a: Array2<f32>,

    // Backward metadata
    d: Array2<f32>,
}

impl Dense {
    /// Creates a new `Dense` layer.
    ///
    /// # Arguments
    /// * `dim` - The amount of inputs and outputs of the layer.
    /// * `act_fn` - An optional activation function, `None` means a linear output.
    pub fn new(dim: (usize, usize), act_fn: Option<ActFn>) -> Self {
        let zeros = Array2::zeros((0, 0));

        Self {
            dim,
            size: (dim.0 + 1) * dim.1,
            act_fn,
            x: zeros.clone(),
            z: zeros.clone(),
            a: zeros.clone(),
            d: zeros,
        }
    }

    /// Returns the size of this layer.
    ///
    /// # Returns
    /// The amount of parameters this layer has.
    pub fn size(&self) -> usize {
        self.size
    }

    /// The amount of inputs and outputs of this layer.
    pub fn dim(&self) -> (usize, usize) {
        self.dim
    }

    /// The amount of weights in this layer, the biases follow them in the parameter slice.
    pub fn weights_len(&self) -> usize {
        self.size - self.dim.1
    }

    pub fn act_fn(&self) -> Option<ActFn> {
        self.act_fn
    }

    /// Makes a forward pass through this layer caching what the backward pass needs.
    ///
    /// # Arguments
    /// * `params` - The parameter slice of this layer.
    /// * `x` - The input, one sample per row.
    ///
    /// # Returns
    /// A view of the layer's output.
    pub fn forward(&mut self, params: &[f32], x: ArrayView2<f32>) -> Result<ArrayView2<'_, f32>> {
        if x.ncols() != self.dim.0 {
            return Err(MlErr::SizeMismatch {
                what: "dense layer inputs",
                got: x.ncols(),
                expected: self.dim.0,
            });
        }

        let (w, b) = self.view_params(params)?;
        let shape = (x.nrows(), self.dim.1);

        resize(&mut self.z, shape);
        linalg::general_mat_mul(1.0, &x, &w, 0.0, &mut self.z);
        self.z += &b;

        self.x = x.to_owned();

        let Some(act_fn) = self.act_fn else {
            return Ok(self.z.view());
        };

        resize(&mut self.a, shape);
        self.a.zip_mut_with(&self.z, |a, &z| *a = act_fn.f(z));
        Ok(self.a.view())
    }

    /// Makes a backward pass through this layer, writing the gradient of its parameters.
    ///
    /// # Arguments
    /// * `params` - The parameter slice of this layer.
    /// * `grad` - The gradient slice of this layer, gets overwritten.
    /// * `d` - The derivative of the loss with respect to this layer's output.
    ///
    /// # Returns
    /// The derivative of the loss with respect to this layer's input.
    pub fn backward(
        &mut self,
        params: &[f32],
        grad: &mut [f32],
        mut d: ArrayViewMut2<f32>,
    ) -> Result<ArrayViewMut2<'_, f32>> {
        if d.dim() != self.z.dim() {
            return Err(MlErr::SizeMismatch {
                what: "dense layer deltas",
                got: d.len(),
                expected: self.z.len(),
            });
        }

        if let Some(act_fn) = self.act_fn {
            d.zip_mut_with(&self.z, |d, &z| *d *= act_fn.df(z));
        }

        let (mut dw, mut db) = self.view_grad(grad)?;
        linalg::general_mat_mul(1.0, &self.x.t(), &d, 0.0, &mut dw);
        db.assign(&d.sum_axis(Axis(0)));

        let (w, _) = self.view_params(params)?;
        resize(&mut self.d, (d.nrows(), self.dim.0));
        linalg::general_mat_mul(1.0, &d, &w.t(), 0.0, &mut self.d);

        Ok(self.d.view_mut())
    }

    /// Gives a view of the raw gradient slice as the delta weights and delta biases of this layer.
    fn view_grad<'a>(
        &self,
        grad: &'a mut [f32],
    ) -> Result<(ArrayViewMut2<'a, f32>, ArrayViewMut1<'a, f32>)> {
        self.check_len("dense layer gradient", grad.len())?;

        let (dw_raw, db_raw) = grad.split_at_mut(self.weights_len());
        let dw = ArrayViewMut2::from_shape(self.dim, dw_raw)?;
        let db = ArrayViewMut1::from_shape(self.dim.1, db_raw)?;
        Ok((dw, db))
    }

    /// Gives a view of the raw parameter slice as the weights and biases of this layer.
    fn view_params<'a>(
        &self,
        params: &'a [f32],
    ) -> Result<(ArrayView2<'a, f32>, ArrayView1<'a, f32>)> {
        self.check_len("dense layer parameters", params.len())?;

        let (w_raw, b_raw) = params.split_at(self.weights_len());
        let weights = ArrayView2::from_shape(self.dim, w_raw)?;
        let biases = ArrayView1::from_shape(self.dim.1, b_raw)?;
        Ok((weights, biases))
    }

    fn check_len(&self, what: &'static str, got: usize) -> Result<()> {
        if got != self.size {
            return Err(MlErr::SizeMismatch {
                what,
                got,
                expected: self.size,
            });
        }

        Ok(())
    }
}

fn resize(buf: &mut Array2<f32>, shape: (usize, usize)) {
    if buf.dim() != shape {
        *buf = Array2::zeros(shape);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn forward_computes_affine_map() {
        // W = [[1, 2], [3, 4], [5, 6]], b = [0.5, -1]
        let params = [1., 2., 3., 4., 5., 6., 0.5, -1.];
        let mut dense = Dense::new((3, 2), None);
        let x = array![[1., 0., -1.], [2., 1., 0.]];

        let y = dense.forward(&params, x.view()).unwrap();

        assert_eq!(y, array![[-3.5f32, -5.], [5.5, 7.]]);
    }

    #[test]
    fn forward_applies_activation() {
        let params = [1., -1., 0., 0.];
        let mut dense = Dense::new((1, 2), Some(ActFn::relu()));
        assert_eq!(dense.act_fn(), Some(ActFn::relu()));
        let x = array![[2.], [-3.]];

        let y = dense.forward(&params, x.view()).unwrap();

        assert_eq!(y, array![[2f32, 0.], [0., 3.]]);
    }

    #[test]
    fn backward_computes_parameter_gradient_and_input_delta() {
        let params = [1., 2., 3., 4., 5., 6., 0.5, -1.];
        let mut grad = [0.; 8];
        let mut dense = Dense::new((3, 2), None);
        let x = array![[1., 0., -1.], [2., 1., 0.]];
        let mut d = array![[1., 0.], [0., 2.]];

        dense.forward(&params, x.view()).unwrap();
        let dx = dense.backward(&params, &mut grad, d.view_mut()).unwrap();

        // dx = d · Wᵀ
        assert_eq!(dx, array![[1f32, 3., 5.], [4., 8., 12.]]);
        // dW = xᵀ · d, db = column sums of d
        assert_eq!(grad, [1f32, 4., 0., 2., -1., 0., 1., 2.]);
    }

    #[test]
    fn backward_scales_by_activation_derivative() {
        let params = [1., 0.];
        let mut grad = [0.; 2];
        let mut dense = Dense::new((1, 1), Some(ActFn::relu()));
        let x = array![[-2.], [3.]];
        let mut d = array![[1.], [1.]];

        dense.forward(&params, x.view()).unwrap();
        dense.backward(&params, &mut grad, d.view_mut()).unwrap();

        // the first sample is clipped by the relu, only the second contributes
        assert_eq!(grad, [3f32, 1.]);
    }

    #[test]
    fn wrong_parameter_count_fails() {
        let mut dense = Dense::new((2, 2), None);
        let x = array![[1., 1.]];

        let err = dense.forward(&[0.; 5], x.view()).unwrap_err();
        assert!(matches!(
            err,
            MlErr::SizeMismatch {
                got: 5,
                expected: 6,
                ..
            }
        ));
    }
}
