use super::Optimizer;

/// Adam: gradient descent with per-parameter step sizes derived from bias-corrected estimates
/// of the gradient's first and second moments.
#[derive(Debug, Clone)]
pub struct Adam {
    learning_rate: f32,
    beta1: f32,
    beta2: f32,
    epsilon: f32,
    beta1_t: f32,
    beta2_t: f32,
    m: Box<[f32]>,
    v: Box<[f32]>,
}

impl Adam {
    /// Creates a new `Adam` optimizer.
    ///
    /// # Arguments
    /// * `len` - The amount of parameters this instance should hold.
    /// * `learning_rate` - The maximum length of the step taken for each parameter.
    /// * `beta1` - Decay rate of the first moment estimate.
    /// * `beta2` - Decay rate of the second moment estimate.
    /// * `epsilon` - Added to the denominator for numerical stability.
    pub fn new(len: usize, learning_rate: f32, beta1: f32, beta2: f32, epsilon: f32) -> Self {
        Self {
            learning_rate,
            beta1,
            beta2,
            epsilon,
            beta1_t: 1.,
            beta2_t: 1.,
            m: vec![0.; len].into_boxed_slice(),
            v: vec![0.; len].into_boxed_slice(),
        }
    }

    /// Adam with the usual decay rates (0.9, 0.999) and epsilon (1e-8).
    pub fn with_defaults(len: usize, learning_rate: f32) -> Self {
        Self::new(len, learning_rate, 0.9, 0.999, 1e-8)
    }
}

impl Optimizer for Adam {
    fn update_params(&mut self, params: &mut [f32], grad: &[f32]) {
        let Self {
            learning_rate: lr,
            beta1: b1,
            beta2: b2,
            epsilon: eps,
            ..
        } = *self;

        self.beta1_t *= b1;
        self.beta2_t *= b2;

        let bc1 = 1. - self.beta1_t;
        let bc2 = 1. - self.beta2_t;

        params
            .iter_mut()
            .zip(grad)
            .zip(self.m.iter_mut())
            .zip(self.v.iter_mut())
            .for_each(|(((w, g), m), v)| {
                *m = b1 * *m + (1. - b1) * g;
                *v = b2 * *v + (1. - b2) * g.powi(2);

                let m_hat = *m / bc1;
                let v_hat = *v / bc2;
                *w -= lr * m_hat / (v_hat.sqrt() + eps);
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_step_has_learning_rate_length() {
        let mut adam = Adam::with_defaults(3, 0.001);
        let mut params = [1., 1., 1.];

        adam.update_params(&mut params, &[10., -0.5, 0.]);

        assert!((params[0] - 0.999).abs() < 1e-6);
        assert!((params[1] - 1.001).abs() < 1e-6);
        assert_eq!(params[2], 1.);
    }

    #[test]
    fn step_size_is_invariant_to_gradient_scale() {
        let mut small = Adam::with_defaults(1, 0.01);
        let mut large = Adam::with_defaults(1, 0.01);
        let mut p_small = [0f32];
        let mut p_large = [0f32];

        for _ in 0..5 {
            small.update_params(&mut p_small, &[0.1]);
            large.update_params(&mut p_large, &[100.]);
        }

        assert!((p_small[0] - p_large[0]).abs() < 1e-4);
    }
}
