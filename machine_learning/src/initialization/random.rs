use rand::Rng;
use rand_distr::{Distribution, Normal, Uniform};

use super::ParamGen;
use crate::Result;

/// A parameter generator that follows a certain probabilistic distribution.
///
/// The generator borrows the run's random number generator, so every parameter of a model is
/// drawn from the same seeded stream.
pub struct RandParamGen<'r, R: Rng, D: Distribution<f32>> {
    rng: &'r mut R,
    distribution: D,
    remaining: usize,
}

impl<'r, R: Rng, D: Distribution<f32>> RandParamGen<'r, R, D> {
    /// Creates a new `RandParamGen` parameter generator.
    ///
    /// # Arguments
    /// * `rng` - A random number generator.
    /// * `distribution` - The distribution to sample the random numbers from.
    /// * `limit` - The maximum amount of numbers to generate.
    pub fn new(rng: &'r mut R, distribution: D, limit: usize) -> Self {
        Self {
            rng,
            distribution,
            remaining: limit,
        }
    }
}

impl<'r, R: Rng> RandParamGen<'r, R, Uniform<f32>> {
    /// Creates a new `RandParamGen` with a uniform distribution over `[low, high)`.
    ///
    /// # Returns
    /// An error if the range is invalid (low >= high).
    pub fn uniform(rng: &'r mut R, limit: usize, low: f32, high: f32) -> Result<Self> {
        Ok(Self::new(rng, Uniform::new(low, high)?, limit))
    }

    /// Uniform over `[-1/√fan_in, 1/√fan_in)`, the default of most dense layer implementations.
    pub fn fan_in_uniform(rng: &'r mut R, limit: usize, fan_in: usize) -> Result<Self> {
        let range = 1. / (fan_in.max(1) as f32).sqrt();
        Self::uniform(rng, limit, -range, range)
    }

    /// Xavier (Glorot) uniform initialization.
    pub fn xavier_uniform(
        rng: &'r mut R,
        limit: usize,
        fan_in: usize,
        fan_out: usize,
    ) -> Result<Self> {
        let range = (6. / (fan_in + fan_out).max(1) as f32).sqrt();
        Self::uniform(rng, limit, -range, range)
    }
}

impl<'r, R: Rng> RandParamGen<'r, R, Normal<f32>> {
    /// Creates a new `RandParamGen` with a normal distribution.
    ///
    /// # Returns
    /// An error if `std_dev` is not finite (Nan or infinite).
    pub fn normal(rng: &'r mut R, limit: usize, mean: f32, std_dev: f32) -> Result<Self> {
        Ok(Self::new(rng, Normal::new(mean, std_dev)?, limit))
    }

    /// Kaiming (He) normal initialization, suited for relu layers.
    pub fn kaiming(rng: &'r mut R, limit: usize, fan_in: usize) -> Result<Self> {
        let std_dev = (2. / fan_in.max(1) as f32).sqrt();
        Self::normal(rng, limit, 0., std_dev)
    }

    /// LeCun normal initialization.
    pub fn lecun(rng: &'r mut R, limit: usize, fan_in: usize) -> Result<Self> {
        let std_dev = (1. / fan_in.max(1) as f32).sqrt();
        Self::normal(rng, limit, 0., std_dev)
    }
}

impl<R: Rng, D: Distribution<f32>> ParamGen for RandParamGen<'_, R, D> {
    fn sample(&mut self, n: usize) -> Option<Vec<f32>> {
        if self.remaining == 0 {
            return None;
        }

        let n = n.min(self.remaining);
        self.remaining -= n;

        let sample = (0..n)
            .map(|_| self.distribution.sample(&mut *self.rng))
            .collect();
        Some(sample)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    #[test]
    fn same_seed_same_parameters() {
        let mut rng_a = StdRng::seed_from_u64(42);
        let mut rng_b = StdRng::seed_from_u64(42);

        let a = RandParamGen::normal(&mut rng_a, 16, 0., 1.)
            .unwrap()
            .sample(16)
            .unwrap();
        let b = RandParamGen::normal(&mut rng_b, 16, 0., 1.)
            .unwrap()
            .sample(16)
            .unwrap();

        assert_eq!(a, b);
    }

    #[test]
    fn fan_in_uniform_stays_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut param_gen = RandParamGen::fan_in_uniform(&mut rng, 1000, 4).unwrap();

        let sample = param_gen.sample(1000).unwrap();
        assert_eq!(sample.len(), 1000);
        assert!(sample.iter().all(|w| (-0.5..0.5).contains(w)));
        assert!(param_gen.sample(1).is_none());
    }

    #[test]
    fn invalid_range_fails() {
        let mut rng = StdRng::seed_from_u64(7);
        assert!(RandParamGen::uniform(&mut rng, 1, 1., -1.).is_err());
    }

    #[test]
    fn invalid_std_dev_fails() {
        let mut rng = StdRng::seed_from_u64(7);
        assert!(RandParamGen::normal(&mut rng, 1, 0., f32::NAN).is_err());
    }
}
