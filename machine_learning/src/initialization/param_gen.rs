/// Hands out the initial values of a layer's parameters.
pub trait ParamGen {
    /// Draws up to `n` values, fewer if the generator's limit is reached first.
    ///
    /// # Returns
    /// `None` once the generator is exhausted.
    fn sample(&mut self, n: usize) -> Option<Vec<f32>>;

    /// Draws exactly `n` values, `None` if the generator can't provide that many.
    fn sample_exact(&mut self, n: usize) -> Option<Vec<f32>> {
        if n == 0 {
            return Some(Vec::new());
        }

        self.sample(n).filter(|values| values.len() == n)
    }
}
