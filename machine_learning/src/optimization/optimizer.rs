/// Defines the strategy for updating model parameters based on calculated gradients.
///
/// The `Optimizer` trait is responsible for the transition of parameters from step `t` to `t+1`.
pub trait Optimizer {
    /// Updates the parameters in place using the gradient of the last backward pass.
    ///
    /// # Arguments
    /// * `params` - The parameters that are going to be modified.
    /// * `grad` - The gradient corresponding to the `params` slice.
    fn update_params(&mut self, params: &mut [f32], grad: &[f32]);
}
