mod bce;
mod loss_fn;
mod mae;
mod mse;

pub use bce::BceWithLogits;
pub use loss_fn::LossFn;
pub use mae::Mae;
pub use mse::Mse;
