mod builder;
mod history;
mod model_trainer;
mod trainer;

pub use builder::TrainerBuilder;
pub use history::{EpochRecord, Evaluation, History};
pub use model_trainer::ModelTrainer;
pub use trainer::Trainer;
