mod csv;
mod dataset;
mod scaler;
mod split;

pub use csv::parse_csv;
pub use dataset::Dataset;
pub use scaler::StandardScaler;
pub use split::Split;
