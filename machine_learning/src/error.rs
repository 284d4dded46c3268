use std::{
    error::Error,
    fmt::{self, Display},
    io,
};

use ndarray::ShapeError;

/// The result type used in the entire machine learning module.
pub type Result<T> = std::result::Result<T, MlErr>;

/// The machine learning module's error type.
#[derive(Debug)]
pub enum MlErr {
    SizeMismatch {
        what: &'static str,
        got: usize,
        expected: usize,
    },
    Shape(ShapeError),
    InvalidConfig(String),
    EmptyDataset,
    Io(io::Error),
    Parse {
        line: usize,
        value: String,
    },
    Json(serde_json::Error),
    Distribution(String),
    Plot(String),
}

impl Display for MlErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MlErr::SizeMismatch {
                what,
                got,
                expected,
            } => write!(
                f,
                "There's a size mismatch in {what}, got {got} and expected {expected}"
            ),
            MlErr::Shape(e) => write!(f, "invalid array shape: {e}"),
            MlErr::InvalidConfig(msg) => write!(f, "invalid configuration: {msg}"),
            MlErr::EmptyDataset => write!(f, "the dataset has no samples"),
            MlErr::Io(e) => write!(f, "io error: {e}"),
            MlErr::Parse { line, value } => {
                write!(f, "dataset line {line}: cannot parse '{value}'")
            }
            MlErr::Json(e) => write!(f, "invalid JSON: {e}"),
            MlErr::Distribution(msg) => write!(f, "invalid distribution: {msg}"),
            MlErr::Plot(msg) => write!(f, "failed to draw plot: {msg}"),
        }
    }
}

impl Error for MlErr {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            MlErr::Shape(e) => Some(e),
            MlErr::Io(e) => Some(e),
            MlErr::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ShapeError> for MlErr {
    fn from(value: ShapeError) -> Self {
        Self::Shape(value)
    }
}

impl From<io::Error> for MlErr {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for MlErr {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

impl From<rand_distr::NormalError> for MlErr {
    fn from(value: rand_distr::NormalError) -> Self {
        Self::Distribution(value.to_string())
    }
}

impl From<rand_distr::uniform::Error> for MlErr {
    fn from(value: rand_distr::uniform::Error) -> Self {
        Self::Distribution(value.to_string())
    }
}

/// Boundary conversion for binaries.
impl From<MlErr> for io::Error {
    fn from(value: MlErr) -> Self {
        match value {
            MlErr::Io(e) => e,
            other => io::Error::new(io::ErrorKind::InvalidData, other),
        }
    }
}
