use std::{fs, path::Path};

use log::debug;

use super::Dataset;
use crate::{MlErr, Result};

impl Dataset {
    /// Loads a dataset from a comma separated file, see [`parse_csv`].
    pub fn from_csv<P: AsRef<Path>>(path: P, x_size: usize, y_size: usize) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;

        let dataset = parse_csv(&content, x_size, y_size)?;
        debug!(rows = dataset.len(), path:? = path; "loaded csv dataset");
        Ok(dataset)
    }
}

/// Parses comma separated rows of `x_size` features followed by `y_size` labels.
///
/// Blank lines are skipped, and so is the first line when it isn't numeric (a header).
///
/// # Returns
/// An error naming the line if a value isn't a number or a row has the wrong width.
pub fn parse_csv(content: &str, x_size: usize, y_size: usize) -> Result<Dataset> {
    let row_size = x_size + y_size;
    let mut data = Vec::new();

    for (i, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let values = line
            .split(',')
            .map(|v| {
                v.trim().parse::<f32>().map_err(|_| MlErr::Parse {
                    line: i + 1,
                    value: v.trim().to_string(),
                })
            })
            .collect::<Result<Vec<_>>>();

        let values = match values {
            Ok(values) => values,
            Err(_) if i == 0 => continue,
            Err(e) => return Err(e),
        };

        if values.len() != row_size {
            return Err(MlErr::SizeMismatch {
                what: "csv row values",
                got: values.len(),
                expected: row_size,
            });
        }

        data.extend(values);
    }

    Dataset::new(data, x_size, y_size)
}
