use std::{fs, num::NonZeroUsize, path::Path};

use log::{debug, info};
use machine_learning::{
    MlErr, Result,
    dataset::{Dataset, StandardScaler, parse_csv},
    metrics::BinaryConfusion,
    specs::{
        ActFnSpec, ExperimentSpec, InitSpec, LayerSpec, LossFnSpec, ModelSpec, OptimizerSpec,
        SplitSpec, TrainerSpec,
    },
    training::{Evaluation, History, TrainerBuilder},
};
use rand::Rng;

/// Amount of measurements describing each tumour.
pub const FEATURES: usize = 30;

const EPOCHS: NonZeroUsize = NonZeroUsize::new(500).unwrap();
const REPORT_EVERY: NonZeroUsize = NonZeroUsize::new(50).unwrap();

/// Parses the UCI `wdbc.data` layout: `id, diagnosis, 30 features` per line.
///
/// Benign (`B`) tumours are labeled 1 and malignant (`M`) ones 0.
pub fn parse_wdbc(content: &str) -> Result<Dataset> {
    let mut data = Vec::new();

    for (i, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let parse_err = |value: &str| MlErr::Parse {
            line: i + 1,
            value: value.to_string(),
        };

        // the id is of no use
        let mut fields = line.split(',').map(str::trim).skip(1);

        let label = match fields.next() {
            Some("B") => 1.,
            Some("M") => 0.,
            other => return Err(parse_err(other.unwrap_or_default())),
        };

        let start = data.len();
        for field in fields {
            data.push(field.parse::<f32>().map_err(|_| parse_err(field))?);
        }

        let got = data.len() - start;
        if got != FEATURES {
            return Err(MlErr::SizeMismatch {
                what: "wdbc features",
                got,
                expected: FEATURES,
            });
        }

        data.push(label);
    }

    Dataset::new(data, FEATURES, 1)
}

/// Whether `content` looks like `wdbc.data`, a diagnosis letter in the second column of the
/// first line.
fn is_wdbc(content: &str) -> bool {
    content
        .lines()
        .find(|line| !line.trim().is_empty())
        .and_then(|line| line.split(',').nth(1))
        .is_some_and(|field| matches!(field.trim(), "M" | "B"))
}

/// Loads the breast cancer table, either as `wdbc.data` or as a numeric csv of 30 features
/// followed by the label.
pub fn load<P: AsRef<Path>>(path: P) -> Result<Dataset> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)?;

    let dataset = if is_wdbc(&content) {
        parse_wdbc(&content)?
    } else {
        parse_csv(&content, FEATURES, 1)?
    };

    debug!(rows = dataset.len(), path:? = path; "loaded breast cancer table");
    Ok(dataset)
}

/// The experiment of the post: `30 → 64 → 32 → 1` with relu hidden layers, trained on logits with
/// binary cross-entropy and Adam over a 70/20/10 split that keeps the row order.
pub fn cancer_spec() -> ExperimentSpec {
    let relu = Some(ActFnSpec::Relu);

    ExperimentSpec {
        split: SplitSpec {
            fractions: vec![0.7, 0.2, 0.1],
            shuffle: false,
        },
        trainer: TrainerSpec {
            model: ModelSpec::Sequential {
                layers: vec![
                    LayerSpec::Dense {
                        dim: (FEATURES, 64),
                        act_fn: relu,
                    },
                    LayerSpec::Dense {
                        dim: (64, 32),
                        act_fn: relu,
                    },
                    LayerSpec::Dense {
                        dim: (32, 1),
                        act_fn: None,
                    },
                ],
            },
            optimizer: OptimizerSpec::Adam {
                learning_rate: 0.001,
                beta1: 0.9,
                beta2: 0.999,
                epsilon: 1e-8,
            },
            loss: LossFnSpec::BceWithLogits,
            init: InitSpec::FanInUniform,
            epochs: EPOCHS,
            batch_size: None,
            report_every: REPORT_EVERY,
            track_accuracy: true,
            seed: Some(42),
        },
    }
}

/// What came out of training the classifier.
#[derive(Debug, Clone)]
pub struct CancerFit {
    pub params: Vec<f32>,
    /// Training and validation measurements of every pass.
    pub history: History,
    pub test: Evaluation,
    pub confusion: BinaryConfusion,
}

/// Splits `dataset` into train, validation and test partitions.
///
/// The partitions are contiguous slices of the rows in their original order, unless the split
/// asks to shuffle them with `rng` first.
pub fn partition<R: Rng>(
    split: &SplitSpec,
    dataset: &Dataset,
    rng: &mut R,
) -> Result<[Dataset; 3]> {
    let mut ordered = dataset.clone();
    if split.shuffle {
        ordered.shuffle(rng);
    }

    <[Dataset; 3]>::try_from(split.resolve()?.apply(&ordered)).map_err(|parts| {
        MlErr::InvalidConfig(format!(
            "the classifier needs train, validation and test partitions, got {}",
            parts.len()
        ))
    })
}

/// Trains the classifier of `spec` on `dataset`.
///
/// The samples are partitioned as in [`partition`], the features are standardized with the
/// training partition's statistics and the test partition is only measured once, after the last
/// pass.
pub fn run(spec: &ExperimentSpec, dataset: &Dataset) -> Result<CancerFit> {
    let builder = TrainerBuilder::new();
    let mut rng = builder.generate_rng(spec.trainer.seed);

    let [mut train, mut val, mut test] = partition(&spec.split, dataset, &mut rng)?;

    info!(
        train = train.len(),
        val = val.len(),
        test = test.len();
        "partitioned the samples"
    );

    let scaler = StandardScaler::fit(train.x())?;
    for partition in [&mut train, &mut val, &mut test] {
        scaler.transform(partition)?;
    }

    let (mut trainer, mut params) = builder.build_with_rng(&spec.trainer, rng)?;
    let history = trainer.fit(&mut params, &train, &val)?;

    let test_eval = trainer.evaluate(&params, &test)?;
    let logits = trainer.predict(&params, test.x())?;
    let confusion = BinaryConfusion::from_logits(logits.view(), test.y());

    Ok(CancerFit {
        params,
        history,
        test: test_eval,
        confusion,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wdbc_line(id: u32, diagnosis: &str) -> String {
        let features: Vec<String> = (0..FEATURES).map(|i| format!("{}.5", i)).collect();
        format!("{id},{diagnosis},{}", features.join(","))
    }

    #[test]
    fn wdbc_diagnosis_becomes_the_label() {
        let content = format!("{}\n{}\n", wdbc_line(842302, "M"), wdbc_line(8510426, "B"));

        let dataset = parse_wdbc(&content).unwrap();

        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.x_size(), FEATURES);
        assert_eq!(dataset.y().column(0).to_vec(), [0., 1.]);
        assert_eq!(dataset.x()[[1, 2]], 2.5);
    }

    #[test]
    fn unknown_diagnosis_is_a_parse_error() {
        let content = wdbc_line(1, "X");

        let err = parse_wdbc(&content).unwrap_err();
        assert!(matches!(err, MlErr::Parse { line: 1, .. }));
    }

    #[test]
    fn short_wdbc_rows_are_rejected() {
        let err = parse_wdbc("1,B,1.0,2.0").unwrap_err();
        assert!(matches!(
            err,
            MlErr::SizeMismatch {
                got: 2,
                expected: FEATURES,
                ..
            }
        ));
    }

    #[test]
    fn detects_the_wdbc_layout() {
        assert!(is_wdbc(&format!("\n{}", wdbc_line(3, "B"))));
        assert!(!is_wdbc("1.0,2.0,0\n"));
        assert!(!is_wdbc(""));
    }

    #[test]
    fn default_split_is_three_ninety_eight_one_fourteen_fifty_seven() {
        let sizes = cancer_spec().split.resolve().unwrap().sizes(569);
        assert_eq!(sizes, [398, 114, 57]);
    }
}
