use std::{fs, num::NonZeroUsize};

use machine_learning::{dataset::Dataset, specs::ExperimentSpec, training::TrainerBuilder};
use posts::cancer::{self, FEATURES, cancer_spec};
use rand::{SeedableRng, rngs::StdRng};
use rand_distr::{Distribution, Normal};

const ROWS: usize = 569;

/// Two gaussian blobs with the shape of the breast cancer table, benign samples centered at
/// `+0.5` on every feature and malignant ones at `-0.5`.
fn synthetic_table(seed: u64) -> Dataset {
    let mut rng = StdRng::seed_from_u64(seed);
    let noise = Normal::new(0f32, 1.).unwrap();

    let data = (0..ROWS)
        .flat_map(|i| {
            let label = (i % 3 != 0) as u8 as f32;
            let center = label - 0.5;
            let mut row: Vec<f32> = (0..FEATURES)
                .map(|_| center + noise.sample(&mut rng))
                .collect();
            row.push(label);
            row
        })
        .collect();

    Dataset::new(data, FEATURES, 1).unwrap()
}

fn short_spec(epochs: usize) -> ExperimentSpec {
    let mut spec = cancer_spec();
    spec.trainer.epochs = NonZeroUsize::new(epochs).unwrap();
    spec
}

#[test]
fn fixed_seed_is_deterministic() {
    let table = synthetic_table(1);

    let a = cancer::run(&short_spec(30), &table).unwrap();
    let b = cancer::run(&short_spec(30), &table).unwrap();

    assert_eq!(a.params, b.params);
    assert_eq!(a.history, b.history);
    assert_eq!(a.confusion, b.confusion);
    assert_eq!(a.confusion.accuracy(), b.confusion.accuracy());
}

#[test]
fn different_seeds_draw_different_parameters() {
    let table = synthetic_table(1);
    let mut other = short_spec(1);
    other.trainer.seed = Some(7);

    let a = cancer::run(&short_spec(1), &table).unwrap();
    let b = cancer::run(&other, &table).unwrap();

    assert_ne!(a.params, b.params);
}

#[test]
fn classifier_separates_the_blobs() {
    let fit = cancer::run(&cancer_spec(), &synthetic_table(2)).unwrap();

    assert_eq!(fit.history.len(), 500);
    assert_eq!(fit.confusion.total(), 57);

    let first = fit.history.records()[0];
    let last = fit.history.last().unwrap();
    assert!(last.train.loss < first.train.loss);
    assert!(last.eval.accuracy.unwrap() > 0.9);
    assert!(fit.confusion.accuracy() > 0.9, "{:?}", fit.confusion);
}

/// A table whose first feature is the row index.
fn indexed_table() -> Dataset {
    let data = (0..ROWS)
        .flat_map(|i| {
            let mut row = vec![0.; FEATURES + 1];
            row[0] = i as f32;
            row
        })
        .collect();

    Dataset::new(data, FEATURES, 1).unwrap()
}

fn row_ids(part: &Dataset) -> Vec<usize> {
    part.x().column(0).iter().map(|&id| id as usize).collect()
}

#[test]
fn default_partitions_keep_the_row_order() {
    let spec = cancer_spec();
    let table = indexed_table();
    let mut rng = TrainerBuilder::new().generate_rng(spec.trainer.seed);

    let [train, val, test] = cancer::partition(&spec.split, &table, &mut rng).unwrap();

    assert_eq!(row_ids(&train), (0..398).collect::<Vec<_>>());
    assert_eq!(row_ids(&val), (398..512).collect::<Vec<_>>());
    assert_eq!(row_ids(&test), (512..ROWS).collect::<Vec<_>>());
}

#[test]
fn shuffled_partitions_are_disjoint_with_the_expected_sizes() {
    let mut spec = cancer_spec();
    spec.split.shuffle = true;
    let table = indexed_table();

    let parts = cancer::partition(&spec.split, &table, &mut StdRng::seed_from_u64(42)).unwrap();
    let sizes: Vec<usize> = parts.iter().map(Dataset::len).collect();
    assert_eq!(sizes, [398, 114, 57]);
    assert_ne!(row_ids(&parts[0]), (0..398).collect::<Vec<_>>());

    let mut seen: Vec<usize> = parts.iter().flat_map(row_ids).collect();
    seen.sort_unstable();
    assert_eq!(seen, (0..ROWS).collect::<Vec<_>>());
}

#[test]
fn loads_the_wdbc_layout_from_disk() {
    let features: Vec<String> = (0..FEATURES).map(|i| i.to_string()).collect();
    let content = format!("842302,M,{0}\n842517,B,{0}\n", features.join(","));
    let path = std::env::temp_dir().join("posts_wdbc.data");
    fs::write(&path, content).unwrap();

    let table = cancer::load(&path).unwrap();

    assert_eq!(table.len(), 2);
    assert_eq!(table.y().column(0).to_vec(), [0., 1.]);
}

#[test]
fn shipped_config_matches_the_default() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/configs/cancer.json");
    assert_eq!(ExperimentSpec::from_json_file(path).unwrap(), cancer_spec());
}
