use std::{fs, num::NonZeroUsize};

use machine_learning::{plot, specs::ExperimentSpec};
use posts::decay::{self, decay_constant, decay_spec};

#[test]
fn fit_improves_on_the_random_initial_parameters() {
    let samples = decay::samples().unwrap();

    for seed in [42, 0, 1, 2, 3, 4, 5, 6, 7, 8, 9] {
        let mut spec = decay_spec();
        spec.trainer.seed = Some(seed);

        let fit = decay::run(&spec, &samples).unwrap();

        assert!(
            fit.final_mae < fit.initial_mae,
            "seed {seed}: {} >= {}",
            fit.final_mae,
            fit.initial_mae
        );
    }
}

#[test]
fn seeded_fit_runs_every_pass_and_lands_close() {
    let fit = decay::run(&decay_spec(), &decay::samples().unwrap()).unwrap();

    assert_eq!(fit.history.len(), 200);
    assert_eq!(fit.predictions.len(), decay::SAMPLES);
    assert!(fit.final_mae < 0.4, "held-out MAE {}", fit.final_mae);
    assert_eq!(fit.history.last().unwrap().eval.loss, fit.final_mae);
}

#[test]
fn enough_passes_recover_the_decay_constant() {
    let mut spec = decay_spec();
    spec.trainer.epochs = NonZeroUsize::new(1000).unwrap();

    let fit = decay::run(&spec, &decay::samples().unwrap()).unwrap();

    assert!(
        (fit.weight + decay_constant()).abs() < 0.05,
        "w = {}, expected about {}",
        fit.weight,
        -decay_constant()
    );
}

#[test]
fn fixed_seed_is_reproducible() {
    let samples = decay::samples().unwrap();

    let a = decay::run(&decay_spec(), &samples).unwrap();
    let b = decay::run(&decay_spec(), &samples).unwrap();

    assert_eq!((a.weight, a.bias), (b.weight, b.bias));
    assert_eq!(a.history, b.history);
}

#[test]
fn shipped_config_matches_the_default() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/configs/decay.json");
    assert_eq!(ExperimentSpec::from_json_file(path).unwrap(), decay_spec());
}

#[test]
fn plotting_without_predictions_leaves_the_data_alone() {
    let samples = decay::samples().unwrap();
    let t: Vec<f32> = samples.x().iter().copied().collect();
    let log_activity: Vec<f32> = samples.y().iter().copied().collect();
    let (t_before, y_before) = (t.clone(), log_activity.clone());

    let path = std::env::temp_dir().join("posts_decay_no_predictions.svg");
    plot::scatter_with_fit(&path, &t, &log_activity, None).unwrap();
    plot::scatter_with_fit(&path, &t, &log_activity, None).unwrap();

    assert_eq!(t, t_before);
    assert_eq!(log_activity, y_before);
    assert!(fs::read_to_string(&path).unwrap().contains("<svg"));
}
