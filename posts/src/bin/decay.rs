use std::{env, fs, io};

use log::info;
use machine_learning::{plot, specs::ExperimentSpec};
use posts::decay;

fn main() -> io::Result<()> {
    posts::logger().init();

    let spec = match env::args().nth(1) {
        Some(path) => {
            info!("reading experiment from {path}");
            ExperimentSpec::from_json_file(path)?
        }
        None => decay::decay_spec(),
    };

    let samples = decay::samples()?;
    let fit = decay::run(&spec, &samples)?;

    info!(
        "fitted ln A = {:.4}·t + {:.4}, expected slope {:.4}",
        fit.weight,
        fit.bias,
        -decay::decay_constant()
    );
    info!(
        "held-out MAE went from {:.4} to {:.4}",
        fit.initial_mae, fit.final_mae
    );

    let out = posts::out_dir()?;
    let t = samples.x().iter().copied().collect::<Vec<_>>();
    let log_activity = samples.y().iter().copied().collect::<Vec<_>>();

    plot::scatter_with_fit(
        out.join("decay.svg"),
        &t,
        &log_activity,
        Some(&fit.predictions),
    )?;
    fs::write(out.join("decay_history.json"), fit.history.to_json()?)?;
    info!("wrote plot and history to {}", out.display());

    Ok(())
}
