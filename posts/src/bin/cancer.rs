use std::{env, fs, io};

use log::info;
use machine_learning::{plot, specs::ExperimentSpec};
use posts::cancer;

const USAGE: &str = "usage: cancer <DATASET.csv> [CONFIG.json]";

fn main() -> io::Result<()> {
    posts::logger().init();

    let mut args = env::args().skip(1);
    let dataset_path = args
        .next()
        .or_else(|| env::var("CANCER_DATASET").ok())
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, USAGE))?;

    let spec = match args.next() {
        Some(path) => {
            info!("reading experiment from {path}");
            ExperimentSpec::from_json_file(path)?
        }
        None => cancer::cancer_spec(),
    };

    let dataset = cancer::load(&dataset_path)?;
    info!("loaded {} samples from {dataset_path}", dataset.len());

    let fit = cancer::run(&spec, &dataset)?;

    if let Some(last) = fit.history.last() {
        info!(
            "after {} epochs: validation loss {:.4}, validation accuracy {:.4}",
            last.epoch,
            last.eval.loss,
            last.eval.accuracy.unwrap_or_default()
        );
    }

    info!(
        "test loss {:.4}, accuracy {:.4}, precision {:.4}, recall {:.4}",
        fit.test.loss,
        fit.confusion.accuracy(),
        fit.confusion.precision(),
        fit.confusion.recall()
    );

    let out = posts::out_dir()?;
    plot::loss_curves(out.join("cancer_loss.svg"), &fit.history)?;
    fs::write(out.join("cancer_history.json"), fit.history.to_json()?)?;
    info!("wrote loss curves and history to {}", out.display());

    Ok(())
}
