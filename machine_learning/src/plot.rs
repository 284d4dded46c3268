use std::{fmt::Display, ops::Range, path::Path};

use log::debug;
use plotters::prelude::*;

use crate::{MlErr, Result, training::History};

const SIZE: (u32, u32) = (800, 600);

fn plot_err<E: Display>(e: E) -> MlErr {
    MlErr::Plot(e.to_string())
}

/// The smallest range containing every value, padded by a tenth of its width.
fn padded_range<I>(values: I) -> Result<Range<f32>>
where
    I: IntoIterator<Item = f32>,
{
    let (min, max) = values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold(None, |acc: Option<(f32, f32)>, v| match acc {
            Some((min, max)) => Some((min.min(v), max.max(v))),
            None => Some((v, v)),
        })
        .ok_or(MlErr::EmptyDataset)?;

    let pad = if max > min { (max - min) / 10. } else { 1. };
    Ok(min - pad..max + pad)
}

/// Draws the samples `(x, y)` as points and, when given, the model's `predictions` for each `x` as
/// a line, into an SVG file.
///
/// Nothing is written back to the inputs.
///
/// # Arguments
/// * `path` - Where the SVG file is written.
/// * `x` - The input of each sample.
/// * `y` - The label of each sample.
/// * `predictions` - The model's output for each sample.
pub fn scatter_with_fit<P: AsRef<Path>>(
    path: P,
    x: &[f32],
    y: &[f32],
    predictions: Option<&[f32]>,
) -> Result<()> {
    if y.len() != x.len() {
        return Err(MlErr::SizeMismatch {
            what: "plotted labels",
            got: y.len(),
            expected: x.len(),
        });
    }

    match predictions {
        Some(predictions) if predictions.len() != x.len() => {
            return Err(MlErr::SizeMismatch {
                what: "plotted predictions",
                got: predictions.len(),
                expected: x.len(),
            });
        }
        _ => {}
    }

    let x_range = padded_range(x.iter().copied())?;
    let y_values = y.iter().chain(predictions.unwrap_or_default());
    let y_range = padded_range(y_values.copied())?;

    let root = SVGBackend::new(path.as_ref(), SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(plot_err)?;

    let mut chart = ChartBuilder::on(&root)
        .margin(10)
        .set_label_area_size(LabelAreaPosition::Left, 50)
        .set_label_area_size(LabelAreaPosition::Bottom, 40)
        .build_cartesian_2d(x_range, y_range)
        .map_err(plot_err)?;

    chart.configure_mesh().draw().map_err(plot_err)?;

    chart
        .draw_series(
            x.iter()
                .zip(y)
                .map(|(&x, &y)| Circle::new((x, y), 3, BLUE.filled())),
        )
        .map_err(plot_err)?;

    if let Some(predictions) = predictions {
        let mut line: Vec<(f32, f32)> = x.iter().copied().zip(predictions.iter().copied()).collect();
        line.sort_by(|a, b| a.0.total_cmp(&b.0));

        chart
            .draw_series(LineSeries::new(line, &RED))
            .map_err(plot_err)?;
    }

    root.present().map_err(plot_err)?;
    debug!(path:? = path.as_ref(), samples = x.len(); "wrote scatter plot");

    Ok(())
}

/// Draws the training and held-out loss of every pass into an SVG file.
pub fn loss_curves<P: AsRef<Path>>(path: P, history: &History) -> Result<()> {
    let records = history.records();
    let last_epoch = history.last().ok_or(MlErr::EmptyDataset)?.epoch;

    let losses = records.iter().flat_map(|r| [r.train.loss, r.eval.loss]);
    let mut y_range = padded_range(losses)?;
    y_range.start = y_range.start.max(0.);

    let root = SVGBackend::new(path.as_ref(), SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(plot_err)?;

    let mut chart = ChartBuilder::on(&root)
        .margin(10)
        .set_label_area_size(LabelAreaPosition::Left, 50)
        .set_label_area_size(LabelAreaPosition::Bottom, 40)
        .build_cartesian_2d(0..last_epoch + 1, y_range)
        .map_err(plot_err)?;

    chart
        .configure_mesh()
        .x_desc("epoch")
        .y_desc("loss")
        .draw()
        .map_err(plot_err)?;

    chart
        .draw_series(LineSeries::new(
            records.iter().map(|r| (r.epoch, r.train.loss)),
            &BLUE,
        ))
        .map_err(plot_err)?;

    chart
        .draw_series(LineSeries::new(
            records.iter().map(|r| (r.epoch, r.eval.loss)),
            &RED,
        ))
        .map_err(plot_err)?;

    root.present().map_err(plot_err)?;
    debug!(path:? = path.as_ref(), epochs = records.len(); "wrote loss curves");

    Ok(())
}
