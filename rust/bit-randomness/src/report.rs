//! Console tables, JSON output and SVG charts for experiment reports.

use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

use plotters::prelude::*;
use serde::Serialize;

use crate::experiment::{CoefficientSummary, ExperimentReport};
use crate::histogram::Histogram;
use crate::{CRITICAL_Z, FAIR_P};

/// Y-axis window of the per-bit mean chart.
pub const MEAN_AXIS: (f64, f64) = (0.46, 0.54);

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to render {path:?}: {message}")]
    Render { path: PathBuf, message: String },
}

// ---------------------------------------------------------------------------
// Console
// ---------------------------------------------------------------------------

/// Print one experiment's results.
pub fn print_summary(report: &ExperimentReport) {
    println!("--- Experiment {}: {} (N={}) ---\n", report.id, report.description, report.n);

    let band = &report.band;
    println!("  Per-bit mean (band = mean ± {:.3}·SE):", band.critical_z);
    println!("    grand mean       : {:.6}", band.grand_mean);
    println!("    min / max mean   : {:.6} / {:.6}", band.min_mean, band.max_mean);
    println!(
        "    outside band     : {} of {} bits {:?}",
        band.outside_band.len(),
        report.bit_stats.len(),
        band.outside_band
    );

    if let (Some(lag), Some(coeffs)) = (report.acf_lag, &report.column_acf) {
        let finite: Vec<f64> = coeffs.iter().copied().filter(|c| c.is_finite()).collect();
        let max_abs = finite.iter().fold(0.0f64, |m, c| m.max(c.abs()));
        let mean = finite.iter().sum::<f64>() / finite.len().max(1) as f64;
        println!("  Lag-{} autocorrelation across bit positions:", lag);
        println!("    mean             : {:.4}", mean);
        println!("    max |r|          : {:.4}", max_abs);
        println!("    ~1.96/sqrt(N)    : {:.4}", 1.96 / (report.n as f64).sqrt());
    }

    if let Some(pairwise) = &report.pairwise {
        println!("  Pairwise association ({} pairs):", pairwise.pair_count);
        println!(
            "    {:<18} {:>10} {:>10} {:>10} {:>10}",
            "coefficient", "mean", "std", "min", "max"
        );
        for c in pairwise.coefficients() {
            println!(
                "    {:<18} {:>10.5} {:>10.5} {:>10.5} {:>10.5}",
                c.name, c.mean, c.std_dev, c.min, c.max
            );
        }
    }
    println!("  Elapsed: {:.2}s\n", report.elapsed_secs);
}

/// One line per experiment.
pub fn print_suite_summary(reports: &[ExperimentReport]) {
    println!("========================================");
    println!("  Summary");
    println!("========================================");
    println!(
        "  {:<5} {:<28} {:>7} {:>11} {:>9}",
        "id", "family", "N", "grand mean", "outside"
    );
    for r in reports {
        println!(
            "  {:<5} {:<28} {:>7} {:>11.6} {:>9}",
            r.id,
            r.family,
            r.n,
            r.band.grand_mean,
            r.band.outside_band.len()
        );
    }
    println!();
}

// ---------------------------------------------------------------------------
// JSON
// ---------------------------------------------------------------------------

/// Pretty-print `value` to `path`, creating parent directories.
pub fn write_json<T: Serialize>(value: &T, path: &Path) -> Result<(), ReportError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// SVG charts
// ---------------------------------------------------------------------------

/// Render every chart available for the report into `out_dir`.
///
/// Returns the written paths.
pub fn render_plots(
    report: &ExperimentReport,
    slug: &str,
    out_dir: &Path,
) -> Result<Vec<PathBuf>, ReportError> {
    fs::create_dir_all(out_dir)?;
    let mut written = Vec::new();

    let path = out_dir.join(format!("{}_mean.svg", slug));
    render(&path, |p| render_mean_band(p, report))?;
    written.push(path);

    if let (Some(lag), Some(coeffs)) = (report.acf_lag, &report.column_acf) {
        let path = out_dir.join(format!("{}_acf_lag{}.svg", slug, lag));
        render(&path, |p| render_column_acf(p, report, lag, coeffs))?;
        written.push(path);
    }

    if let Some(pairwise) = &report.pairwise {
        for c in pairwise.coefficients() {
            let Some(hist) = &c.histogram else {
                continue;
            };
            let file = c.name.to_lowercase().replace(['-', ' '], "_");
            let path = out_dir.join(format!("{}_hist_{}.svg", slug, file));
            render(&path, |p| render_histogram(p, report, c, hist))?;
            written.push(path);
        }
    }

    log::debug!("experiment {}: wrote {} charts", report.id, written.len());
    Ok(written)
}

fn render(
    path: &Path,
    draw: impl FnOnce(&Path) -> Result<(), Box<dyn Error>>,
) -> Result<(), ReportError> {
    draw(path).map_err(|e| ReportError::Render {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Per-bit mean with the `±c·SE` band and the 0.5 reference line.
fn render_mean_band(out_path: &Path, report: &ExperimentReport) -> Result<(), Box<dyn Error>> {
    let (y_min, y_max) = MEAN_AXIS;
    let clamp = |y: f64| y.clamp(y_min, y_max);
    let n_bits = report.bit_stats.len() as f64;

    let mid: Vec<(f64, f64)> = report
        .bit_stats
        .iter()
        .map(|s| (s.index as f64, clamp(s.mean)))
        .collect();
    let upper: Vec<(f64, f64)> = report
        .bit_stats
        .iter()
        .map(|s| (s.index as f64, clamp(s.band(CRITICAL_Z).1)))
        .collect();
    let lower: Vec<(f64, f64)> = report
        .bit_stats
        .iter()
        .map(|s| (s.index as f64, clamp(s.band(CRITICAL_Z).0)))
        .collect();

    let root = SVGBackend::new(out_path, (1200, 700)).into_drawing_area();
    root.fill(&WHITE)?;
    let mut chart = ChartBuilder::on(&root)
        .caption(
            format!("Experiment {}: {} (N={})", report.id, report.description, report.n),
            ("sans-serif", 20),
        )
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(0.0f64..n_bits, y_min..y_max)?;

    chart
        .configure_mesh()
        .x_desc("Digit Index")
        .y_desc("Probability")
        .draw()?;

    chart.draw_series(std::iter::once(PathElement::new(
        vec![(0.0, FAIR_P), (n_bits, FAIR_P)],
        RED.mix(0.6),
    )))?;

    chart
        .draw_series(LineSeries::new(upper, &GREEN))?
        .label("Upper")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], GREEN));
    chart
        .draw_series(LineSeries::new(mid, &BLUE))?
        .label("Avg")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLUE));
    chart
        .draw_series(LineSeries::new(lower, &MAGENTA))?
        .label("Lower")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], MAGENTA));

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::LowerMiddle)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}

/// Lag-h autocorrelation of each bit position.
fn render_column_acf(
    out_path: &Path,
    report: &ExperimentReport,
    lag: usize,
    coeffs: &[f64],
) -> Result<(), Box<dyn Error>> {
    let points: Vec<(f64, f64)> = coeffs
        .iter()
        .enumerate()
        .filter(|(_, c)| c.is_finite())
        .map(|(i, &c)| (i as f64, c))
        .collect();

    let mut y_min = points.iter().map(|p| p.1).fold(f64::INFINITY, f64::min);
    let mut y_max = points.iter().map(|p| p.1).fold(f64::NEG_INFINITY, f64::max);
    if !y_min.is_finite() || !y_max.is_finite() || (y_max - y_min).abs() < 1e-6 {
        y_min = -0.1;
        y_max = 0.1;
    }
    let pad = 0.1 * (y_max - y_min);

    let root = SVGBackend::new(out_path, (1200, 700)).into_drawing_area();
    root.fill(&WHITE)?;
    let mut chart = ChartBuilder::on(&root)
        .caption(
            format!("Experiment {}: lag-{} autocorrelation per bit", report.id, lag),
            ("sans-serif", 20),
        )
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(0.0f64..coeffs.len() as f64, (y_min - pad)..(y_max + pad))?;

    chart
        .configure_mesh()
        .x_desc("Digit Index")
        .y_desc(format!("r({})", lag))
        .draw()?;

    chart.draw_series(std::iter::once(PathElement::new(
        vec![(0.0, 0.0), (coeffs.len() as f64, 0.0)],
        BLACK.mix(0.3),
    )))?;
    chart.draw_series(LineSeries::new(points, &BLUE))?;

    root.present()?;
    Ok(())
}

/// Histogram of one pairwise coefficient across all pairs.
fn render_histogram(
    out_path: &Path,
    report: &ExperimentReport,
    coefficient: &CoefficientSummary,
    hist: &Histogram,
) -> Result<(), Box<dyn Error>> {
    let y_max = hist.max_count().max(1) as f64 * 1.1;

    let root = SVGBackend::new(out_path, (1200, 700)).into_drawing_area();
    root.fill(&WHITE)?;
    let mut chart = ChartBuilder::on(&root)
        .caption(
            format!(
                "Experiment {}: {} over {} pairs",
                report.id,
                coefficient.name,
                hist.total()
            ),
            ("sans-serif", 20),
        )
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(hist.min..hist.max, 0.0f64..y_max)?;

    chart
        .configure_mesh()
        .x_desc(coefficient.name.as_str())
        .y_desc("count")
        .draw()?;

    for (start, count) in hist.bins() {
        chart.draw_series(std::iter::once(Rectangle::new(
            [(start, 0.0), (start + hist.bin_width, count as f64)],
            BLUE.mix(0.6).filled(),
        )))?;
    }

    root.present()?;
    Ok(())
}
