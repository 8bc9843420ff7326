//! Keccak-256 bit randomness study: command-line entry point.
//!
//! Usage:
//!   bit-randomness --mode=reference [--n=10000] [--lag=1] [--seed=N] [--out=DIR] [--no-plots] [--no-pairwise]
//!   bit-randomness --mode=single --family=ascii --max-len=32 [--n=10000] [--lag=N] [--pairwise] [--seed=N] [--out=DIR]
//!   bit-randomness --mode=quick   (small N, console output only)
//!
//! Families: integers, offset-integers, labelled-integers, labelled-offset-integers, ascii
//!
//! Without --seed the random string families draw from OS entropy.
//! Set RUST_LOG=info (or debug) for progress and timings.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use bit_randomness::experiment::{quick_suite, reference_suite, ExperimentConfig, DEFAULT_SAMPLES};
use bit_randomness::report::{print_suite_summary, print_summary, render_plots, write_json};
use bit_randomness::{run_experiment, ExperimentReport, Family};
use rand::rngs::StdRng;
use rand::SeedableRng;

const DEFAULT_OUT_DIR: &str = "data/keccak_randomness";

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let opts = parse_args(&args);

    let mode = opts.get("mode").map(|s| s.as_str()).unwrap_or("reference");
    let mut rng = match seed_option(&opts) {
        Ok(Some(seed)) => {
            println!("Seed: 0x{seed:016x}");
            StdRng::seed_from_u64(seed)
        }
        Ok(None) => StdRng::from_entropy(),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    let (suite, write_files) = match mode {
        "reference" => {
            let n = parse_usize(&opts, "n", DEFAULT_SAMPLES);
            let lag = parse_usize(&opts, "lag", 1);
            let mut suite = reference_suite(n, lag);
            if opts.contains_key("no-pairwise") {
                for config in &mut suite {
                    config.pairwise = false;
                }
            }
            (suite, true)
        }
        "single" => match single_config(&opts) {
            Ok(config) => (vec![config], true),
            Err(e) => {
                eprintln!("Error: {e}");
                std::process::exit(1);
            }
        },
        "quick" => (quick_suite(), false),
        other => {
            eprintln!("Unknown mode: {other}. Use --mode=reference|single|quick");
            std::process::exit(1);
        }
    };

    let out_dir = PathBuf::from(
        opts.get("out")
            .map(String::as_str)
            .unwrap_or(DEFAULT_OUT_DIR),
    );
    let plots = write_files && !opts.contains_key("no-plots");

    println!("========================================");
    println!("  Keccak-256 bit randomness study");
    println!("========================================");
    println!();

    let mut reports: Vec<ExperimentReport> = Vec::new();
    let mut failures = 0usize;

    for config in &suite {
        let report = match run_experiment(config, &mut rng) {
            Ok(report) => report,
            Err(e) => {
                log::error!("experiment {} failed: {}", config.id, e);
                eprintln!("Experiment {} aborted: {}", config.id, e);
                failures += 1;
                continue;
            }
        };
        print_summary(&report);

        if write_files {
            save_outputs(&report, config, &out_dir, plots);
        }
        reports.push(report);
    }

    print_suite_summary(&reports);

    if failures > 0 {
        eprintln!("{failures} experiment(s) failed");
        std::process::exit(1);
    }
}

/// JSON and charts for one experiment. Failures here are logged, not fatal.
fn save_outputs(report: &ExperimentReport, config: &ExperimentConfig, out_dir: &Path, plots: bool) {
    let slug = config.slug();
    let json_path = out_dir.join(format!("{slug}.json"));
    match write_json(report, &json_path) {
        Ok(()) => println!("  Results written to {}", json_path.display()),
        Err(e) => log::warn!("could not write {}: {}", json_path.display(), e),
    }

    if plots {
        match render_plots(report, &slug, out_dir) {
            Ok(paths) => {
                for p in paths {
                    println!("  Chart written to {}", p.display());
                }
            }
            Err(e) => log::warn!("could not render charts for {}: {}", config.id, e),
        }
    }
    println!();
}

fn single_config(opts: &HashMap<String, String>) -> Result<ExperimentConfig, String> {
    let label = opts
        .get("family")
        .ok_or_else(|| "--family is required in single mode".to_string())?;
    let max_len = parse_usize(opts, "max-len", 32);
    let family = Family::from_label(label, max_len).map_err(|e| e.to_string())?;
    let n = parse_usize(opts, "n", DEFAULT_SAMPLES);

    let mut config = ExperimentConfig::new("single", family, n);
    if let Some(lag) = opts.get("lag").and_then(|v| v.parse().ok()) {
        config = config.with_acf(lag);
    } else if family.is_ordered() {
        config = config.with_acf(1);
    }
    if opts.contains_key("pairwise") {
        config = config.with_pairwise();
    }
    Ok(config)
}

// ---------------------------------------------------------------------------
// Argument parsing helpers
// ---------------------------------------------------------------------------

fn parse_args(args: &[String]) -> HashMap<String, String> {
    let mut map = HashMap::new();
    for arg in args {
        if let Some(kv) = arg.strip_prefix("--") {
            if let Some((k, v)) = kv.split_once('=') {
                map.insert(k.to_string(), v.to_string());
            } else {
                map.insert(kv.to_string(), "true".to_string());
            }
        }
    }
    map
}

fn parse_seed(v: &str) -> Option<u64> {
    if let Some(hex) = v.strip_prefix("0x") {
        u64::from_str_radix(hex, 16).ok()
    } else {
        v.parse().ok()
    }
}

/// `--seed` if given; a value that does not parse is an error, never entropy.
fn seed_option(opts: &HashMap<String, String>) -> Result<Option<u64>, String> {
    match opts.get("seed") {
        None => Ok(None),
        Some(v) => parse_seed(v)
            .map(Some)
            .ok_or_else(|| format!("invalid --seed value {v:?}; use a decimal or 0x-prefixed u64")),
    }
}

fn parse_usize(opts: &HashMap<String, String>, key: &str, default: usize) -> usize {
    opts.get(key)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opts(args: &[&str]) -> HashMap<String, String> {
        let args: Vec<String> = args.iter().map(|s| s.to_string()).collect();
        parse_args(&args)
    }

    #[test]
    fn test_seed_decimal_and_hex() {
        assert_eq!(seed_option(&opts(&["--seed=42"])), Ok(Some(42)));
        assert_eq!(seed_option(&opts(&["--seed=0xff"])), Ok(Some(255)));
        assert_eq!(seed_option(&opts(&["--mode=quick"])), Ok(None));
    }

    #[test]
    fn test_malformed_seed_rejected() {
        for bad in ["--seed=12x", "--seed=", "--seed=0x", "--seed", "--seed=-1"] {
            assert!(seed_option(&opts(&[bad])).is_err(), "{bad} should be rejected");
        }
    }
}
