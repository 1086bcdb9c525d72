//! CLI for fitting, converting, and sampling origin-centered ellipses.
//!
//! Provides:
//! - Constrained least-squares fits of one or many point sets (many sets are fit in parallel)
//! - Quadratic → parametric conversion
//! - Boundary sampling for plotting, and synthetic (optionally jittered) point generation

mod input;

use std::fs;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use ellfit_core::{
    fit_parametric, sample, Fit, FitConfig, ParametricFormEllipse, QuadraticFormEllipse, R2,
};
use log::{info, warn};
use rand::{rngs::StdRng, Rng, SeedableRng};
use rayon::prelude::*;
use serde::Serialize;

#[derive(Parser)]
#[command(name = "ellfit")]
#[command(about = "Origin-centered ellipse fitting and plotting helper", long_about = None)]
struct Cli {
    /// Log level (error, warn, info, debug, trace); overrides RUST_LOG
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Write JSON output here instead of stdout
    #[arg(short, long, global = true)]
    output: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fit an ellipse to points
    Fit {
        /// Points as JSON (`[[x, y], ...]`, `{x, y}` or `{re, im}` objects), or `@file`.
        /// An array of point arrays fits each set independently.
        #[arg(short, long)]
        points: String,

        /// Solver configuration (JSON or `@file`); flags below override it
        #[arg(short, long)]
        config: Option<String>,

        /// Maximum Newton iterations
        #[arg(short, long)]
        max_iterations: Option<usize>,

        /// Log solver progress at info level
        #[arg(short, long)]
        verbose: bool,

        /// Also emit this many boundary points of each fitted ellipse
        #[arg(short = 'n', long)]
        samples: Option<usize>,

        /// Exit with an error if any fit does not converge
        #[arg(long)]
        strict: bool,
    },

    /// Convert A·x² + B·x·y + C·y² = 1 to parametric form
    Convert {
        #[arg(allow_hyphen_values = true)]
        a: f64,
        #[arg(allow_hyphen_values = true)]
        b: f64,
        #[arg(allow_hyphen_values = true)]
        c: f64,
    },

    /// Sample boundary points of a parametric ellipse
    Sample {
        #[command(flatten)]
        ellipse: EllipseArgs,

        /// Number of points (first and last coincide)
        #[arg(short = 'n', long, default_value = "1000")]
        samples: usize,
    },

    /// Generate boundary points with optional uniform radial jitter, as input for `fit`
    Synth {
        #[command(flatten)]
        ellipse: EllipseArgs,

        /// Number of distinct points
        #[arg(short = 'n', long, default_value = "100")]
        samples: usize,

        /// Relative jitter: each point is scaled by a factor in [1 - noise, 1 + noise]
        #[arg(long, default_value = "0")]
        noise: f64,

        /// RNG seed
        #[arg(long)]
        seed: Option<u64>,
    },
}

#[derive(clap::Args)]
struct EllipseArgs {
    /// Semi-axis lengths
    #[arg(short = 'r', long, num_args = 2, value_names = ["R0", "R1"], default_values_t = [1., 1.])]
    radii: Vec<f64>,

    /// Counter-clockwise rotation of the first axis, in degrees
    #[arg(short = 't', long, default_value = "0", allow_hyphen_values = true)]
    theta: f64,

    /// Center
    #[arg(short = 'c', long, num_args = 2, value_names = ["X", "Y"], default_values_t = [0., 0.], allow_hyphen_values = true)]
    center: Vec<f64>,
}

impl EllipseArgs {
    fn ellipse(&self) -> ParametricFormEllipse {
        ParametricFormEllipse::new(
            [self.radii[0], self.radii[1]],
            R2 { x: self.center[0], y: self.center[1] },
            self.theta.to_radians(),
        )
    }
}

#[derive(Serialize)]
struct FitOutput {
    #[serde(flatten)]
    fit: Fit,
    parametric: ParametricFormEllipse,
    #[serde(skip_serializing_if = "Option::is_none")]
    points: Option<Vec<R2<f64>>>,
}

fn init_logger(level: Option<&str>) -> Result<()> {
    let mut builder = env_logger::Builder::from_default_env();
    if let Some(level) = level {
        builder.filter_level(ellfit_core::parse_log_level(Some(level)).context("--log-level")?);
    }
    builder.init();
    Ok(())
}

fn emit<T: Serialize>(value: &T, output: Option<&str>) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    match output {
        Some(path) => {
            fs::write(path, json).with_context(|| format!("writing {}", path))?;
            info!("Wrote {}", path);
        }
        None => println!("{}", json),
    }
    Ok(())
}

fn fit_cmd(
    points: &str,
    config: Option<&str>,
    max_iterations: Option<usize>,
    verbose: bool,
    samples: Option<usize>,
    strict: bool,
    output: Option<&str>,
) -> Result<()> {
    let mut config: FitConfig = match config {
        Some(arg) => serde_json::from_str(&input::read_arg(arg)?).context("parsing --config")?,
        None => FitConfig::default(),
    };
    if max_iterations.is_some() {
        config.max_iterations = max_iterations;
    }
    config.verbose |= verbose;

    let (sets, many) = input::parse_point_sets(points)?;
    info!("Fitting {} point set(s)", sets.len());
    let results: Vec<FitOutput> = sets
        .par_iter()
        .enumerate()
        .map(|(idx, points)| {
            let (fit, parametric) = fit_parametric(points, &config)
                .with_context(|| format!("point set {}", idx))?;
            let points = samples.map(|n| sample(&parametric, n));
            Ok(FitOutput { fit, parametric, points })
        })
        .collect::<Result<_>>()?;

    let unconverged: Vec<usize> = results
        .iter()
        .enumerate()
        .filter(|(_, r)| !r.fit.converged())
        .map(|(idx, _)| idx)
        .collect();
    if !unconverged.is_empty() {
        if strict {
            anyhow::bail!("fits did not converge for point set(s) {:?}", unconverged);
        }
        warn!("fits did not converge for point set(s) {:?}", unconverged);
    }

    if many {
        emit(&results, output)
    } else {
        emit(&results[0], output)
    }
}

fn synth(e: &ParametricFormEllipse, n: usize, noise: f64, seed: Option<u64>) -> Vec<R2<f64>> {
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut points = sample(e, n + 1);
    points.pop();
    if noise > 0. {
        for p in points.iter_mut() {
            let scale = 1. + rng.gen_range(-noise..=noise);
            *p = e.center + (*p - e.center) * scale;
        }
    }
    points
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logger(cli.log_level.as_deref())?;
    let output = cli.output.as_deref();

    match cli.command {
        Commands::Fit { points, config, max_iterations, verbose, samples, strict } => {
            fit_cmd(&points, config.as_deref(), max_iterations, verbose, samples, strict, output)
        }
        Commands::Convert { a, b, c } => {
            let quadratic = QuadraticFormEllipse::try_new(a, b, c)?;
            emit(&quadratic.to_parametric(), output)
        }
        Commands::Sample { ellipse, samples } => {
            emit(&sample(&ellipse.ellipse(), samples), output)
        }
        Commands::Synth { ellipse, samples, noise, seed } => {
            emit(&synth(&ellipse.ellipse(), samples, noise, seed), output)
        }
    }
}
