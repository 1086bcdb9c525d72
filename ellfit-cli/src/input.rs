//! Point-set parsing for the `fit` subcommand.

use std::fs;

use anyhow::{Context, Result};
use ellfit_core::{Complex, R2};
use serde::Deserialize;

/// A point as `[x, y]`, `{"x": .., "y": ..}`, or `{"re": .., "im": ..}`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum PointIn {
    Pair([f64; 2]),
    R2(R2<f64>),
    Complex(Complex<f64>),
}

impl From<PointIn> for R2<f64> {
    fn from(p: PointIn) -> Self {
        match p {
            PointIn::Pair([x, y]) => R2 { x, y },
            PointIn::R2(p) => p,
            PointIn::Complex(z) => z.into(),
        }
    }
}

/// One point set, or several to be fit independently.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum PointSets {
    One(Vec<PointIn>),
    Many(Vec<Vec<PointIn>>),
}

impl PointSets {
    pub fn into_sets(self) -> Vec<Vec<R2<f64>>> {
        match self {
            PointSets::One(points) => vec![points.into_iter().map(R2::from).collect()],
            PointSets::Many(sets) => sets
                .into_iter()
                .map(|points| points.into_iter().map(R2::from).collect())
                .collect(),
        }
    }
}

/// Inline JSON, or `@path` to read it from a file.
pub fn read_arg(arg: &str) -> Result<String> {
    match arg.strip_prefix('@') {
        Some(path) => fs::read_to_string(path).with_context(|| format!("reading {}", path)),
        None => Ok(arg.to_string()),
    }
}

pub fn parse_point_sets(arg: &str) -> Result<(Vec<Vec<R2<f64>>>, bool)> {
    let json = read_arg(arg)?;
    let sets: PointSets = serde_json::from_str(&json).context("parsing points: expected an array of points or an array of point arrays")?;
    let many = matches!(sets, PointSets::Many(_));
    Ok((sets.into_sets(), many))
}
