use std::str::FromStr;

use rand::distributions::{Distribution, Uniform};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};

/// true when (x, y) lies strictly inside the unit circle. points exactly on the boundary are outside.
pub fn classify(x: f64, y: f64) -> bool {
    x * x + y * y < 1.0
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Classification {
    Inside,
    Outside,
}

impl Classification {
    pub fn of(x: f64, y: f64) -> Self {
        if classify(x, y) {
            Classification::Inside
        } else {
            Classification::Outside
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Sample {
    pub x: f64,
    pub y: f64,
    pub classification: Classification,
}

impl Sample {
    pub fn new(x: f64, y: f64) -> Self {
        Sample {
            x,
            y,
            classification: Classification::of(x, y),
        }
    }
    pub fn is_inside(&self) -> bool {
        self.classification == Classification::Inside
    }
}

/// which value gets reported at the end of a run.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportMode {
    /// inside / n, which converges to pi/4
    #[default]
    Ratio,
    /// 4 * inside / n
    Pi,
}

impl FromStr for ReportMode {
    type Err = String;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "ratio" => Ok(ReportMode::Ratio),
            "pi" => Ok(ReportMode::Pi),
            other => Err(format!(
                "unknown report mode {:?}, expected \"ratio\" or \"pi\"",
                other
            )),
        }
    }
}

/// the outcome of one run. only constructed with at least one sample, so the ratio is always defined.
#[derive(Clone, Debug, PartialEq)]
pub struct Simulation {
    samples: Vec<Sample>,
    inside_count: usize,
}

impl Simulation {
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }
    pub fn inside_count(&self) -> usize {
        self.inside_count
    }
    pub fn outside_count(&self) -> usize {
        self.samples.len() - self.inside_count
    }
    pub fn total(&self) -> usize {
        self.samples.len()
    }
    pub fn ratio(&self) -> f64 {
        self.inside_count as f64 / self.samples.len() as f64
    }
    pub fn pi_estimate(&self) -> f64 {
        4.0 * self.ratio()
    }
    pub fn report(&self, mode: ReportMode) -> f64 {
        match mode {
            ReportMode::Ratio => self.ratio(),
            ReportMode::Pi => self.pi_estimate(),
        }
    }
}

fn check_sample_count(n: usize) -> Result<()> {
    if n == 0 {
        return Err(Error::InvalidInput(String::from(
            "sample count must be a positive integer",
        )));
    }
    Ok(())
}

/// builds a simulation from already-drawn points, in order.
pub fn from_points<I>(points: I) -> Result<Simulation>
where
    I: IntoIterator<Item = (f64, f64)>,
{
    let mut inside_count = 0;
    let samples = points
        .into_iter()
        .map(|(x, y)| {
            let sample = Sample::new(x, y);
            if sample.is_inside() {
                inside_count += 1;
            }
            sample
        })
        .collect::<Vec<_>>();
    check_sample_count(samples.len())?;
    Ok(Simulation {
        samples,
        inside_count,
    })
}

/// draws n points uniformly from [0, 1) x [0, 1), x before y for each point.
pub fn run<R: Rng + ?Sized>(n: usize, rng: &mut R) -> Result<Simulation> {
    check_sample_count(n)?;
    let unit = Uniform::new(0.0f64, 1.0);
    let mut samples = Vec::with_capacity(n);
    let mut inside_count = 0;
    for _ in 0..n {
        let x = unit.sample(rng);
        let y = unit.sample(rng);
        let sample = Sample::new(x, y);
        if sample.is_inside() {
            inside_count += 1;
        }
        samples.push(sample);
    }
    debug!(n, inside_count, "sampling finished");
    Ok(Simulation {
        samples,
        inside_count,
    })
}

/// like `run`, with a generator seeded from `seed`, or from os entropy when unset.
pub fn run_seeded(n: usize, seed: Option<u64>) -> Result<Simulation> {
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    run(n, &mut rng)
}
