use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::sim::ReportMode;

pub const DEFAULT_SAMPLES: usize = 1000;

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlotConfig {
    pub width: usize,
    pub height: usize,
    pub point_radius: f32,
    pub inside_color: [u8; 3],
    pub outside_color: [u8; 3],
    pub background: [u8; 3],
    pub draw_boundary: bool,
    pub show_window: bool,
    pub output: Option<PathBuf>,
}

impl PlotConfig {
    /// the film must fit in memory and in a png, and markers must be smaller than the film.
    pub fn validate(&self) -> Result<()> {
        let (width, height) = (self.width, self.height);
        if width == 0 || height == 0 {
            return Err(Error::InvalidInput(format!(
                "plot dimensions must be positive, got {}x{}",
                width, height
            )));
        }
        let max_side = u32::MAX as usize;
        if width > max_side || height > max_side || width.checked_mul(height).is_none() {
            return Err(Error::InvalidInput(format!(
                "plot dimensions {}x{} are too large",
                width, height
            )));
        }
        let radius = self.point_radius;
        if !(radius > 0.0) || !radius.is_finite() || radius > width.max(height) as f32 {
            return Err(Error::InvalidInput(format!(
                "point_radius must be positive and no larger than the plot, got {}",
                radius
            )));
        }
        Ok(())
    }
}

impl Default for PlotConfig {
    fn default() -> Self {
        PlotConfig {
            width: 800,
            height: 800,
            point_radius: 2.0,
            inside_color: [255, 0, 0],
            outside_color: [0, 0, 255],
            background: [255, 255, 255],
            draw_boundary: false,
            show_window: true,
            output: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub samples: usize,
    pub seed: Option<u64>,
    pub report: ReportMode,
    pub plot: PlotConfig,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            samples: DEFAULT_SAMPLES,
            seed: None,
            report: ReportMode::Ratio,
            plot: PlotConfig::default(),
        }
    }
}

impl Config {
    pub fn from_toml_str(s: &str) -> Result<Config> {
        Ok(toml::from_str(s)?)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Config> {
        let path = path.as_ref();
        let read_err = |source| Error::ConfigRead {
            path: path.to_path_buf(),
            source,
        };
        let mut buf = String::new();
        File::open(path)
            .and_then(|mut file| file.read_to_string(&mut buf))
            .map_err(read_err)?;
        debug!(path = %path.display(), "loaded config file");
        Config::from_toml_str(&buf)
    }

    pub fn validate(&self) -> Result<()> {
        if self.samples == 0 {
            return Err(Error::InvalidInput(String::from(
                "samples must be a positive integer",
            )));
        }
        self.plot.validate()
    }
}
