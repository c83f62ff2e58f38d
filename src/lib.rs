//! Monte Carlo approximation of pi: sample the unit square, count the points inside the
//! unit quarter circle, and draw them as a two-colored scatter plot.

pub mod config;
pub mod error;
mod film;
pub mod plot;
pub mod sim;
#[cfg(feature = "window")]
pub mod window;

pub use config::{Config, PlotConfig};
pub use error::{Error, Result};
pub use film::Film;
pub use sim::{classify, Classification, ReportMode, Sample, Simulation};

/// packs an rgb triple into the 0RGB layout minifb expects.
pub fn rgb_to_u32(r: u8, g: u8, b: u8) -> u32 {
    ((r as u32) << 16) + ((g as u32) << 8) + (b as u32)
}

pub fn u32_to_rgb(c: u32) -> (u8, u8, u8) {
    ((c >> 16) as u8, (c >> 8) as u8, c as u8)
}
