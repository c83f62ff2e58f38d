use std::path::PathBuf;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use lib::config::Config;
use lib::sim::{self, ReportMode};
use lib::{plot, Result};

#[derive(Debug, Parser)]
#[command(author, version, about = "Approximate pi by sampling the unit square")]
struct Opt {
    /// toml config file, overridden by any flags below
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(short = 'n', long)]
    samples: Option<usize>,
    #[arg(long)]
    seed: Option<u64>,
    /// "ratio" or "pi"
    #[arg(long)]
    report: Option<ReportMode>,
    /// also write the scatter plot to this png
    #[arg(long)]
    output: Option<PathBuf>,
    #[arg(long)]
    no_window: bool,
    #[arg(long)]
    draw_boundary: bool,
}

impl Opt {
    fn resolve(self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load(path)?,
            None => Config::default(),
        };
        if let Some(samples) = self.samples {
            config.samples = samples;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        if let Some(report) = self.report {
            config.report = report;
        }
        if self.output.is_some() {
            config.plot.output = self.output;
        }
        if self.no_window {
            config.plot.show_window = false;
        }
        if self.draw_boundary {
            config.plot.draw_boundary = true;
        }
        config.validate()?;
        Ok(config)
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("APPROXIMATE_PI_LOG")
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(opts: Opt) -> Result<()> {
    let config = opts.resolve()?;
    info!(samples = config.samples, seed = ?config.seed, report = ?config.report, "starting");

    let simulation = sim::run_seeded(config.samples, config.seed)?;
    info!(
        inside = simulation.inside_count(),
        outside = simulation.outside_count(),
        "sampled"
    );

    let film = plot::render(&simulation, &config.plot)?;
    if let Some(path) = &config.plot.output {
        plot::save_png(&film, path)?;
    }
    if config.plot.show_window {
        #[cfg(feature = "window")]
        lib::window::show(&film, "approximating pi")?;
        #[cfg(not(feature = "window"))]
        tracing::warn!("built without the window feature, not showing the plot");
    }

    let value = simulation.report(config.report);
    if config.report == ReportMode::Pi {
        info!(error = (std::f64::consts::PI - value).abs(), "pi estimate");
    }
    println!("{}", value);
    Ok(())
}

fn main() {
    init_tracing();
    let opts = Opt::parse();
    if let Err(e) = run(opts) {
        error!("{}", e);
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
