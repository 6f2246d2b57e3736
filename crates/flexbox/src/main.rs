//! flexbox - compute a single-axis flex layout from the command line.

use anyhow::Result;
use clap::{Parser, ValueEnum};
use common::geometry::EdgeSizes;
use flexbox::FlexConfig;
use layout::{Axis, OrthogonalAlignment};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

/// Compute child frames for a flex container
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// JSON configuration file; flags below override its values
    #[arg(long)]
    config: Option<String>,

    /// Container width
    #[arg(long)]
    width: Option<f32>,

    /// Container height
    #[arg(long)]
    height: Option<f32>,

    /// Major axis
    #[arg(long, value_enum)]
    axis: Option<AxisArg>,

    /// Comma-separated flex weights, one per child
    #[arg(long, value_delimiter = ',')]
    weights: Option<Vec<u32>>,

    /// Gap before, between and after children
    #[arg(long)]
    spacing: Option<f32>,

    /// Minor-axis alignment
    #[arg(long, value_enum)]
    align: Option<AlignArg>,

    /// Uniform padding applied to every child frame
    #[arg(long)]
    padding: Option<f32>,

    /// Print frames as JSON
    #[arg(long)]
    json: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum AxisArg {
    Horizontal,
    Vertical,
}

impl From<AxisArg> for Axis {
    fn from(arg: AxisArg) -> Self {
        match arg {
            AxisArg::Horizontal => Axis::Horizontal,
            AxisArg::Vertical => Axis::Vertical,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum AlignArg {
    Leading,
    Center,
    Trailing,
}

impl From<AlignArg> for OrthogonalAlignment {
    fn from(arg: AlignArg) -> Self {
        match arg {
            AlignArg::Leading => OrthogonalAlignment::Leading,
            AlignArg::Center => OrthogonalAlignment::Center,
            AlignArg::Trailing => OrthogonalAlignment::Trailing,
        }
    }
}

impl Args {
    /// Resolve the final configuration: file first, then flags.
    fn into_config(self) -> Result<FlexConfig> {
        let mut config = match &self.config {
            Some(path) => FlexConfig::load(path)?,
            None => FlexConfig::default(),
        };

        if let Some(width) = self.width {
            config.width = width;
        }
        if let Some(height) = self.height {
            config.height = height;
        }
        if let Some(axis) = self.axis {
            config.axis = axis.into();
        }
        if let Some(weights) = self.weights {
            config.weights = weights;
        }
        if let Some(spacing) = self.spacing {
            config.spacing = spacing;
        }
        if let Some(align) = self.align {
            config.alignment = align.into();
        }
        if let Some(padding) = self.padding {
            config.padding = EdgeSizes::all(padding);
        }
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let log_level = if args.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("flexbox v{}", flexbox::VERSION);

    let json = args.json;
    let config = args.into_config()?;
    info!(
        width = config.width,
        height = config.height,
        axis = ?config.axis,
        children = config.weights.len(),
        "computing layout"
    );

    let frames = flexbox::compute_frames(&config, &tokio::runtime::Handle::current()).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&frames)?);
    } else {
        for (index, frame) in frames.iter().enumerate() {
            println!(
                "{index}\t{:.2}\t{:.2}\t{:.2}\t{:.2}",
                frame.x, frame.y, frame.width, frame.height
            );
        }
    }

    Ok(())
}
