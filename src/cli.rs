use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "dtc")]
#[command(
    version,
    about = "Design Token Checker - Find visual deviations from a design token set",
    long_about = "Design Token Checker (DTC)\n\nModes:\n- analyze: sample colors from an image, locate them, match colors and typography against design tokens and report numbered issues.\n- palette: print the sampled color palette of an image.\n\nExit codes: 0 no failing issues, 1 at least one failing issue, 2 error.\nUse --help on any subcommand for details."
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(
        long,
        global = true,
        value_name = "PATH",
        help = "Optional config file (TOML) to set defaults for sampling/regions/matching/clustering; CLI flags override config"
    )]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Match an image's colors and typography against design tokens
    Analyze(AnalyzeArgs),

    /// Print the sampled color palette of an image
    Palette(PaletteArgs),
}

#[derive(Args)]
pub struct AnalyzeArgs {
    #[arg(long, value_name = "PATH", help = "Screenshot or exported design image")]
    pub image: PathBuf,

    #[arg(long, value_name = "PATH", help = "Design token file (JSON or YAML)")]
    pub tokens: PathBuf,

    #[arg(
        long,
        value_name = "PATH",
        help = "Typography descriptors captured from the same screen (JSON or YAML)"
    )]
    pub typography: Option<PathBuf>,

    #[command(flatten)]
    pub sampling: SamplingFlags,

    #[command(flatten)]
    pub matching: MatchingFlags,

    #[arg(long, help = "Locate palette colors on worker threads")]
    pub parallel: bool,

    #[arg(long, help = "Include raw color/font matches in the output")]
    pub include_matches: bool,

    #[arg(long, value_enum, default_value = "json", help = "Output format")]
    pub format: OutputFormat,

    #[arg(long, short, help = "Output file path (stdout if omitted)")]
    pub output: Option<PathBuf>,
}

#[derive(Args)]
pub struct PaletteArgs {
    #[arg(long, value_name = "PATH", help = "Image to sample")]
    pub image: PathBuf,

    #[command(flatten)]
    pub sampling: SamplingFlags,

    #[arg(long, value_enum, default_value = "json", help = "Output format")]
    pub format: OutputFormat,

    #[arg(long, short, help = "Output file path (stdout if omitted)")]
    pub output: Option<PathBuf>,
}

/// Color sampler overrides; unset flags fall back to config.
#[derive(Args, Debug, Clone, Default)]
pub struct SamplingFlags {
    #[arg(long, value_name = "PX", help = "Sampling grid step in pixels [config default: 4]")]
    pub stride: Option<u32>,

    #[arg(
        long,
        value_name = "0-255",
        help = "Skip sampled pixels with alpha below this [config default: 128]"
    )]
    pub alpha_cutoff: Option<u8>,

    #[arg(long, value_name = "N", help = "Max palette size [config default: 64]")]
    pub max_colors: Option<usize>,
}

/// Region, matching and clustering overrides; unset flags fall back to config.
#[derive(Args, Debug, Clone, Default)]
pub struct MatchingFlags {
    #[arg(
        long,
        value_name = "DIST",
        help = "Max RGB distance for a pixel to belong to a color region [config default: 10]"
    )]
    pub tolerance: Option<f64>,

    #[arg(
        long,
        value_name = "PCT",
        help = "Drop regions smaller than this share of the image [config default: 0.1]"
    )]
    pub min_region_percent: Option<f64>,

    #[arg(
        long,
        value_name = "PX",
        help = "Downscale images above this pixel count before locating regions [config default: 1000000]"
    )]
    pub max_pixels: Option<u64>,

    #[arg(
        long,
        value_name = "DE",
        help = "CIEDE2000 distance at or below which a color passes [config default: 3]"
    )]
    pub pass_threshold: Option<f64>,

    #[arg(
        long,
        value_name = "DE",
        help = "CIEDE2000 distance at or below which a color warns [config default: 10]"
    )]
    pub warn_threshold: Option<f64>,

    #[arg(
        long,
        value_name = "PX",
        help = "Font size difference still treated as a match [config default: 2]"
    )]
    pub font_size_tolerance: Option<f64>,

    #[arg(
        long,
        value_name = "PX",
        help = "Markers closer than this are grouped into one cluster [config default: 30]"
    )]
    pub cluster_radius: Option<f64>,
}

#[derive(Clone, Copy, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Json,
    Pretty,
}

pub fn parse() -> Cli {
    Cli::parse()
}
