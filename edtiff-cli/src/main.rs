//! edtiff CLI - identify detector TIFF images and show their geometry.

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use console::style;
use glob::glob;
use serde::Serialize;
use tracing::{debug, warn};

use edtiff::prelude::*;

/// Output mode for the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputMode {
    Normal,
    /// One JSON document on stdout, no logging.
    Json,
    /// Results only, no logging.
    Quiet,
    /// Debug logging.
    Verbose,
}

/// Command-line arguments for the edtiff tool.
#[derive(Parser, Debug)]
#[command(name = "edtiff")]
#[command(version)]
#[command(about = "Recognise electron-diffraction detector TIFF images")]
#[command(long_about = "edtiff matches single-page TIFF images against known detector \
profiles and reports the placeholder geometry each profile attaches.\n\n\
The 512x512 Merlin and UED BNL profiles are disabled unless enabled with \
--merlin / --ued-bnl or the QD_MERLIN_TIFF / UED_BNL_TIFF environment variables.")]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Enable the Quantum Detectors Merlin profile
    #[arg(long, global = true)]
    merlin: bool,

    /// Enable the UED BNL profile
    #[arg(long = "ued-bnl", global = true)]
    ued_bnl: bool,

    /// JSON file with site geometry overrides
    #[arg(long, global = true, value_name = "FILE")]
    site: Option<PathBuf>,

    /// Verbose output (debug logging)
    #[arg(short, long, global = true, conflicts_with = "quiet", conflicts_with = "json")]
    verbose: bool,

    /// Quiet mode (results only)
    #[arg(short, long, global = true, conflicts_with = "verbose", conflicts_with = "json")]
    quiet: bool,

    /// JSON output mode for programmatic parsing
    #[arg(long, global = true, conflicts_with = "verbose", conflicts_with = "quiet")]
    json: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the matching profile of each file
    Identify {
        /// Files or glob patterns
        #[arg(required = true)]
        inputs: Vec<String>,
    },
    /// Print scan, beam, goniometer and detector of one file
    Show {
        file: PathBuf,

        /// Also decode the pixels and print statistics
        #[arg(long)]
        stats: bool,
    },
    /// List registered profiles
    Profiles,
}

impl Args {
    fn output_mode(&self) -> OutputMode {
        if self.json {
            OutputMode::Json
        } else if self.quiet {
            OutputMode::Quiet
        } else if self.verbose {
            OutputMode::Verbose
        } else {
            OutputMode::Normal
        }
    }

    /// Flags from the command line OR'ed with the environment.
    fn detection_config(&self) -> DetectionConfig {
        DetectionConfig::new()
            .merlin(self.merlin)
            .ued_bnl(self.ued_bnl)
            .union(DetectionConfig::from_env())
    }
}

#[derive(Debug, Serialize)]
struct IdentifyResult {
    path: PathBuf,
    profile: Option<&'static str>,
}

#[derive(Debug, Serialize)]
struct ShowOutput<'a> {
    #[serde(flatten)]
    image: &'a ImportedImage,
    #[serde(skip_serializing_if = "Option::is_none")]
    stats: Option<PixelStats>,
}

#[derive(Debug, Serialize)]
struct ProfileSummary {
    name: &'static str,
    description: &'static str,
    shape: (u32, u32),
    gate: Option<&'static str>,
    still: bool,
}

/// Expand glob patterns; inputs that match nothing are kept as literal paths.
fn expand_inputs(inputs: &[String]) -> anyhow::Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for input in inputs {
        let mut matched = false;
        for entry in glob(input).with_context(|| format!("invalid pattern '{}'", input))? {
            match entry {
                Ok(path) => {
                    matched = true;
                    paths.push(path);
                }
                Err(e) => warn!(error = %e, "Skipping unreadable path"),
            }
        }
        if !matched {
            paths.push(PathBuf::from(input));
        }
    }
    Ok(paths)
}

fn run_identify(
    registry: &FormatRegistry,
    config: &DetectionConfig,
    inputs: &[String],
    mode: OutputMode,
) -> anyhow::Result<bool> {
    let results: Vec<IdentifyResult> = expand_inputs(inputs)?
        .into_iter()
        .map(|path| {
            let profile = registry.identify(&path, config).map(|p| p.name);
            IdentifyResult { path, profile }
        })
        .collect();

    if mode == OutputMode::Json {
        println!("{}", serde_json::to_string_pretty(&results)?);
    } else {
        for result in &results {
            let name = match result.profile {
                Some(name) => style(name).green(),
                None => style("unrecognized").red(),
            };
            println!("{}: {}", result.path.display(), name);
        }
    }

    Ok(results.iter().all(|r| r.profile.is_some()))
}

fn run_show(
    registry: &FormatRegistry,
    config: &DetectionConfig,
    overrides: &SiteOverrides,
    file: &Path,
    stats: bool,
    mode: OutputMode,
) -> anyhow::Result<()> {
    let image = registry
        .open(file, config)?
        .with_overrides(overrides)
        .context("applying site overrides")?;

    let stats = if stats {
        image
            .pixel_stats()
            .with_context(|| format!("decoding {}", file.display()))?
    } else {
        None
    };

    if mode == OutputMode::Json {
        let output = ShowOutput {
            image: &image,
            stats,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("{}", style(file.display()).cyan().bold());
    println!("  Profile:      {}", style(image.profile).green());

    match &image.scan {
        Some(scan) => {
            let (start, end) = scan.oscillation_range();
            println!(
                "  Scan:         images {}-{}, oscillation {:.2} to {:.2} deg",
                scan.image_range.0, scan.image_range.1, start, end
            )
        }
        None => println!("  Scan:         none (still)"),
    }

    let beam = &image.beam;
    println!(
        "  Beam:         wavelength {} A, s0 {:?}, polarization {:?} @ {}",
        beam.wavelength, beam.sample_to_source, beam.polarization_normal, beam.polarization_fraction
    );

    match &image.goniometer {
        Some(gonio) => println!("  Goniometer:   axis {:?}", gonio.rotation_axis),
        None => println!("  Goniometer:   none (still)"),
    }

    for panel in &image.detector.panels {
        println!("  Detector:     {} at {} mm", panel.kind, panel.distance);
        println!(
            "    Pixel size:   {} x {} mm",
            panel.pixel_size.0, panel.pixel_size.1
        );
        println!(
            "    Image size:   {} x {} px",
            panel.image_size.0, panel.image_size.1
        );
        println!(
            "    Beam centre:  ({:.3}, {:.3}) mm",
            panel.beam_centre.0, panel.beam_centre.1
        );
        println!("    Axes:         fast {} slow {}", panel.fast_axis, panel.slow_axis);
        println!("    Origin:       {:?} mm", panel.origin());
        println!(
            "    Trusted:      [{}, {}]",
            panel.trusted_range.0, panel.trusted_range.1
        );
    }

    if let Some(stats) = stats {
        println!("  Pixels:");
        println!("    Min / max:    {} / {}", stats.min, stats.max);
        println!("    Mean:         {:.3}", stats.mean);
        let untrusted = if stats.untrusted > 0 {
            style(stats.untrusted).yellow()
        } else {
            style(stats.untrusted).white()
        };
        println!("    Untrusted:    {}", untrusted);
    }

    Ok(())
}

fn run_profiles(registry: &FormatRegistry, config: &DetectionConfig, mode: OutputMode) -> anyhow::Result<()> {
    let summaries: Vec<ProfileSummary> = registry
        .profiles()
        .iter()
        .map(|p| ProfileSummary {
            name: p.name,
            description: p.description,
            shape: p.shape,
            gate: p.gate.map(|g| g.env_var()),
            still: p.is_still(),
        })
        .collect();

    if mode == OutputMode::Json {
        println!("{}", serde_json::to_string_pretty(&summaries)?);
        return Ok(());
    }

    for (profile, summary) in registry.profiles().iter().zip(&summaries) {
        let gate = match profile.gate {
            Some(gate) if config.allows(gate) => style(format!("{} (enabled)", gate.env_var())).green(),
            Some(gate) => style(format!("{} (disabled)", gate.env_var())).yellow(),
            None => style(String::new()).white(),
        };
        println!(
            "{:<10} {:>4}x{:<4} {:<32} {}",
            style(summary.name).cyan(),
            summary.shape.0,
            summary.shape.1,
            summary.description,
            gate
        );
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let output_mode = args.output_mode();

    // Initialize logging (not in JSON or quiet mode)
    if output_mode != OutputMode::Json && output_mode != OutputMode::Quiet {
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(if args.verbose {
                tracing::Level::DEBUG
            } else {
                tracing::Level::WARN
            })
            .with_target(false)
            .with_writer(std::io::stderr)
            .finish();
        let _ = tracing::subscriber::set_global_default(subscriber);
    }

    let config = args.detection_config();
    debug!(
        merlin = config.merlin,
        ued_bnl = config.ued_bnl,
        "Detection gates"
    );

    let overrides = match &args.site {
        Some(path) => SiteOverrides::from_path(path)
            .with_context(|| format!("reading site overrides from {}", path.display()))?,
        None => SiteOverrides::default(),
    };

    let registry = FormatRegistry::with_builtin();

    match &args.command {
        Command::Identify { inputs } => {
            if !run_identify(&registry, &config, inputs, output_mode)? {
                std::process::exit(1);
            }
        }
        Command::Show { file, stats } => {
            if let Err(e) = run_show(&registry, &config, &overrides, file, *stats, output_mode) {
                eprintln!("{} {:#}", style("Error:").red().bold(), e);
                std::process::exit(1);
            }
        }
        Command::Profiles => run_profiles(&registry, &config, output_mode)?,
    }

    Ok(())
}
