//! Configuration for the flagcodec generator.
//!
//! Handles parsing command-line arguments and registry files, and resolving
//! them into one `Config`.
//!
//! # Philosophy
//!
//! The tool should work with ZERO arguments: it then compiles the built-in
//! sample registry with a fresh mask. `--print-config` shows everything that
//! was resolved, and `--seed` or `--mask` makes a run reproducible.
//!
//! # Registry files
//!
//! ```toml
//! total_bits = 24
//! header_layout = "per-command"
//!
//! [[command]]
//! name = "SCOUT"
//! fields = [3]
//!
//! [[command]]
//! name = "EXPLORE"
//! ```

use crate::sample::{random_registry, sample_registry, SAMPLE_TOTAL_BITS};
use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use flagcodec_core::{CodecBuilder, CommandSpec, HeaderLayout, MaskSource, Target};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Command-line arguments.
#[derive(Debug, Clone, Parser)]
#[command(name = "flagcodec", version, about = "Compile a command registry into a masked flag codec")]
pub struct Args {
    /// Registry file (TOML). Defaults to the built-in sample registry
    #[arg(long, value_name = "PATH", conflicts_with = "random")]
    pub registry: Option<PathBuf>,

    /// Compile a seeded random registry with COUNT commands instead
    #[arg(long, value_name = "COUNT")]
    pub random: Option<usize>,

    /// Override the registry's total bit budget
    #[arg(long, value_name = "N")]
    pub bits: Option<u32>,

    /// Seed for the mask (and the random registry)
    #[arg(long, value_name = "N")]
    pub seed: Option<u64>,

    /// Use this exact mask, decimal or 0x-prefixed hex
    #[arg(long, value_name = "N", value_parser = parse_u64, conflicts_with = "seed")]
    pub mask: Option<u64>,

    /// Give every command the shortest header length (legacy layout)
    #[arg(long)]
    pub uniform_headers: bool,

    /// Output language
    #[arg(long, value_enum, default_value_t = TargetKind::Rust)]
    pub target: TargetKind,

    /// Java package for the generated class (empty for none)
    #[arg(long, value_name = "NAME", default_value = "")]
    pub java_package: String,

    /// Java class name
    #[arg(long, value_name = "NAME", default_value = "Communication")]
    pub java_class: String,

    /// Write generated source here instead of stdout
    #[arg(long, value_name = "PATH")]
    pub out: Option<PathBuf>,

    /// Print resolved configuration
    #[arg(long)]
    pub print_config: bool,

    /// Don't print the layout report
    #[arg(long)]
    pub no_report: bool,

    /// More logging (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Output language selected on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TargetKind {
    Rust,
    Java,
}

fn parse_u64(text: &str) -> std::result::Result<u64, String> {
    let parsed = match text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => text.parse(),
    };
    parsed.map_err(|e| format!("invalid number {text:?}: {e}"))
}

fn default_total_bits() -> u32 {
    SAMPLE_TOTAL_BITS
}

/// On-disk registry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegistryFile {
    #[serde(default = "default_total_bits")]
    pub total_bits: u32,

    #[serde(default)]
    pub header_layout: HeaderLayout,

    #[serde(default, rename = "command")]
    pub commands: Vec<CommandSpec>,
}

impl RegistryFile {
    /// Parse a registry from TOML text.
    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).context("invalid registry file")
    }

    /// Read and parse a registry file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read registry {}", path.display()))?;
        Self::from_toml(&text).with_context(|| format!("in {}", path.display()))
    }
}

/// Complete configuration for one generator run.
#[derive(Debug, Clone)]
pub struct Config {
    // === Registry ===
    /// Where the commands came from, for display
    pub source: String,

    /// Bit budget
    pub total_bits: u32,

    /// Header layout
    pub layout: HeaderLayout,

    /// Commands in declaration order
    pub commands: Vec<CommandSpec>,

    // === Mask ===
    pub mask: MaskSource,

    // === Output ===
    pub target: Target,

    /// Output file (None = stdout)
    pub out: Option<PathBuf>,

    // === Behavior ===
    pub print_config: bool,
    pub print_report: bool,
}

impl Config {
    /// Resolve command-line arguments into a configuration.
    ///
    /// Reads the registry file if one is given.
    pub fn from_args(args: Args) -> Result<Self> {
        let (source, file) = match (&args.registry, args.random) {
            (Some(path), _) => (path.display().to_string(), RegistryFile::load(path)?),
            (None, Some(count)) => {
                if count == 0 {
                    bail!("--random needs at least one command");
                }
                let total_bits = args.bits.unwrap_or(SAMPLE_TOTAL_BITS);
                // The registry is reproducible only with an explicit seed
                let seed = args.seed.unwrap_or_else(rand::random);
                let file = RegistryFile {
                    total_bits,
                    header_layout: HeaderLayout::default(),
                    commands: random_registry(seed, total_bits, count),
                };
                (format!("random ({count} commands, seed {seed})"), file)
            }
            (None, None) => {
                let file = RegistryFile {
                    total_bits: SAMPLE_TOTAL_BITS,
                    header_layout: HeaderLayout::default(),
                    commands: sample_registry(),
                };
                ("built-in sample".to_string(), file)
            }
        };

        let layout = if args.uniform_headers {
            HeaderLayout::Uniform
        } else {
            file.header_layout
        };

        let mask = match (args.mask, args.seed) {
            (Some(mask), _) => MaskSource::Fixed(mask),
            (None, Some(seed)) => MaskSource::Seed(seed),
            (None, None) => MaskSource::Entropy,
        };

        let target = match args.target {
            TargetKind::Rust => Target::Rust,
            TargetKind::Java => Target::Java {
                package: args.java_package,
                class: args.java_class,
            },
        };

        Ok(Config {
            source,
            total_bits: args.bits.unwrap_or(file.total_bits),
            layout,
            commands: file.commands,
            mask,
            target,
            out: args.out,
            print_config: args.print_config,
            print_report: !args.no_report,
        })
    }

    /// A codec builder for this configuration.
    pub fn builder(&self) -> CodecBuilder {
        CodecBuilder::new(self.total_bits)
            .commands(self.commands.iter().cloned())
            .layout(self.layout)
            .mask(self.mask)
    }

    /// Print the configuration in human-readable form.
    ///
    /// Goes to stderr; stdout may carry the generated source.
    pub fn print(&self) {
        eprintln!("=== Configuration ===");
        eprintln!("Registry: {}", self.source);
        eprintln!("Commands: {}", self.commands.len());
        eprintln!("Total bits: {}", self.total_bits);
        eprintln!("Header layout: {}", self.layout.as_str());
        eprintln!();
        eprintln!("=== Mask ===");
        match self.mask {
            MaskSource::Entropy => eprintln!("Source: OS entropy"),
            MaskSource::Seed(seed) => eprintln!("Source: seed {seed}"),
            MaskSource::Fixed(_) => eprintln!("Source: fixed"),
        }
        eprintln!();
        eprintln!("=== Output ===");
        match &self.target {
            Target::Rust => eprintln!("Target: rust"),
            Target::Java { package, class } if package.is_empty() => {
                eprintln!("Target: java ({class})")
            }
            Target::Java { package, class } => eprintln!("Target: java ({package}.{class})"),
        }
        eprintln!(
            "Output: {}",
            self.out
                .as_ref()
                .map_or_else(|| "(stdout)".to_string(), |p| p.display().to_string())
        );
        eprintln!();
    }
}
