//! Configuration for the huffproc command-line tool.
//!
//! Parses command-line arguments with clap and resolves the defaults that
//! depend on other arguments (output paths, the sample seed).
//!
//! Every default is printed by `--print-config`, so runs are reproducible.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tracing::Level;

/// Extension appended to compressed files.
pub const COMPRESSED_EXTENSION: &str = "hf";

/// Extension appended when a decompressed file name cannot be derived.
pub const RESTORED_EXTENSION: &str = "unhf";

/// Default size of generated sample data (1 MiB).
pub const DEFAULT_SAMPLE_BYTES: usize = 1 << 20;

#[derive(Parser, Debug)]
#[command(name = "huffproc")]
#[command(version)]
#[command(about = "Lossless file compression with Huffman coding", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "info")]
    pub log_level: String,

    /// Print resolved configuration
    #[arg(long, global = true)]
    pub print_config: bool,

    /// Don't print the metrics summary
    #[arg(long, global = true)]
    pub no_metrics: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compress a file
    Compress {
        /// File to compress
        input: PathBuf,

        /// Output path (default: <INPUT>.hf)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Decompress a file
    Decompress {
        /// File to decompress
        input: PathBuf,

        /// Output path (default: <INPUT> without .hf, else <INPUT>.unhf)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print the code table a file would be compressed with
    Codes {
        /// File to analyze
        input: PathBuf,
    },

    /// Generate sample data with mixed compressibility
    Sample {
        /// Output path
        #[arg(short, long, default_value = "./sample.bin")]
        output: PathBuf,

        /// Size in bytes
        #[arg(long, default_value_t = DEFAULT_SAMPLE_BYTES)]
        size: usize,

        /// Random seed (default: time-based)
        #[arg(long)]
        seed: Option<u64>,
    },
}

/// What a run does, with every path resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Compress { input: PathBuf, output: PathBuf },
    Decompress { input: PathBuf, output: PathBuf },
    Codes { input: PathBuf },
    Sample { output: PathBuf, size: usize, seed: u64 },
}

/// Complete configuration for a run.
#[derive(Debug, Clone)]
pub struct Config {
    pub action: Action,

    /// Maximum level of log events shown
    pub log_level: Level,

    /// Whether to print detailed config
    pub print_config: bool,

    /// Whether to print the metrics summary
    pub print_metrics: bool,
}

impl Config {
    /// Parse configuration from command-line arguments (program name first).
    #[cfg(test)]
    pub fn from_args<I, T>(args: I) -> Result<Self, String>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let cli = Cli::try_parse_from(args).map_err(|e| e.to_string())?;
        Self::from_cli(cli)
    }

    /// Resolve defaults for parsed arguments.
    pub fn from_cli(cli: Cli) -> Result<Self, String> {
        let log_level = cli
            .log_level
            .parse::<Level>()
            .map_err(|_| format!("invalid log level: {}", cli.log_level))?;

        let action = match cli.command {
            Command::Compress { input, output } => {
                let output = output.unwrap_or_else(|| compressed_path(&input));
                Action::Compress { input, output }
            }
            Command::Decompress { input, output } => {
                let output = output.unwrap_or_else(|| restored_path(&input));
                Action::Decompress { input, output }
            }
            Command::Codes { input } => Action::Codes { input },
            Command::Sample { output, size, seed } => Action::Sample {
                output,
                size,
                seed: seed.unwrap_or_else(time_seed),
            },
        };

        if let Action::Compress { input, output } | Action::Decompress { input, output } = &action {
            if input == output {
                return Err(format!("input and output are the same file: {}", input.display()));
            }
        }

        Ok(Config {
            action,
            log_level,
            print_config: cli.print_config,
            print_metrics: !cli.no_metrics,
        })
    }

    /// Print the configuration in human-readable form.
    pub fn print(&self) {
        println!("=== Configuration ===");
        match &self.action {
            Action::Compress { input, output } => {
                println!("Mode:        compress");
                println!("Input file:  {}", input.display());
                println!("Output file: {}", output.display());
            }
            Action::Decompress { input, output } => {
                println!("Mode:        decompress");
                println!("Input file:  {}", input.display());
                println!("Output file: {}", output.display());
            }
            Action::Codes { input } => {
                println!("Mode:        codes");
                println!("Input file:  {}", input.display());
            }
            Action::Sample { output, size, seed } => {
                println!("Mode:        sample");
                println!("Output file: {}", output.display());
                println!("Size:        {} bytes", size);
                println!("Seed:        {}", seed);
            }
        }
        println!("Log level:   {}", self.log_level);
        println!("Metrics:     {}", if self.print_metrics { "on" } else { "off" });
        println!();
    }
}

/// `<input>.hf`
pub fn compressed_path(input: &Path) -> PathBuf {
    let mut name = input.as_os_str().to_owned();
    name.push(".");
    name.push(COMPRESSED_EXTENSION);
    PathBuf::from(name)
}

/// `<input>` without `.hf`, or `<input>.unhf` when it has no `.hf` extension.
pub fn restored_path(input: &Path) -> PathBuf {
    match input.extension() {
        Some(ext) if ext == COMPRESSED_EXTENSION => input.with_extension(""),
        _ => {
            let mut name = input.as_os_str().to_owned();
            name.push(".");
            name.push(RESTORED_EXTENSION);
            PathBuf::from(name)
        }
    }
}

fn time_seed() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
