//! huffproc: compress and decompress files with Huffman coding
//!
//! ## Usage
//!
//! ```bash
//! # Compress (writes notes.txt.hf)
//! huffproc compress notes.txt
//!
//! # Decompress (writes notes.txt)
//! huffproc decompress notes.txt.hf
//!
//! # Inspect the code table
//! huffproc codes notes.txt
//!
//! # Generate reproducible sample data
//! huffproc sample --seed 42 --size 1048576 -o sample.bin
//! ```

mod config;
mod input_gen;

use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::Path;

use anyhow::Context;
use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use huffproc_core::{compress, decompress, Codebook, FrequencyTable, SENTINEL};

use config::{Action, Cli, Config};

fn main() -> anyhow::Result<()> {
    let config = match Config::from_cli(Cli::parse()) {
        Ok(config) => config,
        Err(msg) => {
            eprintln!("error: {}", msg);
            std::process::exit(2);
        }
    };

    init_tracing(config.log_level)?;

    if config.print_config {
        config.print();
    }

    run(&config)
}

fn init_tracing(level: Level) -> anyhow::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber).context("failed to set tracing subscriber")
}

fn run(config: &Config) -> anyhow::Result<()> {
    match &config.action {
        Action::Compress { input, output } => run_compress(input, output, config.print_metrics),
        Action::Decompress { input, output } => run_decompress(input, output, config.print_metrics),
        Action::Codes { input } => run_codes(input),
        Action::Sample { output, size, seed } => {
            input_gen::write_sample_file(output, *seed, *size)
                .with_context(|| format!("failed to write {}", output.display()))?;
            println!("Wrote {} bytes to {} (seed {})", size, output.display(), seed);
            Ok(())
        }
    }
}

fn open(path: &Path) -> anyhow::Result<BufReader<File>> {
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    Ok(BufReader::new(file))
}

fn run_compress(input: &Path, output: &Path, print_metrics: bool) -> anyhow::Result<()> {
    info!("compressing {} -> {}", input.display(), output.display());

    // Counting consumes one handle; encoding gets a fresh one.
    let freqs = FrequencyTable::from_reader(open(input)?)
        .with_context(|| format!("failed to read {}", input.display()))?;

    let out = File::create(output).with_context(|| format!("failed to create {}", output.display()))?;
    let metrics = compress(&freqs, open(input)?, BufWriter::new(out))
        .with_context(|| format!("failed to compress {}", input.display()))?;

    info!(
        "compressed {} bytes into {} bytes",
        metrics.raw_bytes, metrics.output_bytes
    );
    if print_metrics {
        metrics.print_summary();
    }
    Ok(())
}

fn run_decompress(input: &Path, output: &Path, print_metrics: bool) -> anyhow::Result<()> {
    info!("decompressing {} -> {}", input.display(), output.display());

    // Decode fully before touching the output so a corrupt stream leaves no file.
    let mut decoded = Vec::new();
    let metrics = decompress(open(input)?, &mut decoded)
        .with_context(|| format!("failed to decompress {}", input.display()))?;

    fs::write(output, &decoded).with_context(|| format!("failed to write {}", output.display()))?;

    info!(
        "restored {} bytes from {} bytes",
        metrics.output_bytes, metrics.input_bytes
    );
    if print_metrics {
        metrics.print_summary();
    }
    Ok(())
}

fn run_codes(input: &Path) -> anyhow::Result<()> {
    let freqs = FrequencyTable::from_reader(open(input)?)
        .with_context(|| format!("failed to read {}", input.display()))?;
    let book = Codebook::from_frequencies(&freqs);

    println!("{:>8}  {:>12}  code", "symbol", "count");
    for (symbol, code) in book.table().iter() {
        let (label, count) = if symbol == SENTINEL {
            ("EOF".to_string(), 0)
        } else {
            let byte = symbol as u8;
            (symbol_label(byte), freqs.count(byte))
        };
        println!("{:>8}  {:>12}  {}", label, count, code);
    }
    println!();
    println!(
        "{} codes, longest {} bits",
        book.table().len(),
        book.table().max_len()
    );
    Ok(())
}

fn symbol_label(byte: u8) -> String {
    if byte.is_ascii_graphic() {
        format!("'{}'", byte as char)
    } else {
        format!("0x{:02x}", byte)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let original = dir.path().join("input.bin");
        let compressed = dir.path().join("input.bin.hf");
        let restored = dir.path().join("restored.bin");

        input_gen::write_sample_file(&original, 42, 50_000).unwrap();

        run_compress(&original, &compressed, false).unwrap();
        run_decompress(&compressed, &restored, false).unwrap();

        assert_eq!(fs::read(&original).unwrap(), fs::read(&restored).unwrap());
    }

    #[test]
    fn test_empty_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let original = dir.path().join("empty");
        let compressed = dir.path().join("empty.hf");
        let restored = dir.path().join("empty.out");
        fs::write(&original, b"").unwrap();

        run_compress(&original, &compressed, false).unwrap();
        assert_eq!(fs::metadata(&compressed).unwrap().len(), 7);
        run_decompress(&compressed, &restored, false).unwrap();

        assert!(fs::read(&restored).unwrap().is_empty());
    }

    #[test]
    fn test_corrupt_input_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let compressed = dir.path().join("bad.hf");
        let restored = dir.path().join("bad");
        fs::write(&compressed, b"not a huffproc stream").unwrap();

        assert!(run_decompress(&compressed, &restored, false).is_err());
        assert!(!restored.exists());
    }

    #[test]
    fn test_missing_input() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing");
        let output = dir.path().join("missing.hf");
        assert!(run_compress(&missing, &output, false).is_err());
    }

    #[test]
    fn test_symbol_label() {
        assert_eq!(symbol_label(b'a'), "'a'");
        assert_eq!(symbol_label(b' '), "0x20");
        assert_eq!(symbol_label(0), "0x00");
    }
}
