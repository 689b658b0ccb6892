//! Metrics for a single compress or decompress call.
//!
//! This module makes codec behavior observable:
//! - Bytes in and out
//! - Header and body size in bits
//! - Tree size and longest code
//! - Timing and throughput
//!
//! # Thread Safety
//!
//! `CodecMetrics` is a plain value filled in by the call that owns it. Each
//! call produces its own, so concurrent calls never share one.

use std::time::{Duration, Instant};

/// Direction of the call that produced the metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Compress,
    Decompress,
}

/// Counts and timing for one codec call.
#[derive(Debug, Clone)]
pub struct CodecMetrics {
    pub operation: Operation,

    // === Timing ===
    /// When the call started
    pub start_time: Instant,

    /// When the call ended (set on completion)
    pub end_time: Option<Instant>,

    // === Sizes ===
    /// Bytes consumed by the call (raw for compress, encoded for decompress)
    pub input_bytes: u64,

    /// Bytes produced by the call
    pub output_bytes: u64,

    /// Uncompressed payload length
    pub raw_bytes: u64,

    /// Bits of magic plus serialized tree
    pub header_bits: u64,

    /// Bits of codewords plus the sentinel codeword
    pub body_bits: u64,

    // === Tree ===
    /// Leaves in the tree, sentinel included
    pub leaf_count: usize,

    /// Longest root-to-leaf path
    pub max_code_len: usize,
}

impl CodecMetrics {
    /// Create new metrics with start time set to now.
    pub fn new(operation: Operation) -> Self {
        Self {
            operation,
            start_time: Instant::now(),
            end_time: None,
            input_bytes: 0,
            output_bytes: 0,
            raw_bytes: 0,
            header_bits: 0,
            body_bits: 0,
            leaf_count: 0,
            max_code_len: 0,
        }
    }

    /// Mark the call as complete.
    pub fn complete(&mut self) {
        self.end_time = Some(Instant::now());
    }

    /// Get total duration (or current elapsed if not complete).
    pub fn duration(&self) -> Duration {
        match self.end_time {
            Some(end) => end.duration_since(self.start_time),
            None => self.start_time.elapsed(),
        }
    }

    /// Bytes of the compressed stream, padding included.
    pub fn compressed_bytes(&self) -> u64 {
        (self.header_bits + self.body_bits).div_ceil(8)
    }

    /// Compressed size over raw size.
    ///
    /// Returns 0.0 if there was no raw data.
    pub fn compression_ratio(&self) -> f64 {
        if self.raw_bytes == 0 {
            0.0
        } else {
            self.compressed_bytes() as f64 / self.raw_bytes as f64
        }
    }

    /// Average body bits per raw byte (sentinel codeword included).
    pub fn bits_per_byte(&self) -> f64 {
        if self.raw_bytes == 0 {
            0.0
        } else {
            self.body_bits as f64 / self.raw_bytes as f64
        }
    }

    /// Compute throughput in raw bytes/second.
    pub fn throughput_bps(&self) -> f64 {
        let duration_secs = self.duration().as_secs_f64();
        if duration_secs == 0.0 {
            0.0
        } else {
            self.raw_bytes as f64 / duration_secs
        }
    }

    /// Print a human-readable summary to stdout.
    pub fn print_summary(&self) {
        print!("{}", self.export_text());
    }

    /// Render the summary as text.
    pub fn export_text(&self) -> String {
        let title = match self.operation {
            Operation::Compress => "Compression",
            Operation::Decompress => "Decompression",
        };
        let mut out = String::new();
        out.push_str(&format!("\n=== {} Summary ===\n", title));
        out.push_str(&format!("Duration: {} ms\n", self.duration().as_millis()));
        out.push_str(&format!("Input:  {} bytes\n", self.input_bytes));
        out.push_str(&format!("Output: {} bytes\n", self.output_bytes));
        out.push('\n');
        out.push_str(&format!("Header: {} bits\n", self.header_bits));
        out.push_str(&format!("Body: {} bits ({:.3} bits/byte)\n", self.body_bits, self.bits_per_byte()));
        out.push_str(&format!("Ratio: {:.1}%\n", self.compression_ratio() * 100.0));
        out.push_str(&format!("Leaves: {}\n", self.leaf_count));
        out.push_str(&format!("Longest code: {} bits\n", self.max_code_len));
        out.push_str(&format!(
            "Throughput: {:.2} MiB/s\n",
            self.throughput_bps() / 1024.0 / 1024.0
        ));
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_creation() {
        let metrics = CodecMetrics::new(Operation::Compress);
        assert_eq!(metrics.input_bytes, 0);
        assert_eq!(metrics.output_bytes, 0);
        assert!(metrics.end_time.is_none());
    }

    #[test]
    fn test_compression_ratio() {
        let mut metrics = CodecMetrics::new(Operation::Compress);
        assert_eq!(metrics.compression_ratio(), 0.0);

        metrics.raw_bytes = 100;
        metrics.header_bits = 60;
        metrics.body_bits = 340;
        assert_eq!(metrics.compressed_bytes(), 50);
        assert_eq!(metrics.compression_ratio(), 0.5);
        assert_eq!(metrics.bits_per_byte(), 3.4);
    }

    #[test]
    fn test_compressed_bytes_rounds_up() {
        let mut metrics = CodecMetrics::new(Operation::Decompress);
        metrics.header_bits = 54;
        metrics.body_bits = 1;
        assert_eq!(metrics.compressed_bytes(), 7);
    }

    #[test]
    fn test_throughput() {
        let mut metrics = CodecMetrics::new(Operation::Compress);
        metrics.raw_bytes = 1_000_000;
        std::thread::sleep(Duration::from_millis(10));
        metrics.complete();

        assert!(metrics.throughput_bps() > 0.0);
        assert!(metrics.duration() >= Duration::from_millis(10));
    }

    #[test]
    fn test_export_text() {
        let mut metrics = CodecMetrics::new(Operation::Decompress);
        metrics.leaf_count = 2;
        metrics.complete();

        let text = metrics.export_text();
        assert!(text.contains("Decompression Summary"));
        assert!(text.contains("Leaves: 2"));
    }
}
