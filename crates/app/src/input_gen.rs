//! Sample data generation.
//!
//! Produces input with a mix of compressibility so the codec's behavior shows
//! up in the metrics:
//! - Runs of a single byte (one-bit codes)
//! - Text over a small alphabet (short codes)
//! - Short repeating patterns (a handful of equally likely bytes)
//! - Uniform random bytes (no gain)

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::io::Write;

/// Generate sample bytes with mixed compressibility.
///
/// The same seed and size always produce the same bytes.
pub fn generate_sample_data(seed: u64, size_bytes: usize) -> Vec<u8> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut data = Vec::with_capacity(size_bytes);

    let mut remaining = size_bytes;

    while remaining > 0 {
        let chunk_size = remaining.min(8192);

        match rng.gen_range(0..10u8) {
            // 30% runs
            0..=2 => {
                let byte_value: u8 = rng.gen();
                data.extend(std::iter::repeat(byte_value).take(chunk_size));
            }

            // 30% text-like
            3..=5 => {
                let alphabet = b"etaoinshrdlu etaoin  cmfwyp,.\n";
                for _ in 0..chunk_size {
                    data.push(alphabet[rng.gen_range(0..alphabet.len())]);
                }
            }

            // 20% repeating patterns
            6..=7 => {
                let pattern = generate_pattern(&mut rng);
                data.extend(pattern.iter().cycle().take(chunk_size));
            }

            // 20% random
            _ => {
                for _ in 0..chunk_size {
                    data.push(rng.gen());
                }
            }
        }

        remaining -= chunk_size;
    }

    data
}

fn generate_pattern(rng: &mut ChaCha8Rng) -> Vec<u8> {
    let pattern_len = rng.gen_range(4..=32);
    (0..pattern_len).map(|_| rng.gen()).collect()
}

/// Write generated data to a file.
pub fn write_sample_file(path: &std::path::Path, seed: u64, size_bytes: usize) -> std::io::Result<()> {
    let data = generate_sample_data(seed, size_bytes);
    let mut file = std::fs::File::create(path)?;
    file.write_all(&data)?;
    file.flush()
}
