//! Registries to compile when no registry file is given.
//!
//! # Built-in sample
//!
//! A 24-bit registry of unit commands for a turn-based game: map
//! coordinates are 7 bits per axis, directions 3 bits, unit kinds 4 bits.
//! It mixes bare commands, single fields and multi-field commands so every
//! header class shows up in the report.
//!
//! # Random registries
//!
//! Seeded with ChaCha8, so `--random N --seed S` always compiles the same
//! registry. Payloads are kept small enough that the headers always fit.

use flagcodec_core::CommandSpec;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Bit budget of the built-in sample.
pub const SAMPLE_TOTAL_BITS: u32 = 24;

const SAMPLE: &[(&str, &[u32])] = &[
    ("SCOUT", &[3]),
    ("EXPLORE", &[]),
    ("SAFE_DIR_EDGE", &[3, 3, 6]),
    ("FLEE", &[]),
    ("DEFEND", &[3]),
    ("ENEMY_EC", &[7, 7, 4]),
    ("NEUTRAL_EC", &[7, 7, 4]),
    ("EXPLODE", &[]),
    ("ATTACK_LOC", &[7, 7]),
    ("HIDE", &[3]),
    ("CAPTURE_NEUTRAL_EC", &[7, 7]),
    ("STOP_PRODUCING_MUCKRAKERS", &[]),
];

/// The built-in sample registry.
pub fn sample_registry() -> Vec<CommandSpec> {
    SAMPLE
        .iter()
        .map(|(name, fields)| CommandSpec::new(*name, fields.to_vec()))
        .collect()
}

/// Generate `count` commands named `CMD_0..` for a `total_bits` budget.
///
/// Every header is at least `log2(count + 1) + 1` bits, which leaves room
/// for all codes plus the reserved all-ones code. A budget too small for
/// that yields bare commands only, and compilation reports the shortfall.
pub fn random_registry(seed: u64, total_bits: u32, count: usize) -> Vec<CommandSpec> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    let min_header = usize::BITS - count.leading_zeros() + 1;
    let payload_budget = total_bits.saturating_sub(min_header);

    (0..count)
        .map(|i| {
            let arity = rng.gen_range(0..=3);
            let mut remaining = payload_budget;
            let mut fields = Vec::with_capacity(arity);
            for _ in 0..arity {
                if remaining == 0 {
                    break;
                }
                let width = rng.gen_range(1..=remaining.min(8));
                remaining -= width;
                fields.push(width);
            }
            CommandSpec::new(format!("CMD_{i}"), fields)
        })
        .collect()
}
