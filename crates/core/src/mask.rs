//! Per-compilation secrecy mask.
//!
//! Every encoded value is XORed with one random `total_bits`-wide mask drawn
//! when the codec is compiled. An observer who only sees transmitted values
//! cannot reuse a decoder built against one compilation on the next, because
//! the mapping from messages to values changes with every draw.
//!
//! This is obfuscation, NOT confidentiality. A fixed XOR mask over a known
//! layout is recoverable from a handful of observed values by anyone who
//! guesses the layout. It only defeats static, build-independent inference.
//!
//! # Determinism
//!
//! Draws come from ChaCha8. `MaskSource::Seed` makes a compilation fully
//! reproducible; `MaskSource::Entropy` seeds from the OS for production
//! builds; `MaskSource::Fixed` pins a known mask, e.g. to regenerate an
//! artifact that must interoperate with an existing one.

use crate::bitio::low_mask;
use crate::error::{ConfigurationError, Result};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::trace;

/// Where the mask comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MaskSource {
    /// Fresh OS entropy for every compilation
    #[default]
    Entropy,

    /// Reproducible draw from a seeded ChaCha8 stream
    Seed(u64),

    /// Caller-supplied mask
    Fixed(u64),
}

/// Draw one uniformly random mask of `total_bits` bits.
///
/// # Errors
/// `ConfigurationError::MaskOutOfRange` when a fixed mask has bits set at or
/// above `total_bits`.
pub fn draw_mask(source: MaskSource, total_bits: u32) -> Result<u64> {
    let width = low_mask(total_bits);

    let mask = match source {
        MaskSource::Entropy => ChaCha8Rng::from_entropy().gen::<u64>() & width,
        MaskSource::Seed(seed) => ChaCha8Rng::seed_from_u64(seed).gen::<u64>() & width,
        MaskSource::Fixed(mask) => {
            if mask & !width != 0 {
                return Err(ConfigurationError::MaskOutOfRange { mask, total_bits }.into());
            }
            mask
        }
    };

    trace!(mask, total_bits, "drew secrecy mask");
    Ok(mask)
}
