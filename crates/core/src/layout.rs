//! Header length assignment.
//!
//! Every command gets whatever the budget leaves after its payload:
//! `header_len = total_bits - payload_bits`. The legacy uniform layout instead
//! gives every command the shortest of those lengths, which wastes the top
//! bits of commands with small payloads but keeps one header class.

use crate::error::{ConfigurationError, Result};
use crate::registry::Registry;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// How header lengths are chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HeaderLayout {
    /// Each command's header fills exactly the bits its payload leaves
    #[default]
    PerCommand,

    /// All commands share the shortest header length (legacy artifacts)
    Uniform,
}

impl HeaderLayout {
    /// Stable name used in reports and fingerprints.
    pub fn as_str(&self) -> &'static str {
        match self {
            HeaderLayout::PerCommand => "per-command",
            HeaderLayout::Uniform => "uniform",
        }
    }
}

/// Compute the header length of every command, in registry order.
///
/// # Errors
/// `ConfigurationError::PayloadExceedsBudget` for the first command whose
/// payload alone is wider than `total_bits`. Nothing is computed for the
/// others; compilation stops here.
pub fn assign_header_lengths(registry: &Registry, layout: HeaderLayout) -> Result<Vec<u32>> {
    let total_bits = registry.total_bits();

    let mut lengths = Vec::with_capacity(registry.len());
    for command in registry.commands() {
        let payload_bits = command.payload_bits();
        if payload_bits > total_bits {
            return Err(ConfigurationError::PayloadExceedsBudget {
                command: command.name.clone(),
                payload_bits,
                total_bits,
            }
            .into());
        }
        lengths.push(total_bits - payload_bits);
    }

    if layout == HeaderLayout::Uniform {
        let shortest = lengths.iter().copied().min().unwrap_or(total_bits);
        let wasted: u32 = lengths.iter().map(|&len| len - shortest).sum();
        if wasted > 0 {
            warn!(
                header_len = shortest,
                wasted_bits = wasted,
                "uniform header layout leaves unused payload bits"
            );
        }
        lengths.iter_mut().for_each(|len| *len = shortest);
    }

    Ok(lengths)
}
