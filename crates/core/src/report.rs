//! Layout report for a compiled codec.
//!
//! Shows what the compilation decided:
//! - Header code and length per command
//! - How many distinct messages each command can carry
//! - How much of the code space the headers use (Kraft sum)
//! - The build fingerprint
//!
//! The mask is deliberately left out; reports end up in build logs.

use crate::codec::Codec;
use std::fmt;

/// One row of the header table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandRow {
    pub name: String,
    pub header_bits: String,
    pub header_len: u32,
    pub payload_bits: u32,
}

impl CommandRow {
    /// Number of distinct messages this command can encode (saturating).
    pub fn capacity(&self) -> u64 {
        1u64.checked_shl(self.payload_bits).unwrap_or(u64::MAX)
    }
}

/// Summary of one compilation.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutReport {
    pub total_bits: u32,
    pub layout: &'static str,
    pub fingerprint: u32,
    pub rows: Vec<CommandRow>,
}

impl LayoutReport {
    /// Build the report from a codec.
    pub fn new(codec: &Codec) -> Self {
        let rows = codec
            .registry()
            .commands()
            .iter()
            .zip(codec.headers())
            .map(|(command, header)| CommandRow {
                name: command.name.clone(),
                header_bits: header.code_bits(),
                header_len: header.header_len,
                payload_bits: command.payload_bits(),
            })
            .collect();

        Self {
            total_bits: codec.total_bits(),
            layout: codec.layout().as_str(),
            fingerprint: codec.fingerprint(),
            rows,
        }
    }

    /// Fraction of the value space claimed by headers: Σ 2^-header_len.
    ///
    /// Always below 1.0, since the all-ones raw value is reserved.
    pub fn code_space_used(&self) -> f64 {
        self.rows
            .iter()
            .map(|row| 0.5f64.powi(row.header_len as i32))
            .sum()
    }

    /// Number of bits no command uses (uniform layout only).
    pub fn wasted_bits(&self) -> u32 {
        self.rows
            .iter()
            .map(|row| self.total_bits - row.header_len - row.payload_bits)
            .sum()
    }

    /// Print a human-readable summary to stdout.
    pub fn print_summary(&self) {
        print!("{self}");
    }

    /// Export as `key=value` lines (for parsing/testing).
    pub fn export_text(&self) -> String {
        let mut text = format!(
            "total_bits={}\n\
             layout={}\n\
             fingerprint={:08x}\n\
             commands={}\n\
             code_space_used={:.6}\n",
            self.total_bits,
            self.layout,
            self.fingerprint,
            self.rows.len(),
            self.code_space_used(),
        );
        for row in &self.rows {
            text.push_str(&format!(
                "command.{}=header:{} header_len:{} payload_bits:{} capacity:{}\n",
                row.name,
                row.header_bits,
                row.header_len,
                row.payload_bits,
                row.capacity()
            ));
        }
        text
    }
}

impl fmt::Display for LayoutReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Codec Layout ===")?;
        writeln!(f, "Total bits: {}", self.total_bits)?;
        writeln!(f, "Header layout: {}", self.layout)?;
        writeln!(f, "Fingerprint: {:08x}", self.fingerprint)?;
        writeln!(f)?;

        let name_width = self.rows.iter().map(|r| r.name.len()).max().unwrap_or(0);
        writeln!(
            f,
            "{:<name_width$}  {:>6}  {:>7}  header",
            "command", "hdr", "payload"
        )?;
        for row in &self.rows {
            writeln!(
                f,
                "{:<name_width$}  {:>6}  {:>7}  {}",
                row.name, row.header_len, row.payload_bits, row.header_bits
            )?;
        }
        writeln!(f)?;

        writeln!(f, "Code space used: {:.4}%", self.code_space_used() * 100.0)?;
        if self.wasted_bits() > 0 {
            writeln!(f, "Unused payload bits: {}", self.wasted_bits())?;
        }
        Ok(())
    }
}
