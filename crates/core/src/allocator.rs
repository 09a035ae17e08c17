//! Canonical header allocation.
//!
//! Headers occupy the LOW bits of the raw value, so a decoder identifies a
//! command by masking `x mod 2^header_len` and comparing against the code.
//! For that to be unambiguous across mixed lengths, no shorter code may equal
//! the low bits of any longer code.
//!
//! # Algorithm
//!
//! Commands are numbered densely, shortest header first (ties keep registry
//! order), with an accumulator `acc` that starts at -1 and `cur_len` starting
//! at the shortest header length:
//!
//! ```text
//! for each command (header_len ascending):
//!     if header_len < cur_len:
//!         acc >>= cur_len - header_len
//!         cur_len = header_len
//!     acc += 1
//!     header_code = reverse_bits(acc, cur_len)
//! ```
//!
//! Every code is therefore a distinct `cur_len`-bit number, mirrored so the
//! dense numbering starts from the top bit. A longer header carries its code
//! in the low `cur_len` bits with zeros above, so two commands always differ
//! somewhere in the low `cur_len` bits and no raw value passes two header
//! tests. The code space holds `2^cur_len` commands.
//!
//! A code equal to the all-ones pattern at its own length is rejected: that
//! command with all-ones fields would produce the all-ones raw value, which
//! `+1` maps onto the reserved sentinel. Only a command in the shortest class
//! can get such a code.
//!
//! The result is not trusted by construction; `verify_no_collisions` checks
//! every pair of commands afterwards.

use crate::bitio::{low_mask, reverse_bits};
use crate::error::{ConfigurationError, Result};
use crate::registry::Registry;
use tracing::debug;

/// Header bits assigned to one command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HeaderAssignment {
    /// Code compared against the low `header_len` bits
    pub header_code: u64,

    /// Number of low bits the code occupies
    pub header_len: u32,
}

impl HeaderAssignment {
    /// True when the low `header_len` bits of `raw` equal the code.
    #[inline]
    pub fn matches(&self, raw: u64) -> bool {
        raw & low_mask(self.header_len) == self.header_code
    }

    /// Code rendered as a fixed-width binary string, MSB first.
    pub fn code_bits(&self) -> String {
        if self.header_len == 0 {
            return String::new();
        }
        format!(
            "{:0width$b}",
            self.header_code,
            width = self.header_len as usize
        )
    }
}

/// Assign a canonical header to every command, in registry order.
///
/// `lengths[i]` is the header length of command `i`, as produced by
/// `layout::assign_header_lengths`.
///
/// # Errors
/// - `ConfigurationError::CodeSpaceExhausted` if the lengths leave no code
///   for some command
/// - `ConfigurationError::HeaderCollision` if the exhaustive check finds a
///   conflicting pair
pub fn allocate_headers(registry: &Registry, lengths: &[u32]) -> Result<Vec<HeaderAssignment>> {
    debug_assert_eq!(registry.len(), lengths.len());

    let mut order: Vec<usize> = (0..lengths.len()).collect();
    // Stable: ties keep registry order
    order.sort_by_key(|&i| lengths[i]);

    let mut assignments = vec![
        HeaderAssignment {
            header_code: 0,
            header_len: 0,
        };
        lengths.len()
    ];

    let mut acc: i128 = -1;
    let mut cur_len = match order.first() {
        Some(&first) => lengths[first],
        None => return Ok(assignments),
    };

    for &index in &order {
        let header_len = lengths[index];
        if header_len < cur_len {
            acc >>= cur_len - header_len;
            cur_len = header_len;
        }
        acc += 1;

        let exhausted = || ConfigurationError::CodeSpaceExhausted {
            command: registry.commands()[index].name.clone(),
            header_len,
        };

        if acc >= 1i128 << cur_len {
            return Err(exhausted().into());
        }

        let header_code = reverse_bits(acc as u64, cur_len);
        if header_code == low_mask(header_len) {
            return Err(exhausted().into());
        }

        debug!(
            command = %registry.commands()[index].name,
            header_len,
            header_code,
            "allocated header"
        );
        assignments[index] = HeaderAssignment {
            header_code,
            header_len,
        };
    }

    verify_no_collisions(registry, &assignments)?;
    Ok(assignments)
}

/// Exhaustively check the header table.
///
/// For every pair `(a, b)` with `a.header_len <= b.header_len`, any raw value
/// passing `b`'s test has low `b.header_len` bits equal to `b.header_code`,
/// so it also passes `a`'s test iff the low `a.header_len` bits of
/// `b.header_code` equal `a.header_code`. Every pair is checked, not only
/// neighbours in some sort order. Each code is also checked to fit its
/// length and to differ from the reserved all-ones pattern.
pub fn verify_no_collisions(registry: &Registry, assignments: &[HeaderAssignment]) -> Result<()> {
    let names = registry.commands();

    for (i, assignment) in assignments.iter().enumerate() {
        let full = low_mask(assignment.header_len);
        if assignment.header_code & !full != 0 || assignment.header_code == full {
            return Err(ConfigurationError::CodeSpaceExhausted {
                command: names[i].name.clone(),
                header_len: assignment.header_len,
            }
            .into());
        }
    }

    for i in 0..assignments.len() {
        for j in (i + 1)..assignments.len() {
            let (a, b) = if assignments[i].header_len <= assignments[j].header_len {
                (&assignments[i], &assignments[j])
            } else {
                (&assignments[j], &assignments[i])
            };

            if a.matches(b.header_code) {
                return Err(ConfigurationError::HeaderCollision {
                    first: names[i].name.clone(),
                    second: names[j].name.clone(),
                }
                .into());
            }
        }
    }

    Ok(())
}
