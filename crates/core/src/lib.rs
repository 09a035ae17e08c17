//! flagcodec-core: compiler for fixed-budget variable-length command codecs
//!
//! Agents sharing a narrow broadcast channel can publish exactly one
//! fixed-width integer per turn. This library takes a closed set of command
//! kinds, each with its own payload fields, and derives a bit-exact packing
//! of (header, payload) into that integer, then emits encode/decode routines
//! for it.
//!
//! # Architecture
//!
//! Data flows strictly forward, one module per stage:
//! - `registry`: command names and field widths
//! - `layout`: header length per command from the bit budget
//! - `allocator`: canonical, truncation-decodable header codes plus an
//!   exhaustive pairwise collision check
//! - `mask`: one random per-build XOR mask
//! - `codec`: the immutable compiled `Codec` and its builder
//! - `emit`: Rust and Java source for the compiled codec
//! - `report`: human/script readable layout summary
//! - `bitio`: LSB-first field packing shared by all of the above
//!
//! # Design Principles
//!
//! - **Fail the build**: any budget overflow or header collision is an error
//!   before a codec exists; no inconsistent codec is ever emitted
//! - **No panics**: encode/decode failures are returned to the caller
//! - **Deterministic**: an explicit seed or mask reproduces a build exactly
//! - **Immutable**: a compiled codec is shared read-only, no locking

pub mod allocator;
pub mod bitio;
pub mod codec;
pub mod emit;
pub mod error;
pub mod layout;
pub mod mask;
pub mod registry;
pub mod report;

// Re-export commonly used types
pub use allocator::HeaderAssignment;
pub use codec::{Codec, CodecBuilder, Decoded};
pub use emit::{emit, Target};
pub use error::{ConfigurationError, Error, FieldRangeError, Result};
pub use layout::HeaderLayout;
pub use mask::MaskSource;
pub use registry::{CommandId, CommandSpec, Registry};
pub use report::LayoutReport;
