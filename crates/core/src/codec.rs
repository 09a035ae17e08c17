//! The compiled codec.
//!
//! A `Codec` is the immutable result of running the whole pipeline:
//!
//! ```text
//! Registry -> header lengths -> canonical headers -> mask -> Codec
//! ```
//!
//! Once built it never changes, so it can be shared by reference across any
//! number of threads. `encode` and `decode` here execute exactly the
//! arithmetic the emitters render into source, which makes the codec usable
//! in-process and lets the layout be tested without compiling generated code.
//!
//! # Wire format
//!
//! ```text
//! payload = Σ field[i] << offset_i           (offset_i = Σ width_0..i)
//! raw     = payload << header_len | header_code
//! value   = (raw + 1) ^ mask
//! ```
//!
//! `raw` is never all ones (see `allocator`), so `value == mask` is reserved
//! to mean "no message".

use crate::allocator::{allocate_headers, HeaderAssignment};
use crate::bitio::{low_mask, PayloadReader, PayloadWriter};
use crate::error::{BitIoError, Error, FieldRangeError, Result};
use crate::layout::{assign_header_lengths, HeaderLayout};
use crate::mask::{draw_mask, MaskSource};
use crate::registry::{CommandId, CommandSpec, Registry};
use tracing::info;

/// A decoded message: which command and its field values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoded {
    pub command: CommandId,
    pub fields: Vec<u64>,
}

/// Builder for a `Codec`.
///
/// ```
/// use flagcodec_core::{CodecBuilder, MaskSource};
///
/// let codec = CodecBuilder::new(8)
///     .command("A", &[3])
///     .command("B", &[])
///     .mask(MaskSource::Seed(7))
///     .build()
///     .unwrap();
///
/// let value = codec.encode_named("A", &[5]).unwrap();
/// let decoded = codec.decode(value).unwrap();
/// assert_eq!(codec.command(decoded.command).unwrap().name, "A");
/// assert_eq!(decoded.fields, vec![5]);
/// ```
#[derive(Debug, Clone)]
pub struct CodecBuilder {
    total_bits: u32,
    commands: Vec<CommandSpec>,
    layout: HeaderLayout,
    mask: MaskSource,
}

impl CodecBuilder {
    /// Start a builder for `total_bits`-wide values.
    pub fn new(total_bits: u32) -> Self {
        Self {
            total_bits,
            commands: Vec::new(),
            layout: HeaderLayout::default(),
            mask: MaskSource::default(),
        }
    }

    /// Append one command.
    pub fn command(mut self, name: impl Into<String>, fields: &[u32]) -> Self {
        self.commands.push(CommandSpec::new(name, fields.to_vec()));
        self
    }

    /// Append several commands.
    pub fn commands(mut self, commands: impl IntoIterator<Item = CommandSpec>) -> Self {
        self.commands.extend(commands);
        self
    }

    /// Choose the header layout.
    pub fn layout(mut self, layout: HeaderLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Choose where the mask comes from.
    pub fn mask(mut self, mask: MaskSource) -> Self {
        self.mask = mask;
        self
    }

    /// Run the pipeline.
    ///
    /// Any configuration error aborts before a codec exists.
    pub fn build(self) -> Result<Codec> {
        let registry = Registry::new(self.total_bits, self.commands)?;
        let lengths = assign_header_lengths(&registry, self.layout)?;
        let headers = allocate_headers(&registry, &lengths)?;
        let mask = draw_mask(self.mask, registry.total_bits())?;
        Ok(Codec::assemble(registry, self.layout, headers, mask))
    }
}

/// An immutable compiled codec.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Codec {
    registry: Registry,
    layout: HeaderLayout,
    headers: Vec<HeaderAssignment>,
    mask: u64,
    decode_order: Vec<CommandId>,
    fingerprint: u32,
}

impl Codec {
    fn assemble(
        registry: Registry,
        layout: HeaderLayout,
        headers: Vec<HeaderAssignment>,
        mask: u64,
    ) -> Self {
        let mut decode_order: Vec<CommandId> = registry.iter().map(|(id, _)| id).collect();
        decode_order.sort_by_key(|id| headers[id.0].header_len);

        let fingerprint = fingerprint(&registry, layout, &headers, mask);
        info!(
            commands = registry.len(),
            total_bits = registry.total_bits(),
            layout = layout.as_str(),
            fingerprint = %format!("{fingerprint:08x}"),
            "compiled codec"
        );

        Self {
            registry,
            layout,
            headers,
            mask,
            decode_order,
            fingerprint,
        }
    }

    /// Width of every encoded value.
    pub fn total_bits(&self) -> u32 {
        self.registry.total_bits()
    }

    /// The mask XORed into every value.
    pub fn mask(&self) -> u64 {
        self.mask
    }

    /// The reserved "no message" value. Never returned by `encode`.
    pub fn sentinel(&self) -> u64 {
        self.mask
    }

    /// True if `value` is the reserved "no message" value.
    pub fn is_sentinel(&self, value: u64) -> bool {
        value == self.mask
    }

    /// Header layout the codec was built with.
    pub fn layout(&self) -> HeaderLayout {
        self.layout
    }

    /// The validated registry.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Command by id, `None` if `id` did not come from this codec.
    pub fn command(&self, id: CommandId) -> Option<&CommandSpec> {
        self.registry.command(id)
    }

    /// Header assignments in registry order.
    pub fn headers(&self) -> &[HeaderAssignment] {
        &self.headers
    }

    /// Header assignment of one command.
    pub fn header(&self, id: CommandId) -> Option<&HeaderAssignment> {
        self.headers.get(id.0)
    }

    /// Commands grouped by header length, shortest class first.
    pub fn header_classes(&self) -> Vec<(u32, Vec<CommandId>)> {
        let mut classes: Vec<(u32, Vec<CommandId>)> = Vec::new();
        for &id in &self.decode_order {
            let header_len = self.headers[id.0].header_len;
            match classes.last_mut() {
                Some((len, ids)) if *len == header_len => ids.push(id),
                _ => classes.push((header_len, vec![id])),
            }
        }
        classes
    }

    /// CRC-32 identifying this exact compilation, mask included.
    pub fn fingerprint(&self) -> u32 {
        self.fingerprint
    }

    /// Encode a command looked up by name.
    pub fn encode_named(&self, name: &str, fields: &[u64]) -> Result<u64> {
        let id = self
            .registry
            .find(name)
            .ok_or_else(|| Error::UnknownCommand(name.to_string()))?;
        self.encode(id, fields)
    }

    /// Encode one message.
    ///
    /// # Errors
    /// - `Error::UnknownCommand` if `id` is not in this codec
    /// - `FieldRangeError::WrongArity` if `fields` has the wrong length
    /// - `FieldRangeError::OutOfRange` if a value does not fit its width;
    ///   values are never clamped or truncated
    pub fn encode(&self, id: CommandId, fields: &[u64]) -> Result<u64> {
        let command = self
            .registry
            .command(id)
            .ok_or_else(|| Error::UnknownCommand(format!("#{}", id.0)))?;
        let header = self.headers[id.0];

        if fields.len() != command.fields.len() {
            return Err(FieldRangeError::WrongArity {
                command: command.name.clone(),
                expected: command.fields.len(),
                actual: fields.len(),
            }
            .into());
        }

        let mut writer = PayloadWriter::new();
        for (field, (&width, &value)) in command.fields.iter().zip(fields).enumerate() {
            writer.write_bits(value, width).map_err(|err| match err {
                Error::BitIo(BitIoError::ValueTooWide { .. }) => FieldRangeError::OutOfRange {
                    command: command.name.clone(),
                    field,
                    value,
                    width,
                }
                .into(),
                other => other,
            })?;
        }
        let payload = writer.finish();

        // payload is zero whenever header_len reaches 64
        let raw = payload.checked_shl(header.header_len).unwrap_or(0) | header.header_code;
        Ok((raw + 1) ^ self.mask)
    }

    /// Decode one value.
    ///
    /// The caller is expected to have filtered out the sentinel already; if
    /// it is passed anyway it fails like any other unmatched value.
    ///
    /// # Errors
    /// `Error::DecodeMismatch` if the value has bits above the budget, matches
    /// no header, or leaves unused bits non-zero. This means corruption or a
    /// codec built from a different compilation, never a valid message.
    pub fn decode(&self, value: u64) -> Result<Decoded> {
        let width = low_mask(self.total_bits());
        if value & !width != 0 {
            return Err(Error::DecodeMismatch { value });
        }

        let x = (value ^ self.mask).wrapping_sub(1) & width;

        for &id in &self.decode_order {
            let header = &self.headers[id.0];
            if !header.matches(x) {
                continue;
            }

            let mut reader = PayloadReader::new(x);
            reader.skip_bits(header.header_len)?;
            let fields = self.registry.commands()[id.0]
                .fields
                .iter()
                .map(|&width| reader.read_bits(width))
                .collect::<Result<Vec<u64>>>()?;

            if reader.remainder() != 0 {
                return Err(Error::DecodeMismatch { value });
            }

            return Ok(Decoded { command: id, fields });
        }

        Err(Error::DecodeMismatch { value })
    }
}

fn fingerprint(
    registry: &Registry,
    layout: HeaderLayout,
    headers: &[HeaderAssignment],
    mask: u64,
) -> u32 {
    let mut hasher = crc32fast::Hasher::new();

    hasher.update(&registry.total_bits().to_le_bytes());
    hasher.update(layout.as_str().as_bytes());
    hasher.update(&mask.to_le_bytes());

    for (command, header) in registry.commands().iter().zip(headers) {
        hasher.update(command.name.as_bytes());
        hasher.update(&[0]);
        hasher.update(&(command.fields.len() as u32).to_le_bytes());
        for width in &command.fields {
            hasher.update(&width.to_le_bytes());
        }
        hasher.update(&header.header_code.to_le_bytes());
        hasher.update(&header.header_len.to_le_bytes());
    }

    hasher.finalize()
}
