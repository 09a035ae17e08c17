// @generated by flagcodec 0.1.0. Do not edit.
//
// 8-bit flag codec, 2 commands, per-command headers.
// Values produced by a different build will not decode.

/// Width of every encoded value in bits.
pub const TOTAL_BITS: u32 = 8;

/// Per-build mask XORed into every value. It hides the layout from
/// observers comparing values across builds; it is not encryption.
pub const MASK: u8 = 0x5a;

/// Reserved value meaning "no message". `encode` never returns it.
pub const NO_MESSAGE: u8 = MASK;

/// Identifies the build this file was generated by.
pub const FINGERPRINT: u32 = 0x74571000;

/// `(command, header code, header length)` for every command.
pub const HEADERS: [(&str, u8, u32); 2] = [
    ("A", 0x0, 5),
    ("B", 0x10, 8),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Message {
    /// `A`: 3 bits
    A(u8),
    /// `B`
    B,
}

/// Errors returned by `encode` and `decode`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodecError {
    /// A field value does not fit its declared width.
    FieldRange { field: usize, value: u8, width: u32 },
    /// The value matches no header of this build.
    DecodeMismatch(u8),
}

impl core::fmt::Display for CodecError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            CodecError::FieldRange { field, value, width } => {
                write!(f, "field {field}: value {value} does not fit in {width} bits")
            }
            CodecError::DecodeMismatch(value) => write!(f, "value {value:#x} matches no header"),
        }
    }
}

impl std::error::Error for CodecError {}

#[inline]
fn check(field: usize, value: u8, width: u32) -> Result<(), CodecError> {
    if width < u8::BITS && value >> width != 0 {
        return Err(CodecError::FieldRange { field, value, width });
    }
    Ok(())
}

/// Encode a message into a flag value.
pub fn encode(message: &Message) -> Result<u8, CodecError> {
    let raw: u8 = match *message {
        Message::A(f0) => {
            check(0, f0, 3)?;
            (f0 << 5)
        }
        Message::B => 0x10,
    };
    Ok((raw + 1) ^ MASK)
}

/// Decode a flag value. Callers filter out `NO_MESSAGE` first.
pub fn decode(value: u8) -> Result<Message, CodecError> {
    let x = (value ^ MASK).wrapping_sub(1);
    // 5-bit headers
    if (x & 0x1f) == 0x0 {
        return Ok(Message::A((x >> 5) & 0x7));
    }
    // 8-bit headers
    if (x & 0xff) == 0x10 {
        return Ok(Message::B);
    }
    Err(CodecError::DecodeMismatch(value))
}
