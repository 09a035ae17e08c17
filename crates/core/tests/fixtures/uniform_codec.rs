// @generated by flagcodec 0.1.0. Do not edit.
//
// 12-bit flag codec, 4 commands, uniform headers.
// Values produced by a different build will not decode.

/// Width of every encoded value in bits.
pub const TOTAL_BITS: u32 = 12;

/// Per-build mask XORed into every value. It hides the layout from
/// observers comparing values across builds; it is not encryption.
pub const MASK: u16 = 0x9e5;

/// Reserved value meaning "no message". `encode` never returns it.
pub const NO_MESSAGE: u16 = MASK;

/// Identifies the build this file was generated by.
pub const FINGERPRINT: u32 = 0x56cd4761;

/// `(command, header code, header length)` for every command.
pub const HEADERS: [(&str, u16, u32); 4] = [
    ("MOVE", 0x0, 6),
    ("ATTACK", 0x20, 6),
    ("WAIT", 0x10, 6),
    ("BUILD", 0x30, 6),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Message {
    /// `MOVE`: 3, 3 bits
    Move(u16, u16),
    /// `ATTACK`: 4 bits
    Attack(u16),
    /// `WAIT`
    Wait,
    /// `BUILD`: 2, 2, 2 bits
    Build(u16, u16, u16),
}

/// Errors returned by `encode` and `decode`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodecError {
    /// A field value does not fit its declared width.
    FieldRange { field: usize, value: u16, width: u32 },
    /// The value matches no header of this build.
    DecodeMismatch(u16),
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
fn check(field: usize, value: u16, width: u32) -> Result<(), CodecError> {
    if width < u16::BITS && value >> width != 0 {
        return Err(CodecError::FieldRange { field, value, width });
    }
    Ok(())
}

/// Encode a message into a flag value.
pub fn encode(message: &Message) -> Result<u16, CodecError> {
    let raw: u16 = match *message {
        Message::Move(f0, f1) => {
            check(0, f0, 3)?;
            check(1, f1, 3)?;
            (f0 << 6) | (f1 << 9)
        }
        Message::Attack(f0) => {
            check(0, f0, 4)?;
            (f0 << 6) | 0x20
        }
        Message::Wait => 0x10,
        Message::Build(f0, f1, f2) => {
            check(0, f0, 2)?;
            check(1, f1, 2)?;
            check(2, f2, 2)?;
            (f0 << 6) | (f1 << 8) | (f2 << 10) | 0x30
        }
    };
    Ok((raw + 1) ^ MASK)
}

/// Decode a flag value. Callers filter out `NO_MESSAGE` first.
pub fn decode(value: u16) -> Result<Message, CodecError> {
    if value >> TOTAL_BITS != 0 {
        return Err(CodecError::DecodeMismatch(value));
    }
    let x = (value ^ MASK).wrapping_sub(1) & 0xfff;
    // 6-bit headers
    if (x & 0x3f) == 0x0 {
        return Ok(Message::Move((x >> 6) & 0x7, (x >> 9) & 0x7));
    }
    if (x & 0x3f) == 0x20 {
        if x >> 10 != 0 {
            return Err(CodecError::DecodeMismatch(value));
        }
        return Ok(Message::Attack((x >> 6) & 0xf));
    }
    if (x & 0x3f) == 0x10 {
        if x >> 6 != 0 {
            return Err(CodecError::DecodeMismatch(value));
        }
        return Ok(Message::Wait);
    }
    if (x & 0x3f) == 0x30 {
        return Ok(Message::Build((x >> 6) & 0x3, (x >> 8) & 0x3, (x >> 10) & 0x3));
    }
    Err(CodecError::DecodeMismatch(value))
}
