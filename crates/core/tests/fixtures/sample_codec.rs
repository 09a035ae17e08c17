// @generated by flagcodec 0.1.0. Do not edit.
//
// 24-bit flag codec, 12 commands, per-command headers.
// Values produced by a different build will not decode.

/// Width of every encoded value in bits.
pub const TOTAL_BITS: u32 = 24;

/// Per-build mask XORed into every value. It hides the layout from
/// observers comparing values across builds; it is not encryption.
pub const MASK: u32 = 0x3c5a96;

/// Reserved value meaning "no message". `encode` never returns it.
pub const NO_MESSAGE: u32 = MASK;

/// Identifies the build this file was generated by.
pub const FINGERPRINT: u32 = 0x98d9a105;

/// `(command, header code, header length)` for every command.
pub const HEADERS: [(&str, u32, u32); 12] = [
    ("SCOUT", 0x28, 21),
    ("EXPLORE", 0x4, 24),
    ("SAFE_DIR_EDGE", 0x8, 12),
    ("FLEE", 0x24, 24),
    ("DEFEND", 0x18, 21),
    ("ENEMY_EC", 0x0, 6),
    ("NEUTRAL_EC", 0x20, 6),
    ("EXPLODE", 0x14, 24),
    ("ATTACK_LOC", 0x10, 10),
    ("HIDE", 0x38, 21),
    ("CAPTURE_NEUTRAL_EC", 0x30, 10),
    ("STOP_PRODUCING_MUCKRAKERS", 0x34, 24),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Message {
    /// `SCOUT`: 3 bits
    Scout(u32),
    /// `EXPLORE`
    Explore,
    /// `SAFE_DIR_EDGE`: 3, 3, 6 bits
    SafeDirEdge(u32, u32, u32),
    /// `FLEE`
    Flee,
    /// `DEFEND`: 3 bits
    Defend(u32),
    /// `ENEMY_EC`: 7, 7, 4 bits
    EnemyEc(u32, u32, u32),
    /// `NEUTRAL_EC`: 7, 7, 4 bits
    NeutralEc(u32, u32, u32),
    /// `EXPLODE`
    Explode,
    /// `ATTACK_LOC`: 7, 7 bits
    AttackLoc(u32, u32),
    /// `HIDE`: 3 bits
    Hide(u32),
    /// `CAPTURE_NEUTRAL_EC`: 7, 7 bits
    CaptureNeutralEc(u32, u32),
    /// `STOP_PRODUCING_MUCKRAKERS`
    StopProducingMuckrakers,
}

/// Errors returned by `encode` and `decode`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodecError {
    /// A field value does not fit its declared width.
    FieldRange { field: usize, value: u32, width: u32 },
    /// The value matches no header of this build.
    DecodeMismatch(u32),
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
fn check(field: usize, value: u32, width: u32) -> Result<(), CodecError> {
    if width < u32::BITS && value >> width != 0 {
        return Err(CodecError::FieldRange { field, value, width });
    }
    Ok(())
}

/// Encode a message into a flag value.
pub fn encode(message: &Message) -> Result<u32, CodecError> {
    let raw: u32 = match *message {
        Message::Scout(f0) => {
            check(0, f0, 3)?;
            (f0 << 21) | 0x28
        }
        Message::Explore => 0x4,
        Message::SafeDirEdge(f0, f1, f2) => {
            check(0, f0, 3)?;
            check(1, f1, 3)?;
            check(2, f2, 6)?;
            (f0 << 12) | (f1 << 15) | (f2 << 18) | 0x8
        }
        Message::Flee => 0x24,
        Message::Defend(f0) => {
            check(0, f0, 3)?;
            (f0 << 21) | 0x18
        }
        Message::EnemyEc(f0, f1, f2) => {
            check(0, f0, 7)?;
            check(1, f1, 7)?;
            check(2, f2, 4)?;
            (f0 << 6) | (f1 << 13) | (f2 << 20)
        }
        Message::NeutralEc(f0, f1, f2) => {
            check(0, f0, 7)?;
            check(1, f1, 7)?;
            check(2, f2, 4)?;
            (f0 << 6) | (f1 << 13) | (f2 << 20) | 0x20
        }
        Message::Explode => 0x14,
        Message::AttackLoc(f0, f1) => {
            check(0, f0, 7)?;
            check(1, f1, 7)?;
            (f0 << 10) | (f1 << 17) | 0x10
        }
        Message::Hide(f0) => {
            check(0, f0, 3)?;
            (f0 << 21) | 0x38
        }
        Message::CaptureNeutralEc(f0, f1) => {
            check(0, f0, 7)?;
            check(1, f1, 7)?;
            (f0 << 10) | (f1 << 17) | 0x30
        }
        Message::StopProducingMuckrakers => 0x34,
    };
    Ok((raw + 1) ^ MASK)
}

/// Decode a flag value. Callers filter out `NO_MESSAGE` first.
pub fn decode(value: u32) -> Result<Message, CodecError> {
    if value >> TOTAL_BITS != 0 {
        return Err(CodecError::DecodeMismatch(value));
    }
    let x = (value ^ MASK).wrapping_sub(1) & 0xffffff;
    // 6-bit headers
    if (x & 0x3f) == 0x0 {
        return Ok(Message::EnemyEc((x >> 6) & 0x7f, (x >> 13) & 0x7f, (x >> 20) & 0xf));
    }
    if (x & 0x3f) == 0x20 {
        return Ok(Message::NeutralEc((x >> 6) & 0x7f, (x >> 13) & 0x7f, (x >> 20) & 0xf));
    }
    // 10-bit headers
    if (x & 0x3ff) == 0x10 {
        return Ok(Message::AttackLoc((x >> 10) & 0x7f, (x >> 17) & 0x7f));
    }
    if (x & 0x3ff) == 0x30 {
        return Ok(Message::CaptureNeutralEc((x >> 10) & 0x7f, (x >> 17) & 0x7f));
    }
    // 12-bit headers
    if (x & 0xfff) == 0x8 {
        return Ok(Message::SafeDirEdge((x >> 12) & 0x7, (x >> 15) & 0x7, (x >> 18) & 0x3f));
    }
    // 21-bit headers
    if (x & 0x1fffff) == 0x28 {
        return Ok(Message::Scout((x >> 21) & 0x7));
    }
    if (x & 0x1fffff) == 0x18 {
        return Ok(Message::Defend((x >> 21) & 0x7));
    }
    if (x & 0x1fffff) == 0x38 {
        return Ok(Message::Hide((x >> 21) & 0x7));
    }
    // 24-bit headers
    if (x & 0xffffff) == 0x4 {
        return Ok(Message::Explore);
    }
    if (x & 0xffffff) == 0x24 {
        return Ok(Message::Flee);
    }
    if (x & 0xffffff) == 0x14 {
        return Ok(Message::Explode);
    }
    if (x & 0xffffff) == 0x34 {
        return Ok(Message::StopProducingMuckrakers);
    }
    Err(CodecError::DecodeMismatch(value))
}
