//! Source emission for compiled codecs.
//!
//! The emitted file is self-contained: the header table, the mask as a
//! literal, `encode` and `decode`. Every number in it comes from the `Codec`,
//! so emitting is a pure function of the compilation.
//!
//! # Targets
//!
//! - Rust: a closed `Message` enum with one variant per command, so every
//!   consumer of `decode` is forced to handle every kind.
//! - Java: a `Label` enum plus a `Message` carrying `int[]`/`long[]` fields,
//!   for runtimes that cannot link Rust.
//!
//! Both targets render the arithmetic in `codec.rs`:
//!
//! ```text
//! encode: ((field_i << (header_len + offset_i)) | ... | header_code) + 1) ^ MASK
//! decode: x = ((value ^ MASK) - 1) & WIDTH; test (x & HEADER_MASK) == code per class
//! ```

use crate::bitio::low_mask;
use crate::codec::Codec;
use crate::error::{ConfigurationError, Result};
use crate::registry::CommandSpec;
use std::fmt::Write;

/// Banner identifying the generator.
pub const GENERATOR: &str = concat!("flagcodec ", env!("CARGO_PKG_VERSION"));

/// Output language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Rust,
    Java { package: String, class: String },
}

impl Target {
    /// Short name for logs and errors.
    pub fn name(&self) -> &'static str {
        match self {
            Target::Rust => "rust",
            Target::Java { .. } => "java",
        }
    }
}

/// Render the codec as source for `target`.
///
/// # Errors
/// `ConfigurationError::UnsupportedTarget` if the target language has no
/// integer type wide enough, `ConfigurationError::InvalidName` if a name is
/// reserved in the target language.
pub fn emit(codec: &Codec, target: &Target) -> Result<String> {
    match target {
        Target::Rust => emit_rust(codec),
        Target::Java { package, class } => emit_java(codec, package, class),
    }
}

/// One non-header field as it sits in the raw value.
struct Slot {
    index: usize,
    shift: u32,
    width: u32,
}

fn slots(command: &CommandSpec, header_len: u32) -> Vec<Slot> {
    command
        .fields
        .iter()
        .zip(command.field_offsets())
        .enumerate()
        .map(|(index, (&width, offset))| Slot {
            index,
            shift: header_len + offset,
            width,
        })
        .collect()
}

/// Bits above `header_len + payload_bits` that must be zero, if any.
fn padding_start(codec: &Codec, command: &CommandSpec, header_len: u32) -> Option<u32> {
    let used = header_len + command.payload_bits();
    (used < codec.total_bits()).then_some(used)
}

fn rust_word(total_bits: u32) -> (&'static str, u32) {
    match total_bits {
        0..=8 => ("u8", 8),
        9..=16 => ("u16", 16),
        17..=32 => ("u32", 32),
        _ => ("u64", 64),
    }
}

const RUST_ERROR: &str = r#"/// Errors returned by `encode` and `decode`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodecError {
    /// A field value does not fit its declared width.
    FieldRange { field: usize, value: WORD, width: u32 },
    /// The value matches no header of this build.
    DecodeMismatch(WORD),
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

"#;

const RUST_CHECK: &str = r#"#[inline]
fn check(field: usize, value: WORD, width: u32) -> Result<(), CodecError> {
    if width < WORD::BITS && value >> width != 0 {
        return Err(CodecError::FieldRange { field, value, width });
    }
    Ok(())
}

"#;

fn emit_rust(codec: &Codec) -> Result<String> {
    let total_bits = codec.total_bits();
    let (word, word_bits) = rust_word(total_bits);
    let commands = codec.registry().commands();
    let headers = codec.headers();
    let mut out = String::new();

    writeln!(out, "// @generated by {GENERATOR}. Do not edit.")?;
    writeln!(out, "//")?;
    writeln!(
        out,
        "// {total_bits}-bit flag codec, {} commands, {} headers.",
        commands.len(),
        codec.layout().as_str()
    )?;
    writeln!(out, "// Values produced by a different build will not decode.")?;
    writeln!(out)?;
    writeln!(out, "/// Width of every encoded value in bits.")?;
    writeln!(out, "pub const TOTAL_BITS: u32 = {total_bits};")?;
    writeln!(out)?;
    writeln!(out, "/// Per-build mask XORed into every value. It hides the layout from")?;
    writeln!(out, "/// observers comparing values across builds; it is not encryption.")?;
    writeln!(out, "pub const MASK: {word} = {:#x};", codec.mask())?;
    writeln!(out)?;
    writeln!(out, "/// Reserved value meaning \"no message\". `encode` never returns it.")?;
    writeln!(out, "pub const NO_MESSAGE: {word} = MASK;")?;
    writeln!(out)?;
    writeln!(out, "/// Identifies the build this file was generated by.")?;
    writeln!(out, "pub const FINGERPRINT: u32 = {:#010x};", codec.fingerprint())?;
    writeln!(out)?;
    writeln!(out, "/// `(command, header code, header length)` for every command.")?;
    writeln!(out, "pub const HEADERS: [(&str, {word}, u32); {}] = [", commands.len())?;
    for (command, header) in commands.iter().zip(headers) {
        writeln!(
            out,
            "    ({:?}, {:#x}, {}),",
            command.name, header.header_code, header.header_len
        )?;
    }
    writeln!(out, "];")?;
    writeln!(out)?;

    writeln!(out, "#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]")?;
    writeln!(out, "pub enum Message {{")?;
    for command in commands {
        if command.fields.is_empty() {
            writeln!(out, "    /// `{}`", command.name)?;
            writeln!(out, "    {},", command.variant_name())?;
        } else {
            let widths: Vec<String> = command.fields.iter().map(u32::to_string).collect();
            let types: Vec<&str> = command.fields.iter().map(|_| word).collect();
            writeln!(out, "    /// `{}`: {} bits", command.name, widths.join(", "))?;
            writeln!(out, "    {}({}),", command.variant_name(), types.join(", "))?;
        }
    }
    writeln!(out, "}}")?;
    writeln!(out)?;

    out.push_str(&RUST_ERROR.replace("WORD", word));
    if commands.iter().any(|c| !c.fields.is_empty()) {
        out.push_str(&RUST_CHECK.replace("WORD", word));
    }

    writeln!(out, "/// Encode a message into a flag value.")?;
    writeln!(out, "pub fn encode(message: &Message) -> Result<{word}, CodecError> {{")?;
    writeln!(out, "    let raw: {word} = match *message {{")?;
    for (command, header) in commands.iter().zip(headers) {
        let variant = command.variant_name();
        let slots = slots(command, header.header_len);

        let mut terms: Vec<String> = slots
            .iter()
            .filter(|slot| slot.width > 0)
            .map(|slot| format!("(f{} << {})", slot.index, slot.shift))
            .collect();
        if header.header_code != 0 || terms.is_empty() {
            terms.push(format!("{:#x}", header.header_code));
        }
        let expr = terms.join(" | ");

        if slots.is_empty() {
            writeln!(out, "        Message::{variant} => {expr},")?;
            continue;
        }

        let bindings: Vec<String> = slots.iter().map(|slot| format!("f{}", slot.index)).collect();
        writeln!(out, "        Message::{variant}({}) => {{", bindings.join(", "))?;
        for slot in &slots {
            writeln!(out, "            check({0}, f{0}, {1})?;", slot.index, slot.width)?;
        }
        writeln!(out, "            {expr}")?;
        writeln!(out, "        }}")?;
    }
    writeln!(out, "    }};")?;
    writeln!(out, "    Ok((raw + 1) ^ MASK)")?;
    writeln!(out, "}}")?;
    writeln!(out)?;

    writeln!(out, "/// Decode a flag value. Callers filter out `NO_MESSAGE` first.")?;
    writeln!(out, "pub fn decode(value: {word}) -> Result<Message, CodecError> {{")?;
    if total_bits < word_bits {
        writeln!(out, "    if value >> TOTAL_BITS != 0 {{")?;
        writeln!(out, "        return Err(CodecError::DecodeMismatch(value));")?;
        writeln!(out, "    }}")?;
        writeln!(
            out,
            "    let x = (value ^ MASK).wrapping_sub(1) & {:#x};",
            low_mask(total_bits)
        )?;
    } else {
        writeln!(out, "    let x = (value ^ MASK).wrapping_sub(1);")?;
    }
    for (header_len, ids) in codec.header_classes() {
        writeln!(out, "    // {header_len}-bit headers")?;
        for id in ids {
            let command = &commands[id.0];
            let header = headers[id.0];
            writeln!(
                out,
                "    if (x & {:#x}) == {:#x} {{",
                low_mask(header_len),
                header.header_code
            )?;
            if let Some(used) = padding_start(codec, command, header_len) {
                writeln!(out, "        if x >> {used} != 0 {{")?;
                writeln!(out, "            return Err(CodecError::DecodeMismatch(value));")?;
                writeln!(out, "        }}")?;
            }
            let fields: Vec<String> = slots(command, header_len)
                .iter()
                .map(|slot| {
                    if slot.width == 0 {
                        "0".to_string()
                    } else {
                        format!("(x >> {}) & {:#x}", slot.shift, low_mask(slot.width))
                    }
                })
                .collect();
            if fields.is_empty() {
                writeln!(out, "        return Ok(Message::{});", command.variant_name())?;
            } else {
                writeln!(
                    out,
                    "        return Ok(Message::{}({}));",
                    command.variant_name(),
                    fields.join(", ")
                )?;
            }
            writeln!(out, "    }}")?;
        }
    }
    writeln!(out, "    Err(CodecError::DecodeMismatch(value))")?;
    writeln!(out, "}}")?;

    Ok(out)
}

const JAVA_RESERVED: &[&str] = &[
    "abstract", "assert", "boolean", "break", "byte", "case", "catch", "char", "class", "const",
    "continue", "default", "do", "double", "else", "enum", "extends", "false", "final",
    "finally", "float", "for", "goto", "if", "implements", "import", "instanceof", "int",
    "interface", "long", "native", "new", "null", "package", "private", "protected", "public",
    "return", "short", "static", "strictfp", "super", "switch", "synchronized", "this", "throw",
    "throws", "transient", "true", "try", "void", "volatile", "while", "_",
];

fn java_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    let head_ok = matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$');
    head_ok
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
        && !JAVA_RESERVED.contains(&name)
}

struct JavaWord {
    ty: &'static str,
    bits: u32,
    suffix: &'static str,
}

impl JavaWord {
    fn lit(&self, value: u64) -> String {
        format!("{value:#x}{}", self.suffix)
    }
}

fn emit_java(codec: &Codec, package: &str, class: &str) -> Result<String> {
    let total_bits = codec.total_bits();
    let word = match total_bits {
        0..=31 => JavaWord { ty: "int", bits: 32, suffix: "" },
        32..=63 => JavaWord { ty: "long", bits: 64, suffix: "L" },
        _ => {
            return Err(ConfigurationError::UnsupportedTarget {
                target: "java",
                total_bits,
            }
            .into())
        }
    };

    if !java_identifier(class) {
        return Err(ConfigurationError::InvalidName(class.to_string()).into());
    }
    if !package.is_empty() && !package.split('.').all(java_identifier) {
        return Err(ConfigurationError::InvalidName(package.to_string()).into());
    }

    let commands = codec.registry().commands();
    if let Some(command) = commands.iter().find(|c| !java_identifier(&c.name)) {
        return Err(ConfigurationError::InvalidName(command.name.clone()).into());
    }

    let headers = codec.headers();
    let ty = word.ty;
    let mut out = String::new();

    writeln!(out, "// @generated by {GENERATOR}. Do not edit.")?;
    if !package.is_empty() {
        writeln!(out, "package {package};")?;
    }
    writeln!(out)?;
    writeln!(out, "/**")?;
    writeln!(
        out,
        " * {total_bits}-bit flag codec, {} commands, {} headers.",
        commands.len(),
        codec.layout().as_str()
    )?;
    writeln!(out, " * Values produced by a different build will not decode.")?;
    writeln!(out, " */")?;
    writeln!(out, "public final class {class} {{")?;
    writeln!(out, "    public static final int TOTAL_BITS = {total_bits};")?;
    writeln!(out, "    /** Per-build mask. Hides the layout across builds; not encryption. */")?;
    writeln!(out, "    public static final {ty} MASK = {};", word.lit(codec.mask()))?;
    writeln!(out, "    /** Reserved \"no message\" value; encode never returns it. */")?;
    writeln!(out, "    public static final {ty} NO_MESSAGE = MASK;")?;
    writeln!(out, "    public static final int FINGERPRINT = {:#010x};", codec.fingerprint())?;
    writeln!(out)?;
    writeln!(out, "    public enum Label {{")?;
    let labels: Vec<&str> = commands.iter().map(|c| c.name.as_str()).collect();
    writeln!(out, "        {}", labels.join(", "))?;
    writeln!(out, "    }}")?;
    writeln!(out)?;
    writeln!(out, "    public static final class Message {{")?;
    writeln!(out, "        public final Label label;")?;
    writeln!(out, "        public final {ty}[] data;")?;
    writeln!(out)?;
    writeln!(out, "        public Message(Label label, {ty}... data) {{")?;
    writeln!(out, "            this.label = label;")?;
    writeln!(out, "            this.data = data;")?;
    writeln!(out, "        }}")?;
    writeln!(out, "    }}")?;
    writeln!(out)?;

    writeln!(out, "    public static {ty} encode(Message message) {{")?;
    writeln!(out, "        {ty}[] data = message.data;")?;
    writeln!(out, "        switch (message.label) {{")?;
    for (command, header) in commands.iter().zip(headers) {
        let slots = slots(command, header.header_len);
        writeln!(out, "            case {}: {{", command.name)?;
        writeln!(out, "                arity(data, {});", slots.len())?;
        for slot in &slots {
            writeln!(out, "                field(data, {}, {});", slot.index, slot.width)?;
        }
        let mut terms: Vec<String> = slots
            .iter()
            .filter(|slot| slot.width > 0)
            .map(|slot| format!("(data[{}] << {})", slot.index, slot.shift))
            .collect();
        if header.header_code != 0 || terms.is_empty() {
            terms.push(word.lit(header.header_code));
        }
        writeln!(out, "                return MASK ^ (1 + ({}));", terms.join(" | "))?;
        writeln!(out, "            }}")?;
    }
    writeln!(out, "        }}")?;
    writeln!(out, "        throw new IllegalArgumentException(\"unknown label \" + message.label);")?;
    writeln!(out, "    }}")?;
    writeln!(out)?;

    writeln!(out, "    public static Message decode({ty} flag) {{")?;
    writeln!(out, "        if ((flag >>> TOTAL_BITS) != 0) {{")?;
    writeln!(out, "            throw mismatch(flag);")?;
    writeln!(out, "        }}")?;
    writeln!(
        out,
        "        {ty} x = ((flag ^ MASK) - 1) & {};",
        word.lit(low_mask(total_bits))
    )?;
    for (header_len, ids) in codec.header_classes() {
        writeln!(out, "        // {header_len}-bit headers")?;
        for id in ids {
            let command = &commands[id.0];
            let header = headers[id.0];
            writeln!(
                out,
                "        if ((x & {}) == {}) {{",
                word.lit(low_mask(header_len)),
                word.lit(header.header_code)
            )?;
            if let Some(used) = padding_start(codec, command, header_len) {
                writeln!(out, "            if ((x >>> {used}) != 0) {{")?;
                writeln!(out, "                throw mismatch(flag);")?;
                writeln!(out, "            }}")?;
            }
            let mut args = vec![format!("Label.{}", command.name)];
            args.extend(slots(command, header_len).iter().map(|slot| {
                if slot.width == 0 {
                    word.lit(0)
                } else {
                    format!("(x >>> {}) & {}", slot.shift, word.lit(low_mask(slot.width)))
                }
            }));
            writeln!(out, "            return new Message({});", args.join(", "))?;
            writeln!(out, "        }}")?;
        }
    }
    writeln!(out, "        throw mismatch(flag);")?;
    writeln!(out, "    }}")?;
    writeln!(out)?;

    writeln!(out, "    private static void arity({ty}[] data, int expected) {{")?;
    writeln!(out, "        if (data.length != expected) {{")?;
    writeln!(
        out,
        "            throw new IllegalArgumentException(\"expected \" + expected + \" fields, got \" + data.length);"
    )?;
    writeln!(out, "        }}")?;
    writeln!(out, "    }}")?;
    writeln!(out)?;
    writeln!(out, "    private static void field({ty}[] data, int index, int width) {{")?;
    writeln!(out, "        {ty} value = data[index];")?;
    writeln!(
        out,
        "        if (value < 0 || (width < {} && (value >>> width) != 0)) {{",
        word.bits
    )?;
    writeln!(
        out,
        "            throw new IllegalArgumentException(\"field \" + index + \": value \" + value + \" does not fit in \" + width + \" bits\");"
    )?;
    writeln!(out, "        }}")?;
    writeln!(out, "    }}")?;
    writeln!(out)?;
    writeln!(out, "    private static IllegalArgumentException mismatch({ty} flag) {{")?;
    writeln!(
        out,
        "        return new IllegalArgumentException(\"flag \" + flag + \" matches no header\");"
    )?;
    writeln!(out, "    }}")?;
    writeln!(out, "}}")?;

    Ok(out)
}
