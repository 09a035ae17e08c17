//! Command registry: the closed set of command kinds a codec can carry.
//!
//! Each command has a name and an ordered list of field widths in bits. The
//! registry order is the order commands appear in emitted enums; it does not
//! affect header allocation.

use crate::error::{ConfigurationError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Index of a command within its registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CommandId(pub usize);

/// One command kind and the widths of its payload fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandSpec {
    /// Unique identifier-like name
    pub name: String,

    /// Field widths in bits, in declaration order
    #[serde(default)]
    pub fields: Vec<u32>,
}

impl CommandSpec {
    /// Create a command spec.
    pub fn new(name: impl Into<String>, fields: impl Into<Vec<u32>>) -> Self {
        Self {
            name: name.into(),
            fields: fields.into(),
        }
    }

    /// Sum of all field widths.
    ///
    /// Saturates rather than wrapping so an absurd registry still fails the
    /// budget check instead of slipping under it.
    pub fn payload_bits(&self) -> u32 {
        self.fields
            .iter()
            .fold(0u32, |acc, &width| acc.saturating_add(width))
    }

    /// Bit offset of each field inside the payload.
    pub fn field_offsets(&self) -> Vec<u32> {
        let mut offset = 0u32;
        self.fields
            .iter()
            .map(|&width| {
                let start = offset;
                offset = offset.saturating_add(width);
                start
            })
            .collect()
    }

    /// Name converted to UpperCamelCase, used for emitted enum variants.
    pub fn variant_name(&self) -> String {
        upper_camel(&self.name)
    }
}

/// Validated, ordered list of commands plus the word width they share.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registry {
    total_bits: u32,
    commands: Vec<CommandSpec>,
}

impl Registry {
    /// Validate and build a registry.
    ///
    /// # Errors
    /// - `ConfigurationError::InvalidTotalBits` unless `1 <= total_bits <= 64`
    /// - `ConfigurationError::EmptyRegistry` with no commands
    /// - `ConfigurationError::InvalidName` for non-identifier names
    /// - `ConfigurationError::DuplicateCommand` for repeated names, including
    ///   names that only differ in case or underscores once camel-cased
    pub fn new(total_bits: u32, commands: Vec<CommandSpec>) -> Result<Self> {
        if total_bits == 0 || total_bits > 64 {
            return Err(ConfigurationError::InvalidTotalBits(total_bits).into());
        }

        if commands.is_empty() {
            return Err(ConfigurationError::EmptyRegistry.into());
        }

        let mut names = HashSet::new();
        let mut variants = HashSet::new();
        for command in &commands {
            if !is_identifier(&command.name) {
                return Err(ConfigurationError::InvalidName(command.name.clone()).into());
            }

            let variant = command.variant_name();
            if !is_identifier(&variant) || variant == "Self" {
                return Err(ConfigurationError::InvalidName(command.name.clone()).into());
            }

            if !names.insert(command.name.clone()) || !variants.insert(variant) {
                return Err(ConfigurationError::DuplicateCommand(command.name.clone()).into());
            }
        }

        Ok(Self {
            total_bits,
            commands,
        })
    }

    /// Width of every encoded value.
    pub fn total_bits(&self) -> u32 {
        self.total_bits
    }

    /// All commands in registry order.
    pub fn commands(&self) -> &[CommandSpec] {
        &self.commands
    }

    /// Command at `id`.
    pub fn command(&self, id: CommandId) -> Option<&CommandSpec> {
        self.commands.get(id.0)
    }

    /// Look up a command by name.
    pub fn find(&self, name: &str) -> Option<CommandId> {
        self.commands
            .iter()
            .position(|c| c.name == name)
            .map(CommandId)
    }

    /// Number of commands.
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Always false for a constructed registry.
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Iterate `(id, command)` pairs in registry order.
    pub fn iter(&self) -> impl Iterator<Item = (CommandId, &CommandSpec)> {
        self.commands
            .iter()
            .enumerate()
            .map(|(i, c)| (CommandId(i), c))
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn upper_camel(name: &str) -> String {
    name.split('_')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => {
                    first.to_ascii_uppercase().to_string() + &chars.as_str().to_ascii_lowercase()
                }
                None => String::new(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_payload_bits_and_offsets() {
        let spec = CommandSpec::new("SAFE_DIR_EDGE", vec![3, 3, 6]);
        assert_eq!(spec.payload_bits(), 12);
        assert_eq!(spec.field_offsets(), vec![0, 3, 6]);

        let empty = CommandSpec::new("FLEE", vec![]);
        assert_eq!(empty.payload_bits(), 0);
        assert!(empty.field_offsets().is_empty());
    }

    #[test]
    fn test_payload_bits_saturates() {
        let spec = CommandSpec::new("HUGE", vec![u32::MAX, 5]);
        assert_eq!(spec.payload_bits(), u32::MAX);
    }

    #[test]
    fn test_variant_name() {
        assert_eq!(CommandSpec::new("TWO_COORDS", vec![]).variant_name(), "TwoCoords");
        assert_eq!(CommandSpec::new("explore", vec![]).variant_name(), "Explore");
        assert_eq!(CommandSpec::new("A1_b2", vec![]).variant_name(), "A1B2");
    }

    #[test]
    fn test_valid_registry() {
        let registry = Registry::new(
            24,
            vec![
                CommandSpec::new("SCOUT", vec![3]),
                CommandSpec::new("EXPLORE", vec![]),
            ],
        )
        .unwrap();

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.find("EXPLORE"), Some(CommandId(1)));
        assert_eq!(registry.find("MISSING"), None);
        assert_eq!(registry.command(CommandId(0)).unwrap().name, "SCOUT");
    }

    #[test]
    fn test_empty_registry() {
        assert!(matches!(
            Registry::new(24, vec![]),
            Err(Error::Configuration(ConfigurationError::EmptyRegistry))
        ));
    }

    #[test]
    fn test_invalid_total_bits() {
        let commands = vec![CommandSpec::new("A", vec![])];
        assert!(Registry::new(0, commands.clone()).is_err());
        assert!(Registry::new(65, commands.clone()).is_err());
        assert!(Registry::new(64, commands).is_ok());
    }

    #[test]
    fn test_duplicate_names() {
        let result = Registry::new(
            8,
            vec![CommandSpec::new("ATTACK", vec![]), CommandSpec::new("ATTACK", vec![1])],
        );
        assert!(matches!(
            result,
            Err(Error::Configuration(ConfigurationError::DuplicateCommand(_)))
        ));

        // Distinct names that collapse to one enum variant
        let result = Registry::new(
            8,
            vec![CommandSpec::new("TWO_COORDS", vec![]), CommandSpec::new("two_coords", vec![])],
        );
        assert!(matches!(
            result,
            Err(Error::Configuration(ConfigurationError::DuplicateCommand(_)))
        ));
    }

    #[test]
    fn test_invalid_names() {
        for name in ["", "1ABC", "has space", "dash-name", "_", "_1X", "SELF"] {
            let result = Registry::new(8, vec![CommandSpec::new(name, vec![])]);
            assert!(
                matches!(result, Err(Error::Configuration(ConfigurationError::InvalidName(_)))),
                "name {name:?} should be rejected"
            );
        }
    }
}
