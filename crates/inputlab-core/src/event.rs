#![forbid(unsafe_code)]

//! Canonical input/event types.
//!
//! These are the raw user events a presentation layer forwards to the
//! engine. All types derive `Clone`, `PartialEq`, and `Eq` for use in tests
//! and pattern matching.
//!
//! # Design Notes
//!
//! - Text payloads are raw and untrimmed; trimming is a validation concern.
//! - Colors are a closed palette, so picking one cannot fail.

use std::fmt;
use std::str::FromStr;

/// Canonical input event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// The "+1" button was pressed.
    Increment,
    /// The greeting name input changed.
    EditName(String),
    /// "Say Hello" was pressed.
    SubmitName,
    /// "Clear" was pressed next to the name input.
    ClearName,
    /// A palette swatch was picked.
    PickColor(Swatch),
    /// The message visibility toggle was pressed.
    ToggleMessage,
    /// "Reset All" was pressed.
    ResetAll,
    /// A multi-field form input changed.
    EditField(FieldId, String),
    /// A multi-field form input lost focus.
    BlurField(FieldId),
    /// The multi-field form was submitted.
    Submit,
}

// ---------------------------------------------------------------------------
// FieldId
// ---------------------------------------------------------------------------

/// Identifies one of the multi-field form inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FieldId {
    Name,
    Age,
    Email,
}

impl FieldId {
    /// All fields in display order.
    pub const ALL: [FieldId; 3] = [FieldId::Name, FieldId::Age, FieldId::Email];

    /// Stable lowercase identifier.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Age => "age",
            Self::Email => "email",
        }
    }

    /// Position in [`FieldId::ALL`].
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Name => 0,
            Self::Age => 1,
            Self::Email => 2,
        }
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown field or color identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownIdentifier {
    /// What kind of identifier was being parsed.
    pub kind: &'static str,
    /// The rejected input.
    pub value: String,
}

impl fmt::Display for UnknownIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown {}: {:?}", self.kind, self.value)
    }
}

impl std::error::Error for UnknownIdentifier {}

impl FromStr for FieldId {
    type Err = UnknownIdentifier;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|f| f.as_str() == s)
            .ok_or_else(|| UnknownIdentifier {
                kind: "field",
                value: s.to_string(),
            })
    }
}

// ---------------------------------------------------------------------------
// Swatch
// ---------------------------------------------------------------------------

/// Background color choices.
///
/// `White` is the initial background; the other five make up the pickable
/// palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Swatch {
    #[default]
    White,
    Red,
    Blue,
    Green,
    Amber,
    Violet,
}

impl Swatch {
    /// The pickable palette, in display order.
    pub const PALETTE: [Swatch; 5] = [
        Swatch::Red,
        Swatch::Blue,
        Swatch::Green,
        Swatch::Amber,
        Swatch::Violet,
    ];

    /// CSS hex color for this swatch.
    #[must_use]
    pub const fn hex(self) -> &'static str {
        match self {
            Self::White => "#ffffff",
            Self::Red => "#f87171",
            Self::Blue => "#60a5fa",
            Self::Green => "#34d399",
            Self::Amber => "#fbbf24",
            Self::Violet => "#a78bfa",
        }
    }
}

impl fmt::Display for Swatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.hex())
    }
}

impl FromStr for Swatch {
    type Err = UnknownIdentifier;

    /// Parses a hex color id such as `#60a5fa` (case-insensitive).
    ///
    /// `#ffffff` parses as `White`, so a pick can return to the initial
    /// background.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        std::iter::once(Swatch::White)
            .chain(Swatch::PALETTE)
            .find(|c| c.hex().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownIdentifier {
                kind: "color",
                value: s.to_string(),
            })
    }
}
