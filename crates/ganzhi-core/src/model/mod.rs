//! Domain model: the cycle's building blocks, entities and catalog records.
//!
//! - [`cycle`]: stems, branches and their fixed attribute tables.
//! - [`entity`]: the immutable [`Entity`] produced by the registry.
//! - [`record`]: records supplied by the catalog source (nayin, relations,
//!   annotations).
//!
//! Every enumerated value serializes as its Chinese label (`"木"`, `"六冲"`)
//! and parses from either the label or its ASCII alias (`"wood"`,
//! `"six_clash"`).

use std::fmt;

/// Error returned when parsing an enum value from text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseEnumError {
    pub expected: &'static str,
    pub got: String,
}

impl fmt::Display for ParseEnumError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid {}: '{}'", self.expected, self.got)
    }
}

impl std::error::Error for ParseEnumError {}

/// Declare a fieldless enum whose variants carry a Chinese label and an
/// ASCII alias, with `Display`, `FromStr` and label-based serde.
macro_rules! labeled_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident ($expected:literal) {
            $( $(#[$vmeta:meta])* $variant:ident => $label:literal | $alias:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord,
            ::serde::Serialize, ::serde::Deserialize,
        )]
        #[serde(try_from = "String", into = "&'static str")]
        $vis enum $name {
            $( $(#[$vmeta])* $variant ),+
        }

        impl $name {
            /// Every variant, in canonical order.
            pub const ALL: &'static [Self] = &[ $( Self::$variant ),+ ];

            /// Chinese display label.
            #[must_use]
            pub const fn label(self) -> &'static str {
                match self {
                    $( Self::$variant => $label ),+
                }
            }

            /// ASCII alias accepted when parsing.
            #[must_use]
            pub const fn alias(self) -> &'static str {
                match self {
                    $( Self::$variant => $alias ),+
                }
            }

            /// Zero-based position in [`Self::ALL`].
            #[must_use]
            pub const fn index(self) -> usize {
                self as usize
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(self.label())
            }
        }

        impl ::std::str::FromStr for $name {
            type Err = $crate::model::ParseEnumError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let trimmed = s.trim();
                Self::ALL
                    .iter()
                    .copied()
                    .find(|v| v.label() == trimmed || v.alias().eq_ignore_ascii_case(trimmed))
                    .ok_or_else(|| $crate::model::ParseEnumError {
                        expected: $expected,
                        got: s.to_string(),
                    })
            }
        }

        impl TryFrom<String> for $name {
            type Error = $crate::model::ParseEnumError;

            fn try_from(s: String) -> Result<Self, Self::Error> {
                s.parse()
            }
        }

        impl From<$name> for &'static str {
            fn from(value: $name) -> Self {
                value.label()
            }
        }
    };
}

pub mod cycle;
pub mod entity;
pub mod record;

pub use cycle::{Branch, Direction, Element, Polarity, Season, Stem};
pub use entity::Entity;
pub use record::{
    AuspiciousRecord, EntityScoped, Fortune, LifeStage, Magnitude, NayinRecord, Preference,
    PreferenceRecord, Provenance, RelationRecord, RelationType, SymbolTier, SymbolismRecord,
};
