//! Facial expressions understood by the agent rig.

use crate::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// Facial expression, ordered from most negative to most positive affect.
///
/// The discriminant is the code written to the rig's expression selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Expression {
    /// Very angry (0)
    SuperAngry = 0,
    /// Angry (1)
    LittleAngry = 1,
    /// Slightly angry (2)
    SlightlyAngry = 2,
    /// Neutral (3)
    #[default]
    Normal = 3,
    /// Slightly happy (4)
    SlightlyHappy = 4,
    /// Happy (5)
    LittleHappy = 5,
    /// Very happy (6)
    Happy = 6,
}

impl Expression {
    /// Every expression in code order
    pub const ALL: [Self; 7] = [
        Self::SuperAngry,
        Self::LittleAngry,
        Self::SlightlyAngry,
        Self::Normal,
        Self::SlightlyHappy,
        Self::LittleHappy,
        Self::Happy,
    ];

    /// Integer code sent to the rig
    #[must_use]
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Code as the floating value expected by numeric inputs
    #[must_use]
    pub fn value(self) -> f32 {
        f32::from(self.code())
    }

    /// Look up an expression by its code
    #[must_use]
    pub fn from_code(code: u8) -> Option<Self> {
        Self::ALL.get(usize::from(code)).copied()
    }

    /// Snake-case name
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::SuperAngry => "super_angry",
            Self::LittleAngry => "little_angry",
            Self::SlightlyAngry => "slightly_angry",
            Self::Normal => "normal",
            Self::SlightlyHappy => "slightly_happy",
            Self::LittleHappy => "little_happy",
            Self::Happy => "happy",
        }
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Expression {
    type Err = Error;

    /// Accepts a snake-case name (case-insensitive, `-` allowed) or a code.
    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_lowercase().replace('-', "_");
        if let Ok(code) = normalized.parse::<u8>() {
            return Self::from_code(code)
                .ok_or_else(|| Error::InvalidInput(format!("Expression code out of range: {code}")));
        }
        Self::ALL
            .into_iter()
            .find(|expr| expr.name() == normalized)
            .ok_or_else(|| Error::InvalidInput(format!("Unknown expression: {s}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_monotonic() {
        for (index, expr) in Expression::ALL.iter().enumerate() {
            assert_eq!(usize::from(expr.code()), index);
        }
        assert!(Expression::SuperAngry < Expression::Happy);
    }

    #[test]
    fn test_parse_by_name_and_code() {
        assert_eq!("happy".parse::<Expression>().unwrap(), Expression::Happy);
        assert_eq!("Little-Angry".parse::<Expression>().unwrap(), Expression::LittleAngry);
        assert_eq!("3".parse::<Expression>().unwrap(), Expression::Normal);
        assert!("7".parse::<Expression>().is_err());
        assert!("sleepy".parse::<Expression>().is_err());
    }

    #[test]
    fn test_default_is_normal() {
        assert_eq!(Expression::default(), Expression::Normal);
        assert_eq!(Expression::Normal.value(), 3.0);
    }
}
