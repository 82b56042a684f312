//! Hex color codes used for frame colors and mat colors.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Errors parsing a hex color code.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorError {
    #[error("color code must start with '#': {0}")]
    MissingHash(String),
    #[error("color code must have 3 or 6 hex digits: {0}")]
    InvalidLength(String),
    #[error("invalid hex digit in color code: {0}")]
    InvalidDigit(String),
}

/// An opaque sRGB color parsed from `#RGB` or `#RRGGBB`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HexColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl HexColor {
    /// Default wood-brown frame color.
    pub const WALNUT: Self = Self::rgb(0x8B, 0x45, 0x13);
    /// Light gray used for the empty photo area.
    pub const PLACEHOLDER: Self = Self::rgb(0xF0, 0xF0, 0xF0);
    /// Upload hint drawn on the empty photo area.
    pub const PLACEHOLDER_MARK: Self = Self::rgb(0x99, 0x99, 0x99);
    pub const WHITE: Self = Self::rgb(0xFF, 0xFF, 0xFF);

    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse a `#RGB` or `#RRGGBB` color code (case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns `ColorError` if the code is not a valid hex color.
    pub fn parse(code: &str) -> Result<Self, ColorError> {
        let trimmed = code.trim();
        let digits = trimmed
            .strip_prefix('#')
            .ok_or_else(|| ColorError::MissingHash(code.to_string()))?;

        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ColorError::InvalidDigit(code.to_string()));
        }

        let channel = |s: &str| {
            u8::from_str_radix(s, 16).map_err(|_| ColorError::InvalidDigit(code.to_string()))
        };

        match digits.len() {
            3 => {
                let expand = |i: usize| {
                    digits
                        .get(i..=i)
                        .ok_or_else(|| ColorError::InvalidLength(code.to_string()))
                        .and_then(|d| channel(&d.repeat(2)))
                };
                Ok(Self::rgb(expand(0)?, expand(1)?, expand(2)?))
            }
            6 => {
                let pair = |i: usize| {
                    digits
                        .get(i..i + 2)
                        .ok_or_else(|| ColorError::InvalidLength(code.to_string()))
                        .and_then(channel)
                };
                Ok(Self::rgb(pair(0)?, pair(2)?, pair(4)?))
            }
            _ => Err(ColorError::InvalidLength(code.to_string())),
        }
    }

    /// RGBA channels with full opacity.
    #[must_use]
    pub const fn to_rgba(self) -> [u8; 4] {
        [self.r, self.g, self.b, 255]
    }
}

impl Default for HexColor {
    fn default() -> Self {
        Self::WALNUT
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl FromStr for HexColor {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for HexColor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for HexColor {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <&str as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <&str as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for HexColor {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let text = <&str as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        Ok(Self::parse(text)?)
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for HexColor {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <String as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.to_string(), buf)
    }
}

impl<'de> Deserialize<'de> for HexColor {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}
