//! Enumerations shared by the catalog, wizard, and order pipeline.
//!
//! Every enum here round-trips through its `snake_case` string form via
//! `Display`/`FromStr`, which is also how it is stored and submitted in forms.

use serde::{Deserialize, Serialize};

/// Generates `as_str`, `ALL`, `Display`, and `FromStr` for a fieldless enum.
macro_rules! string_enum {
    ($name:ident, $label:literal, { $($variant:ident => $text:literal),+ $(,)? }) => {
        impl $name {
            /// Every variant in declaration order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// The stored `snake_case` form.
            #[must_use]
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $text),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok(Self::$variant),)+
                    _ => Err(format!(concat!("invalid ", $label, ": {}"), s)),
                }
            }
        }
    };
}

/// Stores a `string_enum!` type as Postgres `TEXT`.
macro_rules! text_column {
    ($name:ident) => {
        #[cfg(feature = "postgres")]
        impl sqlx::Type<sqlx::Postgres> for $name {
            fn type_info() -> sqlx::postgres::PgTypeInfo {
                <&str as sqlx::Type<sqlx::Postgres>>::type_info()
            }

            fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
                <&str as sqlx::Type<sqlx::Postgres>>::compatible(ty)
            }
        }

        #[cfg(feature = "postgres")]
        impl<'r> sqlx::Decode<'r, sqlx::Postgres> for $name {
            fn decode(
                value: sqlx::postgres::PgValueRef<'r>,
            ) -> Result<Self, sqlx::error::BoxDynError> {
                let text = <&str as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
                Ok(text.parse::<Self>()?)
            }
        }

        #[cfg(feature = "postgres")]
        impl sqlx::Encode<'_, sqlx::Postgres> for $name {
            fn encode_by_ref(
                &self,
                buf: &mut sqlx::postgres::PgArgumentBuffer,
            ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
                <&str as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.as_str(), buf)
            }
        }
    };
}

/// Visual style of a framed product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "frame_style", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum FrameStyle {
    #[default]
    Modern,
    Classic,
    Rustic,
    Minimalist,
    Ornate,
}

string_enum!(FrameStyle, "frame style", {
    Modern => "modern",
    Classic => "classic",
    Rustic => "rustic",
    Minimalist => "minimalist",
    Ornate => "ornate",
});

impl FrameStyle {
    /// Title-cased label for display.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Modern => "Modern",
            Self::Classic => "Classic",
            Self::Rustic => "Rustic",
            Self::Minimalist => "Minimalist",
            Self::Ornate => "Ornate",
        }
    }
}

/// Frame moulding material.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "frame_material", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum FrameMaterial {
    #[default]
    Wood,
    Metal,
    Acrylic,
    Composite,
}

string_enum!(FrameMaterial, "frame material", {
    Wood => "wood",
    Metal => "metal",
    Acrylic => "acrylic",
    Composite => "composite",
});

impl FrameMaterial {
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Wood => "Wood",
            Self::Metal => "Metal",
            Self::Acrylic => "Acrylic",
            Self::Composite => "Composite",
        }
    }
}

/// Lifecycle of a placed order.
///
/// ```text
/// pending -> processing -> in_production -> shipped -> delivered
///    \            \               \
///     +------------+---------------+--> cancelled
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "order_status", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Pending,
    Processing,
    InProduction,
    Shipped,
    Delivered,
    Cancelled,
}

string_enum!(OrderStatus, "order status", {
    Pending => "pending",
    Processing => "processing",
    InProduction => "in_production",
    Shipped => "shipped",
    Delivered => "delivered",
    Cancelled => "cancelled",
});

impl OrderStatus {
    /// Whether an order may move from `self` to `next`.
    ///
    /// Orders only move forward one stage at a time and can be cancelled
    /// until they ship.
    #[must_use]
    pub const fn can_transition_to(&self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Processing | Self::Cancelled)
                | (Self::Processing, Self::InProduction | Self::Cancelled)
                | (Self::InProduction, Self::Shipped | Self::Cancelled)
                | (Self::Shipped, Self::Delivered)
        )
    }

    /// Whether no further transitions are possible.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Delivered | Self::Cancelled)
    }
}

/// Orientation of a frame opening. Stored as text in `frame_orientations.code`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrientationCode {
    Landscape,
    #[default]
    Portrait,
    Square,
}

string_enum!(OrientationCode, "orientation", {
    Landscape => "landscape",
    Portrait => "portrait",
    Square => "square",
});
text_column!(OrientationCode);

impl OrientationCode {
    /// Orientation implied by a width and height.
    #[must_use]
    pub fn from_dimensions(width: f64, height: f64) -> Self {
        if (width - height).abs() < f64::EPSILON {
            Self::Square
        } else if width > height {
            Self::Landscape
        } else {
            Self::Portrait
        }
    }
}

/// Glazing chosen on the style step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum GlassType {
    #[default]
    Standard,
    AntiGlare,
    UvProtective,
}

string_enum!(GlassType, "glass type", {
    Standard => "standard",
    AntiGlare => "anti_glare",
    UvProtective => "uv_protective",
});
text_column!(GlassType);

impl GlassType {
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Standard => "Standard glass",
            Self::AntiGlare => "Anti-glare glass",
            Self::UvProtective => "UV-protective glass",
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_string_round_trip() {
        for style in FrameStyle::ALL {
            assert_eq!(style.as_str().parse::<FrameStyle>().unwrap(), *style);
        }
        assert_eq!(
            "in_production".parse::<OrderStatus>().unwrap(),
            OrderStatus::InProduction
        );
        assert_eq!(GlassType::UvProtective.to_string(), "uv_protective");
    }

    #[test]
    fn test_parse_rejects_unknown() {
        let err = "baroque".parse::<FrameStyle>().unwrap_err();
        assert_eq!(err, "invalid frame style: baroque");
        assert!("Wood".parse::<FrameMaterial>().is_err());
    }

    #[test]
    fn test_order_status_transitions() {
        assert!(OrderStatus::Pending.can_transition_to(OrderStatus::Processing));
        assert!(OrderStatus::InProduction.can_transition_to(OrderStatus::Cancelled));
        assert!(OrderStatus::Shipped.can_transition_to(OrderStatus::Delivered));
        assert!(!OrderStatus::Shipped.can_transition_to(OrderStatus::Cancelled));
        assert!(!OrderStatus::Pending.can_transition_to(OrderStatus::Shipped));
        assert!(!OrderStatus::Delivered.can_transition_to(OrderStatus::Pending));
        assert!(OrderStatus::Cancelled.is_terminal());
    }

    #[test]
    fn test_orientation_from_dimensions() {
        assert_eq!(
            OrientationCode::from_dimensions(10.0, 8.0),
            OrientationCode::Landscape
        );
        assert_eq!(
            OrientationCode::from_dimensions(8.0, 10.0),
            OrientationCode::Portrait
        );
        assert_eq!(
            OrientationCode::from_dimensions(12.0, 12.0),
            OrientationCode::Square
        );
    }

    #[test]
    fn test_serde_uses_snake_case() {
        let json = serde_json::to_string(&GlassType::AntiGlare).unwrap();
        assert_eq!(json, "\"anti_glare\"");
    }
}
