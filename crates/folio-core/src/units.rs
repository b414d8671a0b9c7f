// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unit conversion between caller-facing units and PDF points.
//
// Every result is rounded to two decimal places. The em inverse factor is the
// same as its forward factor, so em values do not round-trip.

use serde::{Deserialize, Serialize};

/// Length units accepted from callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Unit {
    #[serde(rename = "pt")]
    Point,
    #[serde(rename = "px")]
    Pixel,
    #[serde(rename = "in")]
    Inch,
    #[serde(rename = "cm")]
    Centimeter,
    #[serde(rename = "em")]
    Em,
    #[default]
    #[serde(rename = "mm")]
    Millimeter,
    #[serde(rename = "ex")]
    Ex,
    #[serde(rename = "pc")]
    Pica,
}

impl Unit {
    /// All supported units.
    pub const ALL: [Unit; 8] = [
        Unit::Point,
        Unit::Pixel,
        Unit::Inch,
        Unit::Centimeter,
        Unit::Em,
        Unit::Millimeter,
        Unit::Ex,
        Unit::Pica,
    ];

    /// Short keyword (`mm`, `pt`, ...).
    pub fn keyword(&self) -> &'static str {
        match self {
            Self::Point => "pt",
            Self::Pixel => "px",
            Self::Inch => "in",
            Self::Centimeter => "cm",
            Self::Em => "em",
            Self::Millimeter => "mm",
            Self::Ex => "ex",
            Self::Pica => "pc",
        }
    }

    /// Parse a unit keyword. Unrecognised keywords are treated as points.
    pub fn from_keyword(keyword: &str) -> Self {
        match keyword.trim().to_ascii_lowercase().as_str() {
            "px" => Self::Pixel,
            "in" => Self::Inch,
            "cm" => Self::Centimeter,
            "em" => Self::Em,
            "mm" => Self::Millimeter,
            "ex" => Self::Ex,
            "pc" => Self::Pica,
            _ => Self::Point,
        }
    }

    /// Multiplier taking a value in this unit to points.
    fn to_points_factor(&self) -> f64 {
        match self {
            Self::Pixel => 0.75,
            Self::Inch => 72.0,
            Self::Centimeter => 28.3465,
            Self::Em => 0.0836,
            Self::Millimeter => 2.83465,
            Self::Ex => 4.30554,
            Self::Pica => 12.0,
            Self::Point => 1.0,
        }
    }

    /// Multiplier taking points back to this unit.
    fn from_points_factor(&self) -> f64 {
        match self {
            Self::Pixel => 1.333_333_333_333_333_3,
            Self::Inch => 0.013_888_888_888_888_888,
            Self::Centimeter => 0.035_277_8,
            Self::Em => 0.0836,
            Self::Millimeter => 0.352_778,
            Self::Ex => 0.232_55,
            Self::Pica => 0.083_33,
            Self::Point => 1.0,
        }
    }
}

impl std::fmt::Display for Unit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.keyword())
    }
}

impl From<&str> for Unit {
    fn from(keyword: &str) -> Self {
        Self::from_keyword(keyword)
    }
}

/// Convert `value` expressed in `unit` to points.
pub fn to_points(unit: Unit, value: f64) -> f64 {
    round2(value * unit.to_points_factor())
}

/// Convert `points` to `unit`.
pub fn from_points(unit: Unit, points: f64) -> f64 {
    round2(points * unit.from_points_factor())
}

/// [`to_points`] for an optional value; an absent value is zero.
pub fn to_points_opt(unit: Unit, value: Option<f64>) -> f64 {
    value.map_or(0.0, |v| to_points(unit, v))
}

/// [`from_points`] for an optional value; an absent value is zero.
pub fn from_points_opt(unit: Unit, points: Option<f64>) -> f64 {
    points.map_or(0.0, |p| from_points(unit, p))
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
