//! Blood glucose units, ranges and conversion
//!
//! Copyright (c) 2025 Glyco Team
//! Licensed under the Apache-2.0 license

pub const MMOL_L: &str = "mmol/L";
pub const MMOL_L_LOWER: &str = "mmol/l";
pub const MG_DL: &str = "mg/dL";
pub const MG_DL_LOWER: &str = "mg/dl";

pub const UNITS: &[&str] = &[MMOL_L, MMOL_L_LOWER, MG_DL, MG_DL_LOWER];

pub const MMOL_L_MINIMUM: f64 = 0.0;
pub const MMOL_L_MAXIMUM: f64 = 55.0;
pub const MG_DL_MINIMUM: f64 = 0.0;
pub const MG_DL_MAXIMUM: f64 = 1000.0;

/// mg/dL per mmol/L
pub const MMOL_L_TO_MG_DL_FACTOR: f64 = 18.01559;

pub fn is_mmol_l(units: &str) -> bool {
    units == MMOL_L || units == MMOL_L_LOWER
}

pub fn is_mg_dl(units: &str) -> bool {
    units == MG_DL || units == MG_DL_LOWER
}

/// Inclusive value range for `units`, if the units are known
pub fn value_range(units: Option<&str>) -> Option<(f64, f64)> {
    match units {
        Some(units) if is_mmol_l(units) => Some((MMOL_L_MINIMUM, MMOL_L_MAXIMUM)),
        Some(units) if is_mg_dl(units) => Some((MG_DL_MINIMUM, MG_DL_MAXIMUM)),
        _ => None,
    }
}

/// Convert `value` in `units` to mmol/L, rounded to five decimal places
///
/// Converted values never exceed the mmol/L maximum, so the top of the
/// mg/dL range stays valid once stored.
pub fn to_mmol_l(value: f64, units: &str) -> f64 {
    if is_mg_dl(units) {
        let converted = (value / MMOL_L_TO_MG_DL_FACTOR * 100_000.0).round() / 100_000.0;
        converted.min(MMOL_L_MAXIMUM)
    } else {
        value
    }
}
