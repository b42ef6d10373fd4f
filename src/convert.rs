//! Kelvin to Fahrenheit conversion.
//!
//! Values are parsed into [`Decimal`] so that `273.15` and `1.8` are exact and a
//! result of exactly `x.5` is a genuine tie. Ties are settled by [`RoundingRule`],
//! which defaults to round-half-to-even.

use std::{fmt, str::FromStr};

use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Cannot convert '{value}' from Kelvin: {reason}")]
pub struct ValueConversionError {
    pub value: String,
    pub reason: String,
}

impl ValueConversionError {
    fn new(value: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            reason: reason.into(),
        }
    }
}

/// Tie-breaking rule applied when the Fahrenheit value falls exactly on `.5`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RoundingRule {
    /// Banker's rounding: `36.5 -> 36`, `45.5 -> 46`.
    #[default]
    HalfEven,
    /// `36.5 -> 37`, `-36.5 -> -37`.
    HalfAwayFromZero,
}

impl RoundingRule {
    fn strategy(self) -> RoundingStrategy {
        match self {
            RoundingRule::HalfEven => RoundingStrategy::MidpointNearestEven,
            RoundingRule::HalfAwayFromZero => RoundingStrategy::MidpointAwayFromZero,
        }
    }
}

impl fmt::Display for RoundingRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoundingRule::HalfEven => write!(f, "half-even"),
            RoundingRule::HalfAwayFromZero => write!(f, "half-away-from-zero"),
        }
    }
}

/// A temperature in Kelvin supplied either as text or as a number.
pub trait KelvinInput {
    fn to_kelvin(&self) -> Result<Decimal, ValueConversionError>;
}

impl KelvinInput for str {
    fn to_kelvin(&self) -> Result<Decimal, ValueConversionError> {
        parse_kelvin(self)
    }
}

impl KelvinInput for String {
    fn to_kelvin(&self) -> Result<Decimal, ValueConversionError> {
        parse_kelvin(self)
    }
}

impl KelvinInput for f64 {
    fn to_kelvin(&self) -> Result<Decimal, ValueConversionError> {
        if !self.is_finite() {
            return Err(ValueConversionError::new(
                self.to_string(),
                "value is not a finite number",
            ));
        }
        Decimal::try_from(*self)
            .map_err(|_| ValueConversionError::new(self.to_string(), OUT_OF_RANGE))
    }
}

impl KelvinInput for Decimal {
    fn to_kelvin(&self) -> Result<Decimal, ValueConversionError> {
        Ok(*self)
    }
}

const NOT_A_NUMBER: &str = "not a finite decimal number";
const OUT_OF_RANGE: &str = "result is out of range";

/// Parses a Kelvin reading as written in a CSV field.
///
/// Surrounding whitespace is ignored. Plain decimals and scientific notation are
/// accepted; `NaN`, `inf` and empty fields are rejected. Values with more than
/// 28 decimal places are rounded to fit.
pub fn parse_kelvin(raw: &str) -> Result<Decimal, ValueConversionError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ValueConversionError::new(raw, "value is empty"));
    }
    let exact = if trimmed.contains(['e', 'E']) {
        Decimal::from_scientific(trimmed)
    } else {
        Decimal::from_str(trimmed)
    };
    if let Ok(value) = exact {
        return Ok(value);
    }
    // scale or magnitude beyond what Decimal holds exactly
    let approx: f64 = trimmed
        .parse()
        .map_err(|_| ValueConversionError::new(raw, NOT_A_NUMBER))?;
    if !trimmed.bytes().any(|b| b.is_ascii_digit()) {
        return Err(ValueConversionError::new(raw, NOT_A_NUMBER));
    }
    Decimal::try_from(approx).map_err(|_| ValueConversionError::new(raw, OUT_OF_RANGE))
}

/// Converts Kelvin to whole degrees Fahrenheit using
/// `round((K - 273.15) * 1.8 + 32)` under the given tie-breaking rule.
pub fn kelvin_to_fahrenheit(
    kelvin: Decimal,
    rounding: RoundingRule,
) -> Result<i64, ValueConversionError> {
    let overflow = || ValueConversionError::new(kelvin.to_string(), OUT_OF_RANGE);
    let fahrenheit = kelvin
        .checked_sub(kelvin_offset())
        .and_then(|celsius| celsius.checked_mul(celsius_scale()))
        .and_then(|scaled| scaled.checked_add(fahrenheit_offset()))
        .ok_or_else(overflow)?;
    fahrenheit
        .round_dp_with_strategy(0, rounding.strategy())
        .to_i64()
        .ok_or_else(overflow)
}

/// Converts a Kelvin reading to Fahrenheit with round-half-to-even.
pub fn convert_k_to_f<T>(kelvin: &T) -> Result<i64, ValueConversionError>
where
    T: KelvinInput + ?Sized,
{
    convert_k_to_f_with(kelvin, RoundingRule::default())
}

pub fn convert_k_to_f_with<T>(kelvin: &T, rounding: RoundingRule) -> Result<i64, ValueConversionError>
where
    T: KelvinInput + ?Sized,
{
    kelvin_to_fahrenheit(kelvin.to_kelvin()?, rounding)
}

fn kelvin_offset() -> Decimal {
    Decimal::new(27315, 2)
}

fn celsius_scale() -> Decimal {
    Decimal::new(18, 1)
}

fn fahrenheit_offset() -> Decimal {
    Decimal::from(32)
}
