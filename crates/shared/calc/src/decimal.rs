//! Decimal-string parsing and output formatting.
//!
//! Parsing is strict: `[+-]?digits[.digits]`, no exponent, no separators,
//! no surrounding whitespace. Rounding happens only in [`DecimalFormat::format`].

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::error::{CalcError, CalcResult};

/// Largest number of fractional digits a `Decimal` can carry
pub const MAX_SCALE: u32 = 28;

/// Integer digits at which a value can no longer fit the 96-bit mantissa
const OVERFLOW_DIGITS: usize = 29;

/// Parse a wire decimal string exactly
pub fn parse_decimal(input: &str) -> CalcResult<Decimal> {
    let Some(int_digits) = integer_digits(input) else {
        return Err(CalcError::InvalidDecimal(input.to_string()));
    };
    let unsigned = input.strip_prefix('+').unwrap_or(input);
    let exact = trim_excess_zeros(unsigned);

    Decimal::from_str_exact(exact).map_err(|_| {
        if int_digits >= OVERFLOW_DIGITS {
            CalcError::Overflow("decimal input")
        } else {
            CalcError::InvalidDecimal(input.to_string())
        }
    })
}

/// Drop trailing fractional zeros beyond what a `Decimal` can hold
fn trim_excess_zeros(input: &str) -> &str {
    match input.split_once('.') {
        Some((int_part, frac)) if frac.len() > MAX_SCALE as usize => {
            let kept = frac.trim_end_matches('0');
            if kept.is_empty() {
                int_part
            } else {
                &input[..int_part.len() + 1 + kept.len()]
            }
        }
        _ => input,
    }
}

/// Validates the grammar and returns the count of significant integer digits
fn integer_digits(input: &str) -> Option<usize> {
    let body = input
        .strip_prefix('-')
        .or_else(|| input.strip_prefix('+'))
        .unwrap_or(input);
    let (int_part, frac_part) = match body.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (body, None),
    };

    let all_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    if !all_digits(int_part) {
        return None;
    }
    if let Some(frac) = frac_part {
        if !all_digits(frac) {
            return None;
        }
    }
    Some(int_part.trim_start_matches('0').len())
}

/// Rounding mode applied when formatting output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rounding {
    /// Banker's rounding
    #[default]
    HalfEven,
    HalfUp,
    HalfDown,
    TowardZero,
    AwayFromZero,
}

impl From<Rounding> for RoundingStrategy {
    fn from(rounding: Rounding) -> Self {
        match rounding {
            Rounding::HalfEven => RoundingStrategy::MidpointNearestEven,
            Rounding::HalfUp => RoundingStrategy::MidpointAwayFromZero,
            Rounding::HalfDown => RoundingStrategy::MidpointTowardZero,
            Rounding::TowardZero => RoundingStrategy::ToZero,
            Rounding::AwayFromZero => RoundingStrategy::AwayFromZero,
        }
    }
}

/// Output formatting policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecimalFormat {
    /// Maximum fractional digits in output
    pub scale: u32,
    pub rounding: Rounding,
}

impl Default for DecimalFormat {
    fn default() -> Self {
        Self {
            scale: 8,
            rounding: Rounding::HalfEven,
        }
    }
}

impl DecimalFormat {
    pub fn new(scale: u32, rounding: Rounding) -> Self {
        Self {
            scale: scale.min(MAX_SCALE),
            rounding,
        }
    }

    /// Round to the output scale and strip trailing zeros
    pub fn round(&self, value: Decimal) -> Decimal {
        let rounded = value
            .round_dp_with_strategy(self.scale.min(MAX_SCALE), self.rounding.into())
            .normalize();
        if rounded.is_zero() {
            Decimal::ZERO
        } else {
            rounded
        }
    }

    /// Canonical wire string; feeding it back through [`parse_decimal`]
    /// and formatting again yields the same string.
    pub fn format(&self, value: Decimal) -> String {
        self.round(value).to_string()
    }
}

/// Format with the default policy (8 places, half-even)
pub fn format_decimal(value: Decimal) -> String {
    DecimalFormat::default().format(value)
}
