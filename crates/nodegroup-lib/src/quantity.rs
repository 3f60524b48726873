//! Kubernetes resource quantity parsing
//!
//! Validates strings against the quantity grammar:
//!
//! ```text
//! <quantity>       ::= <sign>? <number> <suffix>?
//! <number>         ::= <digits> | <digits>.<digits> | <digits>. | .<digits>
//! <suffix>         ::= <binarySI> | <decimalSI> | <decimalExponent>
//! <binarySI>       ::= Ki | Mi | Gi | Ti | Pi | Ei
//! <decimalSI>      ::= n | u | m | k | M | G | T | P | E
//! <decimalExponent>::= e<signedInt> | E<signedInt>
//! ```
//!
//! Valid strings are wrapped in the k8s-openapi [`Quantity`] unchanged.

use crate::error::QuantityError;
use k8s_openapi::apimachinery::pkg::api::resource::Quantity;

/// Unit suffix of a parsed quantity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Suffix {
    /// Power of 1024 (`Ki` = 1 .. `Ei` = 6)
    BinarySi(u32),
    /// Power of ten implied by an SI letter (`m` = -3, `k` = 3, none = 0)
    DecimalSi(i32),
    /// Explicit power of ten (`e3`, `E-2`)
    DecimalExponent(i32),
}

impl Suffix {
    fn apply(&self, magnitude: f64) -> f64 {
        match *self {
            Suffix::BinarySi(power) => magnitude * 1024f64.powi(power as i32),
            Suffix::DecimalSi(exp) | Suffix::DecimalExponent(exp) if exp < 0 => {
                magnitude / 10f64.powi(-exp)
            }
            Suffix::DecimalSi(exp) | Suffix::DecimalExponent(exp) => magnitude * 10f64.powi(exp),
        }
    }
}

const BINARY_SI: &[(&str, u32)] = &[
    ("Ki", 1),
    ("Mi", 2),
    ("Gi", 3),
    ("Ti", 4),
    ("Pi", 5),
    ("Ei", 6),
];

const DECIMAL_SI: &[(&str, i32)] = &[
    ("n", -9),
    ("u", -6),
    ("m", -3),
    ("", 0),
    ("k", 3),
    ("M", 6),
    ("G", 9),
    ("T", 12),
    ("P", 15),
    ("E", 18),
];

/// A quantity string split into its grammar parts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedQuantity {
    pub negative: bool,
    pub integer: String,
    pub fraction: String,
    pub suffix: Suffix,
}

impl ParsedQuantity {
    /// Approximate numeric value in base units, for display only
    pub fn as_f64(&self) -> f64 {
        let integer = if self.integer.is_empty() { "0" } else { &self.integer };
        let magnitude: f64 = format!("{}.{}0", integer, self.fraction)
            .parse()
            .unwrap_or(0.0);
        let value = self.suffix.apply(magnitude);
        if self.negative {
            -value
        } else {
            value
        }
    }
}

/// Split `s` into sign, magnitude and suffix
pub fn parse_quantity(s: &str) -> Result<ParsedQuantity, QuantityError> {
    if s.is_empty() {
        return Err(QuantityError::Empty);
    }

    let (negative, rest) = match s.as_bytes()[0] {
        b'-' => (true, &s[1..]),
        b'+' => (false, &s[1..]),
        _ => (false, s),
    };

    let integer_len = leading_digits(rest);
    let integer = &rest[..integer_len];
    let mut rest = &rest[integer_len..];

    let mut fraction = "";
    if let Some(after_point) = rest.strip_prefix('.') {
        let fraction_len = leading_digits(after_point);
        fraction = &after_point[..fraction_len];
        rest = &after_point[fraction_len..];
    }

    if integer.is_empty() && fraction.is_empty() {
        return Err(QuantityError::InvalidNumber(s.to_string()));
    }

    let suffix = parse_suffix(rest).ok_or_else(|| QuantityError::InvalidSuffix(s.to_string()))?;

    Ok(ParsedQuantity {
        negative,
        integer: integer.to_string(),
        fraction: fraction.to_string(),
        suffix,
    })
}

/// Validate `s` and wrap it as a [`Quantity`]
pub fn parse(s: &str) -> Result<Quantity, QuantityError> {
    parse_quantity(s)?;
    Ok(Quantity(s.to_string()))
}

/// The zero quantity
pub fn zero() -> Quantity {
    Quantity("0".to_string())
}

/// Format an integer amount with the largest decimal SI suffix that keeps it integral
pub fn decimal_si(value: i64) -> Quantity {
    if value == 0 {
        return zero();
    }

    let mut mantissa = value;
    let mut exp = 0;
    while exp < 18 && mantissa % 1000 == 0 {
        mantissa /= 1000;
        exp += 3;
    }

    let suffix = DECIMAL_SI
        .iter()
        .find(|(_, e)| *e == exp)
        .map(|(s, _)| *s)
        .unwrap_or("");

    Quantity(format!("{}{}", mantissa, suffix))
}

fn leading_digits(s: &str) -> usize {
    s.bytes().take_while(u8::is_ascii_digit).count()
}

fn parse_suffix(s: &str) -> Option<Suffix> {
    if let Some((_, power)) = BINARY_SI.iter().find(|(name, _)| *name == s) {
        return Some(Suffix::BinarySi(*power));
    }
    if let Some((_, exp)) = DECIMAL_SI.iter().find(|(name, _)| *name == s) {
        return Some(Suffix::DecimalSi(*exp));
    }

    // "E" alone is exa, handled above; "e3" / "E-2" are exponents
    let exponent = s.strip_prefix('e').or_else(|| s.strip_prefix('E'))?;
    let digits = exponent
        .strip_prefix('-')
        .or_else(|| exponent.strip_prefix('+'))
        .unwrap_or(exponent);
    if digits.is_empty() || leading_digits(digits) != digits.len() {
        return None;
    }
    exponent.parse().ok().map(Suffix::DecimalExponent)
}
