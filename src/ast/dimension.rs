use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::FoamError;

/// SI base units, in dimension-set order.
pub const UNIT_SYMBOLS: [&str; 7] = ["kg", "m", "s", "K", "kmol", "A", "cd"];

static UNIT_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?P<name>[A-Za-z]+|1)(?:\^(?P<exp>-?\d+))?$").unwrap());

/// Exponents over (kg, m, s, K, kmol, A, cd).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct DimensionSet(pub [i32; 7]);

impl DimensionSet {
    pub const DIMENSIONLESS: DimensionSet = DimensionSet([0; 7]);

    pub fn new(exponents: [i32; 7]) -> Self {
        DimensionSet(exponents)
    }

    /// Parses strings such as `m^2/s`, `m^2.s^-2` or `1/kg.m^2/s`.
    ///
    /// Each operator applies to the token that follows it; the first token is positive.
    pub fn from_units(units: &str) -> Result<Self, FoamError> {
        let mut result = [0i32; 7];
        let mut sign = 1;
        let mut rest = units.trim();

        while !rest.is_empty() {
            let (token, next_sign) = match rest.find(['/', '.']) {
                Some(index) => {
                    let op = &rest[index..index + 1];
                    let token = &rest[..index];
                    rest = &rest[index + 1..];
                    (token, if op == "." { 1 } else { -1 })
                }
                None => {
                    let token = rest;
                    rest = "";
                    (token, 1)
                }
            };

            let unknown = || FoamError::Unit {
                unit: token.to_string(),
                units: units.to_string(),
                hint: Some(format!("Known symbols: {}", UNIT_SYMBOLS.join(", "))),
                code: Some(401),
            };
            let caps = UNIT_TOKEN.captures(token).ok_or_else(unknown)?;
            let name = &caps["name"];
            let exponent = match caps.name("exp") {
                Some(exp) => exp.as_str().parse::<i32>().map_err(|_| unknown())?,
                None => 1,
            };
            if name != "1" {
                let index = UNIT_SYMBOLS
                    .iter()
                    .position(|symbol| *symbol == name)
                    .ok_or_else(unknown)?;
                result[index] = sign * exponent;
            }
            sign = next_sign;
        }

        Ok(DimensionSet(result))
    }

    /// Canonical unit string: zero exponents dropped, `.` before positive and `/`
    /// before negative factors, a leading `1` when the first factor is a divisor.
    pub fn units(&self) -> String {
        let mut out = String::new();
        for (symbol, exponent) in UNIT_SYMBOLS.iter().zip(self.0) {
            if exponent == 0 {
                continue;
            }
            out.push(if exponent > 0 { '.' } else { '/' });
            out.push_str(symbol);
            if exponent.abs() != 1 {
                out.push_str(&format!("^{}", exponent.abs()));
            }
        }
        if let Some(stripped) = out.strip_prefix('.') {
            stripped.to_string()
        } else if out.starts_with('/') {
            format!("1{}", out)
        } else {
            out
        }
    }

    pub fn is_dimensionless(&self) -> bool {
        self.0 == [0; 7]
    }
}

impl From<[i32; 7]> for DimensionSet {
    fn from(exponents: [i32; 7]) -> Self {
        DimensionSet(exponents)
    }
}

impl FromStr for DimensionSet {
    type Err = FoamError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DimensionSet::from_units(s)
    }
}

/// Bracketed form used in files: `[0 2 -1 0 0 0 0]`.
impl fmt::Display for DimensionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(|e| e.to_string()).collect();
        write!(f, "[{}]", parts.join(" "))
    }
}
