use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const TEL_SCHEME: &str = "tel";

/// Scheme-qualified contact address, e.g. `tel:+385916242493`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Urn {
    scheme: String,
    path: String,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum UrnError {
    #[error("urn '{0}' is missing a scheme")]
    MissingScheme(String),
    #[error("urn '{0}' has an empty path")]
    EmptyPath(String),
}

impl Urn {
    /// Phone-number URN with the path taken as-is.
    pub fn tel(path: impl Into<String>) -> Self {
        Self {
            scheme: TEL_SCHEME.to_string(),
            path: path.into(),
        }
    }

    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

impl Display for Urn {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.scheme, self.path)
    }
}

impl FromStr for Urn {
    type Err = UrnError;

    /// ```
    /// use sms_core::Urn;
    ///
    /// let urn: Urn = "tel:+15551234567".parse().unwrap();
    /// assert_eq!(urn.scheme(), "tel");
    /// assert_eq!(urn.path(), "+15551234567");
    /// ```
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let (scheme, path) = raw
            .split_once(':')
            .filter(|(scheme, _)| !scheme.is_empty())
            .ok_or_else(|| UrnError::MissingScheme(raw.to_string()))?;
        if path.is_empty() {
            return Err(UrnError::EmptyPath(raw.to_string()));
        }
        Ok(Self {
            scheme: scheme.to_lowercase(),
            path: path.to_string(),
        })
    }
}

impl TryFrom<String> for Urn {
    type Error = UrnError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Urn> for String {
    fn from(urn: Urn) -> Self {
        urn.to_string()
    }
}

/// Normalizes a raw phone number into a `tel` URN scoped to `country`
/// (ISO 3166 alpha-2).
///
/// Numbers already in international form keep their digits behind a `+`. National numbers
/// get the country's calling code when the country is known. A number is only read as
/// already carrying the calling code when it is too long to be a national number of that
/// country. Short codes and alphanumeric sender ids are kept verbatim (lowercased), as is
/// anything when no country is known.
///
/// ```
/// use sms_core::tel_urn_for_country;
///
/// assert_eq!(tel_urn_for_country("0916242493", Some("HR")).path(), "+385916242493");
/// assert_eq!(tel_urn_for_country("9123456789", Some("IN")).path(), "+919123456789");
/// assert_eq!(tel_urn_for_country("+1 (555) 123-4567", None).path(), "+15551234567");
/// assert_eq!(tel_urn_for_country("385916242493", None).path(), "385916242493");
/// ```
pub fn tel_urn_for_country(number: &str, country: Option<&str>) -> Urn {
    let trimmed = number.trim();
    if trimmed.chars().any(|c| c.is_alphabetic()) {
        return Urn::tel(trimmed.to_lowercase());
    }

    let digits: String = trimmed.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return Urn::tel(trimmed);
    }
    if trimmed.starts_with('+') {
        return Urn::tel(format!("+{digits}"));
    }
    if let Some(rest) = digits.strip_prefix("00") {
        return Urn::tel(format!("+{rest}"));
    }

    let Some(plan) = country.and_then(dialing_plan) else {
        return Urn::tel(digits);
    };
    if digits.len() < MIN_NATIONAL_LEN {
        return Urn::tel(digits);
    }
    if let Some(national) = digits.strip_prefix('0') {
        return Urn::tel(format!("+{}{national}", plan.calling_code));
    }
    if plan.is_national_len(digits.len()) {
        return Urn::tel(format!("+{}{digits}", plan.calling_code));
    }
    match digits.strip_prefix(plan.calling_code) {
        Some(national) if plan.is_national_len(national.len()) => Urn::tel(format!("+{digits}")),
        _ => Urn::tel(format!("+{}{digits}", plan.calling_code)),
    }
}

/// Shorter numbers are treated as short codes and never prefixed.
const MIN_NATIONAL_LEN: usize = 7;

#[derive(Debug, Clone, Copy)]
struct DialingPlan {
    calling_code: &'static str,
    /// Significant national number length range, trunk prefix excluded.
    min_len: usize,
    max_len: usize,
}

impl DialingPlan {
    fn is_national_len(&self, len: usize) -> bool {
        (self.min_len..=self.max_len).contains(&len)
    }
}

fn dialing_plan(country: &str) -> Option<DialingPlan> {
    let (calling_code, min_len, max_len) = match country.trim().to_ascii_uppercase().as_str() {
        "US" | "CA" => ("1", 10, 10),
        "RU" | "KZ" => ("7", 10, 10),
        "EG" => ("20", 8, 10),
        "ZA" => ("27", 9, 9),
        "GR" => ("30", 10, 10),
        "NL" => ("31", 9, 9),
        "BE" => ("32", 8, 9),
        "FR" => ("33", 9, 9),
        "ES" => ("34", 9, 9),
        "HU" => ("36", 8, 9),
        "IT" => ("39", 6, 11),
        "RO" => ("40", 9, 9),
        "CH" => ("41", 9, 9),
        "AT" => ("43", 4, 11),
        "GB" => ("44", 9, 10),
        "DK" => ("45", 8, 8),
        "SE" => ("46", 7, 9),
        "NO" => ("47", 8, 8),
        "PL" => ("48", 9, 9),
        "DE" => ("49", 6, 11),
        "PE" => ("51", 8, 9),
        "MX" => ("52", 10, 10),
        "AR" => ("54", 10, 11),
        "BR" => ("55", 10, 11),
        "CL" => ("56", 9, 9),
        "CO" => ("57", 10, 10),
        "MY" => ("60", 8, 10),
        "AU" => ("61", 9, 9),
        "ID" => ("62", 8, 12),
        "PH" => ("63", 10, 10),
        "NZ" => ("64", 8, 10),
        "SG" => ("65", 8, 8),
        "TH" => ("66", 8, 9),
        "JP" => ("81", 9, 10),
        "KR" => ("82", 8, 10),
        "VN" => ("84", 9, 10),
        "CN" => ("86", 10, 11),
        "TR" => ("90", 10, 10),
        "IN" => ("91", 10, 10),
        "PK" => ("92", 10, 10),
        "MA" => ("212", 9, 9),
        "SN" => ("221", 9, 9),
        "GH" => ("233", 9, 9),
        "NG" => ("234", 8, 10),
        "ET" => ("251", 9, 9),
        "KE" => ("254", 9, 9),
        "TZ" => ("255", 9, 9),
        "UG" => ("256", 9, 9),
        "RW" => ("250", 9, 9),
        "ZM" => ("260", 9, 9),
        "MW" => ("265", 9, 9),
        "PT" => ("351", 9, 9),
        "IE" => ("353", 7, 9),
        "FI" => ("358", 6, 10),
        "BG" => ("359", 8, 9),
        "UA" => ("380", 9, 9),
        "RS" => ("381", 8, 9),
        "HR" => ("385", 8, 9),
        "SI" => ("386", 8, 8),
        "BA" => ("387", 8, 8),
        "CZ" => ("420", 9, 9),
        "SK" => ("421", 9, 9),
        "EC" => ("593", 8, 9),
        "BD" => ("880", 10, 10),
        "AE" => ("971", 8, 9),
        "IL" => ("972", 8, 9),
        _ => return None,
    };
    Some(DialingPlan {
        calling_code,
        min_len,
        max_len,
    })
}
