//! Lexical checks for the literal value types.
//!
//! Each check looks at the lexical form only; datatype IRIs are advisory
//! because upstream sources disagree on them (Wikidata serves dates as
//! `xsd:dateTime`, offline dumps often leave them plain).

use chrono::{DateTime, NaiveDate, NaiveTime};
use hub_schema::vocab::XSD_STRING;

/// `YYYY-MM-DD`, RFC 3339 date-time, or Wikidata time (`+YYYY-MM-DDThh:mm:ssZ`).
pub fn is_date(lexical: &str) -> bool {
    let s = lexical.trim();
    NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok()
        || DateTime::parse_from_rfc3339(s).is_ok()
        || is_wikidata_time(s)
}

/// Wikidata time values carry an explicit sign, a year of any width, and
/// `00` month/day components when the precision is coarser than a day.
fn is_wikidata_time(s: &str) -> bool {
    let Some(rest) = s.strip_prefix('+').or_else(|| s.strip_prefix('-')) else {
        return false;
    };
    let Some((date, time)) = rest.split_once('T') else {
        return false;
    };
    let Some(time) = time.strip_suffix('Z') else {
        return false;
    };
    let mut parts = date.splitn(3, '-');
    let (Some(year), Some(month), Some(day)) = (parts.next(), parts.next(), parts.next()) else {
        return false;
    };
    let in_range = |field: &str, max: u32| {
        field.len() == 2 && field.parse::<u32>().is_ok_and(|v| v <= max)
    };
    is_digits(year)
        && in_range(month, 12)
        && in_range(day, 31)
        && NaiveTime::parse_from_str(time, "%H:%M:%S").is_ok()
}

/// Optional sign, digits, optional fractional part.
pub fn is_decimal(lexical: &str) -> bool {
    let s = strip_sign(lexical.trim());
    match s.split_once('.') {
        Some((whole, frac)) => is_digits(whole) && is_digits(frac),
        None => is_digits(s),
    }
}

/// Optional sign and digits.
pub fn is_integer(lexical: &str) -> bool {
    is_digits(strip_sign(lexical.trim()))
}

/// `http://` or `https://` followed by something.
pub fn is_http_url(s: &str) -> bool {
    ["http://", "https://"]
        .iter()
        .any(|scheme| s.strip_prefix(scheme).is_some_and(|rest| !rest.is_empty()))
}

/// Plain or `xsd:string` (language tags are also strings).
pub fn is_string_datatype(datatype: Option<&str>) -> bool {
    datatype.map_or(true, |dt| dt == XSD_STRING)
}

fn strip_sign(s: &str) -> &str {
    s.strip_prefix('+')
        .or_else(|| s.strip_prefix('-'))
        .unwrap_or(s)
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}
