use once_cell::sync::Lazy;
use regex::Regex;

static CURRENCY_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[₹,]").unwrap());

/// Quantity assumed when a cell is blank or not a usable number.
pub const DEFAULT_QTY: f64 = 1.0;

/// States that mean "nobody filled this in", after title-casing.
const UNSPECIFIED_STATES: &[&str] = &["N/A", "Na"];
pub const NOT_SPECIFIED: &str = "Not Specified";

/// Upper-case the first letter of every alphabetic run, lower-case the rest.
/// `"ACME india"` → `"Acme India"`, `"n/a"` → `"N/A"`.
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_word = false;
    for c in s.chars() {
        if c.is_alphabetic() {
            if in_word {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(c);
            in_word = false;
        }
    }
    out
}

/// `"₹1,23,456.00"` → `Some(123456.0)`; anything unparseable → `None`.
pub fn parse_amount(raw: &str) -> Option<f64> {
    let stripped = CURRENCY_RE.replace_all(raw, "");
    parse_finite(stripped.trim())
}

/// Quantity never ends up null or non-positive: those fall back to [`DEFAULT_QTY`].
pub fn parse_qty(raw: &str) -> f64 {
    parse_finite(raw.trim())
        .filter(|q| *q > 0.0)
        .unwrap_or(DEFAULT_QTY)
}

fn parse_finite(s: &str) -> Option<f64> {
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}

pub fn normalize_state(raw: &str) -> String {
    let state = title_case(raw.trim());
    if UNSPECIFIED_STATES.contains(&state.as_str()) {
        NOT_SPECIFIED.to_string()
    } else {
        state
    }
}

pub fn normalize_company(raw: &str) -> String {
    title_case(raw.trim())
}

pub fn normalize_product(raw: &str) -> String {
    raw.trim().to_string()
}
