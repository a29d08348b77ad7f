//! Input validation pipeline
//!
//! Each operation declares an ordered list of [`Rule`]s. [`run`] applies them
//! in order and stops at the first violation, so only the first missing or
//! invalid field is reported. Nothing here touches the network.

use super::bodies::{
    CheckIdentifierRequest, DeleteKeyRequest, DeleteKeylessRequest, ExtendKeyExpirationRequest,
    FetchKeyRequest, GenerateKeyRequest, ValidateKeyRequest,
};
use crate::{Error, Result};
use chrono::NaiveDate;

/// Verdict of a single rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Check {
    Ok,
    Missing,
    NotPositive,
    Invalid(String),
}

/// A named check over an operation input
pub struct Rule<B> {
    pub field: &'static str,
    pub check: fn(&B) -> Check,
}

/// Apply `rules` in order, failing on the first violation
pub fn run<B>(body: &B, rules: &[Rule<B>]) -> Result<()> {
    for rule in rules {
        match (rule.check)(body) {
            Check::Ok => {}
            Check::Missing => return Err(Error::missing_field(rule.field)),
            Check::NotPositive => {
                return Err(Error::invalid_input(format!(
                    "Invalid '{}' value. Expected a positive number",
                    rule.field
                )));
            }
            Check::Invalid(message) => return Err(Error::invalid_input(message)),
        }
    }
    Ok(())
}

/// Reconcile a caller-supplied API key with the client's key
///
/// A differing key fails; an absent key is filled in with the client's.
pub fn authorize(supplied: &mut Option<String>, client_key: &str) -> Result<()> {
    match supplied {
        Some(key) if key != client_key => Err(Error::ApiKeyMismatch),
        Some(_) => Ok(()),
        None => {
            *supplied = Some(client_key.to_string());
            Ok(())
        }
    }
}

/// Check an `expire` value: `YYYY-MM-DD` shape, then a real calendar date
pub fn check_expire(expire: &str) -> Check {
    if !has_date_shape(expire) {
        return Check::Invalid("Invalid 'expire' format. Expected 'YYYY-MM-DD'".to_string());
    }
    if NaiveDate::parse_from_str(expire, "%Y-%m-%d").is_err() {
        return Check::Invalid("Invalid 'expire' date. The date does not exist.".to_string());
    }
    Check::Ok
}

// Four-digit year, month 01-12, day 01-31. chrono's %m and %d also accept
// unpadded values such as 2024-1-5, so the shape is checked separately.
fn has_date_shape(value: &str) -> bool {
    let bytes = value.as_bytes();
    if bytes.len() != 10 || bytes[4] != b'-' || bytes[7] != b'-' {
        return false;
    }
    let digits_ok = bytes
        .iter()
        .enumerate()
        .all(|(i, b)| i == 4 || i == 7 || b.is_ascii_digit());
    if !digits_ok {
        return false;
    }
    let month: u32 = value[5..7].parse().unwrap_or(0);
    let day: u32 = value[8..10].parse().unwrap_or(0);
    (1..=12).contains(&month) && (1..=31).contains(&day)
}

fn text(value: &Option<String>) -> Check {
    match value {
        Some(v) if !v.trim().is_empty() => Check::Ok,
        _ => Check::Missing,
    }
}

fn positive(value: Option<u32>) -> Check {
    match value {
        None => Check::Missing,
        Some(0) => Check::NotPositive,
        Some(_) => Check::Ok,
    }
}

pub const GENERATE_KEY: &[Rule<GenerateKeyRequest>] = &[
    Rule {
        field: "expire",
        check: |b| match b.expire.as_deref() {
            Some(expire) if !expire.trim().is_empty() => check_expire(expire),
            _ => Check::Missing,
        },
    },
    Rule {
        field: "count",
        check: |b| positive(b.count),
    },
    Rule {
        field: "isPremium",
        check: |b| match b.is_premium {
            Some(_) => Check::Ok,
            None => Check::Missing,
        },
    },
    Rule {
        field: "daysKeys",
        check: |b| match b.expires_by_days_key {
            Some(true) => positive(b.days_keys),
            _ => Check::Ok,
        },
    },
    Rule {
        field: "expiresByDaysKey",
        check: |b| match (b.days_keys, b.expires_by_days_key) {
            (Some(_), None) => Check::Missing,
            _ => Check::Ok,
        },
    },
];

pub const DELETE_KEY: &[Rule<DeleteKeyRequest>] = &[Rule {
    field: "keyValue",
    check: |b| text(&b.key_value),
}];

pub const DELETE_KEYLESS: &[Rule<DeleteKeylessRequest>] = &[Rule {
    field: "hwid",
    check: |b| text(&b.hwid),
}];

pub const CHECK_IDENTIFIER: &[Rule<CheckIdentifierRequest>] = &[Rule {
    field: "identifier",
    check: |b| text(&b.identifier),
}];

pub const EXTEND_KEY_EXPIRATION: &[Rule<ExtendKeyExpirationRequest>] = &[
    Rule {
        field: "keyValue",
        check: |b| text(&b.key_value),
    },
    Rule {
        field: "days",
        check: |b| positive(b.days),
    },
];

pub const FETCH_KEY: &[Rule<FetchKeyRequest>] = &[Rule {
    field: "searchTerm",
    check: |b| text(&b.search_term),
}];

// `hwid` is not listed: when absent it is derived after these rules pass.
pub const VALIDATE_KEY: &[Rule<ValidateKeyRequest>] = &[
    Rule {
        field: "keyValue",
        check: |b| {
            if b.keyless {
                Check::Ok
            } else {
                text(&b.key_value)
            }
        },
    },
    Rule {
        field: "service",
        check: |b| text(&b.service),
    },
];
