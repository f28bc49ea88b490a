//! Deal metadata recovered from a deal url.
//!
//! Deal urls look like `/activity/<ADDRESS>-<TYPE>-<MMDDYYYY>-<PARTIES>`.
//! The parser is a heuristic: anything it cannot recognise yields empty fields.

use serde::Serialize;

const ACTIVITY_SEGMENT: &str = "/activity/";
const TRANSACTION_TYPES: [&str; 3] = ["sale", "lease", "financing"];

/// Fields derivable from a deal url
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DealUrlMeta {
    pub property: String,
    pub date: String,
    #[serde(rename = "type")]
    pub kind: String,
}

/// Extract property, date and transaction type from a deal url.
pub fn parse_deal_url(url: &str) -> DealUrlMeta {
    let Some(idx) = url.rfind(ACTIVITY_SEGMENT) else {
        return DealUrlMeta::default();
    };

    let parts: Vec<&str> = url[idx + ACTIVITY_SEGMENT.len()..].split('-').collect();
    if parts.len() < 3 {
        return DealUrlMeta::default();
    }

    let Some((type_idx, kind)) = parts.iter().enumerate().find_map(|(i, part)| {
        let lower = part.to_lowercase();
        TRANSACTION_TYPES
            .contains(&lower.as_str())
            .then_some((i, lower))
    }) else {
        return DealUrlMeta::default();
    };

    let property = title_case(&parts[..type_idx].join(" "));
    let date = parts
        .get(type_idx + 1)
        .map(|raw| reformat_date(raw))
        .unwrap_or_default();

    DealUrlMeta {
        property,
        date,
        kind,
    }
}

/// `MMDDYYYY` becomes `YYYY-MM-DD`; anything else passes through unchanged
fn reformat_date(raw: &str) -> String {
    if raw.len() == 8 && raw.bytes().all(|b| b.is_ascii_digit()) {
        format!("{}-{}-{}", &raw[4..], &raw[..2], &raw[2..4])
    } else {
        raw.to_string()
    }
}

/// Uppercase the first letter of every alphabetic run, lowercase the rest
fn title_case(s: &str) -> String {
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
