//! Display helpers for the raw strings DICOM stores in its date, time and
//! person-name attributes.

/// `YYYYMMDD` becomes `YYYY-MM-DD`. Anything else is returned trimmed.
pub fn format_date(raw: &str) -> String {
    let value = raw.trim();
    if value.len() == 8 && value.bytes().all(|b| b.is_ascii_digit()) {
        format!("{}-{}-{}", &value[0..4], &value[4..6], &value[6..8])
    } else {
        value.to_string()
    }
}

/// `HHMMSS.ffffff` becomes `HH:MM:SS`. Partial times keep what they have.
pub fn format_time(raw: &str) -> String {
    let value = raw.trim();
    let whole = value.split('.').next().unwrap_or_default();
    if whole.is_empty() || !whole.bytes().all(|b| b.is_ascii_digit()) || whole.len() % 2 != 0 {
        return value.to_string();
    }

    whole
        .as_bytes()
        .chunks(2)
        .take(3)
        .map(|pair| String::from_utf8_lossy(pair).into_owned())
        .collect::<Vec<_>>()
        .join(":")
}

/// Component groups are separated by `=` and components by `^`.
/// Only the alphabetic group is shown.
pub fn format_person_name(raw: &str) -> String {
    let alphabetic = raw.trim().split('=').next().unwrap_or_default();
    alphabetic
        .split('^')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn format_frame_rate(rate: Option<f64>) -> String {
    match rate {
        Some(rate) if rate.fract() == 0.0 => format!("{rate:.0}"),
        Some(rate) => format!("{rate:.2}"),
        None => String::from("unknown"),
    }
}
