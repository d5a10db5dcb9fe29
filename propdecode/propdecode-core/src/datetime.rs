//! Parsing of CIM datetime text.
//!
//! Timestamps use the fixed-width form `yyyymmddHHMMSS.ffffff±UUU`, where
//! `UUU` is the UTC offset in minutes. Intervals share the width but carry a
//! day count and a `:000` suffix: `ddddddddHHMMSS.ffffff:000`.

use std::time::Duration;

use chrono::{DateTime, FixedOffset, NaiveDate, TimeZone};

use crate::error::ConversionError;

const CIM_LEN: usize = 25;

pub fn parse_cim_datetime(text: &str) -> Result<DateTime<FixedOffset>, ConversionError> {
    let bytes = check_layout(text)?;
    let offset_sign = match bytes[21] {
        b'+' => 1,
        b'-' => -1,
        b':' => return Err(ConversionError::timestamp(text, "interval where timestamp expected")),
        _ => return Err(ConversionError::timestamp(text, "expected '+' or '-' at offset 21")),
    };

    let year = digits(text, 0..4)?;
    let month = digits(text, 4..6)?;
    let day = digits(text, 6..8)?;
    let (hour, minute, second, micros) = clock(text)?;
    let offset_minutes = digits(text, 22..25)? as i32;

    let date = NaiveDate::from_ymd_opt(year as i32, month, day)
        .ok_or_else(|| ConversionError::timestamp(text, "invalid calendar date"))?;
    let naive = date
        .and_hms_micro_opt(hour, minute, second, micros)
        .ok_or_else(|| ConversionError::timestamp(text, "invalid time of day"))?;
    let offset = FixedOffset::east_opt(offset_sign * offset_minutes * 60)
        .ok_or_else(|| ConversionError::timestamp(text, "UTC offset out of range"))?;

    offset
        .from_local_datetime(&naive)
        .single()
        .ok_or_else(|| ConversionError::timestamp(text, "ambiguous local time"))
}

pub fn parse_cim_interval(text: &str) -> Result<Duration, ConversionError> {
    let bytes = check_layout(text)?;
    if bytes[21] != b':' || &text[22..] != "000" {
        return Err(ConversionError::timestamp(text, "expected ':000' interval suffix"));
    }

    let days = u64::from(digits(text, 0..8)?);
    let (hours, minutes, seconds, micros) = clock(text)?;
    if hours > 23 || minutes > 59 || seconds > 59 {
        return Err(ConversionError::timestamp(text, "invalid interval clock fields"));
    }

    let secs = days * 86_400 + u64::from(hours) * 3_600 + u64::from(minutes) * 60 + u64::from(seconds);
    Ok(Duration::from_secs(secs) + Duration::from_micros(u64::from(micros)))
}

fn check_layout(text: &str) -> Result<&[u8], ConversionError> {
    let bytes = text.as_bytes();
    if !text.is_ascii() {
        return Err(ConversionError::timestamp(text, "non-ASCII characters"));
    }
    if bytes.len() != CIM_LEN {
        return Err(ConversionError::timestamp(
            text,
            format!("expected {CIM_LEN} characters, got {}", bytes.len()),
        ));
    }
    if bytes[14] != b'.' {
        return Err(ConversionError::timestamp(text, "expected '.' at offset 14"));
    }
    Ok(bytes)
}

fn clock(text: &str) -> Result<(u32, u32, u32, u32), ConversionError> {
    Ok((
        digits(text, 8..10)?,
        digits(text, 10..12)?,
        digits(text, 12..14)?,
        digits(text, 15..21)?,
    ))
}

fn digits(text: &str, range: std::ops::Range<usize>) -> Result<u32, ConversionError> {
    let part = &text[range.clone()];
    if part.contains('*') {
        return Err(ConversionError::timestamp(text, "wildcard fields are not supported"));
    }
    if !part.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ConversionError::timestamp(
            text,
            format!("non-digit characters at offset {}", range.start),
        ));
    }
    part.parse()
        .map_err(|_| ConversionError::timestamp(text, format!("bad number at offset {}", range.start)))
}
