use crate::error::{ConversionError, Result};
use crate::models::{Axis, DmsValue};

/// Split decimal degrees into degrees, minutes and seconds.
///
/// The sign is kept in `negative` so that -0.5 becomes `-0° 30' 00"` rather
/// than losing its sign when the whole degrees truncate to zero.
///
/// # Examples
/// ```
/// use utm_converter::utils::coordinates::to_dms;
///
/// let dms = to_dms(-45.5125);
/// assert!(dms.negative);
/// assert_eq!((dms.degrees, dms.minutes), (45, 30));
/// assert!((dms.seconds - 45.0).abs() < 1e-6);
/// ```
pub fn to_dms(value_deg: f64) -> DmsValue {
    let negative = value_deg < 0.0;
    let magnitude = value_deg.abs();

    let degrees = magnitude.floor();
    let minutes_decimal = (magnitude - degrees) * 60.0;
    let minutes = minutes_decimal.floor();
    let seconds = (minutes_decimal - minutes) * 60.0;

    DmsValue {
        negative,
        degrees: degrees as u32,
        minutes: minutes as u32,
        seconds,
    }
}

/// Render as `-45° 00' 00.00"`.
pub fn format_international(value: &DmsValue, precision: usize) -> String {
    let (degrees, minutes, seconds) = round_for_display(value, precision);
    let sign = if value.negative && !(degrees == 0 && minutes == 0 && seconds == 0.0) {
        "-"
    } else {
        ""
    };

    format!(
        "{}{}° {:02}' {:0width$.prec$}\"",
        sign,
        degrees,
        minutes,
        seconds,
        width = seconds_width(precision),
        prec = precision
    )
}

/// Render as `45 00 00,000 W`: unsigned, decimal comma, cardinal letter.
pub fn format_brazilian(value: &DmsValue, axis: Axis, precision: usize) -> String {
    let (degrees, minutes, seconds) = round_for_display(value, precision);
    let body = format!(
        "{} {:02} {:0width$.prec$}",
        degrees,
        minutes,
        seconds,
        width = seconds_width(precision),
        prec = precision
    )
    .replace('.', ",");

    format!("{} {}", body, axis.direction_letter(value.negative))
}

/// Decimal degrees with a fixed number of fractional digits
pub fn format_decimal(value_deg: f64, precision: usize) -> String {
    format!("{:.prec$}", value_deg, prec = precision)
}

/// Round seconds to the display precision, carrying 60" into minutes and
/// 60' into degrees.
fn round_for_display(value: &DmsValue, precision: usize) -> (u32, u32, f64) {
    let scale = 10f64.powi(precision as i32);
    let mut seconds = (value.seconds * scale).round() / scale;
    let mut minutes = value.minutes;
    let mut degrees = value.degrees;

    if seconds >= 60.0 {
        seconds -= 60.0;
        minutes += 1;
    }
    if minutes >= 60 {
        minutes -= 60;
        degrees += 1;
    }

    (degrees, minutes, seconds.abs())
}

fn seconds_width(precision: usize) -> usize {
    if precision == 0 {
        2
    } else {
        precision + 3
    }
}

/// Parse a DMS string back to decimal degrees.
///
/// Accepts the international rendering (`-27° 07' 20.89"`), the Brazilian
/// rendering (`27 07 20,891 S`) and colon-separated `DD:MM:SS`.
pub fn dms_to_decimal(dms: &str) -> Result<f64> {
    let trimmed = dms.trim();
    let mut negative = trimmed.starts_with('-');

    let mut body = trimmed.trim_start_matches('-').to_string();
    if let Some(last) = body.chars().last() {
        match last.to_ascii_uppercase() {
            'W' | 'S' | 'O' => {
                negative = true;
                body.pop();
            }
            'E' | 'N' | 'L' => {
                body.pop();
            }
            _ => {}
        }
    }

    let normalized: String = body
        .chars()
        .map(|c| match c {
            '°' | '\'' | '"' | ':' => ' ',
            ',' => '.',
            other => other,
        })
        .collect();
    let parts: Vec<&str> = normalized.split_whitespace().collect();

    if parts.len() != 3 {
        return Err(ConversionError::ValueParse(format!(
            "Invalid DMS format: '{}'. Expected degrees, minutes and seconds",
            dms
        )));
    }

    let degrees = parts[0].parse::<f64>().map_err(|_| {
        ConversionError::ValueParse(format!("Invalid degrees value: '{}'", parts[0]))
    })?;

    let minutes = parts[1].parse::<f64>().map_err(|_| {
        ConversionError::ValueParse(format!("Invalid minutes value: '{}'", parts[1]))
    })?;

    let seconds = parts[2].parse::<f64>().map_err(|_| {
        ConversionError::ValueParse(format!("Invalid seconds value: '{}'", parts[2]))
    })?;

    if !(0.0..60.0).contains(&minutes) {
        return Err(ConversionError::ValueParse(format!(
            "Minutes must be between 0 and 60, got: {}",
            minutes
        )));
    }

    if !(0.0..60.0).contains(&seconds) {
        return Err(ConversionError::ValueParse(format!(
            "Seconds must be between 0 and 60, got: {}",
            seconds
        )));
    }

    let decimal_value = degrees.abs() + minutes / 60.0 + seconds / 3600.0;

    if negative {
        Ok(-decimal_value)
    } else {
        Ok(decimal_value)
    }
}

/// Parse a planar coordinate cell, accepting a decimal comma.
///
/// `"500000,25"` and `" 500000.25 "` both give 500000.25.
pub fn parse_planar_value(cell: &str) -> Result<f64> {
    let normalized = cell.replace(',', ".");
    let trimmed = normalized.trim();

    if trimmed.is_empty() {
        return Err(ConversionError::ValueParse("empty value".to_string()));
    }

    let value = trimmed.parse::<f64>().map_err(|_| {
        ConversionError::ValueParse(format!("invalid number '{}'", cell.trim()))
    })?;

    if !value.is_finite() {
        return Err(ConversionError::ValueParse(format!(
            "non-finite number '{}'",
            cell.trim()
        )));
    }

    Ok(value)
}
