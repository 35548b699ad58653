// Cell normalizer: the single place where spreadsheet cells become numbers.
use serde::Deserialize;
use shared::models::Cell;
use tracing::debug;

// Brazilian number and clock-time text handling.
pub mod brazilian_format {
    use anyhow::{anyhow, Result};
    use std::str::FromStr;

    // Parses money and percentage text like "R$ 1.234,56", "25%" or "123,45" into f64.
    // Grouping dots go first, then the decimal comma becomes a period.
    pub fn parse_decimal(s: &str) -> Result<f64> {
        let normalized: String = s
            .replace("R$", "")
            .replace('%', "")
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .replace('.', "") // Remove thousand separators
            .replace(',', "."); // Replace decimal separator

        if normalized.is_empty() {
            return Err(anyhow!("No digits in '{}'", s));
        }

        let value = f64::from_str(&normalized).map_err(|e| anyhow!("Failed to parse decimal '{}': {}", s, e))?;
        if !value.is_finite() {
            return Err(anyhow!("Decimal '{}' is not a finite number", s));
        }
        Ok(value)
    }

    // Parses "H:MM:SS" or "H:MM" into hours, optionally preceded by a day count
    // ("2 days 03:00:00", "1 day, 2:30:00"). Hours may exceed 24.
    pub fn parse_clock_hours(s: &str) -> Result<f64> {
        let trimmed = s.trim();
        let (day_part, clock) = match trimmed.rsplit_once(char::is_whitespace) {
            Some((days, clock)) => (Some(days), clock),
            None => (None, trimmed),
        };

        let days = match day_part {
            Some(days) => {
                let count = days
                    .split_whitespace()
                    .next()
                    .ok_or_else(|| anyhow!("Missing day count in '{}'", s))?;
                f64::from_str(count).map_err(|e| anyhow!("Failed to parse day count in '{}': {}", s, e))?
            }
            None => 0.0,
        };

        let parts: Vec<&str> = clock.split(':').collect();
        if parts.len() < 2 || parts.len() > 3 {
            return Err(anyhow!("Failed to parse clock time '{}'", s));
        }
        let hours = f64::from_str(parts[0]).map_err(|e| anyhow!("Failed to parse hours in '{}': {}", s, e))?;
        let minutes = f64::from_str(parts[1]).map_err(|e| anyhow!("Failed to parse minutes in '{}': {}", s, e))?;
        let seconds = match parts.get(2) {
            Some(sec) => f64::from_str(&sec.replace(',', ".")).map_err(|e| anyhow!("Failed to parse seconds in '{}': {}", s, e))?,
            None => 0.0,
        };
        if !(0.0..60.0).contains(&minutes) || !(0.0..60.0).contains(&seconds) {
            return Err(anyhow!("Clock time '{}' out of range", s));
        }

        let total = days * 24.0 + hours + minutes / 60.0 + seconds / 3600.0;
        if !total.is_finite() {
            return Err(anyhow!("Clock time '{}' is not a finite number", s));
        }
        Ok(total)
    }

}

/// How plain numbers in the labor-hour columns are to be read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HoursEncoding {
    /// Numbers are fractions of a day (spreadsheet duration cells); multiply by 24.
    #[default]
    DayFraction,
    /// Numbers are already hours.
    Hours,
}

/// Number in the cell, or `None` when text is present but cannot be read as one.
/// Empty and blank cells read as 0.0; they are not failures.
pub fn try_normalize_number(cell: &Cell) -> Option<f64> {
    match cell {
        Cell::Empty => Some(0.0),
        Cell::Number(n) if n.is_nan() => Some(0.0),
        Cell::Number(n) if n.is_finite() => Some(*n),
        Cell::Number(_) => None,
        Cell::Text(s) if s.trim().is_empty() => Some(0.0),
        Cell::Text(s) => match brazilian_format::parse_decimal(s) {
            Ok(value) => Some(value),
            Err(e) => {
                debug!(cell = %s, error = %e, "Numeric cell substituted with 0");
                None
            }
        },
    }
}

/// Locale-aware number parsing. Never fails: unreadable cells become 0.0.
pub fn normalize_number(cell: &Cell) -> f64 {
    try_normalize_number(cell).unwrap_or(0.0)
}

/// Labor-hour duration in hours, or `None` when text is present but unreadable.
pub fn try_normalize_duration(cell: &Cell, encoding: HoursEncoding) -> Option<f64> {
    let scale = match encoding {
        HoursEncoding::DayFraction => 24.0,
        HoursEncoding::Hours => 1.0,
    };
    match cell {
        Cell::Text(s) if s.contains(':') => match brazilian_format::parse_clock_hours(s) {
            Ok(hours) => Some(hours),
            Err(e) => {
                debug!(cell = %s, error = %e, "Duration cell substituted with 0");
                None
            }
        },
        other => try_normalize_number(other).map(|value| value * scale),
    }
}

/// Duration cell converted to hours with the spreadsheet day-fraction convention.
/// Never fails: unreadable cells become 0.0.
pub fn normalize_duration(cell: &Cell) -> f64 {
    try_normalize_duration(cell, HoursEncoding::DayFraction).unwrap_or(0.0)
}
