//! Shared helper functions for CLI commands

use std::path::Path;

use console::style;
use miette::{miette, IntoDiagnostic, Result, WrapErr};

use crate::core::stats::StatsError;
use crate::raw::{self, RawFile};

/// Decode a raw file from a path, with `-` reading standard input.
pub fn load_raw(input: &str) -> Result<RawFile> {
    let decoded = if input == "-" {
        raw::read_stdin()
    } else {
        raw::read_file(Path::new(input))
    };
    decoded
        .into_diagnostic()
        .wrap_err_with(|| format!("failed to decode '{input}'"))
}

/// Resolve a `--column` selector (index or variable name) to a column
/// index. Column 0 (time) is not selectable for analysis.
pub fn resolve_column(raw: &RawFile, selector: &str) -> Result<usize> {
    let vars = &raw.header.variables;

    if let Ok(index) = selector.parse::<usize>() {
        if index == 0 || index >= vars.len() {
            return Err(miette!(
                "column {index} out of range ({} data columns)",
                vars.len().saturating_sub(1)
            ));
        }
        return Ok(index);
    }

    vars.iter()
        .position(|v| v == selector)
        .filter(|&index| index != 0)
        .ok_or_else(|| miette!("no column named '{selector}'"))
}

/// Round a value to `digits` significant digits for display.
pub fn smart_round(value: f64, digits: usize) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    if value == 0.0 {
        return "0".to_string();
    }

    let magnitude = value.abs().log10().floor() as i32;
    if magnitude < -4 || magnitude >= digits as i32 + 3 {
        return format!("{:.*e}", digits.saturating_sub(1), value);
    }

    let decimals = (digits as i32 - 1 - magnitude).max(0) as usize;
    let rendered = format!("{value:.decimals$}");
    if rendered.contains('.') {
        rendered
            .trim_end_matches('0')
            .trim_end_matches('.')
            .to_string()
    } else {
        rendered
    }
}

/// Format an optional value, rendering `None` as "-".
pub fn format_opt(value: Option<f64>, digits: usize) -> String {
    value
        .map(|v| smart_round(v, digits))
        .unwrap_or_else(|| "-".to_string())
}

/// Print recoverable analysis diagnostics to stderr.
pub fn report_diagnostics(diagnostics: &[StatsError]) {
    for diagnostic in diagnostics {
        eprintln!(
            "{} {}",
            style("warning:").yellow().bold(),
            diagnostic
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_smart_round_trims_trailing_zeros() {
        assert_eq!(smart_round(0.5, 6), "0.5");
        assert_eq!(smart_round(1.0, 6), "1");
        assert_eq!(smart_round(2.5000001, 3), "2.5");
    }

    #[test]
    fn test_smart_round_keeps_significant_digits() {
        assert_eq!(smart_round(1234.5678, 6), "1234.57");
        assert_eq!(smart_round(0.0012345, 3), "0.00123");
    }

    #[test]
    fn test_smart_round_switches_to_scientific() {
        assert_eq!(smart_round(1.5e-9, 3), "1.50e-9");
        assert!(smart_round(3.2e12, 3).contains('e'));
    }

    #[test]
    fn test_smart_round_non_finite() {
        assert_eq!(smart_round(f64::NAN, 6), "NaN");
        assert_eq!(smart_round(f64::INFINITY, 6), "inf");
    }

    #[test]
    fn test_format_opt_dash_for_none() {
        assert_eq!(format_opt(None, 6), "-");
        assert_eq!(format_opt(Some(4.5), 6), "4.5");
    }
}
