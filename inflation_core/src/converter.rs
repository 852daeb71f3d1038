// inflation_core/src/converter.rs

//! Value converter: validates a calculation request, resolves both years
//! through an `IndexSource` and derives the inflation-adjusted figures.
//!
//! The conversion is a pure function of the request and the table:
//!
//! ```text
//! equivalent_value       = amount * (end_index / start_index)
//! inflation_rate_percent = ((end_index - start_index) / start_index) * 100
//! purchasing_power_lost  = amount - amount * (start_index / end_index)
//! ```
//!
//! No rounding happens here; see `format` for display helpers.

use crate::error::{CalcError, InputField};
use crate::format;
use crate::index_table::IndexSource;

/// A single user-supplied field, either as typed text or as a number.
#[derive(Debug, Clone, PartialEq)]
pub enum RawInput {
    Text(String),
    Number(f64),
}

impl From<&str> for RawInput {
    fn from(value: &str) -> Self {
        RawInput::Text(value.to_string())
    }
}

impl From<String> for RawInput {
    fn from(value: String) -> Self {
        RawInput::Text(value)
    }
}

impl From<f64> for RawInput {
    fn from(value: f64) -> Self {
        RawInput::Number(value)
    }
}

impl From<i32> for RawInput {
    fn from(value: i32) -> Self {
        RawInput::Number(value as f64)
    }
}

/// A request that passed input validation.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct CalculationRequest {
    pub amount: f64,
    pub start_year: i32,
    pub end_year: i32,
}

impl CalculationRequest {
    /// Validates raw inputs in order: amount, year format, year range.
    /// Each step fails on its own before any lookup takes place.
    pub fn parse(
        amount: impl Into<RawInput>,
        start_year: impl Into<RawInput>,
        end_year: impl Into<RawInput>,
    ) -> Result<Self, CalcError> {
        let amount = parse_amount(&amount.into())?;
        let start_year = parse_year(&start_year.into())?;
        let end_year = parse_year(&end_year.into())?;

        if start_year >= end_year {
            return Err(CalcError::InvalidRange { start_year, end_year });
        }

        Ok(Self { amount, start_year, end_year })
    }
}

/// Derived figures for one request. Produced fresh on every call.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct CalculationResult {
    pub equivalent_value: f64,
    pub inflation_rate_percent: f64,
    /// Negative when purchasing power was gained over a deflationary interval.
    pub purchasing_power_lost: f64,
    pub start_year: i32,
    pub end_year: i32,
    pub initial_amount: f64,
}

impl CalculationResult {
    /// One-line sentence, e.g. "$100 in 1995 is equivalent to $213.25 in 2025."
    pub fn summary(&self) -> String {
        format!(
            "${} in {} is equivalent to {} in {}.",
            format::format_amount(self.initial_amount),
            self.start_year,
            format::format_currency(self.equivalent_value),
            self.end_year,
        )
    }

    /// Converts the result into labelled rows for display.
    pub fn to_stats_list(&self) -> Vec<(String, String)> {
        let mut stats = Vec::new();

        stats.push(("Initial Amount".to_string(), format!("${}", format::format_amount(self.initial_amount))));
        stats.push(("Equivalent Value".to_string(), format::format_currency(self.equivalent_value)));
        stats.push(("Total Inflation Rate".to_string(), format::format_percent(self.inflation_rate_percent)));
        stats.push(("Purchasing Power Lost".to_string(), format::format_currency(self.purchasing_power_lost)));

        stats
    }
}

/// Runs calculations against an injected index source.
pub struct Converter<'a, S: IndexSource + ?Sized> {
    source: &'a S,
}

impl<'a, S: IndexSource + ?Sized> Converter<'a, S> {
    pub fn new(source: &'a S) -> Self {
        Self { source }
    }

    /// Validates the inputs, looks up both years and derives the result.
    /// A `DataUnavailable` failure from the source is passed through untouched.
    pub fn calculate(
        &self,
        amount: impl Into<RawInput>,
        start_year: impl Into<RawInput>,
        end_year: impl Into<RawInput>,
    ) -> Result<CalculationResult, CalcError> {
        let request = CalculationRequest::parse(amount, start_year, end_year)
            .inspect_err(|e| log::warn!("Rejected calculation request: {}", e))?;
        self.calculate_request(&request)
    }

    pub fn calculate_request(&self, request: &CalculationRequest) -> Result<CalculationResult, CalcError> {
        log::debug!(
            "Calculating {} from {} to {}",
            request.amount,
            request.start_year,
            request.end_year,
        );
        guarded(|| {
            let found = self.source.lookup(&[request.start_year, request.end_year])?;
            derive(request, &found)
        })
    }
}

/// Convenience wrapper around `Converter::calculate`.
pub fn calculate<S: IndexSource + ?Sized>(
    source: &S,
    amount: impl Into<RawInput>,
    start_year: impl Into<RawInput>,
    end_year: impl Into<RawInput>,
) -> Result<CalculationResult, CalcError> {
    Converter::new(source).calculate(amount, start_year, end_year)
}

/// Runs `f`, turning a panic (typically from an injected `IndexSource`) into
/// `CalcError::Internal` so it never crosses the `calculate` boundary.
pub(crate) fn guarded<T>(f: impl FnOnce() -> Result<T, CalcError>) -> Result<T, CalcError> {
    std::panic::catch_unwind(std::panic::AssertUnwindSafe(f)).unwrap_or_else(|panic| {
        let detail = panic_detail(panic.as_ref());
        log::warn!("Calculation fault: {}", detail);
        Err(CalcError::Internal { detail })
    })
}

/// Derives the result from a validated request and the resolved index values.
///
/// A non-finite figure is reported as `CalcError::Internal`.
pub fn derive(
    request: &CalculationRequest,
    found: &std::collections::BTreeMap<i32, f64>,
) -> Result<CalculationResult, CalcError> {
    let (start_index, end_index) = match (found.get(&request.start_year), found.get(&request.end_year)) {
        (Some(&start), Some(&end)) if start > 0.0 && end > 0.0 => (start, end),
        _ => {
            return Err(CalcError::Internal {
                detail: "CPI data not available for the selected years.".to_string(),
            });
        }
    };

    let result = compute(*request, start_index, end_index);

    let figures = [
        result.equivalent_value,
        result.inflation_rate_percent,
        result.purchasing_power_lost,
    ];
    if figures.iter().any(|value| !value.is_finite()) {
        log::warn!("Non-finite result for {:?}: {:?}", request, figures);
        return Err(CalcError::Internal {
            detail: "calculation produced a non-finite value".to_string(),
        });
    }

    Ok(result)
}

fn compute(request: CalculationRequest, start_index: f64, end_index: f64) -> CalculationResult {
    let amount = request.amount;

    CalculationResult {
        equivalent_value: amount * (end_index / start_index),
        inflation_rate_percent: ((end_index - start_index) / start_index) * 100.0,
        purchasing_power_lost: amount - (amount * (start_index / end_index)),
        start_year: request.start_year,
        end_year: request.end_year,
        initial_amount: amount,
    }
}

fn panic_detail(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "calculation panicked".to_string()
    }
}

fn parse_amount(input: &RawInput) -> Result<f64, CalcError> {
    let amount = match input {
        RawInput::Text(text) => text.trim().parse::<f64>().ok(),
        RawInput::Number(number) => Some(*number),
    };

    match amount {
        Some(amount) if amount.is_finite() && amount > 0.0 => Ok(amount),
        _ => Err(CalcError::InvalidInput { field: InputField::Amount }),
    }
}

fn parse_year(input: &RawInput) -> Result<i32, CalcError> {
    let year = match input {
        RawInput::Text(text) => text.trim().parse::<i32>().ok(),
        RawInput::Number(number) => {
            let in_range = *number >= i32::MIN as f64 && *number <= i32::MAX as f64;
            if number.is_finite() && number.fract() == 0.0 && in_range {
                Some(*number as i32)
            } else {
                None
            }
        }
    };

    year.ok_or(CalcError::InvalidInput { field: InputField::YearFormat })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index_table::IndexTable;

    const EPS: f64 = 1e-9;

    fn assert_approx(actual: f64, expected: f64, tol: f64) {
        assert!(
            (actual - expected).abs() <= tol,
            "expected {expected}, got {actual}, tolerance {tol}"
        );
    }

    fn two_year_table() -> IndexTable {
        IndexTable::new([(1995, 152.4), (2025, 325.0)]).unwrap()
    }

    #[test]
    fn converts_1995_to_2025() {
        let result = calculate(&two_year_table(), 100.0, 1995, 2025).unwrap();

        assert_approx(result.equivalent_value, 213.2546, 1e-4);
        assert_approx(result.inflation_rate_percent, 113.2546, 1e-4);
        assert_approx(result.purchasing_power_lost, 53.1077, 1e-4);
        assert_approx(result.equivalent_value, 100.0 * 325.0 / 152.4, EPS);
        assert_eq!(result.start_year, 1995);
        assert_eq!(result.end_year, 2025);
        assert_eq!(result.initial_amount, 100.0);
    }

    #[test]
    fn accepts_text_inputs() {
        let from_text = calculate(&two_year_table(), " 100 ", "1995", "2025").unwrap();
        let from_numbers = calculate(&two_year_table(), 100.0, 1995, 2025).unwrap();
        assert_eq!(from_text, from_numbers);
    }

    #[test]
    fn inverted_range_is_rejected() {
        let err = calculate(&two_year_table(), 100.0, 2025, 1995).unwrap_err();
        assert_eq!(err, CalcError::InvalidRange { start_year: 2025, end_year: 1995 });
    }

    #[test]
    fn equal_years_are_rejected() {
        let err = calculate(&two_year_table(), 100.0, 1995, 1995).unwrap_err();
        assert_eq!(err.kind(), "InvalidRange");
    }

    #[test]
    fn bad_amounts_are_rejected_first() {
        let amount_err = CalcError::InvalidInput { field: InputField::Amount };
        for amount in ["abc", "", "0", "-5", "NaN", "inf"] {
            assert_eq!(calculate(&two_year_table(), amount, "x", 1995).unwrap_err(), amount_err, "{amount:?}");
        }
        assert_eq!(calculate(&two_year_table(), f64::NAN, 1995, 2025).unwrap_err(), amount_err);
    }

    #[test]
    fn non_integer_years_are_rejected_before_range_check() {
        let year_err = CalcError::InvalidInput { field: InputField::YearFormat };
        assert_eq!(calculate(&two_year_table(), 100.0, "nineteen", 2025).unwrap_err(), year_err);
        assert_eq!(calculate(&two_year_table(), 100.0, 1995, "2025.5").unwrap_err(), year_err);
        assert_eq!(calculate(&two_year_table(), 100.0, 2025.5, 1995).unwrap_err(), year_err);
    }

    #[test]
    fn missing_year_is_reported_with_range() {
        let err = calculate(&two_year_table(), 50.0, 1995, 2030).unwrap_err();
        assert_eq!(
            err,
            CalcError::DataUnavailable {
                missing_years: vec![2030],
                min_supported: 1995,
                max_supported: 2025,
            }
        );
    }

    #[test]
    fn deflation_yields_negative_rate_and_gain() {
        let table = IndexTable::new([(2008, 215.3), (2009, 214.5)]).unwrap();
        let result = calculate(&table, 1000.0, 2008, 2009).unwrap();

        assert!(result.inflation_rate_percent < 0.0);
        assert!(result.purchasing_power_lost < 0.0);
        assert!(result.equivalent_value < 1000.0);
    }

    #[test]
    fn overflow_is_reported_as_internal() {
        let table = IndexTable::new([(2000, 1.0), (2001, 10.0)]).unwrap();
        let err = calculate(&table, f64::MAX, 2000, 2001).unwrap_err();
        assert_eq!(err.kind(), "Internal");
    }

    struct FaultySource;

    impl IndexSource for FaultySource {
        fn lookup(&self, _years: &[i32]) -> Result<std::collections::BTreeMap<i32, f64>, CalcError> {
            panic!("backend fault");
        }

        fn supported_range(&self) -> (i32, i32) {
            (1980, 2025)
        }
    }

    #[test]
    fn faulting_source_is_reported_as_internal() {
        let outcome = std::panic::catch_unwind(|| calculate(&FaultySource, 100.0, 1995, 2025));
        let err = outcome.expect("fault escaped calculate").unwrap_err();
        assert_eq!(err, CalcError::Internal { detail: "backend fault".to_string() });
    }

    #[test]
    fn faulting_source_does_not_hide_validation_errors() {
        let err = calculate(&FaultySource, 100.0, 2025, 1995).unwrap_err();
        assert_eq!(err.kind(), "InvalidRange");
    }

    #[test]
    fn derive_without_resolved_years_is_internal() {
        let request = CalculationRequest { amount: 1.0, start_year: 1995, end_year: 2025 };
        let err = derive(&request, &std::collections::BTreeMap::new()).unwrap_err();
        assert_eq!(err.kind(), "Internal");
    }

    #[test]
    fn summary_and_stats_are_rounded_for_display() {
        let result = calculate(&two_year_table(), 100.0, 1995, 2025).unwrap();
        assert_eq!(result.summary(), "$100 in 1995 is equivalent to $213.25 in 2025.");

        let stats = result.to_stats_list();
        assert!(stats.contains(&("Total Inflation Rate".to_string(), "113.25%".to_string())));
        assert!(stats.contains(&("Purchasing Power Lost".to_string(), "$53.11".to_string())));
    }

    mod properties {
        use super::*;
        use proptest::prelude::{prop_assert, prop_assert_eq, proptest};

        proptest! {
            #[test]
            fn equivalent_value_matches_index_ratio(
                amount in 0.01f64..1.0e9,
                start_index in 1.0f64..1000.0,
                end_index in 1.0f64..1000.0,
            ) {
                let table = IndexTable::new([(1990, start_index), (2020, end_index)]).unwrap();
                let result = calculate(&table, amount, 1990, 2020).unwrap();
                let expected = amount * end_index / start_index;
                prop_assert!((result.equivalent_value - expected).abs() <= EPS * expected.abs());
            }

            #[test]
            fn repeated_calls_are_identical(amount in 0.01f64..1.0e6, start in 1980i32..2025, span in 1i32..46) {
                let end = (start + span).min(2025);
                let table = IndexTable::builtin();
                let first = calculate(&table, amount, start, end).unwrap();
                let second = calculate(&table, amount, start, end).unwrap();
                prop_assert_eq!(first, second);
            }

            #[test]
            fn converting_back_restores_amount(amount in 0.01f64..1.0e6, y1 in 1980i32..2025, span in 1i32..46) {
                let y2 = (y1 + span).min(2025);
                let table = IndexTable::builtin();
                let forward = calculate(&table, amount, y1, y2).unwrap();
                let found = table.lookup(&[y1, y2]).unwrap();
                // The converter refuses inverted ranges, so apply the reverse ratio directly.
                let back = forward.equivalent_value * (found[&y1] / found[&y2]);
                prop_assert!((back - amount).abs() <= EPS * amount);
            }

            #[test]
            fn non_increasing_range_is_always_invalid(amount in 0.01f64..1.0e6, start in 1900i32..2100, delta in 0i32..200) {
                let err = calculate(&IndexTable::builtin(), amount, start, start - delta).unwrap_err();
                prop_assert_eq!(err.kind(), "InvalidRange");
            }

            #[test]
            fn non_positive_amount_is_always_invalid(amount in -1.0e9f64..=0.0, start in 1900i32..2100, end in 1900i32..2100) {
                let err = calculate(&IndexTable::builtin(), amount, start, end).unwrap_err();
                prop_assert_eq!(err, CalcError::InvalidInput { field: InputField::Amount });
            }

            #[test]
            fn out_of_range_year_names_exactly_that_year(year in 2026i32..3000) {
                let err = calculate(&IndexTable::builtin(), 100.0, 1995, year).unwrap_err();
                prop_assert_eq!(
                    err,
                    CalcError::DataUnavailable { missing_years: vec![year], min_supported: 1980, max_supported: 2025 }
                );
            }
        }
    }
}
