// inflation_core/src/error.rs

//! Failure taxonomy reported by `calculate`.
//! Every variant is recoverable by correcting the input; the message is meant
//! to be shown to the user verbatim.

/// Which input field failed to parse or validate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum InputField {
    #[serde(rename = "amount")]
    Amount,
    #[serde(rename = "year format")]
    YearFormat,
}

impl std::fmt::Display for InputField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InputField::Amount => write!(f, "amount"),
            InputField::YearFormat => write!(f, "year format"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error, serde::Serialize)]
#[serde(tag = "kind")]
pub enum CalcError {
    #[error("{}", invalid_input_message(*field))]
    InvalidInput { field: InputField },

    #[error("Start year must be earlier than the end year.")]
    InvalidRange { start_year: i32, end_year: i32 },

    #[error(
        "CPI data is not available for the following year(s): {}. Please select years between {min_supported} and {max_supported}.",
        join_years(missing_years)
    )]
    DataUnavailable {
        missing_years: Vec<i32>,
        min_supported: i32,
        max_supported: i32,
    },

    /// Unexpected fault caught at the `calculate` boundary.
    #[error("An unknown error occurred: {detail}")]
    Internal { detail: String },
}

impl CalcError {
    /// Short machine-friendly name of the failure kind.
    pub fn kind(&self) -> &'static str {
        match self {
            CalcError::InvalidInput { .. } => "InvalidInput",
            CalcError::InvalidRange { .. } => "InvalidRange",
            CalcError::DataUnavailable { .. } => "DataUnavailable",
            CalcError::Internal { .. } => "Internal",
        }
    }
}

fn invalid_input_message(field: InputField) -> &'static str {
    match field {
        InputField::Amount => "Please enter a valid positive amount.",
        InputField::YearFormat => "Please enter whole-number years for both start and end.",
    }
}

fn join_years(years: &[i32]) -> String {
    years
        .iter()
        .map(|y| y.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
