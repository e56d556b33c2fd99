use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FilterError {
    #[error("Invalid value for '{param}': must be a number")]
    NotANumber { param: &'static str },

    #[error("Invalid value for '{param}': must not be negative")]
    Negative { param: &'static str },

    #[error("Invalid value for '{param}': must be a positive integer")]
    NotPositiveInteger { param: &'static str },
}

impl FilterError {
    /// Name of the query parameter that failed validation
    pub fn param(&self) -> &'static str {
        match self {
            FilterError::NotANumber { param }
            | FilterError::Negative { param }
            | FilterError::NotPositiveInteger { param } => param,
        }
    }

    /// Machine-readable failure reason
    pub fn reason(&self) -> &'static str {
        match self {
            FilterError::NotANumber { .. } => "not_a_number",
            FilterError::Negative { .. } => "negative",
            FilterError::NotPositiveInteger { .. } => "not_a_positive_integer",
        }
    }
}
