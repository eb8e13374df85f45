use std::fmt;

#[derive(Debug)]
pub enum EngineError {
    /// An input table is narrower than the pipeline's positional schema.
    TooFewColumns { required: usize, found: usize },
    /// An explicitly supplied period string is not MM/YYYY.
    PeriodFormat { value: String },
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooFewColumns { required, found } => {
                write!(
                    f,
                    "input table must have at least {required} columns, found {found}"
                )
            }
            Self::PeriodFormat { value } => {
                write!(f, "invalid period '{value}': expected MM/YYYY")
            }
        }
    }
}

impl std::error::Error for EngineError {}
