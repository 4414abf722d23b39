use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum PriceError {
    #[error("Source not found: {}", .0.display())]
    SourceNotFound(PathBuf),

    #[error("Source is empty: {}", .0.display())]
    EmptySource(PathBuf),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Insufficient data for {statistic}: need {required} points, have {available}")]
    InsufficientData {
        statistic: &'static str,
        required: usize,
        available: usize,
    },

    #[error("Zero baseline for {0}")]
    ZeroBaseline(&'static str),
}

impl PriceError {
    /// Whether the error means "no data to render" rather than a real fault.
    pub fn is_no_data(&self) -> bool {
        matches!(self, PriceError::SourceNotFound(_) | PriceError::EmptySource(_))
    }

    /// Whether a statistic could not be computed from the points available.
    pub fn is_insufficient_data(&self) -> bool {
        matches!(
            self,
            PriceError::InsufficientData { .. } | PriceError::ZeroBaseline(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, PriceError>;
