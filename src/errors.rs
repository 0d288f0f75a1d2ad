use thiserror::Error;

#[derive(Error, Debug)]
pub enum PaletteError {
    #[error("Failed to fetch '{url}': {message}")]
    Fetch { url: String, message: String },

    #[error("Failed to decode image from '{url}': {message}")]
    Decode { url: String, message: String },

    #[error("Scan task failed: {message}")]
    ScanTask { message: String },

    #[error("Found {found} distinct colors, need at least {required}")]
    InsufficientDistinctColors { found: usize, required: usize },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("IO error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    #[error("JSON parsing error: {source}")]
    Json {
        #[from]
        source: serde_json::Error,
    },
}

pub type Result<T> = std::result::Result<T, PaletteError>;

impl PaletteError {
    /// Returns true if this error is confined to a single image, in which
    /// case the batch records it and moves on to the next URL.
    pub fn is_per_image(&self) -> bool {
        matches!(
            self,
            PaletteError::Fetch { .. }
                | PaletteError::Decode { .. }
                | PaletteError::ScanTask { .. }
                | PaletteError::InsufficientDistinctColors { .. }
        )
    }

    /// Returns an error code for programmatic handling; also used as the
    /// error marker in output records.
    pub fn error_code(&self) -> &'static str {
        match self {
            PaletteError::Fetch { .. } => "FETCH_ERROR",
            PaletteError::Decode { .. } => "DECODE_ERROR",
            PaletteError::ScanTask { .. } => "SCAN_TASK_FAILURE",
            PaletteError::InsufficientDistinctColors { .. } => "INSUFFICIENT_DISTINCT_COLORS",
            PaletteError::Config { .. } => "CONFIG_ERROR",
            PaletteError::Io { .. } => "IO_ERROR",
            PaletteError::Json { .. } => "JSON_ERROR",
        }
    }
}
