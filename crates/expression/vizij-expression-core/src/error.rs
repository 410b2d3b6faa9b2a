use thiserror::Error;

/// Errors raised while configuring the engine. Frame updates never fail.
#[derive(Debug, Error)]
pub enum ExpressionError {
    #[error("invalid config value for {field}: {value}")]
    InvalidConfig { field: &'static str, value: f32 },
    #[error("intensity for emotion '{label}' must be in (0, 1], got {value}")]
    InvalidIntensity { label: String, value: f32 },
    #[error("catalog json parse error: {0}")]
    CatalogParse(#[from] serde_json::Error),
}
