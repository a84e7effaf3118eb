use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Io Error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Json Error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("tripwire endpoints coincide at ({0}, {1})")]
    DegenerateTripwire(f32, f32),

    #[error("zone top-left ({0}, {1}) is not above-left of bottom-right ({2}, {3})")]
    InvalidZone(f32, f32, f32, f32),

    #[error("class `{0}` is not in the label table")]
    UnknownClass(String),

    #[error("malformed dump at line {line}: {reason}")]
    MalformedDump { line: usize, reason: String },
}
