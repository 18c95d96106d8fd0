use fintrack_domain::Kind;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Malformed {kind} input: {detail}")]
    InputShape { kind: Kind, detail: String },
}

impl CoreError {
    pub fn input_shape(kind: Kind, detail: impl Into<String>) -> Self {
        CoreError::InputShape {
            kind,
            detail: detail.into(),
        }
    }
}
