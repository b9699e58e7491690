use thiserror::Error;
use trellis_core::ValueError;

#[derive(Debug, Error)]
pub enum FormError {
    #[error("invalid field path `{0}`")]
    InvalidPath(String),
    #[error("no field at `{0}`")]
    FieldNotFound(String),
    #[error("void field `{0}` holds no value")]
    VoidField(String),
    #[error("field `{0}` is not an array field")]
    NotArray(String),
    #[error("schema error: {0}")]
    Schema(#[from] serde_json::Error),
    #[error("value error: {0}")]
    Value(#[from] ValueError),
}
