use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("malformed parameter map: {0}")]
    MalformedParams(String),

    #[error("'{0}' may not be blank")]
    BlankField(&'static str),

    #[error("unterminated '${{' in: {0}")]
    UnterminatedExpansion(String),
}

pub type ModelResult<T> = Result<T, ModelError>;
