use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExecError {
    #[error("failed to build http client: {0}")]
    ClientBuild(String),
}
