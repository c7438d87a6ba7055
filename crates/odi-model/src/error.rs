use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("unknown sex code '{0}'")]
    InvalidSex(String),
}

pub type Result<T> = std::result::Result<T, ModelError>;
