use thiserror::Error;

pub type CoreResult<T> = Result<T, CoreError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    #[error("Invalid number for {what}: '{input}'")]
    InvalidNumber { what: &'static str, input: String },
}
