use thiserror::Error;

#[derive(Debug, Error)]
pub enum EnvError {
    #[error(transparent)]
    Core(#[from] gymui_core::Error),
    #[error("no app registered under `{0}`")]
    UnknownApp(String),
    #[error("app `{0}` is already registered")]
    DuplicateApp(String),
    #[error("invalid environment config: {0}")]
    Config(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, EnvError>;
