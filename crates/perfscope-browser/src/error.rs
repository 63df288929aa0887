use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Browser error: {0}")]
    Browser(String),

    #[error("CDP error: {0}")]
    Cdp(String),

    #[error("Script evaluation failed: {0}")]
    Evaluation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<chromiumoxide::error::CdpError> for Error {
    fn from(err: chromiumoxide::error::CdpError) -> Self {
        Error::Cdp(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Evaluation(format!("unexpected result shape: {}", err))
    }
}

impl From<Error> for perfscope_core::Error {
    fn from(err: Error) -> Self {
        match err {
            Error::Browser(msg) | Error::Cdp(msg) => perfscope_core::Error::Session(msg),
            Error::Evaluation(msg) => perfscope_core::Error::Evaluation(msg),
            Error::Io(e) => perfscope_core::Error::Io(e),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
