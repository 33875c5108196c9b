use thiserror::Error;

#[derive(Error, Debug)]
pub enum GfiError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("GitHub API error: {status} from {url}")]
    Status {
        status: reqwest::StatusCode,
        url: String,
    },

    #[error("missing `{0}` in GitHub response")]
    MissingField(String),

    #[error("could not determine home directory")]
    NoHomeDir,

    #[error("prompt error: {0}")]
    Prompt(#[from] dialoguer::Error),
}

pub type Result<T> = std::result::Result<T, GfiError>;
