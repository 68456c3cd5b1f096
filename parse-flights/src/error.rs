use thiserror::Error;

#[derive(Debug, Error)]
pub enum Status {
    #[error("Invalid delimiter {0:?}, must be one ASCII character")]
    BadDelimiter(String),
    #[error("Can not open input {path}")]
    NoInput {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
