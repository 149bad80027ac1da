pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A malformed single command. The message names the offending fragment
    /// and is meant to be shown to the user verbatim.
    #[error("{message}")]
    Parse { message: String },
}

impl Error {
    pub(crate) fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }
}
