use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("syntax error at {position}: {message}")]
    Syntax { position: usize, message: String },

    #[error("language is finite, its frobenius root is undefined")]
    DegenerateLanguage,

    #[error("there exist infinitely many acceptable strings")]
    InfiniteLanguage,

    #[error("length {length} exceeds the configured limit {limit}")]
    LengthOutOfRange { length: usize, limit: usize },

    #[error("value is out of range")]
    ValueOutOfRange,

    #[error("text is not acceptable")]
    NotAccepted,

    #[error("target language has too few strings for the conversion")]
    IncompatibleConversion,

    #[error("corrupt input: {0}")]
    CorruptInput(String),
}

impl Error {
    pub(crate) fn syntax(position: usize, message: impl Into<String>) -> Self {
        Error::Syntax {
            position,
            message: message.into(),
        }
    }
}
