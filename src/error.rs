pub type LottineResult<T> = Result<T, LottineError>;

#[derive(thiserror::Error, Debug)]
pub enum LottineError {
    #[error("decode error: {0}")]
    Decode(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl LottineError {
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }
}
