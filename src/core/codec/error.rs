//! Codec 错误类型定义

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum CodecError {
    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Truncated input: need {needed} bytes, {remaining} remaining")]
    Truncated { needed: usize, remaining: usize },

    #[error("Unknown histogram builder id: {0}")]
    UnknownBuilder(u32),

    #[error("Trailing bytes after histogram payload: {0}")]
    TrailingBytes(usize),

    #[error("Invalid UTF-8 string: {0}")]
    InvalidUtf8(String),
}

pub type CodecResult<T> = std::result::Result<T, CodecError>;
