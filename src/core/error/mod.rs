//! 统一错误处理
//!
//! ## 设计理念
//!
//! 1. **按子系统划分**：直方图构建、二进制编解码、基数估算各有独立的错误枚举
//! 2. **分层转换**：子系统错误通过 `#[from]` 汇总到 `StatsError`
//! 3. **三种结果互不混淆**：估算接口返回 `Result<Option<T>, EstimateError>`，
//!    `Ok(Some)` 为确定值，`Ok(None)` 表示统计信息不足，`Err` 表示错误

use thiserror::Error;

pub mod estimate;
pub mod expression;
pub mod histogram;

pub use estimate::{EstimateError, EstimateResult};
pub use expression::{ExpressionError, ExpressionErrorType, ExpressionResult};
pub use histogram::{HistogramError, HistogramResult};
pub use crate::core::codec::{CodecError, CodecResult};

/// 统一的统计库错误类型
#[derive(Error, Debug, Clone)]
pub enum StatsError {
    #[error("直方图错误: {0}")]
    Histogram(#[from] HistogramError),

    #[error("编解码错误: {0}")]
    Codec(#[from] CodecError),

    #[error("估算错误: {0}")]
    Estimate(#[from] EstimateError),

    #[error("数据源错误: {0}")]
    Source(String),

    #[error("配置错误: {0}")]
    Config(String),

    #[error("IO错误: {0}")]
    Io(String),

    #[error("日志错误: {0}")]
    Logging(String),
}

/// 统一的结果类型
pub type StatsResult<T> = Result<T, StatsError>;

impl From<std::io::Error> for StatsError {
    fn from(err: std::io::Error) -> Self {
        StatsError::Io(err.to_string())
    }
}

impl From<toml::de::Error> for StatsError {
    fn from(err: toml::de::Error) -> Self {
        StatsError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for StatsError {
    fn from(err: toml::ser::Error) -> Self {
        StatsError::Config(err.to_string())
    }
}

impl From<flexi_logger::FlexiLoggerError> for StatsError {
    fn from(err: flexi_logger::FlexiLoggerError) -> Self {
        StatsError::Logging(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_error_from_histogram() {
        let err: StatsError = HistogramError::EmptyAccumulator("xsd:int".to_string()).into();
        assert!(matches!(err, StatsError::Histogram(_)));
        assert!(err.to_string().contains("直方图错误"));
    }

    #[test]
    fn test_stats_error_from_estimate() {
        let err: StatsError = EstimateError::UnsupportedOperator("group".to_string()).into();
        assert!(matches!(err, StatsError::Estimate(_)));
        assert!(err.to_string().contains("group"));
    }
}
