//! 直方图错误类型

use thiserror::Error;

/// 直方图构建与取值解析错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum HistogramError {
    /// 没有任何观测值时无法生成直方图
    #[error("累加器为空，无法为 <{0}> 生成直方图")]
    EmptyAccumulator(String),

    /// 节点值无法解析为直方图的原生类型
    #[error("无法将 {value} 解析为 <{type_uri}> 的取值: {reason}")]
    Parse {
        value: String,
        type_uri: String,
        reason: String,
    },
}

/// 直方图结果类型
pub type HistogramResult<T> = Result<T, HistogramError>;

impl HistogramError {
    pub fn parse(value: impl ToString, type_uri: &str, reason: impl Into<String>) -> Self {
        HistogramError::Parse {
            value: value.to_string(),
            type_uri: type_uri.to_string(),
            reason: reason.into(),
        }
    }
}
