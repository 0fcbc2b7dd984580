//! 过滤表达式求值错误
//!
//! 求值错误不会向上传播：`is_satisfied` 把任何错误视为不满足，
//! 与 SPARQL FILTER 的错误语义一致

use std::fmt;
use thiserror::Error;

/// 表达式错误（结构化设计）
#[derive(Error, Debug, Clone, PartialEq)]
pub struct ExpressionError {
    /// 错误类型
    pub error_type: ExpressionErrorType,
    /// 错误消息
    pub message: String,
}

/// 表达式错误类型枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExpressionErrorType {
    /// 类型错误
    TypeError,
    /// 未绑定变量
    UnboundVariable,
    /// 未知函数
    UnknownFunction,
    /// 参数数量错误
    ArgumentCountError,
    /// 正则表达式无效
    InvalidRegex,
}

impl fmt::Display for ExpressionErrorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExpressionErrorType::TypeError => write!(f, "类型错误"),
            ExpressionErrorType::UnboundVariable => write!(f, "未绑定变量"),
            ExpressionErrorType::UnknownFunction => write!(f, "未知函数"),
            ExpressionErrorType::ArgumentCountError => write!(f, "参数数量错误"),
            ExpressionErrorType::InvalidRegex => write!(f, "正则表达式无效"),
        }
    }
}

impl ExpressionError {
    pub fn new(error_type: ExpressionErrorType, message: impl Into<String>) -> Self {
        Self {
            error_type,
            message: message.into(),
        }
    }

    pub fn type_error(message: impl Into<String>) -> Self {
        Self::new(ExpressionErrorType::TypeError, message)
    }

    pub fn unbound_variable(name: &str) -> Self {
        Self::new(
            ExpressionErrorType::UnboundVariable,
            format!("变量 ?{} 未绑定", name),
        )
    }

    pub fn unknown_function(name: &str) -> Self {
        Self::new(
            ExpressionErrorType::UnknownFunction,
            format!("未知函数: {}", name),
        )
    }

    /// 创建参数数量错误
    pub fn argument_count_error(name: &str, expected: usize, actual: usize) -> Self {
        Self::new(
            ExpressionErrorType::ArgumentCountError,
            format!("{}: 期望 {} 个参数, 实际 {}", name, expected, actual),
        )
    }

    pub fn invalid_regex(message: impl Into<String>) -> Self {
        Self::new(ExpressionErrorType::InvalidRegex, message)
    }
}

impl fmt::Display for ExpressionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.error_type, self.message)
    }
}

/// 表达式求值结果类型
pub type ExpressionResult<T> = Result<T, ExpressionError>;
