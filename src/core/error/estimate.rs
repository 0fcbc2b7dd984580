//! 基数估算错误类型
//!
//! "统计信息不足" 不是错误，由 `Ok(None)` 表达；这里只包含：
//! - 非法的三元组模式
//! - 不支持的计划算子
//! - 统计信息读取/解析失败
//! - 计划嵌套过深

use thiserror::Error;

use super::HistogramError;

/// 基数估算错误
#[derive(Error, Debug, Clone)]
pub enum EstimateError {
    /// 非法的三元组模式（如谓语为字面量）
    #[error("非法的三元组模式: {0}")]
    InvalidPattern(String),

    /// 不支持估算的计划算子
    #[error("不支持估算的计划算子: {0}")]
    UnsupportedOperator(String),

    /// 单个三元组模式的统计信息读取失败
    #[error("三元组模式 {pattern} 的基数估算失败: {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: HistogramError,
    },

    /// 计划算子估算失败
    #[error("计划算子 {operator} 的基数估算失败: {source}")]
    Operator {
        operator: String,
        #[source]
        source: Box<EstimateError>,
    },

    /// 计划树嵌套超过配置上限
    #[error("计划嵌套深度超过上限 {0}")]
    PlanTooDeep(usize),
}

/// 估算结果类型
pub type EstimateResult<T> = Result<T, EstimateError>;

impl EstimateError {
    /// 附加计划算子上下文
    pub fn in_operator(self, operator: &str) -> Self {
        EstimateError::Operator {
            operator: operator.to_string(),
            source: Box::new(self),
        }
    }
}
