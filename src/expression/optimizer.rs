//! 过滤表达式优化接口
//!
//! De Morgan / 分配律规范化由外部查询引擎提供，估算器只在每个基本图模式上
//! 调用一次 `optimize`，之后按"已优化"的表达式列表下推

use std::fmt::Debug;

use super::filter::FilterExpr;

/// 外部过滤表达式优化器
pub trait FilterOptimizer: Send + Sync + Debug {
    fn optimize(&self, filters: &[FilterExpr]) -> Vec<FilterExpr>;
}

/// 不做任何改写的优化器
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopFilterOptimizer;

impl FilterOptimizer for NoopFilterOptimizer {
    fn optimize(&self, filters: &[FilterExpr]) -> Vec<FilterExpr> {
        filters.to_vec()
    }
}
