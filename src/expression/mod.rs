//! 过滤表达式
//!
//! - `filter` - 表达式树、变量作用域与单变量合取项提取
//! - `evaluator` - 在变量绑定上求值
//! - `optimizer` - 外部表达式优化器接口

pub mod evaluator;
pub mod filter;
pub mod optimizer;

pub use crate::core::error::{ExpressionError, ExpressionErrorType};
pub use evaluator::{bind, Binding, EvalValue, FilterEvaluator};
pub use filter::{filter_vars, single_variable_filter, CompareOp, FilterExpr};
pub use optimizer::{FilterOptimizer, NoopFilterOptimizer};
