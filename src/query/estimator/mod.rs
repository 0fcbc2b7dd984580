//! 基数估算
//!
//! - `pattern` - 单个三元组模式的估算
//! - `plan` - 查询计划树的估算
//! - `cardinality` - `[min, avg, max]` 区间及组合规则
//! - `unique` - 唯一值变量检测
//! - `config` - 选择率等经验参数

pub mod cardinality;
pub mod config;
pub mod pattern;
pub mod plan;
pub mod unique;

pub use cardinality::Cardinality;
pub use config::EstimatorConfig;
pub use pattern::PatternEstimator;
pub use plan::PlanEstimator;
pub use unique::unique_value_vars;
