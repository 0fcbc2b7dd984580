//! 查询计划与基数估算
//!
//! 计划树由外部规划方构造，这里只负责估算每个算子输出的行数区间。

pub mod estimator;
pub mod plan;

pub use estimator::{Cardinality, EstimatorConfig, PatternEstimator, PlanEstimator};
pub use plan::{OrderKey, PlanNode, PropertyPath};
