//! 估算器配置
//!
//! 连接、过滤、可选匹配的选择率以及去重比例都是经验值，
//! 不由直方图推导，因此集中在这里以便调整。
//!
//! ## 使用示例
//!
//! ```rust
//! use graphstats::query::estimator::EstimatorConfig;
//!
//! // 使用默认配置
//! let config = EstimatorConfig::default();
//! assert_eq!(config.join_selectivity, 0.5);
//!
//! // 自定义配置
//! let strict = EstimatorConfig {
//!     filter_selectivity: 0.1,
//!     ..Default::default()
//! };
//! assert_eq!(strict.max_plan_depth, 512);
//! ```

use serde::{Deserialize, Serialize};

/// 估算器配置
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EstimatorConfig {
    /// 有共享变量的连接的选择率。默认值 0.5
    pub join_selectivity: f64,

    /// 非模式子节点上过滤条件的选择率。默认值 0.5
    pub filter_selectivity: f64,

    /// 左外连接保留左侧结果的比例。默认值 0.5
    pub optional_selectivity: f64,

    /// 去重比例
    ///
    /// `k` 个自由变量时平均值乘以 `1 - duplicate_ratio^k`。默认值 0.5，
    /// 即 0.5, 0.75, 0.875, ...
    pub duplicate_ratio: f64,

    /// 计划树最大嵌套深度，超过时估算失败。默认值 512
    pub max_plan_depth: usize,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            join_selectivity: 0.5,
            filter_selectivity: 0.5,
            optional_selectivity: 0.5,
            duplicate_ratio: 0.5,
            max_plan_depth: 512,
        }
    }
}
