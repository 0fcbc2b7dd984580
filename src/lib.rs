//! graphstats - 基于直方图的三元组模式基数估算
//!
//! 一次扫描为数据集生成主语与属性取值的直方图，之后只依据这些直方图
//! 估算三元组模式、基本图模式和查询计划的结果行数，不访问原始数据。
//!
//! - `histogram` - 直方图模型、构建器、覆盖率估算与二进制编解码
//! - `stats` - 统计信息收集、存储与单数据集入口
//! - `query` - 查询计划树与基数估算器
//! - `expression` - 过滤表达式
//! - `config` / `utils` - 配置与日志

pub mod config;
pub mod core;
pub mod expression;
pub mod histogram;
pub mod query;
pub mod stats;
pub mod utils;

pub use crate::core::error::{StatsError, StatsResult};
pub use crate::core::term::{Term, Triple, TriplePattern};
pub use crate::histogram::{Histogram, HistogramType};
pub use crate::query::{Cardinality, PlanNode};
pub use crate::stats::{DatasetStatistics, StatisticsCollector, StatisticsStore};
