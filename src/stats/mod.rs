//! 统计信息
//!
//! - `info` - 数据集元数据
//! - `source` - 外部三元组存储接口
//! - `collector` - 一次扫描生成直方图
//! - `store` - 已加载直方图的只读存储
//! - `dataset` - 面向调用方的单数据集入口

pub mod collector;
pub mod dataset;
pub mod info;
pub mod source;
pub mod store;

pub use collector::{DatasetHistograms, StatisticsCollector};
pub use dataset::DatasetStatistics;
pub use info::{DatasetInfo, SourceType};
pub use source::{MemoryTripleSource, TripleSource, TripleVisitor};
pub use store::StatisticsStore;
