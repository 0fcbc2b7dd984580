//! 核心类型
//!
//! - `term` / `vocab` - RDF 项、三元组模式与值域类型词汇
//! - `codec` - 直方图二进制读写原语
//! - `error` - 统一错误类型
//! - `murmur` - 稳定哈希

pub mod codec;
pub mod error;
pub mod murmur;
pub mod term;
pub mod vocab;

pub use codec::{CodecError, CodecResult, HistogramReader, HistogramWriter};
pub use error::{
    EstimateError, EstimateResult, HistogramError, HistogramResult, StatsError, StatsResult,
};
pub use term::{Literal, Term, Triple, TriplePattern};
