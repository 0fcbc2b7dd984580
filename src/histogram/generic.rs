//! 通用直方图
//!
//! 没有自然顺序（或顺序无法廉价映射为数值）的值域类型，按词法形式的
//! MurmurHash2 取模分桶。只支持等值/不等值估算。

use super::value::concrete_lexical;
use super::BinData;
use crate::core::error::HistogramResult;
use crate::core::murmur::hash_lexical;
use crate::core::term::Term;

/// 词法形式所在的桶
pub fn hash_bin(lexical: &str, num_bins: usize) -> usize {
    if num_bins == 0 {
        return 0;
    }
    hash_lexical(lexical) as usize % num_bins
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenericHistogram {
    data: BinData,
}

impl GenericHistogram {
    pub(crate) fn from_parts(type_uri: impl Into<String>, bins: Vec<u32>, distinct: u32) -> Self {
        Self {
            data: BinData::new(type_uri, bins, distinct),
        }
    }

    pub fn bin_data(&self) -> &BinData {
        &self.data
    }

    pub fn parse_term(&self, term: &Term) -> HistogramResult<String> {
        concrete_lexical(term, &self.data.type_uri).map(str::to_string)
    }

    pub fn bin_index(&self, lexical: &str) -> usize {
        hash_bin(lexical, self.data.bins.len())
    }

    pub fn estimated_quantity(&self, lexical: &str) -> u64 {
        self.data
            .quantity_in_bin(self.bin_index(lexical), self.data.avg_distinct_per_bin())
    }
}
