//! 布尔直方图：bins[0] 为 false 的次数，bins[1] 为 true 的次数

use super::value::{concrete_lexical, parse_boolean};
use super::BinData;
use crate::core::error::HistogramResult;
use crate::core::term::Term;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BooleanHistogram {
    data: BinData,
}

impl BooleanHistogram {
    pub(crate) fn new(type_uri: impl Into<String>, false_count: u32, true_count: u32) -> Self {
        let distinct = (false_count > 0) as u32 + (true_count > 0) as u32;
        Self::from_parts(type_uri, vec![false_count, true_count], distinct)
    }

    pub(crate) fn from_parts(type_uri: impl Into<String>, bins: Vec<u32>, distinct: u32) -> Self {
        Self {
            data: BinData::new(type_uri, bins, distinct),
        }
    }

    pub fn bin_data(&self) -> &BinData {
        &self.data
    }

    pub fn false_count(&self) -> u32 {
        self.data.bins[0]
    }

    pub fn true_count(&self) -> u32 {
        self.data.bins[1]
    }

    pub fn parse_term(&self, term: &Term) -> HistogramResult<bool> {
        parse_boolean(concrete_lexical(term, &self.data.type_uri)?, &self.data.type_uri)
    }

    pub fn bin_index(&self, value: bool) -> usize {
        value as usize
    }

    /// 每个桶只对应一个取值，估计值即精确计数
    pub fn estimated_quantity(&self, value: bool) -> u64 {
        self.data.bins[self.bin_index(value)] as u64
    }
}
