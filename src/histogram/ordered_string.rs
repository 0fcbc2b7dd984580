//! 有序字符串直方图
//!
//! 字符串先投影到保序的 u64 键（min 与 max 公共前缀之后的前 8 个字节，按大端解释），
//! 再按整数等宽算法分桶。每个桶额外记录桶内最大字符串（上界）和去重值数，
//! 点查时按上界二分定位桶，不需要原始数据。

use super::value::concrete_lexical;
use super::BinData;
use crate::core::error::HistogramResult;
use crate::core::term::Term;

/// 公共前缀长度（字节）
pub fn common_prefix_len(a: &str, b: &str) -> usize {
    a.bytes().zip(b.bytes()).take_while(|(x, y)| x == y).count()
}

/// 保序的字符串键
///
/// 跳过 `prefix_len` 字节后取最多 8 个字节，不足部分补零
pub fn string_key(value: &str, prefix_len: usize) -> u64 {
    let rest = value.as_bytes().get(prefix_len..).unwrap_or(&[]);
    let mut buf = [0u8; 8];
    let n = rest.len().min(8);
    buf[..n].copy_from_slice(&rest[..n]);
    u64::from_be_bytes(buf)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderedStringHistogram {
    data: BinData,
    min: String,
    max: String,
    /// 每个桶的上界；空桶沿用前一个桶的上界
    boundaries: Vec<String>,
    bin_distinct: Vec<u32>,
}

impl OrderedStringHistogram {
    pub(crate) fn from_parts(
        type_uri: impl Into<String>,
        bins: Vec<u32>,
        distinct: u32,
        min: String,
        max: String,
        boundaries: Vec<String>,
        bin_distinct: Vec<u32>,
    ) -> Self {
        Self {
            data: BinData::new(type_uri, bins, distinct),
            min,
            max,
            boundaries,
            bin_distinct,
        }
    }

    pub fn bin_data(&self) -> &BinData {
        &self.data
    }

    pub fn min(&self) -> &str {
        &self.min
    }

    pub fn max(&self) -> &str {
        &self.max
    }

    pub fn boundaries(&self) -> &[String] {
        &self.boundaries
    }

    pub fn bin_distinct(&self) -> &[u32] {
        &self.bin_distinct
    }

    pub fn contains(&self, value: &str) -> bool {
        value >= self.min.as_str() && value <= self.max.as_str()
    }

    pub fn parse_term(&self, term: &Term) -> HistogramResult<String> {
        concrete_lexical(term, &self.data.type_uri).map(str::to_string)
    }

    /// 第一个上界不小于 `value` 的桶
    pub fn bin_index(&self, value: &str) -> Option<usize> {
        if !self.contains(value) {
            return None;
        }
        let idx = self.boundaries.partition_point(|b| b.as_str() < value);
        Some(idx.min(self.data.bins.len().saturating_sub(1)))
    }

    /// 桶内去重值数精确已知，估计值为 `ceil(count / distinct_in_bin)`
    pub fn estimated_quantity(&self, value: &str) -> u64 {
        match self.bin_index(value) {
            Some(idx) => {
                let distinct = self.bin_distinct.get(idx).copied().unwrap_or(1);
                self.data.quantity_in_bin(idx, distinct as f64)
            }
            None => 0,
        }
    }

    /// 等值取值在第 `index` 个桶中所占比例
    pub(crate) fn fraction_equal(&self, value: &str, index: usize) -> f64 {
        if self.bin_index(value) != Some(index) {
            return 0.0;
        }
        match self.bin_distinct.get(index) {
            Some(&d) if d > 0 => 1.0 / d as f64,
            _ => 0.0,
        }
    }

    /// 第 `index` 个桶中严格小于 `value` 的比例
    ///
    /// 取值所在的桶内部无法细分，除上界外按一半估计
    pub(crate) fn fraction_below(&self, value: &str, index: usize) -> f64 {
        if value <= self.min.as_str() {
            return 0.0;
        }
        if value > self.max.as_str() {
            return 1.0;
        }
        let target = match self.bin_index(value) {
            Some(idx) => idx,
            None => return 0.0,
        };
        if index < target {
            1.0
        } else if index > target {
            0.0
        } else {
            let rest = 1.0 - self.fraction_equal(value, index);
            if self.boundaries.get(index).map(String::as_str) == Some(value) {
                rest
            } else {
                rest / 2.0
            }
        }
    }
}
