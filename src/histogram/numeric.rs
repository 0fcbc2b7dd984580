//! 数值直方图（i64 / f64 / f32）
//!
//! 等宽分桶：`width = range / bins.len()`，取值 v 落入
//! `floor((v - min) / width)` 号桶，并钳制到最后一个桶，
//! 保证最大值在浮点舍入下也不会越界。

use std::cmp::Ordering;
use std::fmt;

use super::value::{concrete_lexical, parse_double, parse_float, parse_integer};
use super::{BinData, Histogram, HistogramType};
use crate::core::error::HistogramResult;
use crate::core::term::Term;

/// 数值直方图支持的原生类型
pub trait NumericValue:
    Copy + PartialOrd + fmt::Debug + fmt::Display + Send + Sync + 'static
{
    /// 整数类型的范围需要 +1，使最大值落在最后一个桶内
    const INTEGRAL: bool;
    const HISTOGRAM_TYPE: HistogramType;

    /// 分桶范围
    ///
    /// 只有 `offset / range` 的比例有意义，两者须使用同一缩放
    fn range(min: Self, max: Self) -> f64;

    /// 取值相对 min 的偏移
    fn offset(value: Self, min: Self) -> f64;

    /// 全序比较，浮点数按 IEEE 754 totalOrder
    fn cmp_total(&self, other: &Self) -> Ordering;

    fn parse_lexical(lexical: &str, type_uri: &str) -> HistogramResult<Self>;

    fn into_histogram(histogram: NumericHistogram<Self>) -> Histogram;
}

impl NumericValue for i64 {
    const INTEGRAL: bool = true;
    const HISTOGRAM_TYPE: HistogramType = HistogramType::Integer;

    fn range(min: Self, max: Self) -> f64 {
        (max as i128 - min as i128 + 1) as f64
    }

    fn offset(value: Self, min: Self) -> f64 {
        (value as i128 - min as i128) as f64
    }

    fn cmp_total(&self, other: &Self) -> Ordering {
        self.cmp(other)
    }

    fn parse_lexical(lexical: &str, type_uri: &str) -> HistogramResult<Self> {
        parse_integer(lexical, type_uri)
    }

    fn into_histogram(histogram: NumericHistogram<Self>) -> Histogram {
        Histogram::Integer(histogram)
    }
}

impl NumericValue for f64 {
    const INTEGRAL: bool = false;
    const HISTOGRAM_TYPE: HistogramType = HistogramType::Double;

    // 半尺度计算，跨度超过 f64::MAX 的有限值也不会溢出
    fn range(min: Self, max: Self) -> f64 {
        max * 0.5 - min * 0.5
    }

    fn offset(value: Self, min: Self) -> f64 {
        value * 0.5 - min * 0.5
    }

    fn cmp_total(&self, other: &Self) -> Ordering {
        self.total_cmp(other)
    }

    fn parse_lexical(lexical: &str, type_uri: &str) -> HistogramResult<Self> {
        parse_double(lexical, type_uri)
    }

    fn into_histogram(histogram: NumericHistogram<Self>) -> Histogram {
        Histogram::Double(histogram)
    }
}

impl NumericValue for f32 {
    const INTEGRAL: bool = false;
    const HISTOGRAM_TYPE: HistogramType = HistogramType::Float;

    fn range(min: Self, max: Self) -> f64 {
        max as f64 - min as f64
    }

    fn offset(value: Self, min: Self) -> f64 {
        value as f64 - min as f64
    }

    fn cmp_total(&self, other: &Self) -> Ordering {
        self.total_cmp(other)
    }

    fn parse_lexical(lexical: &str, type_uri: &str) -> HistogramResult<Self> {
        parse_float(lexical, type_uri)
    }

    fn into_histogram(histogram: NumericHistogram<Self>) -> Histogram {
        Histogram::Float(histogram)
    }
}

/// 根据偏移计算桶下标
///
/// 负偏移归入 0 号桶；超出末尾或无法比较（如 `inf / inf`）的归入最后一个桶
pub fn bin_position(offset: f64, width: f64, num_bins: usize) -> usize {
    let last = num_bins.saturating_sub(1);
    let idx = (offset / width).floor();
    if idx.is_nan() {
        last
    } else if idx <= 0.0 {
        0
    } else {
        (idx as usize).min(last)
    }
}

/// 数值直方图
#[derive(Debug, Clone, PartialEq)]
pub struct NumericHistogram<T> {
    data: BinData,
    min: T,
    max: T,
}

impl<T: NumericValue> NumericHistogram<T> {
    pub(crate) fn from_parts(
        type_uri: impl Into<String>,
        bins: Vec<u32>,
        distinct: u32,
        min: T,
        max: T,
    ) -> Self {
        Self {
            data: BinData::new(type_uri, bins, distinct),
            min,
            max,
        }
    }

    pub fn bin_data(&self) -> &BinData {
        &self.data
    }

    pub fn min(&self) -> T {
        self.min
    }

    pub fn max(&self) -> T {
        self.max
    }

    /// 与 `NumericValue::range` 同一缩放下的桶宽
    pub(crate) fn bin_width(&self) -> f64 {
        T::range(self.min, self.max) / self.data.bins.len() as f64
    }

    pub fn contains(&self, value: T) -> bool {
        value.cmp_total(&self.min) != Ordering::Less
            && value.cmp_total(&self.max) != Ordering::Greater
    }

    pub fn parse_term(&self, term: &Term) -> HistogramResult<T> {
        T::parse_lexical(concrete_lexical(term, &self.data.type_uri)?, &self.data.type_uri)
    }

    pub fn bin_index(&self, value: T) -> Option<usize> {
        if !self.contains(value) {
            return None;
        }
        Some(bin_position(
            T::offset(value, self.min),
            self.bin_width(),
            self.data.bins.len(),
        ))
    }

    pub fn estimated_quantity(&self, value: T) -> u64 {
        match self.bin_index(value) {
            Some(idx) => self.data.quantity_in_bin(idx, self.data.avg_distinct_per_bin()),
            None => 0,
        }
    }

    /// 第 `index` 个桶中严格小于 `value` 的比例（线性插值）
    pub(crate) fn fraction_below(&self, value: T, index: usize) -> f64 {
        if value.cmp_total(&self.min) != Ordering::Greater {
            return 0.0;
        }
        if value.cmp_total(&self.max) == Ordering::Greater {
            return 1.0;
        }
        let width = self.bin_width();
        if !(width > 0.0 && width.is_finite()) {
            // 退化为单桶
            return 0.5;
        }
        let pos = T::offset(value, self.min) / width - index as f64;
        if pos.is_nan() {
            0.0
        } else {
            pos.clamp(0.0, 1.0)
        }
    }
}
