//! 数值直方图构建器

use std::cmp::Ordering;
use std::collections::BTreeMap;

use super::{bump, HistogramBuilder};
use crate::core::error::{HistogramError, HistogramResult};
use crate::core::term::Term;
use crate::histogram::numeric::{bin_position, NumericHistogram, NumericValue};
use crate::histogram::value::concrete_lexical;
use crate::histogram::Histogram;

/// 为浮点数提供全序，作为有序累加器的键
#[derive(Debug, Clone, Copy)]
struct SortKey<T>(T);

impl<T: NumericValue> PartialEq for SortKey<T> {
    fn eq(&self, other: &Self) -> bool {
        self.0.cmp_total(&other.0) == Ordering::Equal
    }
}

impl<T: NumericValue> Eq for SortKey<T> {}

impl<T: NumericValue> PartialOrd for SortKey<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T: NumericValue> Ord for SortKey<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.cmp_total(&other.0)
    }
}

/// 数值等宽分桶
///
/// `values` 须按升序排列且互不相同。`range = max - min`（整数 +1），
/// 范围大于 0 时使用期望桶数，否则 1 个桶；桶数不超过不同取值数。
pub fn bin_numeric<T: NumericValue>(
    type_uri: &str,
    values: &[(T, u32)],
    pref_size: usize,
) -> HistogramResult<NumericHistogram<T>> {
    let (min, max) = match (values.first(), values.last()) {
        (Some(first), Some(last)) => (first.0, last.0),
        _ => return Err(HistogramError::EmptyAccumulator(type_uri.to_string())),
    };

    let range = T::range(min, max);
    let mut num_bins = if range > 0.0 { pref_size.max(1) } else { 1 };
    num_bins = num_bins.min(values.len());

    let width = range / num_bins as f64;
    let mut bins = vec![0u32; num_bins];
    for &(value, count) in values {
        let idx = bin_position(T::offset(value, min), width, num_bins);
        bins[idx] = bins[idx].saturating_add(count);
    }

    let distinct = u32::try_from(values.len()).unwrap_or(u32::MAX);
    Ok(NumericHistogram::from_parts(type_uri, bins, distinct, min, max))
}

/// 数值直方图构建器（i64 / f64 / f32）
#[derive(Debug)]
pub struct NumericHistogramBuilder<T> {
    type_uri: String,
    pref_size: usize,
    values: BTreeMap<SortKey<T>, u32>,
}

impl<T: NumericValue> NumericHistogramBuilder<T> {
    pub fn new(type_uri: impl Into<String>, pref_size: usize) -> Self {
        Self {
            type_uri: type_uri.into(),
            pref_size,
            values: BTreeMap::new(),
        }
    }
}

impl<T: NumericValue> HistogramBuilder for NumericHistogramBuilder<T> {
    type Value = T;

    fn add_value(&mut self, value: T) {
        bump(self.values.entry(SortKey(value)).or_insert(0));
    }

    fn add_term(&mut self, term: &Term) -> HistogramResult<()> {
        let value = T::parse_lexical(concrete_lexical(term, &self.type_uri)?, &self.type_uri)?;
        self.add_value(value);
        Ok(())
    }

    fn distinct_values(&self) -> usize {
        self.values.len()
    }

    fn generate(self) -> HistogramResult<Histogram> {
        let values: Vec<(T, u32)> = self.values.into_iter().map(|(k, c)| (k.0, c)).collect();
        bin_numeric(&self.type_uri, &values, self.pref_size).map(T::into_histogram)
    }
}
