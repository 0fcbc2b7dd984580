//! 布尔直方图构建器

use super::{bump, HistogramBuilder};
use crate::core::error::{HistogramError, HistogramResult};
use crate::core::term::Term;
use crate::histogram::value::{concrete_lexical, parse_boolean};
use crate::histogram::{BooleanHistogram, Histogram};

/// 布尔分桶：固定两个桶，直接计数
pub fn bin_boolean(type_uri: &str, false_count: u32, true_count: u32) -> HistogramResult<Histogram> {
    if false_count == 0 && true_count == 0 {
        return Err(HistogramError::EmptyAccumulator(type_uri.to_string()));
    }
    Ok(Histogram::Boolean(BooleanHistogram::new(
        type_uri,
        false_count,
        true_count,
    )))
}

#[derive(Debug)]
pub struct BooleanHistogramBuilder {
    type_uri: String,
    counts: [u32; 2],
}

impl BooleanHistogramBuilder {
    pub fn new(type_uri: impl Into<String>) -> Self {
        Self {
            type_uri: type_uri.into(),
            counts: [0, 0],
        }
    }
}

impl HistogramBuilder for BooleanHistogramBuilder {
    type Value = bool;

    fn add_value(&mut self, value: bool) {
        bump(&mut self.counts[value as usize]);
    }

    fn add_term(&mut self, term: &Term) -> HistogramResult<()> {
        let value = parse_boolean(concrete_lexical(term, &self.type_uri)?, &self.type_uri)?;
        self.add_value(value);
        Ok(())
    }

    fn distinct_values(&self) -> usize {
        self.counts.iter().filter(|&&c| c > 0).count()
    }

    fn generate(self) -> HistogramResult<Histogram> {
        bin_boolean(&self.type_uri, self.counts[0], self.counts[1])
    }
}
