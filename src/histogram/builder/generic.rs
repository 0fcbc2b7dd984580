//! 通用直方图构建器

use std::collections::HashMap;

use super::{bump, HistogramBuilder};
use crate::core::error::{HistogramError, HistogramResult};
use crate::core::term::Term;
use crate::histogram::generic::{hash_bin, GenericHistogram};
use crate::histogram::value::concrete_lexical;
use crate::histogram::Histogram;

/// 哈希分桶：桶数为 `min(pref_size, 不同取值数)`
pub fn bin_generic(
    type_uri: &str,
    values: &[(String, u32)],
    pref_size: usize,
) -> HistogramResult<GenericHistogram> {
    if values.is_empty() {
        return Err(HistogramError::EmptyAccumulator(type_uri.to_string()));
    }
    let num_bins = pref_size.max(1).min(values.len());
    let mut bins = vec![0u32; num_bins];
    for (lexical, count) in values {
        let idx = hash_bin(lexical, num_bins);
        bins[idx] = bins[idx].saturating_add(*count);
    }
    let distinct = u32::try_from(values.len()).unwrap_or(u32::MAX);
    Ok(GenericHistogram::from_parts(type_uri, bins, distinct))
}

#[derive(Debug)]
pub struct GenericHistogramBuilder {
    type_uri: String,
    pref_size: usize,
    values: HashMap<String, u32>,
}

impl GenericHistogramBuilder {
    pub fn new(type_uri: impl Into<String>, pref_size: usize) -> Self {
        Self {
            type_uri: type_uri.into(),
            pref_size,
            values: HashMap::new(),
        }
    }
}

impl HistogramBuilder for GenericHistogramBuilder {
    type Value = String;

    fn add_value(&mut self, value: String) {
        bump(self.values.entry(value).or_insert(0));
    }

    fn add_term(&mut self, term: &Term) -> HistogramResult<()> {
        let lexical = concrete_lexical(term, &self.type_uri)?;
        self.add_value(lexical.to_string());
        Ok(())
    }

    fn distinct_values(&self) -> usize {
        self.values.len()
    }

    fn generate(self) -> HistogramResult<Histogram> {
        let values: Vec<(String, u32)> = self.values.into_iter().collect();
        bin_generic(&self.type_uri, &values, self.pref_size).map(Histogram::Generic)
    }
}
