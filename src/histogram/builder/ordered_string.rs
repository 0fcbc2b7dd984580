//! 有序字符串直方图构建器

use std::collections::BTreeMap;

use super::{bump, HistogramBuilder};
use crate::core::error::{HistogramError, HistogramResult};
use crate::core::term::Term;
use crate::histogram::numeric::bin_position;
use crate::histogram::ordered_string::{common_prefix_len, string_key, OrderedStringHistogram};
use crate::histogram::value::concrete_lexical;
use crate::histogram::Histogram;

/// 有序字符串等宽分桶
///
/// `values` 须按字典序升序排列且互不相同。字符串映射为保序整数键后
/// 按整数算法分桶，同时记录每桶的去重值数与最大字符串。
pub fn bin_ordered_strings(
    type_uri: &str,
    values: &[(String, u32)],
    pref_size: usize,
) -> HistogramResult<OrderedStringHistogram> {
    let (min, max) = match (values.first(), values.last()) {
        (Some(first), Some(last)) => (first.0.clone(), last.0.clone()),
        _ => return Err(HistogramError::EmptyAccumulator(type_uri.to_string())),
    };

    let prefix = common_prefix_len(&min, &max);
    let min_key = string_key(&min, prefix);
    let max_key = string_key(&max, prefix);
    let range = (max_key as i128 - min_key as i128 + 1) as f64;

    let num_bins = pref_size.max(1).min(values.len());
    let width = range / num_bins as f64;

    let mut bins = vec![0u32; num_bins];
    let mut bin_distinct = vec![0u32; num_bins];
    let mut uppers: Vec<Option<&str>> = vec![None; num_bins];
    for (value, count) in values {
        let offset = string_key(value, prefix).saturating_sub(min_key);
        let idx = bin_position(offset as f64, width, num_bins);
        bins[idx] = bins[idx].saturating_add(*count);
        bump(&mut bin_distinct[idx]);
        uppers[idx] = Some(value.as_str());
    }

    let mut boundaries = Vec::with_capacity(num_bins);
    let mut previous = min.as_str();
    for upper in uppers {
        if let Some(u) = upper {
            previous = u;
        }
        boundaries.push(previous.to_string());
    }

    let distinct = u32::try_from(values.len()).unwrap_or(u32::MAX);
    Ok(OrderedStringHistogram::from_parts(
        type_uri,
        bins,
        distinct,
        min,
        max,
        boundaries,
        bin_distinct,
    ))
}

/// 有序字符串构建器，用于 xsd:string、URI 主语/宾语和空白节点
#[derive(Debug)]
pub struct OrderedStringHistogramBuilder {
    type_uri: String,
    pref_size: usize,
    values: BTreeMap<String, u32>,
}

impl OrderedStringHistogramBuilder {
    pub fn new(type_uri: impl Into<String>, pref_size: usize) -> Self {
        Self {
            type_uri: type_uri.into(),
            pref_size,
            values: BTreeMap::new(),
        }
    }
}

impl HistogramBuilder for OrderedStringHistogramBuilder {
    type Value = String;

    fn add_value(&mut self, value: String) {
        bump(self.values.entry(value).or_insert(0));
    }

    fn add_term(&mut self, term: &Term) -> HistogramResult<()> {
        let lexical = concrete_lexical(term, &self.type_uri)?;
        match self.values.get_mut(lexical) {
            Some(count) => bump(count),
            None => {
                self.values.insert(lexical.to_string(), 1);
            }
        }
        Ok(())
    }

    fn distinct_values(&self) -> usize {
        self.values.len()
    }

    fn generate(self) -> HistogramResult<Histogram> {
        let values: Vec<(String, u32)> = self.values.into_iter().collect();
        bin_ordered_strings(&self.type_uri, &values, self.pref_size).map(Histogram::OrderedString)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::vocab;

    fn sample_values() -> Vec<(String, u32)> {
        [("A", 20), ("AB", 1), ("C", 1), ("F", 2), ("Foo", 2), ("Voodoo", 100)]
            .iter()
            .map(|(s, c)| (s.to_string(), *c))
            .collect()
    }

    #[test]
    fn test_ordered_string_sample() {
        let h = bin_ordered_strings(vocab::XSD_STRING, &sample_values(), 6).unwrap();
        assert_eq!(h.bin_data().distinct_count(), 6);
        assert_eq!(h.min(), "A");
        assert_eq!(h.max(), "Voodoo");
        assert_eq!(h.bin_data().bins(), &[22, 4, 0, 0, 0, 100]);
        assert_eq!(h.bin_distinct(), &[3, 2, 0, 0, 0, 1]);
        assert_eq!(h.boundaries(), &["C", "Foo", "Foo", "Foo", "Foo", "Voodoo"]);
    }

    #[test]
    fn test_boundaries_non_decreasing() {
        let h = bin_ordered_strings(vocab::XSD_STRING, &sample_values(), 3).unwrap();
        let b = h.boundaries();
        assert!(b.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(h.bin_data().total_count(), 126);
    }

    #[test]
    fn test_uri_subjects_share_prefix() {
        let mut builder = OrderedStringHistogramBuilder::new(vocab::RDFS_RESOURCE, 4);
        for i in 0..8 {
            builder
                .add_term(&Term::uri(format!("http://example.org/person/{}", i)))
                .unwrap();
        }
        let h = builder.generate().unwrap();
        assert_eq!(h.num_bins(), 4);
        assert_eq!(h.bins(), &[2, 2, 2, 2]);
        assert!(h.has_unique_values());
    }

    #[test]
    fn test_single_string() {
        let mut builder = OrderedStringHistogramBuilder::new(vocab::XSD_STRING, 4);
        builder.add_value("only".to_string());
        builder.add_value("only".to_string());
        let h = builder.generate().unwrap();
        assert_eq!(h.bins(), &[2]);
        assert_eq!(h.distinct_count(), 1);
    }
}
