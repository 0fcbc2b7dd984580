//! 三元组模式估算器
//!
//! 只依据已加载的直方图估算单个三元组模式 `(s, p, o)` 的匹配数。
//! 结果有三种：`Ok(Some(n))` 确定的估算值，`Ok(None)` 统计信息不足，
//! `Err` 模式非法或统计信息读取失败。

use std::collections::BTreeSet;
use std::sync::Arc;

use log::debug;

use crate::core::error::{EstimateError, EstimateResult, HistogramError};
use crate::core::term::{Term, TriplePattern};
use crate::expression::{bind, single_variable_filter, FilterExpr};
use crate::histogram::{coverage, Histogram};
use crate::stats::StatisticsStore;

/// 三元组模式估算器
#[derive(Debug, Clone, Copy)]
pub struct PatternEstimator<'a> {
    store: &'a StatisticsStore,
    dataset: &'a str,
}

impl<'a> PatternEstimator<'a> {
    pub fn new(store: &'a StatisticsStore, dataset: &'a str) -> Self {
        Self { store, dataset }
    }

    pub fn dataset(&self) -> &str {
        self.dataset
    }

    /// 不带过滤条件的模式估算
    pub fn triples_for_pattern(&self, s: &Term, p: &Term, o: &Term) -> EstimateResult<Option<u64>> {
        self.triples_for_filtered_pattern(s, p, o, &[])
    }

    /// 带过滤条件的模式估算
    ///
    /// `filters` 视为已经优化过的合取列表，只有恰好涉及一个变量的合取项参与估算
    pub fn triples_for_filtered_pattern(
        &self,
        s: &Term,
        p: &Term,
        o: &Term,
        filters: &[FilterExpr],
    ) -> EstimateResult<Option<u64>> {
        let result = self.estimate(s, p, o, filters);
        debug!(
            "模式 {} {} {} 估算结果: {:?}",
            s,
            p,
            o,
            result.as_ref().map_err(|e| e.to_string())
        );
        result
    }

    fn estimate(
        &self,
        s: &Term,
        p: &Term,
        o: &Term,
        filters: &[FilterExpr],
    ) -> EstimateResult<Option<u64>> {
        let pattern_text = || TriplePattern::new(s.clone(), p.clone(), o.clone()).to_string();

        if matches!(s, Term::Literal(_)) {
            return Err(EstimateError::InvalidPattern(pattern_text()));
        }
        if !matches!(p, Term::Uri(_) | Term::Variable(_)) {
            return Err(EstimateError::InvalidPattern(pattern_text()));
        }

        if let Term::Uri(uri) = s {
            match self.subject_not_exists(uri)? {
                None => return Ok(None),
                Some(true) => return Ok(Some(0)),
                Some(false) => {}
            }
        }

        let wrap = |source: HistogramError| EstimateError::Pattern {
            pattern: pattern_text(),
            source,
        };

        let total = match (p, o.as_variable()) {
            // :p :o
            (Term::Uri(property), None) => {
                let range = match o.range_type() {
                    Some(range) => range,
                    None => return Err(EstimateError::InvalidPattern(pattern_text())),
                };
                let estimate = match self.store.property_histogram(self.dataset, property, range) {
                    Some(h) => h.estimated_quantity_for(o).map_err(wrap)?,
                    None => return Ok(None),
                };
                // 完全绑定的三元组要么存在要么不存在
                if s.is_concrete() {
                    return Ok(Some(estimate.min(1)));
                }
                estimate
            }

            // :p ?o
            (Term::Uri(property), Some(o_var)) => {
                let o_filter = single_variable_filter(filters, o_var);
                // 没有直方图的属性视为没有数据
                let mut total = 0u64;
                for h in self.histograms_of(property) {
                    match restricted_total(&h, o_filter.as_ref(), o_var) {
                        Some(n) => total = total.saturating_add(n),
                        None => return Ok(None),
                    }
                }
                total
            }

            // ?p :o
            (Term::Variable(p_var), None) => {
                let range = match o.range_type() {
                    Some(range) => range,
                    None => return Err(EstimateError::InvalidPattern(pattern_text())),
                };
                let candidates = self.store.properties(self.dataset, Some(range));
                if candidates.is_empty() {
                    return Ok(None);
                }
                let p_filter = single_variable_filter(filters, p_var);
                // 过滤后没有候选属性时同样视为统计信息不足
                let mut total: Option<u64> = None;
                for property in candidates {
                    if !property_allowed(p_filter.as_ref(), p_var, &property) {
                        continue;
                    }
                    if let Some(h) = self.store.property_histogram(self.dataset, &property, range) {
                        let n = h.estimated_quantity_for(o).map_err(wrap)?;
                        total = Some(total.unwrap_or(0).saturating_add(n));
                    }
                }
                match total {
                    Some(n) => n,
                    None => return Ok(None),
                }
            }

            // ?p ?o
            (Term::Variable(p_var), Some(o_var)) => {
                let candidates = self.store.properties(self.dataset, None);
                if candidates.is_empty() {
                    return Ok(None);
                }
                let p_filter = single_variable_filter(filters, p_var);
                let o_filter = single_variable_filter(filters, o_var);
                let mut total: Option<u64> = None;
                for property in candidates {
                    if !property_allowed(p_filter.as_ref(), p_var, &property) {
                        continue;
                    }
                    for h in self.histograms_of(&property) {
                        match restricted_total(&h, o_filter.as_ref(), o_var) {
                            Some(n) => total = Some(total.unwrap_or(0).saturating_add(n)),
                            None => return Ok(None),
                        }
                    }
                }
                match total {
                    Some(n) => n,
                    None => return Ok(None),
                }
            }

            _ => return Err(EstimateError::InvalidPattern(pattern_text())),
        };

        // 绑定主语只能匹配总量中属于它的一份
        if s.is_concrete() && total > 1 {
            let subjects = match self.subjects_total() {
                Some(n) => n.max(1),
                None => return Ok(None),
            };
            return Ok(Some(total.div_ceil(subjects)));
        }
        Ok(Some(total))
    }

    fn histograms_of(&self, property: &str) -> Vec<Arc<Histogram>> {
        self.store
            .property_ranges(self.dataset, property)
            .iter()
            .filter_map(|range| self.store.property_histogram(self.dataset, property, range))
            .collect()
    }

    /// 主语总数：URI 主语加空白节点主语
    ///
    /// 没有 URI 主语直方图时统计信息不足；空白节点主语直方图缺失按 0 计
    pub fn subjects_total(&self) -> Option<u64> {
        let uri = self.uri_subjects_total()?;
        Some(uri.saturating_add(self.anonymous_subjects_total().unwrap_or(0)))
    }

    pub fn uri_subjects_total(&self) -> Option<u64> {
        self.store
            .subject_histogram(self.dataset, false)
            .map(|h| h.total_count())
    }

    pub fn anonymous_subjects_total(&self) -> Option<u64> {
        self.store
            .subject_histogram(self.dataset, true)
            .map(|h| h.total_count())
    }

    /// URI 主语是否确定不存在，没有主语直方图时返回 `None`
    pub fn subject_not_exists(&self, uri: &str) -> EstimateResult<Option<bool>> {
        let histogram = match self.store.subject_histogram(self.dataset, false) {
            Some(h) => h,
            None => return Ok(None),
        };
        let subject = Term::uri(uri);
        let quantity = histogram
            .estimated_quantity_for(&subject)
            .map_err(|source| EstimateError::Pattern {
                pattern: subject.to_string(),
                source,
            })?;
        Ok(Some(quantity == 0))
    }

    /// 全部属性直方图的总量之和
    pub fn triples_total(&self) -> u64 {
        self.store
            .properties(self.dataset, None)
            .iter()
            .flat_map(|p| self.histograms_of(p))
            .map(|h| h.total_count())
            .fold(0u64, u64::saturating_add)
    }

    /// 有直方图的属性，可按值域类型过滤
    pub fn properties(&self, range: Option<&str>) -> BTreeSet<String> {
        self.store.properties(self.dataset, range)
    }

    /// 属性取值的区分度：各值域直方图 `distinct / total` 之积
    ///
    /// 属性没有直方图时返回 `None`
    pub fn property_entropy(&self, property: &str) -> Option<f64> {
        let histograms = self.histograms_of(property);
        if histograms.is_empty() {
            return None;
        }
        Some(
            histograms
                .iter()
                .filter(|h| h.total_count() > 0)
                .map(|h| h.distinct_count() as f64 / h.total_count() as f64)
                .product(),
        )
    }

    /// 按区分度升序排列的全部属性
    pub fn property_entropy_sorted(&self) -> Vec<(f64, String)> {
        let mut entropies: Vec<(f64, String)> = self
            .properties(None)
            .into_iter()
            .filter_map(|p| self.property_entropy(&p).map(|e| (e, p)))
            .collect();
        entropies.sort_by(|a, b| a.0.total_cmp(&b.0).then_with(|| a.1.cmp(&b.1)));
        entropies
    }
}

/// 直方图总量，有过滤条件时按覆盖率估算；无法估算时返回 `None`
fn restricted_total(histogram: &Histogram, filter: Option<&FilterExpr>, var: &str) -> Option<u64> {
    match filter {
        Some(expr) => coverage::estimate(histogram, expr, var),
        None => Some(histogram.total_count()),
    }
}

/// 将候选属性绑定到谓语变量上检验过滤条件
fn property_allowed(filter: Option<&FilterExpr>, var: &str, property: &str) -> bool {
    match filter {
        Some(expr) => expr.is_satisfied(&bind(var, Term::uri(property))),
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::vocab;
    use crate::expression::CompareOp;
    use crate::histogram::AnyHistogramBuilder;

    const DS: &str = "http://example.org/people.rdf";
    const AGE: &str = "http://example.org/age";
    const NAME: &str = "http://example.org/name";

    fn person(i: usize) -> Term {
        Term::uri(format!("http://example.org/person/{:02}", i))
    }

    fn histogram(range: &str, terms: &[Term]) -> Histogram {
        let mut builder = AnyHistogramBuilder::for_range(range, 5);
        for t in terms {
            builder.add_term(t).unwrap();
        }
        builder.generate().unwrap()
    }

    /// 10 个人，年龄 1..=10，每人一个名字
    fn store() -> StatisticsStore {
        let store = StatisticsStore::new();
        let subjects: Vec<Term> = (1..=10).map(person).collect();
        store.put_subject_histogram(DS, false, histogram(vocab::RDFS_RESOURCE, &subjects));
        let ages: Vec<Term> = (1..=10).map(Term::integer).collect();
        store.put_property_histogram(DS, AGE, histogram(vocab::XSD_INTEGER, &ages));
        let names: Vec<Term> = (1..=10).map(|i| Term::string(format!("name{}", i))).collect();
        store.put_property_histogram(DS, NAME, histogram(vocab::XSD_STRING, &names));
        store
    }

    #[test]
    fn test_unknown_subject_is_zero() {
        let store = store();
        let est = PatternEstimator::new(&store, DS);
        let missing = Term::uri("http://example.org/zzz");
        assert_eq!(est.subject_not_exists("http://example.org/zzz").unwrap(), Some(true));
        assert_eq!(
            est.triples_for_pattern(&missing, &Term::uri(AGE), &Term::integer(5)).unwrap(),
            Some(0)
        );
    }

    #[test]
    fn test_bound_triple_collapses_to_one() {
        let store = store();
        let est = PatternEstimator::new(&store, DS);
        let result = est
            .triples_for_pattern(&person(3), &Term::uri(AGE), &Term::integer(3))
            .unwrap();
        assert_eq!(result, Some(1));
    }

    #[test]
    fn test_property_variable_object() {
        let store = store();
        let est = PatternEstimator::new(&store, DS);
        let result = est
            .triples_for_pattern(&Term::var("s"), &Term::uri(AGE), &Term::var("age"))
            .unwrap();
        assert_eq!(result, Some(10));

        // 没有直方图的属性为 0
        let result = est
            .triples_for_pattern(&Term::var("s"), &Term::uri("http://example.org/none"), &Term::var("o"))
            .unwrap();
        assert_eq!(result, Some(0));
    }

    #[test]
    fn test_filtered_object() {
        let store = store();
        let est = PatternEstimator::new(&store, DS);
        let filters = vec![FilterExpr::var_compare("age", CompareOp::Lt, Term::integer(5))];
        let result = est
            .triples_for_filtered_pattern(&Term::var("s"), &Term::uri(AGE), &Term::var("age"), &filters)
            .unwrap();
        assert_eq!(result, Some(4));

        // 无法在直方图上估算的过滤条件
        let filters = vec![FilterExpr::function("isLiteral", vec![FilterExpr::var("age")])];
        let result = est
            .triples_for_filtered_pattern(&Term::var("s"), &Term::uri(AGE), &Term::var("age"), &filters)
            .unwrap();
        assert_eq!(result, None);
    }

    #[test]
    fn test_variable_property() {
        let store = store();
        let est = PatternEstimator::new(&store, DS);
        let all = est
            .triples_for_pattern(&Term::var("s"), &Term::var("p"), &Term::var("o"))
            .unwrap();
        assert_eq!(all, Some(20));

        let filters = vec![FilterExpr::var_compare("p", CompareOp::Eq, Term::uri(NAME))];
        let names = est
            .triples_for_filtered_pattern(&Term::var("s"), &Term::var("p"), &Term::var("o"), &filters)
            .unwrap();
        assert_eq!(names, Some(10));

        let by_value = est
            .triples_for_pattern(&Term::var("s"), &Term::var("p"), &Term::integer(7))
            .unwrap();
        assert_eq!(by_value, Some(1));
    }

    #[test]
    fn test_bound_subject_normalized() {
        let store = store();
        let est = PatternEstimator::new(&store, DS);
        // 20 / 10 个主语
        let result = est
            .triples_for_pattern(&person(1), &Term::var("p"), &Term::var("o"))
            .unwrap();
        assert_eq!(result, Some(2));
    }

    #[test]
    fn test_missing_subject_histogram_is_none() {
        let store = StatisticsStore::new();
        let est = PatternEstimator::new(&store, DS);
        assert_eq!(
            est.triples_for_pattern(&person(1), &Term::uri(AGE), &Term::var("o")).unwrap(),
            None
        );
        assert_eq!(est.subjects_total(), None);
    }

    #[test]
    fn test_invalid_patterns() {
        let store = store();
        let est = PatternEstimator::new(&store, DS);
        assert!(matches!(
            est.triples_for_pattern(&Term::var("s"), &Term::string("p"), &Term::var("o")),
            Err(EstimateError::InvalidPattern(_))
        ));
        assert!(matches!(
            est.triples_for_pattern(&Term::string("s"), &Term::uri(AGE), &Term::var("o")),
            Err(EstimateError::InvalidPattern(_))
        ));
        assert!(matches!(
            est.triples_for_pattern(
                &Term::var("s"),
                &Term::uri(AGE),
                &Term::typed("abc", vocab::XSD_INTEGER)
            ),
            Err(EstimateError::Pattern { .. })
        ));
    }

    #[test]
    fn test_totals_and_entropy() {
        let store = store();
        let est = PatternEstimator::new(&store, DS);
        assert_eq!(est.subjects_total(), Some(10));
        assert_eq!(est.anonymous_subjects_total(), None);
        assert_eq!(est.triples_total(), 20);
        assert_eq!(est.property_entropy(AGE), Some(1.0));
        assert_eq!(est.property_entropy("http://example.org/none"), None);
        assert_eq!(est.property_entropy_sorted().len(), 2);
    }
}
