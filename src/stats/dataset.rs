//! 数据集统计信息入口
//!
//! 绑定一个数据集，对外提供模式、基本图模式和查询计划的基数估算，
//! 以及主语/三元组总量和元数据访问。

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};

use super::info::{DatasetInfo, SourceType};
use super::store::StatisticsStore;
use crate::core::error::EstimateResult;
use crate::core::term::{Term, TriplePattern};
use crate::expression::{FilterExpr, FilterOptimizer, NoopFilterOptimizer};
use crate::query::estimator::{Cardinality, EstimatorConfig, PatternEstimator, PlanEstimator};
use crate::query::plan::PlanNode;

/// 单个数据集的统计信息
#[derive(Debug, Clone)]
pub struct DatasetStatistics {
    store: Arc<StatisticsStore>,
    dataset: String,
    config: EstimatorConfig,
    optimizer: Arc<dyn FilterOptimizer>,
}

impl DatasetStatistics {
    pub fn new(store: Arc<StatisticsStore>, dataset: impl Into<String>) -> Self {
        Self {
            store,
            dataset: dataset.into(),
            config: EstimatorConfig::default(),
            optimizer: Arc::new(NoopFilterOptimizer),
        }
    }

    pub fn with_config(mut self, config: EstimatorConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_optimizer(mut self, optimizer: Arc<dyn FilterOptimizer>) -> Self {
        self.optimizer = optimizer;
        self
    }

    pub fn dataset(&self) -> &str {
        &self.dataset
    }

    pub fn config(&self) -> &EstimatorConfig {
        &self.config
    }

    fn patterns(&self) -> PatternEstimator<'_> {
        PatternEstimator::new(&self.store, &self.dataset)
    }

    fn plans(&self) -> PlanEstimator<'_> {
        PlanEstimator::new(&self.store, &self.dataset, &self.config, self.optimizer.as_ref())
    }

    pub fn triples_for_pattern(&self, s: &Term, p: &Term, o: &Term) -> EstimateResult<Option<u64>> {
        self.patterns().triples_for_pattern(s, p, o)
    }

    /// 先优化过滤条件，再按模式估算
    pub fn triples_for_filtered_pattern(
        &self,
        s: &Term,
        p: &Term,
        o: &Term,
        filters: &[FilterExpr],
    ) -> EstimateResult<Option<u64>> {
        let optimized = if filters.is_empty() {
            Vec::new()
        } else {
            self.optimizer.optimize(filters)
        };
        self.patterns().triples_for_filtered_pattern(s, p, o, &optimized)
    }

    pub fn triples_for_basic_pattern(
        &self,
        triples: &[TriplePattern],
    ) -> EstimateResult<Option<Cardinality>> {
        self.plans().estimate_basic_pattern(triples, &[])
    }

    pub fn triples_for_filtered_basic_pattern(
        &self,
        triples: &[TriplePattern],
        filters: &[FilterExpr],
    ) -> EstimateResult<Option<Cardinality>> {
        self.plans().estimate_basic_pattern(triples, filters)
    }

    pub fn triples_for_plan(&self, plan: &PlanNode) -> EstimateResult<Option<Cardinality>> {
        self.plans().estimate(plan)
    }

    pub fn subjects_total(&self) -> Option<u64> {
        self.patterns().subjects_total()
    }

    pub fn uri_subjects_total(&self) -> Option<u64> {
        self.patterns().uri_subjects_total()
    }

    pub fn anonymous_subjects_total(&self) -> Option<u64> {
        self.patterns().anonymous_subjects_total()
    }

    pub fn subject_not_exists(&self, uri: &str) -> EstimateResult<Option<bool>> {
        self.patterns().subject_not_exists(uri)
    }

    pub fn triples_total(&self) -> u64 {
        self.patterns().triples_total()
    }

    pub fn properties(&self) -> BTreeSet<String> {
        self.patterns().properties(None)
    }

    pub fn properties_with_range(&self, range: &str) -> BTreeSet<String> {
        self.patterns().properties(Some(range))
    }

    pub fn property_entropy(&self, property: &str) -> Option<f64> {
        self.patterns().property_entropy(property)
    }

    pub fn property_entropy_sorted(&self) -> Vec<(f64, String)> {
        self.patterns().property_entropy_sorted()
    }

    pub fn info(&self) -> Option<DatasetInfo> {
        self.store.dataset_info(&self.dataset)
    }

    pub fn creator(&self) -> Option<String> {
        self.info().and_then(|i| i.creator)
    }

    pub fn created(&self) -> Option<DateTime<Utc>> {
        self.info().and_then(|i| i.created)
    }

    pub fn source_url(&self) -> &str {
        &self.dataset
    }

    pub fn source_type(&self) -> Option<SourceType> {
        self.info().map(|i| i.source_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::vocab;
    use crate::expression::CompareOp;
    use crate::histogram::AnyHistogramBuilder;

    const DS: &str = "http://example.org/sparql";
    const AGE: &str = "http://example.org/age";

    /// 只保留第一个过滤条件的优化器
    #[derive(Debug)]
    struct FirstOnly;

    impl FilterOptimizer for FirstOnly {
        fn optimize(&self, filters: &[FilterExpr]) -> Vec<FilterExpr> {
            filters.iter().take(1).cloned().collect()
        }
    }

    fn statistics() -> DatasetStatistics {
        let store = StatisticsStore::new();
        store.register_dataset(
            DatasetInfo::new(DS, SourceType::SparqlEndpoint).with_creator("collector"),
        );
        let mut subjects = AnyHistogramBuilder::for_range(vocab::RDFS_RESOURCE, 4);
        let mut ages = AnyHistogramBuilder::for_range(vocab::XSD_INTEGER, 5);
        for i in 1..=10 {
            subjects
                .add_term(&Term::uri(format!("http://example.org/p{:02}", i)))
                .unwrap();
            ages.add_term(&Term::integer(i)).unwrap();
        }
        store.put_subject_histogram(DS, false, subjects.generate().unwrap());
        store.put_property_histogram(DS, AGE, ages.generate().unwrap());
        DatasetStatistics::new(Arc::new(store), DS)
    }

    #[test]
    fn test_metadata() {
        let stats = statistics();
        assert_eq!(stats.source_url(), DS);
        assert_eq!(stats.source_type(), Some(SourceType::SparqlEndpoint));
        assert_eq!(stats.creator().as_deref(), Some("collector"));
        assert_eq!(stats.created(), None);
        assert_eq!(stats.subjects_total(), Some(10));
        assert_eq!(stats.properties().len(), 1);
        assert!(stats.properties_with_range(vocab::XSD_STRING).is_empty());
    }

    #[test]
    fn test_filtered_pattern_uses_optimizer() {
        let stats = statistics().with_optimizer(Arc::new(FirstOnly));
        let filters = vec![
            FilterExpr::var_compare("age", CompareOp::Gt, Term::integer(8)),
            FilterExpr::var_compare("age", CompareOp::Lt, Term::integer(2)),
        ];
        let result = stats
            .triples_for_filtered_pattern(&Term::var("s"), &Term::uri(AGE), &Term::var("age"), &filters)
            .unwrap();
        assert_eq!(result, Some(2));
    }

    #[test]
    fn test_basic_pattern_minimum() {
        let stats = statistics();
        let triples = vec![
            TriplePattern::new(Term::var("s"), Term::uri(AGE), Term::var("age")),
            TriplePattern::new(Term::var("s"), Term::uri(AGE), Term::integer(3)),
        ];
        assert_eq!(
            stats.triples_for_basic_pattern(&triples).unwrap(),
            Some(Cardinality::exact(1))
        );

        let filters = vec![FilterExpr::var_compare("age", CompareOp::Ge, Term::integer(3))];
        assert_eq!(
            stats
                .triples_for_filtered_basic_pattern(&triples[..1], &filters)
                .unwrap(),
            Some(Cardinality::exact(8))
        );
    }
}
