//! 基数估算集成测试
//!
//! 测试范围:
//! - query::estimator::pattern - 单个三元组模式的估算
//! - query::estimator::plan - 查询计划逐算子组合
//! - stats::dataset - 总量、区分度与元数据
//!
//! 数据集见 `common::people_triples`

mod common;

use common::*;
use graphstats::core::error::EstimateError;
use graphstats::core::term::{Term, TriplePattern};
use graphstats::core::vocab;
use graphstats::expression::{CompareOp, FilterExpr};
use graphstats::query::estimator::{Cardinality, EstimatorConfig};
use graphstats::query::plan::PlanNode;
use graphstats::stats::{DatasetStatistics, SourceType};

fn tp(s: Term, p: &str, o: Term) -> TriplePattern {
    TriplePattern::new(s, Term::uri(p), o)
}

fn ages() -> PlanNode {
    PlanNode::triple(Term::var("s"), Term::uri(AGE), Term::var("age"))
}

fn names() -> PlanNode {
    PlanNode::triple(Term::var("s"), Term::uri(NAME), Term::var("name"))
}

fn unknown_property() -> PlanNode {
    PlanNode::triple(
        Term::var("s"),
        Term::uri("http://example.org/vocab/unknown"),
        Term::integer(1),
    )
}

// ==================== 单模式估算 ====================

#[test]
fn test_absent_subject_matches_nothing() {
    let stats = people_statistics();
    let absent = Term::uri("http://example.org/zzz");

    assert_eq!(stats.subject_not_exists("http://example.org/zzz").unwrap(), Some(true));
    assert_eq!(stats.subject_not_exists(person(5).as_uri().unwrap()).unwrap(), Some(false));
    assert_eq!(
        stats.triples_for_pattern(&absent, &Term::uri(AGE), &Term::var("o")).unwrap(),
        Some(0)
    );
    assert_eq!(
        stats.triples_for_pattern(&absent, &Term::var("p"), &Term::var("o")).unwrap(),
        Some(0)
    );
}

#[test]
fn test_bound_triple_is_at_most_one() {
    let stats = people_statistics();
    // person 3 的年龄是 21，直方图估计为 2
    assert_eq!(
        stats.triples_for_pattern(&Term::var("s"), &Term::uri(AGE), &Term::integer(21)).unwrap(),
        Some(2)
    );
    assert_eq!(
        stats.triples_for_pattern(&person(3), &Term::uri(AGE), &Term::integer(21)).unwrap(),
        Some(1)
    );
    assert_eq!(
        stats.triples_for_pattern(&person(3), &Term::uri(AGE), &Term::integer(99)).unwrap(),
        Some(0)
    );
}

#[test]
fn test_bound_subject_is_normalized_by_subjects() {
    let stats = people_statistics();
    // 530 个三元组 / 110 个主语
    assert_eq!(
        stats.triples_for_pattern(&person(3), &Term::var("p"), &Term::var("o")).unwrap(),
        Some(5)
    );
    // 100 / 110
    assert_eq!(
        stats.triples_for_pattern(&person(3), &Term::uri(AGE), &Term::var("o")).unwrap(),
        Some(1)
    );
}

#[test]
fn test_unbound_property_patterns() {
    let stats = people_statistics();
    assert_eq!(
        stats.triples_for_pattern(&Term::var("s"), &Term::uri(AGE), &Term::var("o")).unwrap(),
        Some(100)
    );
    // 只有 name 和 city 是字符串值域，"City 1" 不在 name 的范围内
    assert_eq!(
        stats
            .triples_for_pattern(&Term::var("s"), &Term::var("p"), &Term::string("City 1"))
            .unwrap(),
        Some(3)
    );
    assert_eq!(
        stats.triples_for_pattern(&Term::var("s"), &Term::var("p"), &Term::var("o")).unwrap(),
        Some(530)
    );
    // 没有任何属性使用该值域
    assert_eq!(
        stats
            .triples_for_pattern(
                &Term::var("s"),
                &Term::var("p"),
                &Term::typed("P1D", "http://www.w3.org/2001/XMLSchema#duration"),
            )
            .unwrap(),
        None
    );
}

#[test]
fn test_property_filter_on_unbound_predicate() {
    let stats = people_statistics();
    let filters = vec![FilterExpr::var_compare("p", CompareOp::Eq, Term::uri(CITY))];
    assert_eq!(
        stats
            .triples_for_filtered_pattern(
                &Term::var("s"),
                &Term::var("p"),
                &Term::var("o"),
                &filters,
            )
            .unwrap(),
        Some(ADDRESSES as u64)
    );

    // 过滤掉全部候选属性时没有估算结果
    let filters = vec![FilterExpr::var_compare("p", CompareOp::Eq, Term::uri("http://nope/x"))];
    for object in [Term::integer(20), Term::var("o")] {
        assert_eq!(
            stats
                .triples_for_filtered_pattern(&Term::var("s"), &Term::var("p"), &object, &filters)
                .unwrap(),
            None,
            "{}",
            object
        );
    }
}

#[test]
fn test_range_filter_narrows_estimate() {
    let stats = people_statistics();
    let filters = vec![FilterExpr::var_compare("age", CompareOp::Gt, Term::integer(60))];
    let estimate = stats
        .triples_for_filtered_pattern(&Term::var("s"), &Term::uri(AGE), &Term::var("age"), &filters)
        .unwrap()
        .unwrap();
    assert!(estimate > 0 && estimate < 40, "estimate {}", estimate);
}

#[test]
fn test_invalid_patterns() {
    let stats = people_statistics();
    let err = stats
        .triples_for_pattern(&Term::string("x"), &Term::uri(AGE), &Term::var("o"))
        .unwrap_err();
    assert!(matches!(err, EstimateError::InvalidPattern(_)));

    let err = stats
        .triples_for_pattern(&Term::var("s"), &Term::integer(1), &Term::var("o"))
        .unwrap_err();
    assert!(matches!(err, EstimateError::InvalidPattern(_)));
}

#[test]
fn test_unknown_dataset_has_no_opinion() {
    let stats = DatasetStatistics::new(collected_store(), "http://example.org/missing");
    assert_eq!(
        stats.triples_for_pattern(&person(1), &Term::uri(AGE), &Term::var("o")).unwrap(),
        None
    );
    assert_eq!(
        stats.triples_for_pattern(&Term::var("s"), &Term::var("p"), &Term::var("o")).unwrap(),
        None
    );
    assert_eq!(stats.subjects_total(), None);
    assert_eq!(stats.triples_total(), 0);
}

// ==================== 计划估算 ====================

#[test]
fn test_cardinality_combinations() {
    let left = Cardinality::new(0, 5, 10);
    let right = Cardinality::new(0, 3, 6);
    assert_eq!(left.join(&right, false, 0.5).as_array(), [0, 15, 60]);
    assert_eq!(left.union(&right).as_array(), [0, 8, 16]);
    assert_eq!(Cardinality::exact(100).reduced(2, 0.5).as_array(), [1, 75, 100]);
}

#[test]
fn test_table_and_null() {
    let stats = people_statistics();
    let table = PlanNode::Table {
        vars: vec!["a".to_string(), "b".to_string()],
        rows: 100,
    };
    assert_eq!(stats.triples_for_plan(&table).unwrap(), Some(Cardinality::exact(100)));
    assert_eq!(
        stats.triples_for_plan(&PlanNode::distinct(table)).unwrap(),
        Some(Cardinality::new(1, 75, 100))
    );
    assert_eq!(stats.triples_for_plan(&PlanNode::Null).unwrap(), Some(Cardinality::empty()));
}

#[test]
fn test_join_and_union() {
    let stats = people_statistics();

    let join = PlanNode::join(ages(), names());
    assert_eq!(
        stats.triples_for_plan(&join).unwrap(),
        Some(Cardinality::new(0, 5000, 10000))
    );

    // 过滤条件作用在非模式子节点上时按选择率折减
    let filtered = PlanNode::filter(
        vec![FilterExpr::var_compare("age", CompareOp::Gt, Term::integer(60))],
        join,
    );
    assert_eq!(
        stats.triples_for_plan(&filtered).unwrap(),
        Some(Cardinality::new(0, 2500, 10000))
    );

    let cross = PlanNode::join(
        ages(),
        PlanNode::triple(Term::var("x"), Term::uri(CITY), Term::var("city")),
    );
    assert_eq!(
        stats.triples_for_plan(&cross).unwrap(),
        Some(Cardinality::exact(1000))
    );

    let union = PlanNode::union(ages(), names());
    assert_eq!(stats.triples_for_plan(&union).unwrap(), Some(Cardinality::exact(200)));

    let optional = PlanNode::left_join(ages(), names());
    assert_eq!(
        stats.triples_for_plan(&optional).unwrap(),
        Some(Cardinality::new(0, 50, 100))
    );
}

#[test]
fn test_basic_pattern_takes_smallest() {
    let stats = people_statistics();
    let bgp = PlanNode::bgp(vec![
        tp(Term::var("s"), AGE, Term::var("age")),
        tp(Term::var("s"), BORN, Term::var("born")),
    ]);
    assert_eq!(stats.triples_for_plan(&bgp).unwrap(), Some(Cardinality::exact(20)));

    let limited = PlanNode::slice(PlanNode::project(vec!["s".to_string()], bgp), 0, Some(10));
    assert_eq!(stats.triples_for_plan(&limited).unwrap(), Some(Cardinality::exact(10)));

    assert_eq!(
        stats.triples_for_basic_pattern(&[]).unwrap(),
        Some(Cardinality::exact(1))
    );
}

#[test]
fn test_filter_on_pattern_uses_histograms() {
    let stats = people_statistics();
    let filtered = PlanNode::filter(
        vec![FilterExpr::var_compare("age", CompareOp::Gt, Term::integer(60))],
        ages(),
    );
    let c = stats.triples_for_plan(&filtered).unwrap().unwrap();
    assert_eq!(c.min, c.max);
    assert!(c.avg > 0 && c.avg < 40, "{}", c);

    let direct = stats
        .triples_for_filtered_basic_pattern(
            &[tp(Term::var("s"), AGE, Term::var("age"))],
            &[FilterExpr::var_compare("age", CompareOp::Gt, Term::integer(60))],
        )
        .unwrap();
    assert_eq!(direct, Some(c));
}

#[test]
fn test_distinct_respects_unique_values() {
    let stats = people_statistics();

    // 没有唯一值变量：两个自由变量，平均值乘以 0.75
    let plain = PlanNode::distinct(PlanNode::bgp(vec![tp(Term::var("s"), AGE, Term::var("a"))]));
    assert_eq!(
        stats.triples_for_plan(&plain).unwrap(),
        Some(Cardinality::new(1, 75, 100))
    );

    // name 的取值互不相同，去重不起作用
    let unique = PlanNode::distinct(PlanNode::join(
        PlanNode::bgp(vec![tp(person(1), NAME, Term::var("n"))]),
        PlanNode::bgp(vec![tp(Term::var("s"), AGE, Term::var("a"))]),
    ));
    assert_eq!(
        stats.triples_for_plan(&unique).unwrap(),
        Some(Cardinality::exact(100))
    );

    let reduced = PlanNode::reduced(PlanNode::bgp(vec![tp(Term::var("s"), AGE, Term::var("a"))]));
    assert_eq!(
        stats.triples_for_plan(&reduced).unwrap(),
        Some(Cardinality::new(1, 75, 100))
    );
}

#[test]
fn test_missing_statistics_propagate() {
    let stats = people_statistics();
    assert_eq!(stats.triples_for_plan(&unknown_property()).unwrap(), None);
    assert_eq!(
        stats.triples_for_plan(&PlanNode::union(ages(), unknown_property())).unwrap(),
        None
    );
    assert_eq!(
        stats.triples_for_plan(&PlanNode::join(unknown_property(), names())).unwrap(),
        None
    );
    assert_eq!(
        stats
            .triples_for_plan(&PlanNode::distinct(PlanNode::left_join(unknown_property(), names())))
            .unwrap(),
        None
    );
}

#[test]
fn test_unsupported_operator_is_named() {
    let stats = people_statistics();
    let minus = PlanNode::project(
        vec!["s".to_string()],
        PlanNode::Minus {
            left: Box::new(ages()),
            right: Box::new(names()),
        },
    );
    match stats.triples_for_plan(&minus) {
        Err(EstimateError::UnsupportedOperator(name)) => assert_eq!(name, "minus"),
        other => panic!("unexpected result: {:?}", other),
    }

    let group = PlanNode::Group {
        keys: vec!["s".to_string()],
        input: Box::new(ages()),
    };
    match stats.triples_for_plan(&PlanNode::union(ages(), group)) {
        Err(EstimateError::UnsupportedOperator(name)) => assert_eq!(name, "group"),
        other => panic!("unexpected result: {:?}", other),
    }
}

#[test]
fn test_pattern_error_names_operator() {
    let stats = people_statistics();
    let bad = PlanNode::join(
        ages(),
        PlanNode::triple(Term::var("s"), Term::string("p"), Term::var("o")),
    );
    match stats.triples_for_plan(&bad) {
        Err(EstimateError::Operator { operator, source }) => {
            assert_eq!(operator, "triple");
            assert!(matches!(*source, EstimateError::InvalidPattern(_)));
        }
        other => panic!("unexpected result: {:?}", other),
    }
}

#[test]
fn test_plan_depth_limit() {
    let stats = people_statistics().with_config(EstimatorConfig {
        max_plan_depth: 3,
        ..Default::default()
    });

    let mut plan = ages();
    for _ in 0..10 {
        plan = PlanNode::project(vec!["s".to_string()], plan);
    }
    assert!(matches!(
        stats.triples_for_plan(&plan),
        Err(EstimateError::PlanTooDeep(3))
    ));
    assert_eq!(stats.triples_for_plan(&ages()).unwrap(), Some(Cardinality::exact(100)));
}

#[test]
fn test_selectivities_come_from_config() {
    let stats = people_statistics().with_config(EstimatorConfig {
        join_selectivity: 0.1,
        ..Default::default()
    });
    assert_eq!(
        stats.triples_for_plan(&PlanNode::join(ages(), names())).unwrap(),
        Some(Cardinality::new(0, 1000, 10000))
    );
}

// ==================== 总量与元数据 ====================

#[test]
fn test_totals() {
    let stats = people_statistics();
    assert_eq!(stats.uri_subjects_total(), Some(PEOPLE as u64));
    assert_eq!(stats.anonymous_subjects_total(), Some(ADDRESSES as u64));
    assert_eq!(stats.subjects_total(), Some(110));
    assert_eq!(stats.triples_total(), 530);
    assert_eq!(stats.properties().len(), 7);
    assert_eq!(
        stats.properties_with_range(vocab::XSD_STRING).into_iter().collect::<Vec<_>>(),
        vec![CITY.to_string(), NAME.to_string()]
    );
}

#[test]
fn test_property_entropy_order() {
    let stats = people_statistics();
    assert_eq!(stats.property_entropy(NAME), Some(1.0));
    assert_eq!(stats.property_entropy(AGE), Some(0.5));
    assert_eq!(stats.property_entropy("http://example.org/vocab/unknown"), None);

    let sorted: Vec<String> = stats
        .property_entropy_sorted()
        .into_iter()
        .map(|(_, p)| p)
        .collect();
    assert_eq!(
        sorted,
        vec![ACTIVE, CITY, AGE, BORN, HEIGHT, KNOWS, NAME]
            .into_iter()
            .map(String::from)
            .collect::<Vec<_>>()
    );
}

#[test]
fn test_metadata() {
    let stats = people_statistics();
    assert_eq!(stats.source_url(), DATASET);
    assert_eq!(stats.source_type(), Some(SourceType::RdfDocument));
    assert_eq!(stats.creator().as_deref(), Some("integration-tests"));
    assert_eq!(stats.info().unwrap().source_url, DATASET);
}
