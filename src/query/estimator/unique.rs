//! 唯一值变量检测
//!
//! 对形如 `:s :p ?o` 的三元组模式，如果 `:p` 只有一个值域直方图且其中所有取值
//! 都只出现一次，则 `?o` 的取值不会重复，去重算子对其无效。

use std::collections::BTreeSet;

use crate::core::term::TriplePattern;
use crate::query::plan::PlanNode;
use crate::stats::StatisticsStore;

/// 收集子计划中可证明取值唯一的变量
pub fn unique_value_vars(plan: &PlanNode, store: &StatisticsStore, dataset: &str) -> BTreeSet<String> {
    let mut unique = BTreeSet::new();
    let mut stack = vec![plan];
    while let Some(node) = stack.pop() {
        for triple in node.own_triples() {
            if let Some(var) = unique_object_var(&triple, store, dataset) {
                unique.insert(var);
            }
        }
        stack.extend(node.children());
    }
    unique
}

fn unique_object_var(triple: &TriplePattern, store: &StatisticsStore, dataset: &str) -> Option<String> {
    if triple.subject.is_variable() {
        return None;
    }
    let property = triple.predicate.as_uri()?;
    let var = triple.object.as_variable()?;

    let ranges = store.property_ranges(dataset, property);
    if ranges.len() != 1 {
        return None;
    }
    let histogram = store.property_histogram(dataset, property, &ranges[0])?;
    histogram.has_unique_values().then(|| var.to_string())
}
