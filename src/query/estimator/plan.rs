//! 查询计划估算器
//!
//! 对计划树逐个算子估算 `[min, avg, max]`。任一子估算为 `None` 时整个计划为 `None`，
//! 不返回部分结果。不支持的算子返回 `UnsupportedOperator`。

use log::debug;

use super::cardinality::Cardinality;
use super::config::EstimatorConfig;
use super::pattern::PatternEstimator;
use super::unique::unique_value_vars;
use crate::core::error::{EstimateError, EstimateResult};
use crate::core::term::TriplePattern;
use crate::expression::{filter_vars, FilterExpr, FilterOptimizer};
use crate::query::plan::PlanNode;
use crate::stats::StatisticsStore;

/// 查询计划估算器
pub struct PlanEstimator<'a> {
    store: &'a StatisticsStore,
    dataset: &'a str,
    config: &'a EstimatorConfig,
    optimizer: &'a dyn FilterOptimizer,
}

impl<'a> PlanEstimator<'a> {
    pub fn new(
        store: &'a StatisticsStore,
        dataset: &'a str,
        config: &'a EstimatorConfig,
        optimizer: &'a dyn FilterOptimizer,
    ) -> Self {
        Self {
            store,
            dataset,
            config,
            optimizer,
        }
    }

    fn patterns(&self) -> PatternEstimator<'a> {
        PatternEstimator::new(self.store, self.dataset)
    }

    /// 估算整个计划
    pub fn estimate(&self, plan: &PlanNode) -> EstimateResult<Option<Cardinality>> {
        self.visit(plan, None, 0)
    }

    /// 基本图模式：取所有三元组模式中最小的估算值
    ///
    /// 过滤条件在这里优化一次，只传给涉及过滤变量的三元组模式。
    /// 空模式匹配一个空解。
    pub fn estimate_basic_pattern(
        &self,
        triples: &[TriplePattern],
        filters: &[FilterExpr],
    ) -> EstimateResult<Option<Cardinality>> {
        let optimized = if filters.is_empty() {
            Vec::new()
        } else {
            self.optimizer.optimize(filters)
        };
        let vars = filter_vars(&optimized);
        let patterns = self.patterns();

        let mut smallest: Option<u64> = None;
        for t in triples {
            let estimate = if !optimized.is_empty() && t.mentions_any(&vars) {
                patterns.triples_for_filtered_pattern(&t.subject, &t.predicate, &t.object, &optimized)?
            } else {
                patterns.triples_for_pattern(&t.subject, &t.predicate, &t.object)?
            };
            let estimate = match estimate {
                Some(n) => n,
                None => return Ok(None),
            };
            smallest = Some(smallest.map_or(estimate, |s| s.min(estimate)));
        }
        Ok(Some(Cardinality::exact(smallest.unwrap_or(1))))
    }

    fn visit(
        &self,
        node: &PlanNode,
        parent_filter: Option<&[FilterExpr]>,
        depth: usize,
    ) -> EstimateResult<Option<Cardinality>> {
        if depth > self.config.max_plan_depth {
            return Err(EstimateError::PlanTooDeep(self.config.max_plan_depth));
        }
        let next = depth + 1;

        let result = match node {
            PlanNode::Bgp(triples) | PlanNode::QuadPattern { triples, .. } => self
                .estimate_basic_pattern(triples, parent_filter.unwrap_or(&[]))
                .map_err(|e| e.in_operator(node.name()))?,

            PlanNode::Triple(t) => {
                let filters = match parent_filter {
                    Some(f) if !f.is_empty() => self.optimizer.optimize(f),
                    _ => Vec::new(),
                };
                self.patterns()
                    .triples_for_filtered_pattern(&t.subject, &t.predicate, &t.object, &filters)
                    .map_err(|e| e.in_operator(node.name()))?
                    .map(Cardinality::exact)
            }

            PlanNode::Null => Some(Cardinality::empty()),

            PlanNode::Table { rows, .. } => Some(Cardinality::exact(*rows as u64)),

            PlanNode::Filter { exprs, input } => {
                let sub = self.visit(input, Some(exprs), next)?;
                // 叶子算子已在模式层面使用了过滤条件
                if input.is_leaf() {
                    sub
                } else {
                    sub.map(|c| c.filtered(self.config.filter_selectivity))
                }
            }

            PlanNode::Join { left, right } => {
                let (l, r) = match self.visit_pair(left, right, next)? {
                    Some(pair) => pair,
                    None => return Ok(None),
                };
                let shared = shares_vars(left, right);
                Some(l.join(&r, shared, self.config.join_selectivity))
            }

            PlanNode::LeftJoin { left, right, .. } => {
                let (l, _) = match self.visit_pair(left, right, next)? {
                    Some(pair) => pair,
                    None => return Ok(None),
                };
                let shared = shares_vars(left, right);
                Some(l.left_join(shared, self.config.optional_selectivity))
            }

            PlanNode::Union { left, right } => self
                .visit_pair(left, right, next)?
                .map(|(l, r)| l.union(&r)),

            PlanNode::Distinct(input) | PlanNode::Reduced(input) => {
                let sub = match self.visit(input, None, next)? {
                    Some(c) => c,
                    None => return Ok(None),
                };
                let unique = unique_value_vars(input, self.store, self.dataset);
                let vars = input.pattern_vars();
                if unique.is_empty() && !vars.is_empty() {
                    Some(sub.reduced(vars.len(), self.config.duplicate_ratio))
                } else {
                    Some(sub)
                }
            }

            PlanNode::Project { input, .. }
            | PlanNode::Order { input, .. }
            | PlanNode::Label { input, .. }
            | PlanNode::Service { input, .. } => self.visit(input, None, next)?,

            PlanNode::Slice { input, length, .. } => {
                self.visit(input, None, next)?.map(|c| c.limited(*length))
            }

            PlanNode::Graph { .. }
            | PlanNode::Path { .. }
            | PlanNode::DatasetNames(_)
            | PlanNode::Assign { .. }
            | PlanNode::Extend { .. }
            | PlanNode::Group { .. }
            | PlanNode::Procedure { .. }
            | PlanNode::PropertyFunction { .. }
            | PlanNode::List(_)
            | PlanNode::Sequence(_)
            | PlanNode::Conditional { .. }
            | PlanNode::Minus { .. }
            | PlanNode::Extension { .. } => {
                return Err(EstimateError::UnsupportedOperator(node.name().to_string()));
            }
        };

        debug!("算子 {} 估算结果: {:?}", node.name(), result);
        Ok(result)
    }

    /// 两侧都可估算时返回两侧结果
    fn visit_pair(
        &self,
        left: &PlanNode,
        right: &PlanNode,
        depth: usize,
    ) -> EstimateResult<Option<(Cardinality, Cardinality)>> {
        let l = self.visit(left, None, depth)?;
        let r = self.visit(right, None, depth)?;
        Ok(l.zip(r))
    }
}

fn shares_vars(left: &PlanNode, right: &PlanNode) -> bool {
    let left_vars = left.pattern_vars();
    right.pattern_vars().iter().any(|v| left_vars.contains(v))
}
