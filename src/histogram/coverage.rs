//! 过滤表达式在直方图上的覆盖率估算
//!
//! 为每个桶计算满足表达式的取值比例，满足数量为 `ceil(Σ bins[i] * fraction[i])`。
//!
//! - 变量与常量的比较：有序类型按桶内"严格小于"比例 b 与"等于"比例 e 组合，
//!   通用直方图只支持 `=` / `!=`，布尔直方图为精确值
//! - `&&` 取逐桶最小值，`||` 取逐桶和并截断到 1，`!` 取补
//! - 其余形式（函数调用、涉及其他变量、常量无法解析）无法估算，返回 `None`

use super::{Histogram, HistogramValue};
use crate::core::term::Term;
use crate::expression::{CompareOp, FilterExpr};

/// 满足 `expr` 的取值数量估计
///
/// `expr` 须只涉及变量 `var`，`var` 的取值分布由 `histogram` 描述
pub fn estimate(histogram: &Histogram, expr: &FilterExpr, var: &str) -> Option<u64> {
    let fractions = bin_fractions(histogram, expr, var)?;
    let raw: f64 = histogram
        .bins()
        .iter()
        .zip(&fractions)
        .map(|(&count, fraction)| count as f64 * fraction)
        .sum();
    Some(round_up(raw))
}

/// 逐桶满足比例
pub fn bin_fractions(histogram: &Histogram, expr: &FilterExpr, var: &str) -> Option<Vec<f64>> {
    match expr {
        FilterExpr::Compare { op, left, right } => match (left.as_ref(), right.as_ref()) {
            (FilterExpr::Variable(v), FilterExpr::Constant(t)) if v == var => {
                compare_fractions(histogram, *op, t)
            }
            (FilterExpr::Constant(t), FilterExpr::Variable(v)) if v == var => {
                compare_fractions(histogram, op.flip(), t)
            }
            _ => None,
        },
        FilterExpr::And(l, r) => {
            let a = bin_fractions(histogram, l, var)?;
            let b = bin_fractions(histogram, r, var)?;
            Some(a.iter().zip(&b).map(|(x, y)| x.min(*y)).collect())
        }
        FilterExpr::Or(l, r) => {
            let a = bin_fractions(histogram, l, var)?;
            let b = bin_fractions(histogram, r, var)?;
            Some(a.iter().zip(&b).map(|(x, y)| (x + y).min(1.0)).collect())
        }
        FilterExpr::Not(e) => {
            let a = bin_fractions(histogram, e, var)?;
            Some(a.iter().map(|x| 1.0 - x).collect())
        }
        FilterExpr::Bound(v) if v == var => Some(vec![1.0; histogram.num_bins()]),
        _ => None,
    }
}

fn compare_fractions(histogram: &Histogram, op: CompareOp, constant: &Term) -> Option<Vec<f64>> {
    let value = histogram.parse_term(constant).ok()?;
    let n = histogram.num_bins();

    match (histogram, &value) {
        (Histogram::Boolean(_), HistogramValue::Boolean(v)) => Some(
            [false, true]
                .iter()
                .map(|bin_value| op.matches(bin_value.cmp(v)) as u8 as f64)
                .collect(),
        ),
        (Histogram::Generic(h), HistogramValue::String(v)) => {
            let hit = h.bin_index(v);
            let e = 1.0 / h.bin_data().avg_distinct_per_bin();
            let eq: Vec<f64> = (0..n).map(|i| if i == hit { e } else { 0.0 }).collect();
            match op {
                CompareOp::Eq => Some(eq),
                CompareOp::Ne => Some(eq.iter().map(|x| 1.0 - x).collect()),
                _ => None,
            }
        }
        _ => {
            let fractions = (0..n)
                .map(|i| {
                    let (below, equal) = below_and_equal(histogram, &value, i)?;
                    Some(combine(op, below, equal))
                })
                .collect::<Option<Vec<f64>>>()?;
            Some(fractions)
        }
    }
}

/// 第 `index` 个桶中严格小于、等于 `value` 的比例
fn below_and_equal(histogram: &Histogram, value: &HistogramValue, index: usize) -> Option<(f64, f64)> {
    let equal = |hit: Option<usize>, distinct: f64| {
        if hit == Some(index) {
            (1.0 / distinct).min(1.0)
        } else {
            0.0
        }
    };
    match (histogram, value) {
        (Histogram::Integer(h), HistogramValue::Integer(v)) => Some((
            h.fraction_below(*v, index),
            equal(h.bin_index(*v), h.bin_data().avg_distinct_per_bin()),
        )),
        (Histogram::Double(h), HistogramValue::Double(v)) => Some((
            h.fraction_below(*v, index),
            equal(h.bin_index(*v), h.bin_data().avg_distinct_per_bin()),
        )),
        (Histogram::Float(h), HistogramValue::Float(v)) => Some((
            h.fraction_below(*v, index),
            equal(h.bin_index(*v), h.bin_data().avg_distinct_per_bin()),
        )),
        (Histogram::OrderedString(h), HistogramValue::String(v)) => {
            Some((h.fraction_below(v, index), h.fraction_equal(v, index)))
        }
        _ => None,
    }
}

fn combine(op: CompareOp, below: f64, equal: f64) -> f64 {
    match op {
        CompareOp::Lt => below,
        CompareOp::Le => (below + equal).min(1.0),
        CompareOp::Gt => (1.0 - below - equal).max(0.0),
        CompareOp::Ge => 1.0 - below,
        CompareOp::Eq => equal,
        CompareOp::Ne => 1.0 - equal,
    }
}

fn round_up(raw: f64) -> u64 {
    if !(raw > 0.0) {
        return 0;
    }
    // 消除浮点累加误差
    (raw - 1e-9).ceil().max(0.0) as u64
}
