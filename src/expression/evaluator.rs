//! 过滤表达式求值
//!
//! 在一组变量绑定上计算表达式的布尔值。估算器只在候选属性 URI
//! 绑定到谓语变量时使用（`?p` 上的单变量过滤），因此这里只覆盖
//! 比较、逻辑连接词、`bound` 以及常用的字符串内置函数。

use std::collections::HashMap;

use regex::RegexBuilder;

use super::filter::{CompareOp, FilterExpr};
use crate::core::error::{ExpressionError, ExpressionResult};
use crate::core::term::{Literal, Term};
use crate::core::vocab;

/// 变量绑定
pub type Binding = HashMap<String, Term>;

/// 求值中间结果
#[derive(Debug, Clone, PartialEq)]
pub enum EvalValue {
    Bool(bool),
    Term(Term),
}

impl EvalValue {
    /// 有效布尔值
    pub fn effective_boolean(&self) -> ExpressionResult<bool> {
        match self {
            EvalValue::Bool(b) => Ok(*b),
            EvalValue::Term(Term::Literal(lit)) => literal_boolean(lit),
            EvalValue::Term(other) => Err(ExpressionError::type_error(format!(
                "{} 没有布尔值",
                other
            ))),
        }
    }
}

fn literal_boolean(lit: &Literal) -> ExpressionResult<bool> {
    let dt = lit.range_type();
    if dt == vocab::XSD_BOOLEAN {
        return Ok(lit.lexical == "true" || lit.lexical == "1");
    }
    if vocab::is_numeric_type(dt) {
        return lit
            .lexical
            .trim()
            .parse::<f64>()
            .map(|v| v != 0.0 && !v.is_nan())
            .map_err(|e| ExpressionError::type_error(e.to_string()));
    }
    if dt == vocab::XSD_STRING {
        return Ok(!lit.lexical.is_empty());
    }
    Err(ExpressionError::type_error(format!(
        "<{}> 没有布尔值",
        dt
    )))
}

fn numeric_value(term: &Term) -> Option<f64> {
    match term {
        Term::Literal(lit) if vocab::is_numeric_type(lit.range_type()) => {
            lit.lexical.trim().parse::<f64>().ok()
        }
        _ => None,
    }
}

/// 过滤表达式求值器
pub struct FilterEvaluator;

impl FilterEvaluator {
    pub fn evaluate(expr: &FilterExpr, binding: &Binding) -> ExpressionResult<EvalValue> {
        match expr {
            FilterExpr::Variable(v) => binding
                .get(v)
                .cloned()
                .map(EvalValue::Term)
                .ok_or_else(|| ExpressionError::unbound_variable(v)),
            FilterExpr::Constant(t) => Ok(EvalValue::Term(t.clone())),
            FilterExpr::Compare { op, left, right } => {
                let l = Self::evaluate_term(left, binding)?;
                let r = Self::evaluate_term(right, binding)?;
                Self::compare(*op, &l, &r).map(EvalValue::Bool)
            }
            FilterExpr::And(l, r) => Self::eval_and(l, r, binding),
            FilterExpr::Or(l, r) => Self::eval_or(l, r, binding),
            FilterExpr::Not(e) => Self::evaluate(e, binding)?
                .effective_boolean()
                .map(|b| EvalValue::Bool(!b)),
            FilterExpr::Bound(v) => Ok(EvalValue::Bool(binding.contains_key(v))),
            FilterExpr::Function { name, args } => Self::call(name, args, binding),
        }
    }

    /// 求值并判断是否满足，求值错误视为不满足
    pub fn is_satisfied(expr: &FilterExpr, binding: &Binding) -> bool {
        Self::evaluate(expr, binding)
            .and_then(|v| v.effective_boolean())
            .unwrap_or(false)
    }

    fn evaluate_term(expr: &FilterExpr, binding: &Binding) -> ExpressionResult<Term> {
        match Self::evaluate(expr, binding)? {
            EvalValue::Term(t) => Ok(t),
            EvalValue::Bool(b) => Ok(Term::boolean(b)),
        }
    }

    fn evaluate_string(expr: &FilterExpr, binding: &Binding) -> ExpressionResult<String> {
        match Self::evaluate_term(expr, binding)? {
            Term::Literal(lit) => Ok(lit.lexical),
            other => Err(ExpressionError::type_error(format!(
                "{} 不是字符串字面量",
                other
            ))),
        }
    }

    /// 逻辑与：一侧为 false 时忽略另一侧的错误
    fn eval_and(l: &FilterExpr, r: &FilterExpr, binding: &Binding) -> ExpressionResult<EvalValue> {
        let left = Self::evaluate(l, binding).and_then(|v| v.effective_boolean());
        let right = Self::evaluate(r, binding).and_then(|v| v.effective_boolean());
        match (left, right) {
            (Ok(false), _) | (_, Ok(false)) => Ok(EvalValue::Bool(false)),
            (Ok(true), Ok(true)) => Ok(EvalValue::Bool(true)),
            (Err(e), _) | (_, Err(e)) => Err(e),
        }
    }

    /// 逻辑或：一侧为 true 时忽略另一侧的错误
    fn eval_or(l: &FilterExpr, r: &FilterExpr, binding: &Binding) -> ExpressionResult<EvalValue> {
        let left = Self::evaluate(l, binding).and_then(|v| v.effective_boolean());
        let right = Self::evaluate(r, binding).and_then(|v| v.effective_boolean());
        match (left, right) {
            (Ok(true), _) | (_, Ok(true)) => Ok(EvalValue::Bool(true)),
            (Ok(false), Ok(false)) => Ok(EvalValue::Bool(false)),
            (Err(e), _) | (_, Err(e)) => Err(e),
        }
    }

    /// 比较两个 RDF 项
    ///
    /// 数值按数值比较，同类字面量按词法比较，其余只支持 `=` / `!=`
    pub fn compare(op: CompareOp, left: &Term, right: &Term) -> ExpressionResult<bool> {
        if let (Some(a), Some(b)) = (numeric_value(left), numeric_value(right)) {
            return match a.partial_cmp(&b) {
                Some(ordering) => Ok(op.matches(ordering)),
                None => Ok(op == CompareOp::Ne),
            };
        }

        let ordering = match (left, right) {
            (Term::Literal(a), Term::Literal(b))
                if a.range_type() == b.range_type() && a.language == b.language =>
            {
                Some(a.lexical.cmp(&b.lexical))
            }
            _ => None,
        };

        match (ordering, op) {
            (Some(ord), _) => Ok(op.matches(ord)),
            (None, CompareOp::Eq) => Ok(left == right),
            (None, CompareOp::Ne) => Ok(left != right),
            (None, _) => Err(ExpressionError::type_error(format!(
                "无法比较 {} 与 {}",
                left, right
            ))),
        }
    }

    fn call(name: &str, args: &[FilterExpr], binding: &Binding) -> ExpressionResult<EvalValue> {
        let lower = name.to_ascii_lowercase();
        match lower.as_str() {
            "str" => {
                Self::expect_args(name, args, 1)?;
                let term = Self::evaluate_term(&args[0], binding)?;
                Ok(EvalValue::Term(Term::string(term.lexical_form())))
            }
            "isiri" | "isuri" => {
                Self::expect_args(name, args, 1)?;
                let term = Self::evaluate_term(&args[0], binding)?;
                Ok(EvalValue::Bool(term.is_uri()))
            }
            "isliteral" => {
                Self::expect_args(name, args, 1)?;
                let term = Self::evaluate_term(&args[0], binding)?;
                Ok(EvalValue::Bool(matches!(term, Term::Literal(_))))
            }
            "isblank" => {
                Self::expect_args(name, args, 1)?;
                let term = Self::evaluate_term(&args[0], binding)?;
                Ok(EvalValue::Bool(matches!(term, Term::Blank(_))))
            }
            "strstarts" | "strends" | "contains" => {
                Self::expect_args(name, args, 2)?;
                let haystack = Self::evaluate_string(&args[0], binding)?;
                let needle = Self::evaluate_string(&args[1], binding)?;
                let result = match lower.as_str() {
                    "strstarts" => haystack.starts_with(&needle),
                    "strends" => haystack.ends_with(&needle),
                    _ => haystack.contains(&needle),
                };
                Ok(EvalValue::Bool(result))
            }
            "regex" => {
                if args.len() != 2 && args.len() != 3 {
                    return Err(ExpressionError::argument_count_error(name, 2, args.len()));
                }
                let text = Self::evaluate_string(&args[0], binding)?;
                let pattern = Self::evaluate_string(&args[1], binding)?;
                let flags = match args.get(2) {
                    Some(f) => Self::evaluate_string(f, binding)?,
                    None => String::new(),
                };
                let regex = RegexBuilder::new(&pattern)
                    .case_insensitive(flags.contains('i'))
                    .multi_line(flags.contains('m'))
                    .dot_matches_new_line(flags.contains('s'))
                    .build()
                    .map_err(|e| ExpressionError::invalid_regex(e.to_string()))?;
                Ok(EvalValue::Bool(regex.is_match(&text)))
            }
            _ => Err(ExpressionError::unknown_function(name)),
        }
    }

    fn expect_args(name: &str, args: &[FilterExpr], expected: usize) -> ExpressionResult<()> {
        if args.len() != expected {
            return Err(ExpressionError::argument_count_error(name, expected, args.len()));
        }
        Ok(())
    }
}

impl FilterExpr {
    /// 在绑定上求值，错误视为不满足
    pub fn is_satisfied(&self, binding: &Binding) -> bool {
        FilterEvaluator::is_satisfied(self, binding)
    }
}

/// 单变量绑定
pub fn bind(var: &str, value: Term) -> Binding {
    let mut binding = Binding::with_capacity(1);
    binding.insert(var.to_string(), value);
    binding
}
