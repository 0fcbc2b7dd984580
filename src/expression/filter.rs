//! 过滤表达式
//!
//! 查询计划中 Filter 算子携带的表达式列表（各项之间为合取关系）。
//! 本库只消费表达式，不解析查询文本。

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;

use crate::core::term::Term;

/// 比较运算符
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompareOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl CompareOp {
    /// 交换左右操作数后的等价运算符
    pub fn flip(self) -> Self {
        match self {
            CompareOp::Eq => CompareOp::Eq,
            CompareOp::Ne => CompareOp::Ne,
            CompareOp::Lt => CompareOp::Gt,
            CompareOp::Le => CompareOp::Ge,
            CompareOp::Gt => CompareOp::Lt,
            CompareOp::Ge => CompareOp::Le,
        }
    }

    /// 比较结果是否满足运算符
    pub fn matches(self, ordering: Ordering) -> bool {
        match self {
            CompareOp::Eq => ordering == Ordering::Equal,
            CompareOp::Ne => ordering != Ordering::Equal,
            CompareOp::Lt => ordering == Ordering::Less,
            CompareOp::Le => ordering != Ordering::Greater,
            CompareOp::Gt => ordering == Ordering::Greater,
            CompareOp::Ge => ordering != Ordering::Less,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            CompareOp::Eq => "=",
            CompareOp::Ne => "!=",
            CompareOp::Lt => "<",
            CompareOp::Le => "<=",
            CompareOp::Gt => ">",
            CompareOp::Ge => ">=",
        }
    }
}

/// 过滤表达式
#[derive(Debug, Clone, PartialEq)]
pub enum FilterExpr {
    /// 变量引用，名称不含 `?`
    Variable(String),
    Constant(Term),
    Compare {
        op: CompareOp,
        left: Box<FilterExpr>,
        right: Box<FilterExpr>,
    },
    And(Box<FilterExpr>, Box<FilterExpr>),
    Or(Box<FilterExpr>, Box<FilterExpr>),
    Not(Box<FilterExpr>),
    /// bound(?var)
    Bound(String),
    /// 内置函数调用，名称不区分大小写
    Function { name: String, args: Vec<FilterExpr> },
}

impl FilterExpr {
    pub fn var(name: impl Into<String>) -> Self {
        FilterExpr::Variable(name.into())
    }

    pub fn constant(term: Term) -> Self {
        FilterExpr::Constant(term)
    }

    pub fn compare(op: CompareOp, left: FilterExpr, right: FilterExpr) -> Self {
        FilterExpr::Compare {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// `?var op constant`
    pub fn var_compare(var: &str, op: CompareOp, value: Term) -> Self {
        Self::compare(op, FilterExpr::var(var), FilterExpr::Constant(value))
    }

    pub fn and(left: FilterExpr, right: FilterExpr) -> Self {
        FilterExpr::And(Box::new(left), Box::new(right))
    }

    pub fn or(left: FilterExpr, right: FilterExpr) -> Self {
        FilterExpr::Or(Box::new(left), Box::new(right))
    }

    #[allow(clippy::should_implement_trait)]
    pub fn not(expr: FilterExpr) -> Self {
        FilterExpr::Not(Box::new(expr))
    }

    pub fn bound(var: impl Into<String>) -> Self {
        FilterExpr::Bound(var.into())
    }

    pub fn function(name: impl Into<String>, args: Vec<FilterExpr>) -> Self {
        FilterExpr::Function {
            name: name.into(),
            args,
        }
    }

    /// 直接子表达式
    pub fn children(&self) -> Vec<&FilterExpr> {
        match self {
            FilterExpr::Variable(_) | FilterExpr::Constant(_) | FilterExpr::Bound(_) => Vec::new(),
            FilterExpr::Compare { left, right, .. } => vec![left.as_ref(), right.as_ref()],
            FilterExpr::And(l, r) | FilterExpr::Or(l, r) => vec![l.as_ref(), r.as_ref()],
            FilterExpr::Not(e) => vec![e.as_ref()],
            FilterExpr::Function { args, .. } => args.iter().collect(),
        }
    }

    /// 表达式中出现的全部变量
    pub fn vars_mentioned(&self) -> BTreeSet<String> {
        let mut vars = BTreeSet::new();
        let mut stack = vec![self];
        while let Some(expr) = stack.pop() {
            match expr {
                FilterExpr::Variable(v) | FilterExpr::Bound(v) => {
                    vars.insert(v.clone());
                }
                other => stack.extend(other.children()),
            }
        }
        vars
    }

    /// 展开顶层合取
    pub fn conjuncts(&self) -> Vec<&FilterExpr> {
        let mut result = Vec::new();
        let mut stack = vec![self];
        while let Some(expr) = stack.pop() {
            match expr {
                FilterExpr::And(l, r) => {
                    stack.push(r);
                    stack.push(l);
                }
                other => result.push(other),
            }
        }
        result
    }
}

impl fmt::Display for FilterExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterExpr::Variable(v) => write!(f, "?{}", v),
            FilterExpr::Constant(t) => write!(f, "{}", t),
            FilterExpr::Compare { op, left, right } => {
                write!(f, "({} {} {})", left, op.symbol(), right)
            }
            FilterExpr::And(l, r) => write!(f, "({} && {})", l, r),
            FilterExpr::Or(l, r) => write!(f, "({} || {})", l, r),
            FilterExpr::Not(e) => write!(f, "!{}", e),
            FilterExpr::Bound(v) => write!(f, "bound(?{})", v),
            FilterExpr::Function { name, args } => {
                write!(f, "{}(", name)?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", arg)?;
                }
                write!(f, ")")
            }
        }
    }
}

/// 表达式列表中出现的全部变量
pub fn filter_vars(filters: &[FilterExpr]) -> BTreeSet<String> {
    filters.iter().flat_map(FilterExpr::vars_mentioned).collect()
}

/// 提取只涉及 `var` 一个变量的合取项，合并为一个表达式
///
/// 涉及多个变量的合取项无法下推到单个直方图，直接忽略
pub fn single_variable_filter(filters: &[FilterExpr], var: &str) -> Option<FilterExpr> {
    filters
        .iter()
        .flat_map(FilterExpr::conjuncts)
        .filter(|expr| {
            let vars = expr.vars_mentioned();
            vars.len() == 1 && vars.contains(var)
        })
        .cloned()
        .reduce(FilterExpr::and)
}
