//! 查询计划树
//!
//! 由查询规划方构造的不可变算子树。估算器对每种算子显式匹配，
//! 不支持估算的算子同样在这里列出，新增算子时必须在估算器中处理。

use std::collections::BTreeSet;
use std::fmt;

use crate::core::term::{Term, TriplePattern};
use crate::expression::FilterExpr;

/// 属性路径
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyPath {
    /// 单个属性
    Link(String),
    /// 反向
    Inverse(Box<PropertyPath>),
    /// 顺序 `a/b`
    Sequence(Box<PropertyPath>, Box<PropertyPath>),
    /// 选择 `a|b`
    Alternative(Box<PropertyPath>, Box<PropertyPath>),
    /// `a*`
    ZeroOrMore(Box<PropertyPath>),
    /// `a+`
    OneOrMore(Box<PropertyPath>),
    /// `a?`
    ZeroOrOne(Box<PropertyPath>),
}

impl fmt::Display for PropertyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyPath::Link(uri) => write!(f, "<{}>", uri),
            PropertyPath::Inverse(p) => write!(f, "^{}", p),
            PropertyPath::Sequence(a, b) => write!(f, "({}/{})", a, b),
            PropertyPath::Alternative(a, b) => write!(f, "({}|{})", a, b),
            PropertyPath::ZeroOrMore(p) => write!(f, "{}*", p),
            PropertyPath::OneOrMore(p) => write!(f, "{}+", p),
            PropertyPath::ZeroOrOne(p) => write!(f, "{}?", p),
        }
    }
}

/// 排序键
#[derive(Debug, Clone, PartialEq)]
pub struct OrderKey {
    pub expr: FilterExpr,
    pub ascending: bool,
}

/// 计划节点
#[derive(Debug, Clone, PartialEq)]
pub enum PlanNode {
    /// 基本图模式
    Bgp(Vec<TriplePattern>),
    /// 指定图上的基本图模式
    QuadPattern {
        graph: Term,
        triples: Vec<TriplePattern>,
    },
    /// 单个三元组模式
    Triple(TriplePattern),
    /// 空结果
    Null,
    /// 内联数据表
    Table { vars: Vec<String>, rows: usize },
    Filter {
        exprs: Vec<FilterExpr>,
        input: Box<PlanNode>,
    },
    Join {
        left: Box<PlanNode>,
        right: Box<PlanNode>,
    },
    LeftJoin {
        left: Box<PlanNode>,
        right: Box<PlanNode>,
        exprs: Vec<FilterExpr>,
    },
    Union {
        left: Box<PlanNode>,
        right: Box<PlanNode>,
    },
    Distinct(Box<PlanNode>),
    Reduced(Box<PlanNode>),
    Project {
        vars: Vec<String>,
        input: Box<PlanNode>,
    },
    Order {
        keys: Vec<OrderKey>,
        input: Box<PlanNode>,
    },
    /// LIMIT / OFFSET，`length` 为空表示不限制
    Slice {
        input: Box<PlanNode>,
        offset: u64,
        length: Option<u64>,
    },
    Label {
        label: String,
        input: Box<PlanNode>,
    },
    Service {
        endpoint: Term,
        silent: bool,
        input: Box<PlanNode>,
    },

    // 以下算子不支持估算
    Graph {
        graph: Term,
        input: Box<PlanNode>,
    },
    Path {
        subject: Term,
        path: PropertyPath,
        object: Term,
    },
    DatasetNames(Term),
    Assign {
        bindings: Vec<(String, FilterExpr)>,
        input: Box<PlanNode>,
    },
    Extend {
        bindings: Vec<(String, FilterExpr)>,
        input: Box<PlanNode>,
    },
    Group {
        keys: Vec<String>,
        input: Box<PlanNode>,
    },
    Procedure {
        name: String,
        args: Vec<FilterExpr>,
        input: Box<PlanNode>,
    },
    PropertyFunction {
        name: String,
        subject: Term,
        object: Term,
        input: Box<PlanNode>,
    },
    List(Box<PlanNode>),
    Sequence(Vec<PlanNode>),
    Conditional {
        left: Box<PlanNode>,
        right: Box<PlanNode>,
    },
    Minus {
        left: Box<PlanNode>,
        right: Box<PlanNode>,
    },
    /// 扩展算子
    Extension { name: String },
}

impl PlanNode {
    pub fn bgp(triples: Vec<TriplePattern>) -> Self {
        PlanNode::Bgp(triples)
    }

    pub fn triple(subject: Term, predicate: Term, object: Term) -> Self {
        PlanNode::Triple(TriplePattern::new(subject, predicate, object))
    }

    pub fn filter(exprs: Vec<FilterExpr>, input: PlanNode) -> Self {
        PlanNode::Filter {
            exprs,
            input: Box::new(input),
        }
    }

    pub fn join(left: PlanNode, right: PlanNode) -> Self {
        PlanNode::Join {
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn left_join(left: PlanNode, right: PlanNode) -> Self {
        PlanNode::LeftJoin {
            left: Box::new(left),
            right: Box::new(right),
            exprs: Vec::new(),
        }
    }

    pub fn union(left: PlanNode, right: PlanNode) -> Self {
        PlanNode::Union {
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn distinct(input: PlanNode) -> Self {
        PlanNode::Distinct(Box::new(input))
    }

    pub fn reduced(input: PlanNode) -> Self {
        PlanNode::Reduced(Box::new(input))
    }

    pub fn project(vars: Vec<String>, input: PlanNode) -> Self {
        PlanNode::Project {
            vars,
            input: Box::new(input),
        }
    }

    pub fn slice(input: PlanNode, offset: u64, length: Option<u64>) -> Self {
        PlanNode::Slice {
            input: Box::new(input),
            offset,
            length,
        }
    }

    /// 算子名称（SPARQL 代数名）
    pub fn name(&self) -> &'static str {
        match self {
            PlanNode::Bgp(_) => "bgp",
            PlanNode::QuadPattern { .. } => "quadpattern",
            PlanNode::Triple(_) => "triple",
            PlanNode::Null => "null",
            PlanNode::Table { .. } => "table",
            PlanNode::Filter { .. } => "filter",
            PlanNode::Join { .. } => "join",
            PlanNode::LeftJoin { .. } => "leftjoin",
            PlanNode::Union { .. } => "union",
            PlanNode::Distinct(_) => "distinct",
            PlanNode::Reduced(_) => "reduced",
            PlanNode::Project { .. } => "project",
            PlanNode::Order { .. } => "order",
            PlanNode::Slice { .. } => "slice",
            PlanNode::Label { .. } => "label",
            PlanNode::Service { .. } => "service",
            PlanNode::Graph { .. } => "graph",
            PlanNode::Path { .. } => "path",
            PlanNode::DatasetNames(_) => "datasetnames",
            PlanNode::Assign { .. } => "assign",
            PlanNode::Extend { .. } => "extend",
            PlanNode::Group { .. } => "group",
            PlanNode::Procedure { .. } => "procedure",
            PlanNode::PropertyFunction { .. } => "propfunc",
            PlanNode::List(_) => "list",
            PlanNode::Sequence(_) => "sequence",
            PlanNode::Conditional { .. } => "conditional",
            PlanNode::Minus { .. } => "minus",
            PlanNode::Extension { .. } => "ext",
        }
    }

    /// 直接子节点
    pub fn children(&self) -> Vec<&PlanNode> {
        match self {
            PlanNode::Bgp(_)
            | PlanNode::QuadPattern { .. }
            | PlanNode::Triple(_)
            | PlanNode::Null
            | PlanNode::Table { .. }
            | PlanNode::Path { .. }
            | PlanNode::DatasetNames(_)
            | PlanNode::Extension { .. } => Vec::new(),
            PlanNode::Filter { input, .. }
            | PlanNode::Project { input, .. }
            | PlanNode::Order { input, .. }
            | PlanNode::Slice { input, .. }
            | PlanNode::Label { input, .. }
            | PlanNode::Service { input, .. }
            | PlanNode::Graph { input, .. }
            | PlanNode::Assign { input, .. }
            | PlanNode::Extend { input, .. }
            | PlanNode::Group { input, .. }
            | PlanNode::Procedure { input, .. }
            | PlanNode::PropertyFunction { input, .. } => vec![input.as_ref()],
            PlanNode::Distinct(input) | PlanNode::Reduced(input) | PlanNode::List(input) => {
                vec![input.as_ref()]
            }
            PlanNode::Join { left, right }
            | PlanNode::LeftJoin { left, right, .. }
            | PlanNode::Union { left, right }
            | PlanNode::Conditional { left, right }
            | PlanNode::Minus { left, right } => vec![left.as_ref(), right.as_ref()],
            PlanNode::Sequence(nodes) => nodes.iter().collect(),
        }
    }

    /// 没有子节点的算子
    pub fn is_leaf(&self) -> bool {
        self.children().is_empty()
    }

    /// 直接由三元组模式构成、会消费上层过滤条件的算子
    pub fn is_pattern(&self) -> bool {
        matches!(
            self,
            PlanNode::Bgp(_) | PlanNode::QuadPattern { .. } | PlanNode::Triple(_)
        )
    }

    /// 节点自身携带的三元组模式（不含子树），单属性路径按三元组处理
    pub fn own_triples(&self) -> Vec<TriplePattern> {
        match self {
            PlanNode::Bgp(triples) | PlanNode::QuadPattern { triples, .. } => triples.clone(),
            PlanNode::Triple(t) => vec![t.clone()],
            PlanNode::Path {
                subject,
                path: PropertyPath::Link(p),
                object,
            } => vec![TriplePattern::new(
                subject.clone(),
                Term::uri(p.clone()),
                object.clone(),
            )],
            _ => Vec::new(),
        }
    }

    /// 子树中模式部分出现的全部变量
    ///
    /// 使用显式栈遍历，深层计划树不会耗尽调用栈
    pub fn pattern_vars(&self) -> BTreeSet<String> {
        let mut vars = BTreeSet::new();
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            match node {
                PlanNode::Bgp(triples) => triples.iter().for_each(|t| vars.extend(t.vars())),
                PlanNode::QuadPattern { graph, triples } => {
                    add_var(&mut vars, graph);
                    triples.iter().for_each(|t| vars.extend(t.vars()));
                }
                PlanNode::Triple(t) => vars.extend(t.vars()),
                PlanNode::Table { vars: table_vars, .. } => vars.extend(table_vars.iter().cloned()),
                PlanNode::Graph { graph, .. } | PlanNode::DatasetNames(graph) => {
                    add_var(&mut vars, graph)
                }
                PlanNode::Path {
                    subject, object, ..
                }
                | PlanNode::PropertyFunction {
                    subject, object, ..
                } => {
                    add_var(&mut vars, subject);
                    add_var(&mut vars, object);
                }
                _ => {}
            }
            stack.extend(node.children());
        }
        vars
    }
}

fn add_var(vars: &mut BTreeSet<String>, term: &Term) {
    if let Some(v) = term.as_variable() {
        vars.insert(v.to_string());
    }
}
