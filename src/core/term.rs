//! RDF 项与三元组模式
//!
//! 查询计划和统计构建共用的节点表示：
//! - `Term` - 变量、URI、字面量或空白节点
//! - `TriplePattern` - 主语/谓语/宾语三元组（构建阶段的具体三元组也使用此类型）

use std::collections::BTreeSet;
use std::fmt;

use super::vocab;

/// 字面量
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Literal {
    /// 词法形式
    pub lexical: String,
    /// 数据类型 URI
    pub datatype: Option<String>,
    /// 语言标签
    pub language: Option<String>,
}

impl Literal {
    /// 无类型字面量
    pub fn plain(lexical: impl Into<String>) -> Self {
        Self {
            lexical: lexical.into(),
            datatype: None,
            language: None,
        }
    }

    /// 带数据类型的字面量
    pub fn typed(lexical: impl Into<String>, datatype: impl Into<String>) -> Self {
        Self {
            lexical: lexical.into(),
            datatype: Some(datatype.into()),
            language: None,
        }
    }

    /// 带语言标签的字面量
    pub fn lang(lexical: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            lexical: lexical.into(),
            datatype: None,
            language: Some(language.into()),
        }
    }

    /// 值域类型：显式数据类型，否则为 xsd:string
    pub fn range_type(&self) -> &str {
        self.datatype.as_deref().unwrap_or(vocab::XSD_STRING)
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\"", self.lexical)?;
        if let Some(lang) = &self.language {
            write!(f, "@{}", lang)?;
        } else if let Some(dt) = &self.datatype {
            write!(f, "^^<{}>", dt)?;
        }
        Ok(())
    }
}

/// RDF 项（主语、谓语或宾语）
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Term {
    /// 变量，名称不含 `?`
    Variable(String),
    Uri(String),
    Literal(Literal),
    /// 空白节点标识
    Blank(String),
}

impl Term {
    pub fn var(name: impl Into<String>) -> Self {
        Term::Variable(name.into())
    }

    pub fn uri(uri: impl Into<String>) -> Self {
        Term::Uri(uri.into())
    }

    pub fn blank(id: impl Into<String>) -> Self {
        Term::Blank(id.into())
    }

    pub fn string(value: impl Into<String>) -> Self {
        Term::Literal(Literal::plain(value))
    }

    pub fn typed(lexical: impl Into<String>, datatype: impl Into<String>) -> Self {
        Term::Literal(Literal::typed(lexical, datatype))
    }

    pub fn integer(value: i64) -> Self {
        Term::typed(value.to_string(), vocab::XSD_INTEGER)
    }

    pub fn double(value: f64) -> Self {
        Term::typed(value.to_string(), vocab::XSD_DOUBLE)
    }

    pub fn float(value: f32) -> Self {
        Term::typed(value.to_string(), vocab::XSD_FLOAT)
    }

    pub fn boolean(value: bool) -> Self {
        Term::typed(value.to_string(), vocab::XSD_BOOLEAN)
    }

    pub fn is_variable(&self) -> bool {
        matches!(self, Term::Variable(_))
    }

    /// 非变量即为具体值
    pub fn is_concrete(&self) -> bool {
        !self.is_variable()
    }

    pub fn is_uri(&self) -> bool {
        matches!(self, Term::Uri(_))
    }

    pub fn as_variable(&self) -> Option<&str> {
        match self {
            Term::Variable(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_uri(&self) -> Option<&str> {
        match self {
            Term::Uri(u) => Some(u),
            _ => None,
        }
    }

    /// 作为宾语时的值域类型，变量没有值域类型
    pub fn range_type(&self) -> Option<&str> {
        match self {
            Term::Variable(_) => None,
            Term::Uri(_) => Some(vocab::RDFS_RESOURCE),
            Term::Blank(_) => Some(vocab::STATS_BLANK_NODE),
            Term::Literal(lit) => Some(lit.range_type()),
        }
    }

    /// 词法形式：URI 本身、空白节点标识或字面量词法值
    pub fn lexical_form(&self) -> &str {
        match self {
            Term::Variable(v) => v,
            Term::Uri(u) => u,
            Term::Blank(b) => b,
            Term::Literal(lit) => &lit.lexical,
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Variable(v) => write!(f, "?{}", v),
            Term::Uri(u) => write!(f, "<{}>", u),
            Term::Literal(lit) => write!(f, "{}", lit),
            Term::Blank(id) => write!(f, "_:{}", id),
        }
    }
}

/// 三元组模式
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TriplePattern {
    pub subject: Term,
    pub predicate: Term,
    pub object: Term,
}

/// 数据集中的具体三元组
pub type Triple = TriplePattern;

impl TriplePattern {
    pub fn new(subject: Term, predicate: Term, object: Term) -> Self {
        Self {
            subject,
            predicate,
            object,
        }
    }

    /// 模式中出现的变量
    pub fn vars(&self) -> BTreeSet<String> {
        [&self.subject, &self.predicate, &self.object]
            .into_iter()
            .filter_map(|t| t.as_variable().map(str::to_string))
            .collect()
    }

    /// 模式是否提及集合中的任一变量
    pub fn mentions_any(&self, vars: &BTreeSet<String>) -> bool {
        [&self.subject, &self.predicate, &self.object]
            .into_iter()
            .filter_map(Term::as_variable)
            .any(|v| vars.contains(v))
    }
}

impl fmt::Display for TriplePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.subject, self.predicate, self.object)
    }
}
