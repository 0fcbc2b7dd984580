//! 直方图原生取值
//!
//! RDF 节点按直方图类型解析为对应的原生值后才能定位桶

use std::cmp::Ordering;
use std::fmt;

use crate::core::error::{HistogramError, HistogramResult};
use crate::core::term::Term;

/// 直方图原生取值
#[derive(Debug, Clone, PartialEq)]
pub enum HistogramValue {
    Boolean(bool),
    Integer(i64),
    Double(f64),
    Float(f32),
    /// 有序字符串与通用直方图使用词法形式
    String(String),
}

impl HistogramValue {
    /// 同类型取值之间的全序比较，类型不同时返回 `None`
    pub fn compare(&self, other: &HistogramValue) -> Option<Ordering> {
        match (self, other) {
            (HistogramValue::Boolean(a), HistogramValue::Boolean(b)) => Some(a.cmp(b)),
            (HistogramValue::Integer(a), HistogramValue::Integer(b)) => Some(a.cmp(b)),
            (HistogramValue::Double(a), HistogramValue::Double(b)) => Some(a.total_cmp(b)),
            (HistogramValue::Float(a), HistogramValue::Float(b)) => Some(a.total_cmp(b)),
            (HistogramValue::String(a), HistogramValue::String(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }
}

impl fmt::Display for HistogramValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HistogramValue::Boolean(v) => write!(f, "{}", v),
            HistogramValue::Integer(v) => write!(f, "{}", v),
            HistogramValue::Double(v) => write!(f, "{}", v),
            HistogramValue::Float(v) => write!(f, "{}", v),
            HistogramValue::String(v) => write!(f, "{}", v),
        }
    }
}

/// 取出非变量节点的词法形式
pub(crate) fn concrete_lexical<'a>(term: &'a Term, type_uri: &str) -> HistogramResult<&'a str> {
    match term {
        Term::Variable(_) => Err(HistogramError::parse(term, type_uri, "变量没有取值")),
        _ => Ok(term.lexical_form()),
    }
}

/// xsd:boolean 词法空间：true / false / 1 / 0
pub fn parse_boolean(lexical: &str, type_uri: &str) -> HistogramResult<bool> {
    match lexical.trim() {
        "true" | "1" => Ok(true),
        "false" | "0" => Ok(false),
        other => Err(HistogramError::parse(other, type_uri, "不是合法的布尔值")),
    }
}

pub fn parse_integer(lexical: &str, type_uri: &str) -> HistogramResult<i64> {
    let trimmed = lexical.trim();
    let digits = trimmed.strip_prefix('+').unwrap_or(trimmed);
    digits
        .parse::<i64>()
        .map_err(|e| HistogramError::parse(trimmed, type_uri, e.to_string()))
}

pub fn parse_double(lexical: &str, type_uri: &str) -> HistogramResult<f64> {
    let trimmed = lexical.trim();
    trimmed
        .parse::<f64>()
        .map_err(|e| HistogramError::parse(trimmed, type_uri, e.to_string()))
}

pub fn parse_float(lexical: &str, type_uri: &str) -> HistogramResult<f32> {
    let trimmed = lexical.trim();
    trimmed
        .parse::<f32>()
        .map_err(|e| HistogramError::parse(trimmed, type_uri, e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::vocab;

    #[test]
    fn test_parse_boolean() {
        assert_eq!(parse_boolean("true", vocab::XSD_BOOLEAN), Ok(true));
        assert_eq!(parse_boolean("0", vocab::XSD_BOOLEAN), Ok(false));
        assert!(parse_boolean("yes", vocab::XSD_BOOLEAN).is_err());
    }

    #[test]
    fn test_parse_numeric() {
        assert_eq!(parse_integer("+42", vocab::XSD_INTEGER), Ok(42));
        assert_eq!(parse_integer(" -7 ", vocab::XSD_INT), Ok(-7));
        assert!(parse_integer("4.2", vocab::XSD_INTEGER).is_err());
        assert_eq!(parse_double("2.5e3", vocab::XSD_DOUBLE), Ok(2500.0));
        assert!(parse_double("INF", vocab::XSD_DOUBLE).map(f64::is_infinite).unwrap_or(false));
        assert_eq!(parse_float("-0.5", vocab::XSD_FLOAT), Ok(-0.5));
    }

    #[test]
    fn test_variable_has_no_value() {
        let err = concrete_lexical(&Term::var("x"), vocab::XSD_STRING).unwrap_err();
        assert!(matches!(err, HistogramError::Parse { .. }));
    }

    #[test]
    fn test_compare_same_kind_only() {
        let a = HistogramValue::Integer(1);
        let b = HistogramValue::Integer(2);
        assert_eq!(a.compare(&b), Some(Ordering::Less));
        assert_eq!(a.compare(&HistogramValue::Double(1.0)), None);
    }
}
