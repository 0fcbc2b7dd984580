//! 直方图构建器
//!
//! 构建阶段的累加器：记录每个不同取值的出现次数（饱和计数），
//! `generate` 消费构建器生成不可变的直方图，累加器随之释放。
//! 每种类型的分桶算法是独立的纯函数，便于单独测试。

pub mod boolean;
pub mod generic;
pub mod numeric;
pub mod ordered_string;

pub use boolean::{bin_boolean, BooleanHistogramBuilder};
pub use generic::{bin_generic, GenericHistogramBuilder};
pub use numeric::{bin_numeric, NumericHistogramBuilder};
pub use ordered_string::{bin_ordered_strings, OrderedStringHistogramBuilder};

use super::{Histogram, HistogramType};
use crate::core::error::HistogramResult;
use crate::core::term::Term;

/// 直方图构建器接口
pub trait HistogramBuilder {
    type Value;

    /// 记录一次取值
    fn add_value(&mut self, value: Self::Value);

    /// 解析 RDF 节点并记录
    fn add_term(&mut self, term: &Term) -> HistogramResult<()>;

    /// 已记录的不同取值数
    fn distinct_values(&self) -> usize;

    /// 生成直方图，累加器为空时返回 `HistogramError::EmptyAccumulator`
    fn generate(self) -> HistogramResult<Histogram>
    where
        Self: Sized;
}

/// 饱和递增计数
pub(crate) fn bump(count: &mut u32) {
    *count = count.saturating_add(1);
}

/// 按值域类型分派的构建器
#[derive(Debug)]
pub enum AnyHistogramBuilder {
    Boolean(BooleanHistogramBuilder),
    Integer(NumericHistogramBuilder<i64>),
    Double(NumericHistogramBuilder<f64>),
    Float(NumericHistogramBuilder<f32>),
    OrderedString(OrderedStringHistogramBuilder),
    Generic(GenericHistogramBuilder),
}

impl AnyHistogramBuilder {
    pub fn for_range(type_uri: &str, pref_size: usize) -> Self {
        match HistogramType::for_range(type_uri) {
            HistogramType::Boolean => {
                AnyHistogramBuilder::Boolean(BooleanHistogramBuilder::new(type_uri))
            }
            HistogramType::Integer => {
                AnyHistogramBuilder::Integer(NumericHistogramBuilder::new(type_uri, pref_size))
            }
            HistogramType::Double => {
                AnyHistogramBuilder::Double(NumericHistogramBuilder::new(type_uri, pref_size))
            }
            HistogramType::Float => {
                AnyHistogramBuilder::Float(NumericHistogramBuilder::new(type_uri, pref_size))
            }
            HistogramType::OrderedString => AnyHistogramBuilder::OrderedString(
                OrderedStringHistogramBuilder::new(type_uri, pref_size),
            ),
            HistogramType::Generic => {
                AnyHistogramBuilder::Generic(GenericHistogramBuilder::new(type_uri, pref_size))
            }
        }
    }

    pub fn histogram_type(&self) -> HistogramType {
        match self {
            AnyHistogramBuilder::Boolean(_) => HistogramType::Boolean,
            AnyHistogramBuilder::Integer(_) => HistogramType::Integer,
            AnyHistogramBuilder::Double(_) => HistogramType::Double,
            AnyHistogramBuilder::Float(_) => HistogramType::Float,
            AnyHistogramBuilder::OrderedString(_) => HistogramType::OrderedString,
            AnyHistogramBuilder::Generic(_) => HistogramType::Generic,
        }
    }

    pub fn add_term(&mut self, term: &Term) -> HistogramResult<()> {
        match self {
            AnyHistogramBuilder::Boolean(b) => b.add_term(term),
            AnyHistogramBuilder::Integer(b) => b.add_term(term),
            AnyHistogramBuilder::Double(b) => b.add_term(term),
            AnyHistogramBuilder::Float(b) => b.add_term(term),
            AnyHistogramBuilder::OrderedString(b) => b.add_term(term),
            AnyHistogramBuilder::Generic(b) => b.add_term(term),
        }
    }

    pub fn distinct_values(&self) -> usize {
        match self {
            AnyHistogramBuilder::Boolean(b) => b.distinct_values(),
            AnyHistogramBuilder::Integer(b) => b.distinct_values(),
            AnyHistogramBuilder::Double(b) => b.distinct_values(),
            AnyHistogramBuilder::Float(b) => b.distinct_values(),
            AnyHistogramBuilder::OrderedString(b) => b.distinct_values(),
            AnyHistogramBuilder::Generic(b) => b.distinct_values(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.distinct_values() == 0
    }

    pub fn generate(self) -> HistogramResult<Histogram> {
        match self {
            AnyHistogramBuilder::Boolean(b) => b.generate(),
            AnyHistogramBuilder::Integer(b) => b.generate(),
            AnyHistogramBuilder::Double(b) => b.generate(),
            AnyHistogramBuilder::Float(b) => b.generate(),
            AnyHistogramBuilder::OrderedString(b) => b.generate(),
            AnyHistogramBuilder::Generic(b) => b.generate(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::HistogramError;
    use crate::core::vocab;

    #[test]
    fn test_bump_saturates() {
        let mut count = u32::MAX - 1;
        bump(&mut count);
        bump(&mut count);
        assert_eq!(count, u32::MAX);
    }

    #[test]
    fn test_any_builder_dispatch() {
        let cases = [
            (vocab::XSD_BOOLEAN, HistogramType::Boolean),
            (vocab::XSD_LONG, HistogramType::Integer),
            (vocab::XSD_DOUBLE, HistogramType::Double),
            (vocab::XSD_FLOAT, HistogramType::Float),
            (vocab::RDFS_RESOURCE, HistogramType::OrderedString),
            (vocab::XSD_DATE_TIME, HistogramType::Generic),
        ];
        for (uri, expected) in cases {
            assert_eq!(AnyHistogramBuilder::for_range(uri, 8).histogram_type(), expected);
        }
    }

    #[test]
    fn test_any_builder_generate() {
        let mut builder = AnyHistogramBuilder::for_range(vocab::XSD_INTEGER, 4);
        assert!(builder.is_empty());
        builder.add_term(&Term::integer(3)).unwrap();
        builder.add_term(&Term::integer(3)).unwrap();
        builder.add_term(&Term::integer(9)).unwrap();
        assert_eq!(builder.distinct_values(), 2);

        let h = builder.generate().unwrap();
        assert_eq!(h.histogram_type(), HistogramType::Integer);
        assert_eq!(h.total_count(), 3);
        assert_eq!(h.distinct_count(), 2);
    }

    #[test]
    fn test_any_builder_empty() {
        let builder = AnyHistogramBuilder::for_range(vocab::XSD_DATE_TIME, 4);
        assert!(matches!(builder.generate(), Err(HistogramError::EmptyAccumulator(_))));
    }

    #[test]
    fn test_any_builder_parse_error() {
        let mut builder = AnyHistogramBuilder::for_range(vocab::XSD_INTEGER, 4);
        let err = builder.add_term(&Term::typed("abc", vocab::XSD_INTEGER)).unwrap_err();
        assert!(matches!(err, HistogramError::Parse { .. }));
    }
}
