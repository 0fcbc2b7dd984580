//! 直方图模块
//!
//! 对某个属性在某个值域类型（range type）上的取值分布进行分桶摘要，
//! 用于在不扫描原始数据的情况下估算选择度。
//!
//! ## 直方图类型
//!
//! | 类型 | 值域 | 分桶方式 |
//! |------|------|----------|
//! | Boolean | xsd:boolean | 固定 2 个桶（false, true） |
//! | Integer | xsd:integer 族 | 等宽分桶，范围为 max - min + 1 |
//! | Double | xsd:double / xsd:decimal | 等宽分桶 |
//! | Float | xsd:float | 等宽分桶 |
//! | OrderedString | xsd:string、URI、空白节点 | 按字典序映射为整数键后等宽分桶，记录每桶上界与去重数 |
//! | Generic | 其他类型（如 xsd:dateTime） | 按词法形式的 MurmurHash2 取模分桶 |
//!
//! 直方图一经生成即不可变，由 `builder` 子模块中的构建器产生，
//! 由 `codec` 子模块负责二进制编解码。

pub mod boolean;
pub mod builder;
pub mod codec;
pub mod coverage;
pub mod generic;
pub mod numeric;
pub mod ordered_string;
pub mod value;

use std::fmt;

use crate::core::error::HistogramResult;
use crate::core::term::Term;
use crate::core::vocab;

pub use boolean::BooleanHistogram;
pub use builder::{
    AnyHistogramBuilder, BooleanHistogramBuilder, GenericHistogramBuilder, HistogramBuilder,
    NumericHistogramBuilder, OrderedStringHistogramBuilder,
};
pub use codec::{decode, encode};
pub use generic::GenericHistogram;
pub use numeric::{NumericHistogram, NumericValue};
pub use ordered_string::OrderedStringHistogram;
pub use value::HistogramValue;

/// 直方图类型，同时标识产生它的构建器
///
/// 编码时持久化 `id()`，解码时据此恢复构建器来源
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HistogramType {
    Boolean,
    Integer,
    Double,
    Float,
    OrderedString,
    Generic,
}

impl HistogramType {
    /// 根据值域类型选择直方图类型
    pub fn for_range(type_uri: &str) -> Self {
        match type_uri {
            vocab::XSD_BOOLEAN => HistogramType::Boolean,
            vocab::XSD_DOUBLE | vocab::XSD_DECIMAL => HistogramType::Double,
            vocab::XSD_FLOAT => HistogramType::Float,
            vocab::XSD_STRING | vocab::RDFS_RESOURCE | vocab::STATS_BLANK_NODE => {
                HistogramType::OrderedString
            }
            uri if vocab::is_integer_type(uri) => HistogramType::Integer,
            _ => HistogramType::Generic,
        }
    }

    /// 持久化的构建器标识
    pub fn id(&self) -> u32 {
        match self {
            HistogramType::Boolean => 1,
            HistogramType::Integer => 2,
            HistogramType::Double => 3,
            HistogramType::Float => 4,
            HistogramType::OrderedString => 5,
            HistogramType::Generic => 6,
        }
    }

    pub fn from_id(id: u32) -> Option<Self> {
        match id {
            1 => Some(HistogramType::Boolean),
            2 => Some(HistogramType::Integer),
            3 => Some(HistogramType::Double),
            4 => Some(HistogramType::Float),
            5 => Some(HistogramType::OrderedString),
            6 => Some(HistogramType::Generic),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            HistogramType::Boolean => "BooleanHistogram",
            HistogramType::Integer => "IntegerHistogram",
            HistogramType::Double => "DoubleHistogram",
            HistogramType::Float => "FloatHistogram",
            HistogramType::OrderedString => "OrderedStringHistogram",
            HistogramType::Generic => "GenericHistogram",
        }
    }

    /// 取值是否有全序（决定范围比较能否下推到直方图）
    pub fn is_ordered(&self) -> bool {
        !matches!(self, HistogramType::Generic)
    }
}

impl fmt::Display for HistogramType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// 所有直方图共有的分桶数据
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinData {
    pub(crate) type_uri: String,
    pub(crate) bins: Vec<u32>,
    pub(crate) distinct_count: u32,
}

impl BinData {
    pub(crate) fn new(type_uri: impl Into<String>, bins: Vec<u32>, distinct_count: u32) -> Self {
        Self {
            type_uri: type_uri.into(),
            bins,
            distinct_count,
        }
    }

    pub fn type_uri(&self) -> &str {
        &self.type_uri
    }

    pub fn bins(&self) -> &[u32] {
        &self.bins
    }

    pub fn distinct_count(&self) -> u32 {
        self.distinct_count
    }

    pub fn total_count(&self) -> u64 {
        self.bins.iter().map(|&c| c as u64).sum()
    }

    pub fn non_empty_bins(&self) -> usize {
        self.bins.iter().filter(|&&c| c > 0).count()
    }

    /// 非空桶的平均去重值数，至少为 1
    pub fn avg_distinct_per_bin(&self) -> f64 {
        let non_empty = self.non_empty_bins();
        if non_empty == 0 {
            return 1.0;
        }
        (self.distinct_count as f64 / non_empty as f64).max(1.0)
    }

    /// 桶内单个取值的估计出现次数
    pub(crate) fn quantity_in_bin(&self, index: usize, distinct_in_bin: f64) -> u64 {
        match self.bins.get(index) {
            Some(&count) if count > 0 => (count as f64 / distinct_in_bin.max(1.0)).ceil() as u64,
            _ => 0,
        }
    }
}

/// 直方图
#[derive(Debug, Clone, PartialEq)]
pub enum Histogram {
    Boolean(BooleanHistogram),
    Integer(NumericHistogram<i64>),
    Double(NumericHistogram<f64>),
    Float(NumericHistogram<f32>),
    OrderedString(OrderedStringHistogram),
    Generic(GenericHistogram),
}

impl Histogram {
    pub fn histogram_type(&self) -> HistogramType {
        match self {
            Histogram::Boolean(_) => HistogramType::Boolean,
            Histogram::Integer(_) => HistogramType::Integer,
            Histogram::Double(_) => HistogramType::Double,
            Histogram::Float(_) => HistogramType::Float,
            Histogram::OrderedString(_) => HistogramType::OrderedString,
            Histogram::Generic(_) => HistogramType::Generic,
        }
    }

    pub fn bin_data(&self) -> &BinData {
        match self {
            Histogram::Boolean(h) => h.bin_data(),
            Histogram::Integer(h) => h.bin_data(),
            Histogram::Double(h) => h.bin_data(),
            Histogram::Float(h) => h.bin_data(),
            Histogram::OrderedString(h) => h.bin_data(),
            Histogram::Generic(h) => h.bin_data(),
        }
    }

    pub fn type_uri(&self) -> &str {
        self.bin_data().type_uri()
    }

    pub fn bins(&self) -> &[u32] {
        self.bin_data().bins()
    }

    pub fn num_bins(&self) -> usize {
        self.bins().len()
    }

    pub fn total_count(&self) -> u64 {
        self.bin_data().total_count()
    }

    pub fn distinct_count(&self) -> u32 {
        self.bin_data().distinct_count()
    }

    /// 所有观测值互不相同
    pub fn has_unique_values(&self) -> bool {
        self.distinct_count() as u64 == self.total_count()
    }

    /// 将 RDF 节点解析为本直方图的原生取值
    pub fn parse_term(&self, term: &Term) -> HistogramResult<HistogramValue> {
        match self {
            Histogram::Boolean(h) => h.parse_term(term).map(HistogramValue::Boolean),
            Histogram::Integer(h) => h.parse_term(term).map(HistogramValue::Integer),
            Histogram::Double(h) => h.parse_term(term).map(HistogramValue::Double),
            Histogram::Float(h) => h.parse_term(term).map(HistogramValue::Float),
            Histogram::OrderedString(h) => h.parse_term(term).map(HistogramValue::String),
            Histogram::Generic(h) => h.parse_term(term).map(HistogramValue::String),
        }
    }

    /// 取值所在的桶，超出范围或类型不匹配时返回 `None`
    pub fn bin_index(&self, value: &HistogramValue) -> Option<usize> {
        match (self, value) {
            (Histogram::Boolean(h), HistogramValue::Boolean(v)) => Some(h.bin_index(*v)),
            (Histogram::Integer(h), HistogramValue::Integer(v)) => h.bin_index(*v),
            (Histogram::Double(h), HistogramValue::Double(v)) => h.bin_index(*v),
            (Histogram::Float(h), HistogramValue::Float(v)) => h.bin_index(*v),
            (Histogram::OrderedString(h), HistogramValue::String(v)) => h.bin_index(v),
            (Histogram::Generic(h), HistogramValue::String(v)) => Some(h.bin_index(v)),
            _ => None,
        }
    }

    /// 单个取值的估计出现次数
    ///
    /// 超出范围、落入空桶或类型不匹配时为 0
    pub fn estimated_quantity(&self, value: &HistogramValue) -> u64 {
        match (self, value) {
            (Histogram::Boolean(h), HistogramValue::Boolean(v)) => h.estimated_quantity(*v),
            (Histogram::Integer(h), HistogramValue::Integer(v)) => h.estimated_quantity(*v),
            (Histogram::Double(h), HistogramValue::Double(v)) => h.estimated_quantity(*v),
            (Histogram::Float(h), HistogramValue::Float(v)) => h.estimated_quantity(*v),
            (Histogram::OrderedString(h), HistogramValue::String(v)) => h.estimated_quantity(v),
            (Histogram::Generic(h), HistogramValue::String(v)) => h.estimated_quantity(v),
            _ => 0,
        }
    }

    /// 解析节点并估算其出现次数
    pub fn estimated_quantity_for(&self, term: &Term) -> HistogramResult<u64> {
        let value = self.parse_term(term)?;
        Ok(self.estimated_quantity(&value))
    }
}

impl fmt::Display for Histogram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let data = self.bin_data();
        write!(f, "{} <{}>", self.histogram_type(), data.type_uri)?;
        match self {
            Histogram::Integer(h) => write!(f, " min={} max={}", h.min(), h.max())?,
            Histogram::Double(h) => write!(f, " min={} max={}", h.min(), h.max())?,
            Histogram::Float(h) => write!(f, " min={} max={}", h.min(), h.max())?,
            Histogram::OrderedString(h) => write!(f, " min={:?} max={:?}", h.min(), h.max())?,
            Histogram::Boolean(_) | Histogram::Generic(_) => {}
        }
        write!(
            f,
            " bins={:?} distinct={} total={}",
            data.bins,
            data.distinct_count,
            data.total_count()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_histogram_type_for_range() {
        assert_eq!(HistogramType::for_range(vocab::XSD_BOOLEAN), HistogramType::Boolean);
        assert_eq!(HistogramType::for_range(vocab::XSD_INT), HistogramType::Integer);
        assert_eq!(
            HistogramType::for_range(vocab::XSD_NON_NEGATIVE_INTEGER),
            HistogramType::Integer
        );
        assert_eq!(HistogramType::for_range(vocab::XSD_DECIMAL), HistogramType::Double);
        assert_eq!(HistogramType::for_range(vocab::XSD_FLOAT), HistogramType::Float);
        assert_eq!(
            HistogramType::for_range(vocab::RDFS_RESOURCE),
            HistogramType::OrderedString
        );
        assert_eq!(
            HistogramType::for_range(vocab::STATS_BLANK_NODE),
            HistogramType::OrderedString
        );
        assert_eq!(HistogramType::for_range(vocab::XSD_DATE_TIME), HistogramType::Generic);
    }

    #[test]
    fn test_histogram_type_id_roundtrip() {
        for t in [
            HistogramType::Boolean,
            HistogramType::Integer,
            HistogramType::Double,
            HistogramType::Float,
            HistogramType::OrderedString,
            HistogramType::Generic,
        ] {
            assert_eq!(HistogramType::from_id(t.id()), Some(t));
        }
        assert_eq!(HistogramType::from_id(0), None);
        assert_eq!(HistogramType::from_id(99), None);
    }

    #[test]
    fn test_bin_data_avg_distinct() {
        let data = BinData::new(vocab::XSD_INTEGER, vec![10, 0, 5, 0], 6);
        assert_eq!(data.total_count(), 15);
        assert_eq!(data.non_empty_bins(), 2);
        assert_eq!(data.avg_distinct_per_bin(), 3.0);
        assert_eq!(data.quantity_in_bin(0, 3.0), 4);
        assert_eq!(data.quantity_in_bin(1, 3.0), 0);
        assert_eq!(data.quantity_in_bin(9, 3.0), 0);
    }

    #[test]
    fn test_display() {
        let mut builder = NumericHistogramBuilder::<i64>::new(vocab::XSD_INTEGER, 4);
        builder.add_value(1);
        builder.add_value(8);
        let h = builder.generate().unwrap();
        let text = h.to_string();
        assert!(text.starts_with("IntegerHistogram"));
        assert!(text.contains("min=1 max=8"));
        assert!(text.contains("total=2"));
    }
}
