//! 直方图二进制编解码
//!
//! 格式：`[构建器标识:int][值域类型:string][类型相关字段]`
//!
//! | 类型 | 字段顺序 |
//! |------|----------|
//! | Boolean | bins(2), distinct |
//! | Integer | min:long, max:long, bins, distinct |
//! | Double | min 位模式:long, max 位模式:long, bins, distinct |
//! | Float | min 位模式:int, max 位模式:int, bins, distinct |
//! | OrderedString | min:string, max:string, bins, distinct, 桶上界:string[], 桶去重数:int[] |
//! | Generic | bins, distinct |
//!
//! 期望桶数不写入数据，解码时由调用方提供，仅用作数组预分配的提示。

use std::cmp::Ordering;

use super::{
    BooleanHistogram, GenericHistogram, Histogram, HistogramType, NumericHistogram, NumericValue,
    OrderedStringHistogram,
};
use crate::core::codec::{CodecError, CodecResult, HistogramReader, HistogramWriter};

/// 编码直方图
pub fn encode(histogram: &Histogram) -> Vec<u8> {
    let data = histogram.bin_data();
    let mut writer = HistogramWriter::with_capacity(16 + data.type_uri().len() + data.bins().len() * 4);
    writer.write_int(histogram.histogram_type().id());
    writer.write_string(data.type_uri());

    match histogram {
        Histogram::Boolean(_) | Histogram::Generic(_) => {}
        Histogram::Integer(h) => {
            writer.write_long(h.min() as u64);
            writer.write_long(h.max() as u64);
        }
        Histogram::Double(h) => {
            writer.write_long(h.min().to_bits());
            writer.write_long(h.max().to_bits());
        }
        Histogram::Float(h) => {
            writer.write_int(h.min().to_bits());
            writer.write_int(h.max().to_bits());
        }
        Histogram::OrderedString(h) => {
            writer.write_string(h.min());
            writer.write_string(h.max());
        }
    }

    writer.write_int_array(data.bins());
    writer.write_int(data.distinct_count());

    if let Histogram::OrderedString(h) = histogram {
        writer.write_string_array(h.boundaries());
        writer.write_int_array(h.bin_distinct());
    }

    writer.into_inner()
}

/// 解码直方图
///
/// 截断、未知构建器、多余字节或字段不一致时立即失败
pub fn decode(data: &[u8], pref_hint: usize) -> CodecResult<Histogram> {
    let mut reader = HistogramReader::new(data);
    let id = reader.read_int()?;
    let histogram_type = HistogramType::from_id(id).ok_or(CodecError::UnknownBuilder(id))?;
    let type_uri = reader.read_string()?;

    let histogram = match histogram_type {
        HistogramType::Boolean => {
            let (bins, distinct) = read_bins(&mut reader, 2)?;
            if bins.len() != 2 {
                return Err(CodecError::InvalidData(format!(
                    "Boolean histogram requires 2 bins, got {}",
                    bins.len()
                )));
            }
            Histogram::Boolean(BooleanHistogram::from_parts(type_uri, bins, distinct))
        }
        HistogramType::Integer => {
            let min = reader.read_long()? as i64;
            let max = reader.read_long()? as i64;
            if min > max {
                return Err(CodecError::InvalidData(format!(
                    "Integer histogram min {} exceeds max {}",
                    min, max
                )));
            }
            let (bins, distinct) = read_bins(&mut reader, pref_hint)?;
            Histogram::Integer(NumericHistogram::from_parts(type_uri, bins, distinct, min, max))
        }
        HistogramType::Double => {
            let min = f64::from_bits(reader.read_long()?);
            let max = f64::from_bits(reader.read_long()?);
            check_bounds(min, max)?;
            let (bins, distinct) = read_bins(&mut reader, pref_hint)?;
            Histogram::Double(NumericHistogram::from_parts(type_uri, bins, distinct, min, max))
        }
        HistogramType::Float => {
            let min = f32::from_bits(reader.read_int()?);
            let max = f32::from_bits(reader.read_int()?);
            check_bounds(min, max)?;
            let (bins, distinct) = read_bins(&mut reader, pref_hint)?;
            Histogram::Float(NumericHistogram::from_parts(type_uri, bins, distinct, min, max))
        }
        HistogramType::OrderedString => {
            let min = reader.read_string()?;
            let max = reader.read_string()?;
            let (bins, distinct) = read_bins(&mut reader, pref_hint)?;
            let boundaries = reader.read_string_array(pref_hint)?;
            let bin_distinct = reader.read_int_array(pref_hint)?;
            if boundaries.len() != bins.len() || bin_distinct.len() != bins.len() {
                return Err(CodecError::InvalidData(format!(
                    "OrderedString histogram has {} bins but {} boundaries and {} bin distinct counts",
                    bins.len(),
                    boundaries.len(),
                    bin_distinct.len()
                )));
            }
            if min > max || boundaries.windows(2).any(|w| w[0] > w[1]) {
                return Err(CodecError::InvalidData(
                    "OrderedString histogram bounds are not ordered".to_string(),
                ));
            }
            if boundaries.iter().any(|b| *b < min || *b > max) {
                return Err(CodecError::InvalidData(
                    "OrderedString histogram boundary outside [min, max]".to_string(),
                ));
            }
            if let Some(i) = (0..bins.len()).find(|&i| bin_distinct[i] > bins[i]) {
                return Err(CodecError::InvalidData(format!(
                    "Bin {} has {} distinct values but only {} occurrences",
                    i, bin_distinct[i], bins[i]
                )));
            }
            let distinct_sum: u64 = bin_distinct.iter().map(|&d| d as u64).sum();
            if distinct_sum != distinct as u64 {
                return Err(CodecError::InvalidData(format!(
                    "Bin distinct counts sum to {} but histogram distinct is {}",
                    distinct_sum, distinct
                )));
            }
            Histogram::OrderedString(OrderedStringHistogram::from_parts(
                type_uri,
                bins,
                distinct,
                min,
                max,
                boundaries,
                bin_distinct,
            ))
        }
        HistogramType::Generic => {
            let (bins, distinct) = read_bins(&mut reader, pref_hint)?;
            Histogram::Generic(GenericHistogram::from_parts(type_uri, bins, distinct))
        }
    };

    reader.expect_end()?;
    Ok(histogram)
}

/// 浮点边界不能是 NaN，且按全序 `min <= max`
fn check_bounds<T: NumericValue>(min: T, max: T) -> CodecResult<()> {
    let is_nan = |v: T| v.partial_cmp(&v).is_none();
    if is_nan(min) || is_nan(max) || min.cmp_total(&max) == Ordering::Greater {
        return Err(CodecError::InvalidData(format!(
            "{} histogram bounds are invalid: min {}, max {}",
            T::HISTOGRAM_TYPE,
            min,
            max
        )));
    }
    Ok(())
}

fn read_bins(reader: &mut HistogramReader<'_>, hint: usize) -> CodecResult<(Vec<u32>, u32)> {
    let bins = reader.read_int_array(hint)?;
    if bins.is_empty() {
        return Err(CodecError::InvalidData("Histogram has no bins".to_string()));
    }
    let distinct = reader.read_int()?;
    let total: u64 = bins.iter().map(|&c| c as u64).sum();
    if distinct as u64 > total {
        return Err(CodecError::InvalidData(format!(
            "Distinct count {} exceeds total count {}",
            distinct, total
        )));
    }
    Ok((bins, distinct))
}
