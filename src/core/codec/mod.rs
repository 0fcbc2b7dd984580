//! Codec 模块 - 直方图二进制编解码原语
//!
//! ## 二进制格式
//!
//! - int：4 字节小端
//! - long：8 字节小端；浮点数以位模式写入，保证 -0.0、NaN 等特殊值无损往返
//! - int 数组 / 字符串：u32 长度前缀 + 内容
//!
//! 各直方图类型的字段顺序见 `crate::histogram::codec`
//!
//! ## 使用示例
//!
//! ```ignore
//! use graphstats::core::codec::{HistogramReader, HistogramWriter};
//!
//! let mut writer = HistogramWriter::new();
//! writer.write_int_array(&[3, 0, 7]);
//! let data = writer.into_inner();
//!
//! let mut reader = HistogramReader::new(&data);
//! let bins = reader.read_int_array(64)?;
//! ```

pub mod error;
pub mod reader;
pub mod writer;

pub use error::{CodecError, CodecResult};
pub use reader::HistogramReader;
pub use writer::HistogramWriter;
