//! HistogramWriter - 二进制编码器

/// 直方图字段写入器
///
/// 所有整数均为小端定长；数组和字符串带 u32 长度前缀
#[derive(Debug, Default)]
pub struct HistogramWriter {
    buffer: Vec<u8>,
}

impl HistogramWriter {
    pub fn new() -> Self {
        Self { buffer: Vec::new() }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: Vec::with_capacity(capacity),
        }
    }

    pub fn write_int(&mut self, value: u32) {
        self.buffer.extend_from_slice(&value.to_le_bytes());
    }

    pub fn write_long(&mut self, value: u64) {
        self.buffer.extend_from_slice(&value.to_le_bytes());
    }

    pub fn write_int_array(&mut self, values: &[u32]) {
        self.write_int(values.len() as u32);
        for value in values {
            self.write_int(*value);
        }
    }

    pub fn write_string(&mut self, value: &str) {
        let bytes = value.as_bytes();
        self.write_int(bytes.len() as u32);
        self.buffer.extend_from_slice(bytes);
    }

    pub fn write_string_array(&mut self, values: &[String]) {
        self.write_int(values.len() as u32);
        for value in values {
            self.write_string(value);
        }
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.buffer
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.buffer
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }
}
