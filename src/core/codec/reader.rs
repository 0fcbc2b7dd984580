//! HistogramReader - 二进制解码器

use super::error::{CodecError, CodecResult};

/// 直方图字段读取器
///
/// 输入被截断时立即返回错误，不会产生补零的直方图
pub struct HistogramReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> HistogramReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    pub fn is_exhausted(&self) -> bool {
        self.remaining() == 0
    }

    /// 确认所有字节都已被消费
    pub fn expect_end(&self) -> CodecResult<()> {
        match self.remaining() {
            0 => Ok(()),
            n => Err(CodecError::TrailingBytes(n)),
        }
    }

    pub fn read_int(&mut self) -> CodecResult<u32> {
        let bytes: [u8; 4] = self
            .take(4)?
            .try_into()
            .map_err(|_| CodecError::InvalidData("Failed to read int".to_string()))?;
        Ok(u32::from_le_bytes(bytes))
    }

    pub fn read_long(&mut self) -> CodecResult<u64> {
        let bytes: [u8; 8] = self
            .take(8)?
            .try_into()
            .map_err(|_| CodecError::InvalidData("Failed to read long".to_string()))?;
        Ok(u64::from_le_bytes(bytes))
    }

    /// 读取整数数组
    ///
    /// `hint` 为构建时的期望桶数，仅用于预分配；实际长度可以更短
    pub fn read_int_array(&mut self, hint: usize) -> CodecResult<Vec<u32>> {
        let len = self.read_len(4)?;
        let mut values = Vec::with_capacity(len.min(hint.max(1)));
        for _ in 0..len {
            values.push(self.read_int()?);
        }
        Ok(values)
    }

    pub fn read_string(&mut self) -> CodecResult<String> {
        let len = self.read_len(1)?;
        let bytes = self.take(len)?;
        String::from_utf8(bytes.to_vec()).map_err(|e| CodecError::InvalidUtf8(e.to_string()))
    }

    pub fn read_string_array(&mut self, hint: usize) -> CodecResult<Vec<String>> {
        // 每个字符串至少有 4 字节长度前缀
        let len = self.read_len(4)?;
        let mut values = Vec::with_capacity(len.min(hint.max(1)));
        for _ in 0..len {
            values.push(self.read_string()?);
        }
        Ok(values)
    }

    /// 读取长度前缀，并校验剩余数据至少能容纳 `len * min_item_size` 字节
    fn read_len(&mut self, min_item_size: usize) -> CodecResult<usize> {
        let len = self.read_int()? as usize;
        let needed = len.saturating_mul(min_item_size);
        if needed > self.remaining() {
            return Err(CodecError::Truncated {
                needed,
                remaining: self.remaining(),
            });
        }
        Ok(len)
    }

    fn take(&mut self, n: usize) -> CodecResult<&'a [u8]> {
        if n > self.remaining() {
            return Err(CodecError::Truncated {
                needed: n,
                remaining: self.remaining(),
            });
        }
        let slice = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }
}
