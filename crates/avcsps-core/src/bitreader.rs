//! 比特流读取器.
//!
//! 在字节缓冲区上按位读取数据, 是 Exp-Golomb 解码与 SPS 解析的基础设施.
//!
//! 按大端位序读取 (MSB first). 读取位置只增不减, 且永远不会越过声明的位长度.

use crate::{SpsError, SpsResult};

/// 比特流读取器
///
/// 从字节缓冲区中按位读取数据, 使用大端位序 (MSB first).
///
/// # 示例
/// ```
/// use avcsps_core::bitreader::BitReader;
///
/// let data = [0b10110001, 0b01010101];
/// let mut br = BitReader::new(&data);
/// assert_eq!(br.read_bits(4).unwrap(), 0b1011);
/// assert_eq!(br.read_bits(4).unwrap(), 0b0001);
/// assert_eq!(br.read_bits(8).unwrap(), 0b01010101);
/// assert!(br.is_eof());
/// ```
#[derive(Debug, Clone)]
pub struct BitReader<'a> {
    /// 源数据
    data: &'a [u8],
    /// 当前位偏移 (从 0 开始)
    pos: usize,
    /// 可读总位数
    end: usize,
}

impl<'a> BitReader<'a> {
    /// 创建覆盖整个缓冲区的读取器
    pub fn new(data: &'a [u8]) -> Self {
        Self::with_bit_len(data, data.len() * 8)
    }

    /// 创建只读取前 `bit_len` 位的读取器
    ///
    /// `bit_len` 超过缓冲区容量时截断到 `data.len() * 8`.
    pub fn with_bit_len(data: &'a [u8], bit_len: usize) -> Self {
        Self {
            data,
            pos: 0,
            end: bit_len.min(data.len() * 8),
        }
    }

    /// 获取已读取的总位数
    pub fn bits_read(&self) -> usize {
        self.pos
    }

    /// 获取剩余可读位数
    pub fn bits_left(&self) -> usize {
        self.end.saturating_sub(self.pos)
    }

    /// 是否已到达末尾
    pub fn is_eof(&self) -> bool {
        self.bits_left() == 0
    }

    /// 读取 1 个位
    pub fn read_bit(&mut self) -> SpsResult<u32> {
        if self.pos >= self.end {
            return Err(SpsError::EndOfBuffer);
        }

        let byte = self.data[self.pos >> 3];
        let bit = (byte >> (7 - (self.pos & 7))) & 1;
        self.pos += 1;

        Ok(u32::from(bit))
    }

    /// 读取 1 个位并转为布尔值
    pub fn read_flag(&mut self) -> SpsResult<bool> {
        Ok(self.read_bit()? == 1)
    }

    /// 读取 N 个位 (最多 32 位)
    ///
    /// 按大端位序读取, 返回值的低 N 位有效. 剩余位数不足时不移动位置.
    pub fn read_bits(&mut self, n: u32) -> SpsResult<u32> {
        if n == 0 {
            return Ok(0);
        }
        if n > 32 {
            return Err(SpsError::InvalidInput(format!(
                "read_bits: n={} 超过 32 位",
                n,
            )));
        }
        if (n as usize) > self.bits_left() {
            return Err(SpsError::EndOfBuffer);
        }

        let mut result = 0u32;
        for _ in 0..n {
            result = (result << 1) | self.read_bit()?;
        }

        Ok(result)
    }
}
