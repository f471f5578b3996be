//! 比特流写入器.
//!
//! 向字节缓冲区按位写入数据, 与 BitReader 对应.
//! 提供无符号 Exp-Golomb 编码, 用于构造 SPS 码流 (测试、基准与工具).

/// 比特流写入器
///
/// 向字节缓冲区按位写入数据, 使用大端位序 (MSB first).
///
/// # 示例
/// ```
/// use avcsps_core::bitwriter::BitWriter;
///
/// let mut bw = BitWriter::new();
/// bw.write_ue(0); // "1"
/// bw.write_ue(1); // "010"
/// bw.write_ue(3); // "00100"
/// assert_eq!(bw.finish(), vec![0b1010_0010, 0b0000_0000]);
/// ```
#[derive(Debug, Default, Clone)]
pub struct BitWriter {
    /// 输出缓冲区
    data: Vec<u8>,
    /// 当前字节 (正在填充)
    current_byte: u8,
    /// 当前字节中已填充的位数 (0-7)
    bit_count: u8,
}

impl BitWriter {
    /// 创建新的比特流写入器
    pub fn new() -> Self {
        Self::default()
    }

    /// 获取已写入的总位数
    pub fn bits_written(&self) -> usize {
        self.data.len() * 8 + self.bit_count as usize
    }

    /// 写入 1 个位
    pub fn write_bit(&mut self, bit: u32) {
        self.current_byte = (self.current_byte << 1) | (bit & 1) as u8;
        self.bit_count += 1;
        if self.bit_count >= 8 {
            self.data.push(self.current_byte);
            self.current_byte = 0;
            self.bit_count = 0;
        }
    }

    /// 写入布尔标志位
    pub fn write_flag(&mut self, flag: bool) {
        self.write_bit(u32::from(flag));
    }

    /// 写入 N 个位 (最多 32 位)
    ///
    /// 值的低 N 位被写入, 高位在前 (大端).
    pub fn write_bits(&mut self, value: u32, n: u32) {
        debug_assert!(n <= 32, "write_bits: n={} 超过 32 位", n);

        for i in (0..n).rev() {
            self.write_bit((value >> i) & 1);
        }
    }

    /// 写入无符号 Exp-Golomb 编码值 ue(v)
    ///
    /// `value + 1` 的有效位数为 `len`, 先写 `len - 1` 个 0, 再写 `value + 1` 本身.
    pub fn write_ue(&mut self, value: u32) {
        let code = u64::from(value) + 1;
        let len = 64 - code.leading_zeros();
        for _ in 0..len - 1 {
            self.write_bit(0);
        }
        for i in (0..len).rev() {
            self.write_bit(((code >> i) & 1) as u32);
        }
    }

    /// 写入 RBSP 尾部 (停止位 1 + 对齐用的 0)
    pub fn write_rbsp_trailing_bits(&mut self) {
        self.write_bit(1);
        self.align_to_byte();
    }

    /// 对齐到字节边界 (用 0 填充)
    pub fn align_to_byte(&mut self) {
        if self.bit_count > 0 {
            let pad = 8 - self.bit_count;
            self.current_byte <<= pad;
            self.data.push(self.current_byte);
            self.current_byte = 0;
            self.bit_count = 0;
        }
    }

    /// 写入完整字节
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        if self.bit_count == 0 {
            self.data.extend_from_slice(bytes);
        } else {
            for &b in bytes {
                self.write_bits(u32::from(b), 8);
            }
        }
    }

    /// 完成写入, 返回字节数据
    ///
    /// 如果当前不在字节边界, 自动用 0 填充.
    pub fn finish(mut self) -> Vec<u8> {
        self.align_to_byte();
        self.data
    }
}
