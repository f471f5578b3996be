//! 输入解析: 十六进制文本、原始文件与可选的 NAL 头.

use anyhow::{Context, Result, bail};
use std::path::Path;

/// SPS 的 nal_unit_type
const NAL_TYPE_SPS: u8 = 7;

/// 解析十六进制字符串
///
/// 允许空白、`0x` 前缀以及 `:` / `,` / `-` 分隔符, 如 `"42 00 1e dd e0"` 或 `"0x42,0x00"`.
pub fn parse_hex(text: &str) -> Result<Vec<u8>> {
    let mut digits = String::with_capacity(text.len());
    for token in text.split(|c: char| c.is_whitespace() || matches!(c, ':' | ',' | '-')) {
        let token = token
            .strip_prefix("0x")
            .or_else(|| token.strip_prefix("0X"))
            .unwrap_or(token);
        digits.push_str(token);
    }

    if digits.len() % 2 != 0 {
        bail!("十六进制数字个数为奇数: {}", digits.len());
    }

    digits
        .as_bytes()
        .chunks(2)
        .map(|pair| {
            let s = std::str::from_utf8(pair).context("十六进制输入不是 ASCII")?;
            u8::from_str_radix(s, 16).with_context(|| format!("无效的十六进制字节 '{s}'"))
        })
        .collect()
}

/// 读取原始 SPS 文件
pub fn read_file(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).with_context(|| format!("无法读取文件 '{}'", path.display()))
}

/// 去掉 1 字节 NAL 头, 并确认 nal_unit_type 为 SPS
pub fn strip_nal_header(data: &[u8]) -> Result<&[u8]> {
    let Some((&header, payload)) = data.split_first() else {
        bail!("输入为空, 缺少 NAL 头");
    };
    if header & 0x80 != 0 {
        bail!("NAL 头 forbidden_zero_bit 不为 0: 0x{header:02X}");
    }
    let nal_type = header & 0x1F;
    if nal_type != NAL_TYPE_SPS {
        bail!("NAL 类型不是 SPS: nal_unit_type={nal_type}");
    }
    Ok(payload)
}
