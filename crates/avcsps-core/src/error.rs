//! 统一错误类型定义.
//!
//! avcsps 各 crate 共用的错误类型, 对调用方只暴露三类解码失败:
//! 输入无效、码流损坏、语法路径未实现.

use thiserror::Error;

/// SPS 解码错误类型
#[derive(Debug, Error)]
pub enum SpsError {
    /// 输入无效 (缓冲区为空或长度不足), 属于调用方错误
    #[error("无效输入: {0}")]
    InvalidInput(String),

    /// 码流损坏或被截断
    #[error("码流损坏: {0}")]
    MalformedBitstream(String),

    /// 合法但未实现的语法路径
    #[error("不支持的语法: {0}")]
    Unsupported(String),

    /// 比特读取越过缓冲区末尾
    ///
    /// 仅由 [`BitReader`](crate::bitreader::BitReader) 产生,
    /// SPS 解码器会将其转换为 [`SpsError::MalformedBitstream`].
    #[error("已到达缓冲区末尾")]
    EndOfBuffer,
}

impl SpsError {
    /// 将 `EndOfBuffer` 转换为带字段名的 `MalformedBitstream`, 其余错误原样返回
    pub fn truncated(self, field: &str) -> Self {
        match self {
            SpsError::EndOfBuffer => {
                SpsError::MalformedBitstream(format!("H.264: 读取 {} 时码流被截断", field))
            }
            other => other,
        }
    }
}

/// 统一 Result 类型
pub type SpsResult<T> = Result<T, SpsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncated_maps_end_of_buffer() {
        let err = SpsError::EndOfBuffer.truncated("frame_mbs_only_flag");
        match err {
            SpsError::MalformedBitstream(msg) => assert!(msg.contains("frame_mbs_only_flag")),
            other => panic!("应转换为 MalformedBitstream, actual={:?}", other),
        }
    }

    #[test]
    fn test_truncated_keeps_other_errors() {
        let err = SpsError::Unsupported("pic_order_cnt_type=1".into()).truncated("x");
        assert!(matches!(err, SpsError::Unsupported(_)));
    }
}
