//! # avcsps
//!
//! 纯 Rust 实现的 H.264 SPS (Sequence Parameter Set) 解码器.
//!
//! 输入为已去除 NAL 头与防竞争字节的 SPS RBSP, 输出 profile、level、
//! 宏块网格、裁剪矩形与参考帧上限等参数.
//!
//! # 快速开始
//!
//! ```rust
//! use avcsps::codec::parse_sps;
//!
//! let sps = parse_sps(&[0x42, 0x00, 0x1E, 0xDD, 0xE0]).unwrap();
//! println!("{} {}x{}", sps.profile_name(), sps.width_cropped, sps.height_cropped);
//! ```
//!
//! # Crate 结构
//!
//! | Crate | 功能 |
//! |-------|------|
//! | `avcsps-core` | 比特流读写与错误类型 |
//! | `avcsps-codec` | Exp-Golomb、量化矩阵与 SPS 解析 |

/// 比特流读写与错误类型
pub use avcsps_core as core;

/// SPS 解析
pub use avcsps_codec as codec;

pub use avcsps_codec::{Sps, parse_sps};
pub use avcsps_core::{SpsError, SpsResult};

/// 获取版本号
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
