//! # avcsps-codec
//!
//! H.264 SPS 解码库, 在 avcsps-core 的比特流读取器之上实现
//! Exp-Golomb 解码、量化矩阵解码和 SPS 字段解析.
//!
//! ## 使用示例
//!
//! ```rust
//! use avcsps_codec::parsers::h264::parse_sps;
//!
//! let sps = parse_sps(&[0x42, 0x00, 0x1E, 0xDD, 0xE0]).unwrap();
//! assert_eq!(sps.profile_idc, 66);
//! assert_eq!((sps.width_cropped, sps.height_cropped), (16, 16));
//! ```

pub mod parsers;

// 重导出常用类型
pub use parsers::h264::{Sps, parse_sps};
