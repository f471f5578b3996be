//! # avcsps-core
//!
//! avcsps 核心库, 提供比特流读写与统一错误类型.
//!
//! 上层的 Exp-Golomb 解码、量化矩阵解码与 SPS 解析都建立在本 crate 之上.

pub mod bitreader;
pub mod bitwriter;
pub mod error;

// 重导出常用类型
pub use bitreader::BitReader;
pub use bitwriter::BitWriter;
pub use error::{SpsError, SpsResult};
