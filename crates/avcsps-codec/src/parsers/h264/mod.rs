//! H.264/AVC 码流解析器.
//!
//! 提供 SPS RBSP 的解析能力:
//! - Exp-Golomb 可变长整数解码
//! - 量化矩阵 (scaling matrix) 解码
//! - SPS (Sequence Parameter Set) 解析与几何尺寸推导
//!
//! NAL 单元分割与防竞争字节去除由上游完成, 这里的输入都是干净的 RBSP.

pub mod golomb;
pub mod scaling;
pub mod sps;

pub use golomb::read_ue;
pub use scaling::{ScalingMatrix, decode_scaling_matrix, scaling_list};
pub use sps::{Sps, parse_sps};
