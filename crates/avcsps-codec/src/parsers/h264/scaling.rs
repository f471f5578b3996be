//! SPS 量化矩阵 (seq_scaling_matrix) 解码.
//!
//! 量化矩阵本身不进入 [`Sps`](super::sps::Sps), 解码它是为了让读取位置正确越过
//! 这一可选结构. 解码结果保存在定长数组中, 便于检查与测试.

use avcsps_core::bitreader::BitReader;
use avcsps_core::SpsResult;
use log::trace;

use super::golomb::read_ue;

/// 4x4 列表个数 (Intra Y/Cb/Cr, Inter Y/Cb/Cr)
pub const NUM_LISTS_4X4: usize = 6;

/// 8x8 列表的最大个数 (4:4:4 时为 6, 否则为 2)
pub const MAX_LISTS_8X8: usize = 6;

/// 一次 SPS 量化矩阵解码的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScalingMatrix {
    /// 4x4 列表, 未出现的列表保持为 0
    pub lists_4x4: [[u8; 16]; NUM_LISTS_4X4],
    /// 8x8 列表, 只有前 `num_lists - 6` 组有意义
    pub lists_8x8: [[u8; 64]; MAX_LISTS_8X8],
    /// 每个列表的 seq_scaling_list_present_flag
    pub present: [bool; NUM_LISTS_4X4 + MAX_LISTS_8X8],
    /// 每个列表的 UseDefaultScalingMatrixFlag
    pub use_default: [bool; NUM_LISTS_4X4 + MAX_LISTS_8X8],
    /// 码流中的列表总数 (8 或 12)
    pub num_lists: usize,
}

impl ScalingMatrix {
    fn empty(num_lists: usize) -> Self {
        Self {
            lists_4x4: [[0; 16]; NUM_LISTS_4X4],
            lists_8x8: [[0; 64]; MAX_LISTS_8X8],
            present: [false; NUM_LISTS_4X4 + MAX_LISTS_8X8],
            use_default: [false; NUM_LISTS_4X4 + MAX_LISTS_8X8],
            num_lists,
        }
    }
}

/// 解码单个 scaling_list, 返回 UseDefaultScalingMatrixFlag
///
/// delta_scale 按 ue(v) 读取, 与 se(v) 码长相同, 读取位置一致.
pub fn scaling_list<const N: usize>(br: &mut BitReader, list: &mut [u8; N]) -> SpsResult<bool> {
    let mut last_scale = 8u32;
    let mut next_scale = 8u32;
    let mut use_default = false;

    for (idx, slot) in list.iter_mut().enumerate() {
        if next_scale != 0 {
            let delta_scale = read_ue(br)?;
            // 2^32 是 256 的倍数, 回绕加法不影响模 256 的结果
            next_scale = last_scale.wrapping_add(delta_scale).wrapping_add(256) % 256;
            use_default = idx == 0 && next_scale == 0;
        }
        let cur_scale = if next_scale == 0 {
            last_scale
        } else {
            next_scale
        };
        *slot = cur_scale as u8;
        last_scale = cur_scale;
    }

    Ok(use_default)
}

/// 解码 SPS 中的量化矩阵
///
/// `chroma_format_idc != 3` 时共 8 个列表, 否则 12 个. 前 6 个为 4x4, 其余为 8x8.
pub fn decode_scaling_matrix(
    br: &mut BitReader,
    chroma_format_idc: u32,
) -> SpsResult<ScalingMatrix> {
    let num_lists = if chroma_format_idc != 3 { 8 } else { 12 };
    let mut matrix = ScalingMatrix::empty(num_lists);

    for i in 0..num_lists {
        let present = br
            .read_flag()
            .map_err(|e| e.truncated(&format!("seq_scaling_list_present_flag[{}]", i)))?;
        matrix.present[i] = present;
        if !present {
            continue;
        }

        matrix.use_default[i] = if i < NUM_LISTS_4X4 {
            scaling_list(br, &mut matrix.lists_4x4[i])?
        } else {
            scaling_list(br, &mut matrix.lists_8x8[i - NUM_LISTS_4X4])?
        };
        trace!(
            "H.264: scaling_list[{}] 已解码, use_default={}",
            i, matrix.use_default[i]
        );
    }

    Ok(matrix)
}
