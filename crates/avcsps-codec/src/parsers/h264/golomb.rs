//! Exp-Golomb 可变长编码读取.
//!
//! `ue(v)` 的码字由前导零、一个终止位 1 和与前导零等长的后缀组成:
//!
//! | 码字 | 值 |
//! |------|----|
//! | `1` | 0 |
//! | `010` | 1 |
//! | `011` | 2 |
//! | `00100` | 3 |

use avcsps_core::bitreader::BitReader;
use avcsps_core::{SpsError, SpsResult};

/// u32 能容纳的最大前导零个数
const MAX_LEADING_ZEROS: u32 = 31;

/// 读取无符号 Exp-Golomb 编码值 ue(v)
///
/// 前缀或后缀读取过程中码流耗尽时返回 `MalformedBitstream`.
/// 即使调用方丢弃返回值, 码字的所有位也已被消耗.
pub fn read_ue(br: &mut BitReader) -> SpsResult<u32> {
    let mut leading_zeros = 0u32;
    loop {
        if br.bits_left() < 1 {
            return Err(SpsError::MalformedBitstream(
                "H.264: Exp-Golomb 前缀被截断".into(),
            ));
        }
        if br.read_bit()? == 1 {
            break;
        }
        leading_zeros += 1;
        if leading_zeros > MAX_LEADING_ZEROS {
            return Err(SpsError::MalformedBitstream(
                "H.264: Exp-Golomb 前导零过多".into(),
            ));
        }
    }

    let suffix = br.read_bits(leading_zeros).map_err(|_| {
        SpsError::MalformedBitstream(format!(
            "H.264: Exp-Golomb 后缀被截断, 需要 {} 位",
            leading_zeros
        ))
    })?;

    Ok(((1u64 << leading_zeros) | u64::from(suffix)) as u32 - 1)
}
