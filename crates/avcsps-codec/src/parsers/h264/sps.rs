//! H.264 SPS (Sequence Parameter Set) 解析器.
//!
//! 从 RBSP (已去除 NAL 头与防竞争字节) 中按固定顺序单遍读取 SPS 字段, 得到:
//! - Profile / Level (编码规格)
//! - 色度格式 (chroma_format_idc)
//! - 帧号与 POC 参数
//! - 图像宽度和高度 (宏块单位与像素单位, 以及 cropping 后的尺寸)
//!
//! 解析在读取完 frame cropping 之后立即结束, VUI 与 RBSP 尾部不会被读取.
//! 任何字段出错都会中止整个解析, 不返回部分结果.

use avcsps_core::bitreader::BitReader;
use avcsps_core::{SpsError, SpsResult};
use log::{debug, warn};

use super::golomb::read_ue;
use super::scaling::decode_scaling_matrix;

/// seq_parameter_set_id 的取值个数
const MAX_SPS_COUNT: u32 = 32;

/// log2_max_frame_num 上限
const MAX_LOG2_MAX_FRAME_NUM: u32 = 16;

/// 宏块边长 (像素)
const MACROBLOCK_SIZE: u32 = 16;

/// 宽高方向宏块数上限 (2^20), 防止后续乘法溢出
const MAX_MACROBLOCKS: u64 = 1 << 20;

/// SPS 解析结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sps {
    /// profile_idc (编码规格, 如 66=Baseline, 77=Main, 100=High)
    pub profile_idc: u8,
    /// level_idc (编码级别, 如 30=3.0, 41=4.1)
    pub level_idc: u8,
    /// seq_parameter_set_id (0-31)
    pub seq_parameter_set_id: u8,
    /// 色度格式 (0=单色, 1=4:2:0, 2=4:2:2, 3=4:4:4), 码流中未出现时为 1
    pub chroma_format_idc: u8,
    /// log2(max_frame_num) = log2_max_frame_num_minus4 + 4
    pub log2_max_frame_num: u32,
    /// 图像顺序计数类型 (仅支持 0 和 2)
    pub pic_order_cnt_type: u32,
    /// 最大参考帧数
    pub max_num_ref_frames: u32,
    /// 宽度方向宏块数
    pub pic_width_in_mbs: u32,
    /// 高度方向 map unit 数, 场编码时已乘 2
    pub pic_height_in_map_units: u32,
    /// 是否只含帧宏块 (非场编码)
    pub frame_mbs_only_flag: bool,
    /// frame_cropping_flag
    pub frame_cropping_flag: bool,
    /// 左侧裁剪 (像素)
    pub frame_crop_left_offset: u32,
    /// 右侧裁剪 (像素)
    pub frame_crop_right_offset: u32,
    /// 顶部裁剪 (像素)
    pub frame_crop_top_offset: u32,
    /// 底部裁剪 (像素)
    pub frame_crop_bottom_offset: u32,
    /// 宏块对齐的宽度 (像素)
    pub width: u32,
    /// 宏块对齐的高度 (像素)
    pub height: u32,
    /// 裁剪后的宽度 (像素)
    pub width_cropped: u32,
    /// 裁剪后的高度 (像素)
    pub height_cropped: u32,
}

impl Sps {
    /// profile 名称
    pub fn profile_name(&self) -> &'static str {
        match self.profile_idc {
            44 => "CAVLC 4:4:4 Intra",
            66 => "Baseline",
            77 => "Main",
            83 => "Scalable Baseline",
            86 => "Scalable High",
            88 => "Extended",
            100 => "High",
            110 => "High 10",
            118 => "Multiview High",
            122 => "High 4:2:2",
            128 => "Stereo High",
            138 => "Multiview Depth High",
            144 => "High 4:4:4",
            244 => "High 4:4:4 Predictive",
            _ => "Unknown",
        }
    }

    /// 色度格式名称
    pub fn chroma_format_name(&self) -> &'static str {
        match self.chroma_format_idc {
            0 => "4:0:0",
            1 => "4:2:0",
            2 => "4:2:2",
            _ => "4:4:4",
        }
    }

    /// level 的十进制写法, 如 level_idc=31 → "3.1", level_idc=9 → "1b"
    pub fn level_name(&self) -> String {
        match self.level_idc {
            9 => "1b".to_string(),
            idc => format!("{}.{}", idc / 10, idc % 10),
        }
    }
}

/// 从 RBSP 数据解析 SPS
///
/// 字节 0 为 profile_idc, 字节 2 为 level_idc, 字节 1 (constraint_set 标志) 不读取.
/// 比特读取从字节 3 开始.
pub fn parse_sps(rbsp: &[u8]) -> SpsResult<Sps> {
    if rbsp.len() < 3 {
        return Err(SpsError::InvalidInput(format!(
            "H.264: SPS RBSP 太短, len={}",
            rbsp.len()
        )));
    }

    let profile_idc = rbsp[0];
    let level_idc = rbsp[2];
    let mut br = BitReader::with_bit_len(&rbsp[3..], (rbsp.len() - 3) * 8);

    // seq_parameter_set_id
    let sps_id = read_ue(&mut br)?;
    if sps_id >= MAX_SPS_COUNT {
        warn!("H.264: sps_id 超出范围, sps_id={}", sps_id);
        return Err(SpsError::MalformedBitstream(format!(
            "H.264: sps_id 超出范围, sps_id={}",
            sps_id
        )));
    }

    let mut chroma_format_idc = 1; // 默认 4:2:0

    // High profile 及以上有额外字段
    if is_high_profile(profile_idc) {
        chroma_format_idc = read_ue(&mut br)?;
        if chroma_format_idc > 3 {
            warn!("H.264: chroma_format_idc 非法, value={}", chroma_format_idc);
            return Err(SpsError::MalformedBitstream(format!(
                "H.264: chroma_format_idc 非法, value={}",
                chroma_format_idc
            )));
        }
        if chroma_format_idc == 3 {
            read_flag(&mut br, "separate_colour_plane_flag")?;
        }

        // bit_depth_luma_minus8 / bit_depth_chroma_minus8
        read_ue(&mut br)?;
        read_ue(&mut br)?;

        read_flag(&mut br, "qpprime_y_zero_transform_bypass_flag")?;
        if read_flag(&mut br, "seq_scaling_matrix_present_flag")? {
            decode_scaling_matrix(&mut br, chroma_format_idc)?;
        }
    }

    // log2_max_frame_num_minus4
    let log2_max_frame_num = read_ue(&mut br)?.saturating_add(4);
    if log2_max_frame_num > MAX_LOG2_MAX_FRAME_NUM {
        warn!(
            "H.264: log2_max_frame_num 超出范围, value={}",
            log2_max_frame_num
        );
        return Err(SpsError::MalformedBitstream(format!(
            "H.264: log2_max_frame_num 超出范围, value={}",
            log2_max_frame_num
        )));
    }

    // pic_order_cnt_type
    let pic_order_cnt_type = read_ue(&mut br)?;
    match pic_order_cnt_type {
        0 => {
            // log2_max_pic_order_cnt_lsb_minus4
            read_ue(&mut br)?;
        }
        2 => {}
        other => {
            warn!("H.264: 不支持的 pic_order_cnt_type={}", other);
            return Err(SpsError::Unsupported(format!(
                "H.264: pic_order_cnt_type={}",
                other
            )));
        }
    }

    let max_num_ref_frames = read_ue(&mut br)?;
    read_flag(&mut br, "gaps_in_frame_num_value_allowed_flag")?;

    // 图像尺寸 (宏块单位)
    let pic_width_in_mbs = u64::from(read_ue(&mut br)?) + 1;
    let mut pic_height_in_map_units = u64::from(read_ue(&mut br)?) + 1;

    let frame_mbs_only_flag = read_flag(&mut br, "frame_mbs_only_flag")?;
    if !frame_mbs_only_flag {
        pic_height_in_map_units *= 2;
    }

    if pic_width_in_mbs >= MAX_MACROBLOCKS || pic_height_in_map_units >= MAX_MACROBLOCKS {
        warn!(
            "H.264: 宽高溢出, pic_width_in_mbs={}, pic_height_in_map_units={}",
            pic_width_in_mbs, pic_height_in_map_units
        );
        return Err(SpsError::MalformedBitstream(format!(
            "H.264: 宽高溢出, pic_width_in_mbs={}, pic_height_in_map_units={}",
            pic_width_in_mbs, pic_height_in_map_units
        )));
    }
    let pic_width_in_mbs = pic_width_in_mbs as u32;
    let pic_height_in_map_units = pic_height_in_map_units as u32;

    if !frame_mbs_only_flag {
        read_flag(&mut br, "mb_adaptive_frame_field_flag")?;
    }
    read_flag(&mut br, "direct_8x8_inference_flag")?;

    let frame_cropping_flag = read_flag(&mut br, "frame_cropping_flag")?;
    let width = MACROBLOCK_SIZE * pic_width_in_mbs;
    let height = MACROBLOCK_SIZE * pic_height_in_map_units;

    let mut crop = CropOffsets::default();
    if frame_cropping_flag {
        let crop_left = read_ue(&mut br)?;
        let crop_right = read_ue(&mut br)?;
        let crop_top = read_ue(&mut br)?;
        let crop_bottom = read_ue(&mut br)?;

        let (crop_unit_x, crop_unit_y) = cropping_unit(chroma_format_idc, frame_mbs_only_flag);
        let crop_x = (u64::from(crop_left) + u64::from(crop_right)) * u64::from(crop_unit_x);
        let crop_y = (u64::from(crop_top) + u64::from(crop_bottom)) * u64::from(crop_unit_y);
        if crop_x >= u64::from(width) || crop_y >= u64::from(height) {
            warn!(
                "H.264: 裁剪参数非法, raw={}x{}, crop_x={}, crop_y={}",
                width, height, crop_x, crop_y
            );
            return Err(SpsError::MalformedBitstream(format!(
                "H.264: 裁剪参数非法, raw={}x{}, crop_x={}, crop_y={}",
                width, height, crop_x, crop_y
            )));
        }

        // 已校验小于宽高, 乘积不会溢出
        crop = CropOffsets {
            left: crop_unit_x * crop_left,
            right: crop_unit_x * crop_right,
            top: crop_unit_y * crop_top,
            bottom: crop_unit_y * crop_bottom,
        };
    }

    let sps = Sps {
        profile_idc,
        level_idc,
        seq_parameter_set_id: sps_id as u8,
        chroma_format_idc: chroma_format_idc as u8,
        log2_max_frame_num,
        pic_order_cnt_type,
        max_num_ref_frames,
        pic_width_in_mbs,
        pic_height_in_map_units,
        frame_mbs_only_flag,
        frame_cropping_flag,
        frame_crop_left_offset: crop.left,
        frame_crop_right_offset: crop.right,
        frame_crop_top_offset: crop.top,
        frame_crop_bottom_offset: crop.bottom,
        width,
        height,
        width_cropped: width - crop.left - crop.right,
        height_cropped: height - crop.top - crop.bottom,
    };

    debug!(
        "H.264: SPS 解析完成, id={}, profile={}, level={}, {}x{} (cropped {}x{}), 剩余 {} 位未读",
        sps.seq_parameter_set_id,
        sps.profile_idc,
        sps.level_idc,
        sps.width,
        sps.height,
        sps.width_cropped,
        sps.height_cropped,
        br.bits_left()
    );

    Ok(sps)
}

// ============================================================
// 辅助函数
// ============================================================

/// 像素单位的裁剪偏移
#[derive(Debug, Default, Clone, Copy)]
struct CropOffsets {
    left: u32,
    right: u32,
    top: u32,
    bottom: u32,
}

/// 是否为 High Profile 族 (码流中带 chroma_format_idc 等扩展字段)
fn is_high_profile(profile_idc: u8) -> bool {
    matches!(
        profile_idc,
        44 | 83 | 86 | 100 | 110 | 118 | 122 | 128 | 138 | 144 | 244
    )
}

/// 获取 cropping 单位 (CropUnitX, CropUnitY)
fn cropping_unit(chroma_format_idc: u32, frame_mbs_only_flag: bool) -> (u32, u32) {
    let hsub = u32::from(chroma_format_idc == 1 || chroma_format_idc == 2);
    let vsub = u32::from(chroma_format_idc == 1);
    let field_factor = if frame_mbs_only_flag { 1 } else { 2 };
    (1 << hsub, field_factor << vsub)
}

/// 检查剩余位数是否足够读取 `n` 个标志位
/// 读取单个标志位, 码流耗尽时报告字段名
fn read_flag(br: &mut BitReader, field: &str) -> SpsResult<bool> {
    br.read_flag().map_err(|e| e.truncated(field))
}
