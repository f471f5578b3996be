//! H.264 SPS 解码集成测试
//!
//! 验证 SPS 解码的完整流程:
//! - 典型码流的字段与尺寸推导
//! - 取值范围边界
//! - 截断与随机输入下只返回错误, 不越界读取

use avcsps::core::bitwriter::BitWriter;
use avcsps::{SpsError, parse_sps};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// 构造 SPS RBSP: 头部 3 字节 + 由闭包写入的比特
fn build_rbsp(profile_idc: u8, level_idc: u8, body: impl FnOnce(&mut BitWriter)) -> Vec<u8> {
    let mut bw = BitWriter::new();
    bw.write_bytes(&[profile_idc, 0x00, level_idc]);
    body(&mut bw);
    bw.write_rbsp_trailing_bits();
    bw.finish()
}

/// 写入 log2_max_frame_num 之后的通用字段 (poc_type=2, 无裁剪)
fn write_tail(bw: &mut BitWriter, width_mbs: u32, height_map_units: u32, frame_mbs_only: bool) {
    bw.write_ue(0); // log2_max_frame_num_minus4
    bw.write_ue(2); // pic_order_cnt_type
    bw.write_ue(1); // max_num_ref_frames
    bw.write_flag(false); // gaps_in_frame_num_value_allowed_flag
    bw.write_ue(width_mbs - 1);
    bw.write_ue(height_map_units - 1);
    bw.write_flag(frame_mbs_only);
    if !frame_mbs_only {
        bw.write_flag(false); // mb_adaptive_frame_field_flag
    }
    bw.write_flag(true); // direct_8x8_inference_flag
}

// ============================================================
// 典型码流
// ============================================================

#[test]
fn test_minimal_baseline_end_to_end() {
    init_logger();
    let sps = parse_sps(&[0x42, 0x00, 0x1E, 0xDD, 0xE0]).expect("最小 Baseline SPS 解析失败");

    assert_eq!(sps.profile_idc, 66);
    assert_eq!(sps.level_idc, 30);
    assert_eq!(sps.seq_parameter_set_id, 0);
    assert_eq!(sps.chroma_format_idc, 1);
    assert_eq!(sps.log2_max_frame_num, 4);
    assert_eq!(sps.pic_order_cnt_type, 2);
    assert_eq!(sps.max_num_ref_frames, 0);
    assert_eq!(sps.pic_width_in_mbs, 1);
    assert_eq!(sps.pic_height_in_map_units, 1);
    assert_eq!(sps.width, 16);
    assert_eq!(sps.height, 16);
    assert_eq!(sps.width_cropped, 16);
    assert_eq!(sps.height_cropped, 16);
    assert!(!sps.frame_cropping_flag);
}

#[test]
fn test_truncated_minimal_baseline() {
    init_logger();
    let err = parse_sps(&[0x42, 0x00, 0x1E, 0xDD]).expect_err("截断的 SPS 应失败");
    assert!(matches!(err, SpsError::MalformedBitstream(_)), "actual={:?}", err);
}

#[test]
fn test_real_world_high_profile_720p() {
    // x264 风格的 High@3.1 720p SPS (poc_type=0, 无裁剪, 带 VUI 尾部)
    let rbsp = build_rbsp(100, 31, |bw| {
        bw.write_ue(0); // sps_id
        bw.write_ue(1); // chroma_format_idc
        bw.write_ue(0); // bit_depth_luma_minus8
        bw.write_ue(0); // bit_depth_chroma_minus8
        bw.write_flag(false); // qpprime_y_zero_transform_bypass_flag
        bw.write_flag(false); // seq_scaling_matrix_present_flag
        bw.write_ue(0); // log2_max_frame_num_minus4
        bw.write_ue(0); // pic_order_cnt_type
        bw.write_ue(2); // log2_max_pic_order_cnt_lsb_minus4
        bw.write_ue(4); // max_num_ref_frames
        bw.write_flag(false);
        bw.write_ue(79); // 1280 / 16 - 1
        bw.write_ue(44); // 720 / 16 - 1
        bw.write_flag(true);
        bw.write_flag(true);
        bw.write_flag(false); // frame_cropping_flag
        // VUI: 解码器不会读取这部分
        bw.write_flag(true);
        bw.write_bits(0xDEAD_BEEF, 32);
    });

    let sps = parse_sps(&rbsp).expect("720p SPS 解析失败");
    assert_eq!(sps.profile_name(), "High");
    assert_eq!(sps.level_name(), "3.1");
    assert_eq!(sps.max_num_ref_frames, 4);
    assert_eq!((sps.width, sps.height), (1280, 720));
    assert_eq!((sps.width_cropped, sps.height_cropped), (1280, 720));
}

#[test]
fn test_422_and_monochrome_crop_units() {
    // 4:2:2: CropUnitX=2, CropUnitY=1
    let rbsp = build_rbsp(122, 40, |bw| {
        bw.write_ue(0);
        bw.write_ue(2);
        bw.write_ue(2);
        bw.write_ue(2);
        bw.write_flag(false);
        bw.write_flag(false);
        write_tail(bw, 120, 68, true);
        bw.write_flag(true);
        for crop in [1, 2, 3, 8] {
            bw.write_ue(crop);
        }
    });
    let sps = parse_sps(&rbsp).expect("4:2:2 SPS 解析失败");
    assert_eq!(sps.chroma_format_idc, 2);
    assert_eq!(sps.frame_crop_left_offset, 2);
    assert_eq!(sps.frame_crop_right_offset, 4);
    assert_eq!(sps.frame_crop_top_offset, 3);
    assert_eq!(sps.frame_crop_bottom_offset, 8);
    assert_eq!((sps.width_cropped, sps.height_cropped), (1914, 1077));

    // 单色场编码: CropUnitX=1, CropUnitY=2
    let rbsp = build_rbsp(100, 40, |bw| {
        bw.write_ue(0);
        bw.write_ue(0);
        bw.write_ue(0);
        bw.write_ue(0);
        bw.write_flag(false);
        bw.write_flag(false);
        write_tail(bw, 45, 23, false);
        bw.write_flag(true);
        for crop in [1, 1, 0, 3] {
            bw.write_ue(crop);
        }
    });
    let sps = parse_sps(&rbsp).expect("单色场编码 SPS 解析失败");
    assert_eq!(sps.chroma_format_idc, 0);
    assert_eq!(sps.pic_height_in_map_units, 46);
    assert_eq!((sps.width, sps.height), (720, 736));
    assert_eq!((sps.width_cropped, sps.height_cropped), (718, 730));
}

#[test]
fn test_444_separate_colour_plane_and_scaling_matrix() {
    let rbsp = build_rbsp(244, 51, |bw| {
        bw.write_ue(5); // sps_id
        bw.write_ue(3); // chroma_format_idc
        bw.write_flag(true); // separate_colour_plane_flag
        bw.write_ue(2);
        bw.write_ue(2);
        bw.write_flag(true);
        bw.write_flag(true); // seq_scaling_matrix_present_flag
        for i in 0..12 {
            let present = i % 5 == 0;
            bw.write_flag(present);
            if present {
                let size = if i < 6 { 16 } else { 64 };
                for _ in 0..size {
                    bw.write_ue(0);
                }
            }
        }
        write_tail(bw, 240, 135, true);
        bw.write_flag(false);
    });

    let sps = parse_sps(&rbsp).expect("4:4:4 SPS 解析失败");
    assert_eq!(sps.seq_parameter_set_id, 5);
    assert_eq!(sps.chroma_format_idc, 3);
    assert_eq!((sps.width, sps.height), (3840, 2160));
}

// ============================================================
// 取值范围
// ============================================================

#[test]
fn test_sps_id_32_rejected_31_accepted() {
    init_logger();
    let make = |sps_id: u32| {
        build_rbsp(66, 30, |bw| {
            bw.write_ue(sps_id);
            write_tail(bw, 1, 1, true);
            bw.write_flag(false);
        })
    };

    assert_eq!(parse_sps(&make(31)).unwrap().seq_parameter_set_id, 31);
    assert!(matches!(
        parse_sps(&make(32)),
        Err(SpsError::MalformedBitstream(_))
    ));
}

#[test]
fn test_poc_type_1_unsupported() {
    let rbsp = build_rbsp(77, 30, |bw| {
        bw.write_ue(0);
        bw.write_ue(0);
        bw.write_ue(1); // pic_order_cnt_type
        bw.write_flag(false);
        bw.write_ue(0);
        bw.write_ue(0);
        bw.write_ue(0);
    });
    assert!(matches!(parse_sps(&rbsp), Err(SpsError::Unsupported(_))));
}

#[test]
fn test_crop_equal_to_height_rejected() {
    // 4:2:0 帧编码, 1 个宏块高: CropUnitY=2, (4+4)*2 == 16
    let rbsp = build_rbsp(66, 30, |bw| {
        bw.write_ue(0);
        write_tail(bw, 2, 1, true);
        bw.write_flag(true);
        for crop in [0, 0, 4, 4] {
            bw.write_ue(crop);
        }
    });
    assert!(matches!(
        parse_sps(&rbsp),
        Err(SpsError::MalformedBitstream(_))
    ));
}

// ============================================================
// 截断与随机输入
// ============================================================

/// 简单的 xorshift 随机数, 保证测试可复现
struct XorShift(u64);

impl XorShift {
    fn next(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }
}

#[test]
fn test_random_buffers_never_panic() {
    let mut rng = XorShift(0x9E37_79B9_7F4A_7C15);
    let profiles = [66u8, 77, 88, 100, 110, 122, 144, 244];

    for _ in 0..20_000 {
        let len = (rng.next() % 24) as usize;
        let mut buf: Vec<u8> = (0..len).map(|_| rng.next() as u8).collect();
        if len > 0 {
            buf[0] = profiles[(rng.next() % profiles.len() as u64) as usize];
        }

        match parse_sps(&buf) {
            Ok(sps) => {
                assert!(sps.seq_parameter_set_id < 32);
                assert!(sps.chroma_format_idc <= 3);
                assert!((4..=16).contains(&sps.log2_max_frame_num));
                assert!(matches!(sps.pic_order_cnt_type, 0 | 2));
                assert!(sps.width_cropped <= sps.width);
                assert!(sps.height_cropped <= sps.height);
                assert!(sps.width_cropped > 0 && sps.height_cropped > 0);
            }
            Err(SpsError::InvalidInput(_)) => assert!(len < 3),
            Err(SpsError::MalformedBitstream(_)) | Err(SpsError::Unsupported(_)) => {}
            Err(other) => panic!("意外的错误类型: {:?}", other),
        }
    }
}

#[test]
fn test_decode_is_deterministic() {
    let rbsp = [0x64, 0x00, 0x1F, 0xAC, 0xD9, 0x40, 0x50, 0x05, 0xBB, 0x01, 0x10];
    let first = parse_sps(&rbsp).map_err(|e| e.to_string());
    let second = parse_sps(&rbsp).map_err(|e| e.to_string());
    assert_eq!(first, second);
}
