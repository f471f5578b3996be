//! avcsps-probe - H.264 SPS 探测工具
//!
//! 解码以十六进制文本或原始文件给出的 SPS RBSP, 输出 profile、level、
//! 宏块网格与裁剪后的图像尺寸.

mod input;
mod logging;

use clap::Parser;
use serde::Serialize;
use std::path::PathBuf;
use std::process;

use avcsps_codec::{Sps, parse_sps};

/// H.264 SPS 探测工具
#[derive(Parser, Debug)]
#[command(name = "avcsps-probe", version, about = "H.264 SPS 解码与尺寸探测工具")]
struct Cli {
    /// 十六进制 SPS RBSP (可多个)
    inputs: Vec<String>,

    /// 从文件读取原始 SPS RBSP
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// 输入带有 1 字节 NAL 头 (nal_unit_type 必须为 7)
    #[arg(long)]
    nal: bool,

    /// 输出 JSON 格式
    #[arg(long)]
    json: bool,

    /// 日志详细程度 (-v: debug, -vv: trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// 日志文件目录 (不指定则只输出到终端)
    #[arg(long)]
    log_dir: Option<PathBuf>,
}

// ============================================================
// JSON 输出结构体
// ============================================================

/// 单个输入的探测结果
#[derive(Debug, Serialize)]
struct SpsInfo {
    source: String,
    profile_idc: u8,
    profile: &'static str,
    level_idc: u8,
    level: String,
    seq_parameter_set_id: u8,
    chroma_format_idc: u8,
    chroma_format: &'static str,
    log2_max_frame_num: u32,
    pic_order_cnt_type: u32,
    max_num_ref_frames: u32,
    pic_width_in_mbs: u32,
    pic_height_in_map_units: u32,
    frame_mbs_only: bool,
    width: u32,
    height: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    crop: Option<CropInfo>,
    width_cropped: u32,
    height_cropped: u32,
}

/// 裁剪偏移 (像素)
#[derive(Debug, Serialize)]
struct CropInfo {
    left: u32,
    right: u32,
    top: u32,
    bottom: u32,
}

impl SpsInfo {
    fn new(source: String, sps: &Sps) -> Self {
        let crop = sps.frame_cropping_flag.then(|| CropInfo {
            left: sps.frame_crop_left_offset,
            right: sps.frame_crop_right_offset,
            top: sps.frame_crop_top_offset,
            bottom: sps.frame_crop_bottom_offset,
        });
        Self {
            source,
            profile_idc: sps.profile_idc,
            profile: sps.profile_name(),
            level_idc: sps.level_idc,
            level: sps.level_name(),
            seq_parameter_set_id: sps.seq_parameter_set_id,
            chroma_format_idc: sps.chroma_format_idc,
            chroma_format: sps.chroma_format_name(),
            log2_max_frame_num: sps.log2_max_frame_num,
            pic_order_cnt_type: sps.pic_order_cnt_type,
            max_num_ref_frames: sps.max_num_ref_frames,
            pic_width_in_mbs: sps.pic_width_in_mbs,
            pic_height_in_map_units: sps.pic_height_in_map_units,
            frame_mbs_only: sps.frame_mbs_only_flag,
            width: sps.width,
            height: sps.height,
            crop,
            width_cropped: sps.width_cropped,
            height_cropped: sps.height_cropped,
        }
    }
}

// ============================================================
// 主逻辑
// ============================================================

fn main() {
    let cli = Cli::parse();

    let guard = match logging::init(cli.verbose, cli.log_dir.as_deref()) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("警告: 日志初始化失败: {e:#}");
            None
        }
    };

    let code = run(&cli);

    // process::exit 不执行析构, 先释放 guard 让文件日志落盘
    drop(guard);
    process::exit(code);
}

/// 处理全部输入, 返回进程退出码
fn run(cli: &Cli) -> i32 {
    if cli.inputs.is_empty() && cli.file.is_none() {
        eprintln!("错误: 需要至少一个十六进制输入或 --file");
        return 2;
    }

    let mut sources: Vec<(String, anyhow::Result<Vec<u8>>)> = Vec::new();
    if let Some(path) = &cli.file {
        sources.push((path.display().to_string(), input::read_file(path)));
    }
    for text in &cli.inputs {
        sources.push((text.clone(), input::parse_hex(text)));
    }

    let mut failed = 0usize;
    for (source, data) in sources {
        match probe(&source, data, cli.nal) {
            Ok(info) => print_info(&info, cli.json),
            Err(e) => {
                failed += 1;
                tracing::debug!("输入 '{source}' 解码失败: {e:#}");
                eprintln!("错误: '{source}': {e:#}");
            }
        }
    }

    if failed > 0 { 1 } else { 0 }
}

/// 解码单个输入
fn probe(source: &str, data: anyhow::Result<Vec<u8>>, nal: bool) -> anyhow::Result<SpsInfo> {
    let data = data?;
    let rbsp = if nal {
        input::strip_nal_header(&data)?
    } else {
        &data[..]
    };
    tracing::debug!("解码 SPS, source={source}, len={}", rbsp.len());
    let sps = parse_sps(rbsp)?;
    Ok(SpsInfo::new(source.to_string(), &sps))
}

/// 输出探测结果
fn print_info(info: &SpsInfo, json: bool) {
    if json {
        match serde_json::to_string(info) {
            Ok(line) => println!("{line}"),
            Err(e) => eprintln!("错误: JSON 序列化失败: {e}"),
        }
        return;
    }

    println!("[SPS]");
    println!("  输入           : {}", info.source);
    println!("  Profile        : {} ({})", info.profile, info.profile_idc);
    println!("  Level          : {} ({})", info.level, info.level_idc);
    println!("  SPS ID         : {}", info.seq_parameter_set_id);
    println!(
        "  色度格式       : {} ({})",
        info.chroma_format, info.chroma_format_idc
    );
    println!("  log2 帧号上限  : {}", info.log2_max_frame_num);
    println!("  POC 类型       : {}", info.pic_order_cnt_type);
    println!("  最大参考帧     : {}", info.max_num_ref_frames);
    println!(
        "  宏块网格       : {}x{}{}",
        info.pic_width_in_mbs,
        info.pic_height_in_map_units,
        if info.frame_mbs_only { "" } else { " (场编码)" }
    );
    println!("  编码尺寸       : {}x{}", info.width, info.height);
    if let Some(crop) = &info.crop {
        println!(
            "  裁剪           : 左 {} 右 {} 上 {} 下 {}",
            crop.left, crop.right, crop.top, crop.bottom
        );
    }
    println!(
        "  显示尺寸       : {}x{}",
        info.width_cropped, info.height_cropped
    );
    println!("[/SPS]");
}
