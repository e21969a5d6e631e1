use std::fs;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::parser::ValueSource;
use clap::{arg, command, value_parser, ArgAction, ArgMatches};
use image::RgbImage;
use log::{error, info, warn, LevelFilter};
use simplelog::{ColorChoice, CombinedLogger, Config, TermLogger, TerminalMode, WriteLogger};

use radar_map_lib::{render_area, AreaSize, AreaSpec, BlockCoord, ColorData, Land, MAP_BLOCK_SIZE};


/// Color tables shorter than this cannot resolve every 16 bit code.
const FULL_COLOR_TABLE_LEN: usize = 2 * 65536;


fn parse_args() -> ArgMatches {
    command!()
        .next_line_help(true)
        .arg(
            arg!(--data <DIR>)
                .required(false)
                .default_value(".")
                .value_parser(value_parser!(PathBuf))
                .help("Directory containing Radarcol.mul and map<WORLD>.mul")
        )
        .arg(
            arg!(--world <WORLD>)
                .required(false)
                .default_value("0")
                .value_parser(value_parser!(u8))
        )
        .arg(
            arg!(--"width-blocks" <BLOCKS>)
                .required(false)
                .default_value("896")
                .value_parser(value_parser!(usize))
                .help("Map width in blocks")
        )
        .arg(
            arg!(--"height-blocks" <BLOCKS>)
                .required(false)
                .default_value("512")
                .value_parser(value_parser!(usize))
                .help("Map height in blocks")
        )
        .arg(
            arg!(--"start-h" <BLOCK>)
                .required(false)
                .default_value("0")
                .value_parser(value_parser!(usize))
                .help("Left edge of the rendered area, in blocks")
        )
        .arg(
            arg!(--"start-v" <BLOCK>)
                .required(false)
                .default_value("0")
                .value_parser(value_parser!(usize))
                .help("Top edge of the rendered area, in blocks")
        )
        .arg(
            arg!(--"size-h" [BLOCKS])
                .required(false)
                .value_parser(value_parser!(usize))
                .help("Area width in blocks. Defaults to the rest of the map")
        )
        .arg(
            arg!(--"size-v" [BLOCKS])
                .required(false)
                .value_parser(value_parser!(usize))
                .help("Area height in blocks. Defaults to the rest of the map")
        )
        .arg(
            arg!(--"map-out" <FILE>)
                .required(false)
                .default_value("map.png")
                .value_parser(value_parser!(PathBuf))
        )
        .arg(
            arg!(--"heights-out" <FILE>)
                .required(false)
                .default_value("zmap.png")
                .value_parser(value_parser!(PathBuf))
        )
        .arg(
            arg!(--loglevel <LEVEL>)
                .required(false)
                .default_value("debug")
                .value_parser(["trace", "debug", "info", "warn", "error", "off"])
                .action(ArgAction::Set)
        )
        .arg(
            arg!(--logfile [FILE_NAME])
                .required(false)
                .default_value("radar_map.log")
                .action(ArgAction::Set)
                .help("Enables logging to a file. Disabled by default")
        )
        .arg(
            arg!(-q --quiet)
                .required(false)
                .action(ArgAction::SetTrue)
                .help("Disables output to the terminal")
        )
        .get_matches()
}


fn initialize_logging(matches: &ArgMatches) {
    let loglevel = match matches.get_one::<String>("loglevel") {
        None => LevelFilter::Off,
        Some(level) => {
            match level.as_str() {
                "trace" => LevelFilter::Trace,
                "debug" => LevelFilter::Debug,
                "info" => LevelFilter::Info,
                "warn" => LevelFilter::Warn,
                "error" => LevelFilter::Error,
                "off" => LevelFilter::Off,
                _ => unreachable!(),
            }
        }
    };
    let quiet = matches.get_flag("quiet");
    let term_loglevel = if quiet { LevelFilter::Off } else { loglevel };

    let logfile = match (matches.value_source("logfile"), matches.get_one::<String>("logfile")) {
        (Some(ValueSource::CommandLine), Some(file_name)) => {
            Some(file_name)
        },
        _ => None,
    };

    if let Some(logfile) = logfile {
        CombinedLogger::init(
            vec![
                TermLogger::new(term_loglevel, Config::default(), TerminalMode::Mixed, ColorChoice::Auto),
                WriteLogger::new(loglevel, Config::default(), File::create(logfile).unwrap())
            ]
        ).unwrap();
    } else {
        TermLogger::init(term_loglevel, Config::default(), TerminalMode::Mixed, ColorChoice::Auto).unwrap();
    }
}


fn load_gamefile(path: &Path) -> io::Result<Vec<u8>> {
    let buf = fs::read(path)?;
    info!("loaded {:.3} KBytes of game data from '{}'", buf.len() as f64 / 1024.0, path.display());
    Ok(buf)
}


fn save_image(image: &RgbImage, path: &Path) {
    if let Err(err) = image.save(path) {
        error!("error while writing image to '{}': {err}", path.display());
        std::process::exit(1);
    }
    info!("saved '{}'", path.display());
}


fn run_render(matches: &ArgMatches) {
    let start = Instant::now();

    let data_dir = matches.get_one::<PathBuf>("data").unwrap();
    let world = *matches.get_one::<u8>("world").unwrap();
    let width_blocks = *matches.get_one::<usize>("width-blocks").unwrap();
    let height_blocks = *matches.get_one::<usize>("height-blocks").unwrap();
    let start_h = *matches.get_one::<usize>("start-h").unwrap();
    let start_v = *matches.get_one::<usize>("start-v").unwrap();

    let radar_path = data_dir.join("Radarcol.mul");
    let map_path = data_dir.join(format!("map{world}.mul"));

    let radar_buf = match load_gamefile(&radar_path) {
        Ok(buf) => buf,
        Err(err) => {
            error!("error while reading '{}': {err}", radar_path.display());
            std::process::exit(1);
        }
    };
    let map_buf = match load_gamefile(&map_path) {
        Ok(buf) => buf,
        Err(err) => {
            error!("error while reading '{}': {err}", map_path.display());
            std::process::exit(1);
        }
    };

    if radar_buf.len() < FULL_COLOR_TABLE_LEN {
        warn!("color table is {} bytes, too short to resolve every radar color code", radar_buf.len());
    }
    let expected = MAP_BLOCK_SIZE * width_blocks * height_blocks;
    if map_buf.len() < expected {
        warn!("map buffer is {} bytes, a {width_blocks}x{height_blocks} block grid wants {expected}", map_buf.len());
    }

    let colors = ColorData::new(&radar_buf);
    let land = Land::new(&map_buf, width_blocks, height_blocks);

    let size_h = matches.get_one::<usize>("size-h").copied()
        .unwrap_or_else(|| land.width_blocks().saturating_sub(start_h));
    let size_v = matches.get_one::<usize>("size-v").copied()
        .unwrap_or_else(|| land.height_blocks().saturating_sub(start_v));

    if size_h == 0 || size_v == 0 {
        error!("the requested area is empty ({size_h}x{size_v} blocks)");
        std::process::exit(1);
    }

    let area = AreaSpec {
        start: BlockCoord { h: start_h, v: start_v },
        size: AreaSize { h: size_h, v: size_v },
    };

    info!("rendering {size_h}x{size_v} block area starting at ({start_h}, {start_v})");

    let rendered = match render_area(&area, &land, &colors) {
        Ok(rendered) => rendered,
        Err(err) => {
            error!("render failed: {err}");
            std::process::exit(1);
        }
    };

    save_image(&rendered.map, matches.get_one::<PathBuf>("map-out").unwrap());
    save_image(&rendered.heights, matches.get_one::<PathBuf>("heights-out").unwrap());

    info!("the render completed in {:?}", start.elapsed());
}


fn main() {
    let matches = parse_args();
    initialize_logging(&matches);
    run_render(&matches);
}
