extern crate clap;
extern crate env_logger;
#[macro_use]
extern crate log;
extern crate mandelzoom;

use clap::{App, Arg, ArgMatches};
use log::LevelFilter;
use std::path::PathBuf;
use std::str::FromStr;

use mandelzoom::config::{parse_complex, parse_pair};
use mandelzoom::{ColorScheme, Config, Ffmpeg, PngDirectory, ZoomError};

fn validate_pair<T: FromStr>(s: &str, separator: char, err: &str) -> Result<(), String> {
    match parse_pair::<T>(s, separator) {
        Some(_) => Ok(()),
        None => Err(err.to_string()),
    }
}

fn validate_at_least<T: FromStr + PartialOrd>(
    s: &str,
    low: T,
    isnotanumber_err: &str,
    isnotinrange_err: &str,
) -> Result<(), String> {
    match T::from_str(s) {
        Ok(i) => {
            if i >= low {
                Ok(())
            } else {
                Err(isnotinrange_err.to_string())
            }
        }
        Err(_) => Err(isnotanumber_err.to_string()),
    }
}

const MAX_ITER: &str = "max_iter";
const ZOOM_START: &str = "zoom_start";
const ZOOM_END: &str = "zoom_end";
const ZOOM_FACTOR: &str = "zoom_factor";
const SIZE: &str = "size";
const CENTER: &str = "center";
const SCHEME: &str = "scheme";
const INVERT: &str = "invert";
const OUTPUT_DIR: &str = "output-dir";
const PREFIX: &str = "prefix";
const THREADS: &str = "threads";
const VIDEO: &str = "video";
const NO_VIDEO: &str = "no-video";
const FFMPEG: &str = "ffmpeg";
const VERBOSE: &str = "verbose";
const QUIET: &str = "quiet";

fn args<'a>() -> ArgMatches<'a> {
    App::new("mandelzoom")
        .version("0.1.0")
        .about("Renders a Mandelbrot deep zoom as numbered frames and a video")
        .arg(
            Arg::with_name(MAX_ITER)
                .required(true)
                .index(1)
                .validator(|s| {
                    validate_at_least(
                        &s,
                        1u32,
                        "max_iter should be an integer",
                        "max_iter must be at least 1",
                    )
                })
                .help("Iteration budget per pixel"),
        )
        .arg(
            Arg::with_name(ZOOM_START)
                .required(true)
                .index(2)
                .validator(|s| {
                    validate_at_least(
                        &s,
                        0u32,
                        "zoom_start should be an integer",
                        "zoom_start must not be negative",
                    )
                })
                .help("First frame index"),
        )
        .arg(
            Arg::with_name(ZOOM_END)
                .required(true)
                .index(3)
                .validator(|s| {
                    validate_at_least(
                        &s,
                        0u32,
                        "zoom_end should be an integer",
                        "zoom_end must not be negative",
                    )
                })
                .help("Last frame index, inclusive"),
        )
        .arg(
            Arg::with_name(ZOOM_FACTOR)
                .required(true)
                .index(4)
                .validator(|s| match f64::from_str(&s) {
                    Ok(f) if f > 1.0 && f.is_finite() => Ok(()),
                    Ok(_) => Err("zoom_factor must be greater than 1".to_string()),
                    Err(_) => Err("zoom_factor should be a float".to_string()),
                })
                .help("Per-frame zoom multiplier"),
        )
        .arg(
            Arg::with_name(SIZE)
                .long(SIZE)
                .short("s")
                .takes_value(true)
                .default_value("1200x1200")
                .validator(|s| validate_pair::<usize>(&s, 'x', "Could not parse frame size"))
                .help("Size of each frame, WIDTHxHEIGHT"),
        )
        .arg(
            Arg::with_name(CENTER)
                .long(CENTER)
                .short("c")
                .takes_value(true)
                .allow_hyphen_values(true)
                .validator(|s| validate_pair::<f64>(&s, ',', "Could not parse zoom center"))
                .help("Point to zoom in on, RE,IM [default: -1.7499984109937408,-1.6571246929541869e-15]"),
        )
        .arg(
            Arg::with_name(SCHEME)
                .long(SCHEME)
                .short("k")
                .takes_value(true)
                .possible_values(ColorScheme::names())
                .default_value("linear")
                .help("Color scheme"),
        )
        .arg(
            Arg::with_name(INVERT)
                .long(INVERT)
                .help("Invert the colors of every frame"),
        )
        .arg(
            Arg::with_name(OUTPUT_DIR)
                .long(OUTPUT_DIR)
                .short("d")
                .takes_value(true)
                .default_value("frames")
                .help("Directory to write frames into"),
        )
        .arg(
            Arg::with_name(PREFIX)
                .long(PREFIX)
                .short("p")
                .takes_value(true)
                .default_value("mandelbrot_set")
                .help("Frame filename prefix"),
        )
        .arg(
            Arg::with_name(THREADS)
                .long(THREADS)
                .short("t")
                .takes_value(true)
                .validator(|s| {
                    validate_at_least(
                        &s,
                        1usize,
                        "Could not parse thread count",
                        "Thread count must be at least 1",
                    )
                })
                .help("Number of render workers [default: one per CPU]"),
        )
        .arg(
            Arg::with_name(VIDEO)
                .long(VIDEO)
                .short("o")
                .takes_value(true)
                .default_value("out.mp4")
                .help("Video file to assemble"),
        )
        .arg(
            Arg::with_name(NO_VIDEO)
                .long(NO_VIDEO)
                .help("Only render the frames"),
        )
        .arg(
            Arg::with_name(FFMPEG)
                .long(FFMPEG)
                .takes_value(true)
                .default_value("ffmpeg")
                .help("Video encoder binary"),
        )
        .arg(
            Arg::with_name(VERBOSE)
                .long(VERBOSE)
                .short("v")
                .multiple(true)
                .help("Log more; repeat for even more"),
        )
        .arg(
            Arg::with_name(QUIET)
                .long(QUIET)
                .short("q")
                .conflicts_with(VERBOSE)
                .help("Only log warnings and errors"),
        )
        .get_matches()
}

fn init_logging(matches: &ArgMatches) {
    let level = if matches.is_present(QUIET) {
        LevelFilter::Warn
    } else {
        match matches.occurrences_of(VERBOSE) {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };
    env_logger::Builder::new().filter(None, level).init();
}

fn config(matches: &ArgMatches) -> Result<Config, ZoomError> {
    let number = |name: &str| -> Result<u32, ZoomError> {
        matches
            .value_of(name)
            .and_then(|s| u32::from_str(s).ok())
            .ok_or_else(|| ZoomError::Config(format!("could not parse {}", name)))
    };
    let zoom_factor = matches
        .value_of(ZOOM_FACTOR)
        .and_then(|s| f64::from_str(s).ok())
        .ok_or_else(|| ZoomError::Config("could not parse zoom_factor".to_string()))?;

    let mut config = Config::new(
        number(MAX_ITER)?,
        number(ZOOM_START)?,
        number(ZOOM_END)?,
        zoom_factor,
    )?;

    let size = matches
        .value_of(SIZE)
        .and_then(|s| parse_pair::<usize>(s, 'x'))
        .ok_or_else(|| ZoomError::Config("could not parse frame size".to_string()))?;
    config.width = size.0;
    config.height = size.1;
    if let Some(center) = matches.value_of(CENTER) {
        config.center = parse_complex(center)
            .ok_or_else(|| ZoomError::Config("could not parse zoom center".to_string()))?;
    }
    config.scheme = matches
        .value_of(SCHEME)
        .unwrap_or("linear")
        .parse()
        .map_err(ZoomError::Config)?;
    config.invert = matches.is_present(INVERT);
    if let Some(threads) = matches.value_of(THREADS) {
        config.threads = usize::from_str(threads)
            .map_err(|_| ZoomError::Config("could not parse thread count".to_string()))?;
    }
    config.output_dir = PathBuf::from(matches.value_of(OUTPUT_DIR).unwrap_or("frames"));
    config.prefix = matches.value_of(PREFIX).unwrap_or("mandelbrot_set").to_string();
    config.video = if matches.is_present(NO_VIDEO) {
        None
    } else {
        matches.value_of(VIDEO).map(PathBuf::from)
    };
    config.ffmpeg = matches.value_of(FFMPEG).unwrap_or("ffmpeg").to_string();
    config.validate()
}

fn main() {
    let matches = args();
    init_logging(&matches);

    let result = config(&matches).and_then(|config| {
        let sink = PngDirectory::create(&config.output_dir, &config.prefix)?;
        let ffmpeg = Ffmpeg::new(&config.ffmpeg, &config.prefix, config.schedule.start());
        mandelzoom::run(&config, &sink, &ffmpeg)
    });

    match result {
        Ok(stats) => {
            info!("all {} frames rendered", stats.frames_completed);
        }
        Err(e) => {
            eprintln!("mandelzoom: {}", e);
            std::process::exit(e.exit_code());
        }
    }
}
