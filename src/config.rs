use std::{io, path::PathBuf, time::Duration};

use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use log::LevelFilter;

use crate::core::Color;

pub const DEFAULT_TITLE: &str = "Cubo 3D";
pub const DEFAULT_WIDTH: usize = 512;
pub const DEFAULT_HEIGHT: usize = 512;
pub const DEFAULT_EDGE_LENGTH: f32 = 50.0;
pub const DEFAULT_FRAME_DELAY_MS: u64 = 10;
pub const DEFAULT_LOG_FILE: &str = "cubo3d.log";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayTarget {
    Terminal,
    Window,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub target: DisplayTarget,
    /// Window size in pixels. Terminal mode sizes itself from the terminal.
    pub width: usize,
    pub height: usize,
    pub title: String,
    pub edge_length: f32,
    /// World units per translation key press
    pub move_step: f32,
    /// Multiplier per scale-up key press, its reciprocal scales down
    pub scale_step: f32,
    pub rotate_step_deg: f32,
    pub frame_delay: Duration,
    pub line_color: Color,
    pub clear_color: Color,
    pub log_file: PathBuf,
    pub log_level: LevelFilter,
    pub debug: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            target: DisplayTarget::Window,
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            title: DEFAULT_TITLE.to_string(),
            edge_length: DEFAULT_EDGE_LENGTH,
            move_step: 5.0,
            scale_step: 1.1,
            rotate_step_deg: 5.0,
            frame_delay: Duration::from_millis(DEFAULT_FRAME_DELAY_MS),
            line_color: Color::BLACK,
            clear_color: Color::WHITE,
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
            log_level: LevelFilter::Info,
            debug: false,
        }
    }
}

impl Config {
    /// Defaults for a target. The terminal draws light edges on a dark background.
    pub fn for_target(target: DisplayTarget) -> Self {
        match target {
            DisplayTarget::Window => Self::default(),
            DisplayTarget::Terminal => Self {
                target,
                line_color: Color::WHITE,
                clear_color: Color::BLACK,
                ..Self::default()
            },
        }
    }

    pub fn rotate_step(&self) -> f32 {
        self.rotate_step_deg.to_radians()
    }

    pub fn validate(&self) -> io::Result<()> {
        let invalid = |msg: String| Err(io::Error::new(io::ErrorKind::InvalidInput, msg));

        if self.width == 0 || self.height == 0 {
            return invalid(format!(
                "window size must be positive, got {}x{}",
                self.width, self.height
            ));
        }
        if !(self.edge_length.is_finite() && self.edge_length > 0.0) {
            return invalid(format!("edge length must be positive, got {}", self.edge_length));
        }
        if !(self.move_step.is_finite() && self.move_step > 0.0) {
            return invalid(format!("move step must be positive, got {}", self.move_step));
        }
        if !(self.scale_step.is_finite() && self.scale_step > 1.0) {
            return invalid(format!("scale step must be greater than 1, got {}", self.scale_step));
        }
        if !(self.rotate_step_deg.is_finite() && self.rotate_step_deg > 0.0) {
            return invalid(format!("rotation step must be positive, got {}", self.rotate_step_deg));
        }
        Ok(())
    }

    pub fn from_matches(matches: &ArgMatches) -> io::Result<Self> {
        let target = match matches.get_one::<String>("mode").map(|s| s.as_str()) {
            Some("terminal") | Some("t") => DisplayTarget::Terminal,
            _ => DisplayTarget::Window,
        };
        let mut config = Self::for_target(target);

        if let Some(size) = matches.get_one::<String>("size") {
            let (w, h) = parse_size(size)?;
            config.width = w;
            config.height = h;
        }
        if let Some(edge) = matches.get_one::<f32>("edge") {
            config.edge_length = *edge;
        }
        if let Some(step) = matches.get_one::<f32>("step") {
            config.move_step = *step;
        }
        if let Some(step) = matches.get_one::<f32>("scale-step") {
            config.scale_step = *step;
        }
        if let Some(step) = matches.get_one::<f32>("rotate-step") {
            config.rotate_step_deg = *step;
        }
        if let Some(delay) = matches.get_one::<u64>("delay") {
            config.frame_delay = Duration::from_millis(*delay);
        }
        if let Some(hex) = matches.get_one::<String>("color") {
            config.line_color = parse_color(hex)?;
        }
        if let Some(hex) = matches.get_one::<String>("background") {
            config.clear_color = parse_color(hex)?;
        }
        if let Some(path) = matches.get_one::<PathBuf>("log") {
            config.log_file = path.clone();
        }
        if matches.get_flag("verbose") {
            config.log_level = LevelFilter::Debug;
        }
        config.debug = matches.get_flag("debug");
        if config.debug {
            config.log_level = LevelFilter::Trace;
        }

        config.validate()?;
        Ok(config)
    }
}

fn parse_size(size: &str) -> io::Result<(usize, usize)> {
    let bad = || {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("invalid size '{}', expected WIDTHxHEIGHT", size),
        )
    };
    let (w, h) = size.split_once(['x', 'X']).ok_or_else(bad)?;
    let w = w.trim().parse().map_err(|_| bad())?;
    let h = h.trim().parse().map_err(|_| bad())?;
    Ok((w, h))
}

fn parse_color(hex: &str) -> io::Result<Color> {
    Color::from_hex(hex)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, format!("{}: '{}'", e, hex)))
}

pub fn create_clap_command() -> Command {
    Command::new("cubo3d")
        .about("Interactive wireframe cube, rendered in a window (minifb) or the terminal")
        .version(env!("CARGO_PKG_VERSION"))
        .arg(
            Arg::new("mode")
                .short('m')
                .long("mode")
                .value_name("MODE")
                .help("Where to draw: 'window', 'terminal', 'w' or 't'")
                .value_parser(["window", "terminal", "w", "t"]),
        )
        .arg(
            Arg::new("size")
                .short('s')
                .long("size")
                .value_name("WxH")
                .help("Window size in pixels (window mode only)"),
        )
        .arg(
            Arg::new("edge")
                .short('e')
                .long("edge")
                .value_name("LENGTH")
                .help("Cube edge length in world units")
                .value_parser(value_parser!(f32)),
        )
        .arg(
            Arg::new("step")
                .long("step")
                .value_name("UNITS")
                .help("Translation per key press")
                .value_parser(value_parser!(f32)),
        )
        .arg(
            Arg::new("scale-step")
                .long("scale-step")
                .value_name("FACTOR")
                .help("Scale multiplier per key press (> 1)")
                .value_parser(value_parser!(f32)),
        )
        .arg(
            Arg::new("rotate-step")
                .long("rotate-step")
                .value_name("DEGREES")
                .help("Rotation per key press")
                .value_parser(value_parser!(f32)),
        )
        .arg(
            Arg::new("delay")
                .short('d')
                .long("delay")
                .value_name("MS")
                .help("Delay between redraws in milliseconds")
                .value_parser(value_parser!(u64)),
        )
        .arg(
            Arg::new("color")
                .long("color")
                .value_name("RRGGBB")
                .help("Edge color"),
        )
        .arg(
            Arg::new("background")
                .long("background")
                .value_name("RRGGBB")
                .help("Clear color"),
        )
        .arg(
            Arg::new("log")
                .short('l')
                .long("log")
                .value_name("FILE")
                .help("Log file path")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Log at debug level")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("debug")
                .long("debug")
                .help("Trace every pipeline stage (very noisy)")
                .action(ArgAction::SetTrue),
        )
}
