//! Settings for the `brainfuck` binary.
//!
//! Values come from, in order of precedence: command-line flags, the
//! `BF_TAPE_LENGTH` environment variable, `brainfuck.toml` in the XDG config home,
//! and the built-in defaults. The file is a small TOML subset:
//!
//! ```toml
//! [interpreter]
//! tape_length = 30000
//!
//! [colors]
//! error = "red"
//! progress = "#f9e2af"
//! ```

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::OnceLock;

use cross_xdg::BaseDirs;
use nu_ansi_term::Color;

use crate::DEFAULT_TAPE_LENGTH;

pub const CONFIG_FILE_NAME: &str = "brainfuck.toml";
pub const TAPE_LENGTH_ENV: &str = "BF_TAPE_LENGTH";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid tape length '{value}': expected a whole number of cells between 1 and {}", MAX_TAPE_LENGTH)]
    InvalidTapeLength { value: String },
}

/// Colours used for diagnostics and progress lines.
#[derive(Debug, Clone, PartialEq)]
pub struct Colors {
    pub error: Color,
    pub progress: Color,
    pub done: Color,
    pub percent: Color,
    pub help_title: Color,
}

impl Default for Colors {
    fn default() -> Self {
        // Catppuccin Mocha
        Self {
            error: Color::Rgb(243, 139, 168),
            progress: Color::Rgb(249, 226, 175),
            done: Color::Rgb(166, 227, 161),
            percent: Color::Rgb(205, 214, 244),
            help_title: Color::Rgb(243, 139, 168),
        }
    }
}

/// Everything read from the config file. Absent keys stay `None`/default.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FileConfig {
    pub tape_length: Option<String>,
    pub colors: Colors,
}

static FILE_CONFIG: OnceLock<FileConfig> = OnceLock::new();

/// The config file contents, loaded once.
pub fn file_config() -> &'static FileConfig {
    FILE_CONFIG.get_or_init(|| {
        config_path()
            .and_then(|path| fs::read_to_string(path).ok())
            .map(|content| parse_config(&content))
            .unwrap_or_default()
    })
}

pub fn colors() -> &'static Colors {
    &file_config().colors
}

/// Resolve the tape length: flag, then environment, then config file, then default.
pub fn resolve_tape_length(flag: Option<usize>) -> Result<usize, ConfigError> {
    let env = std::env::var(TAPE_LENGTH_ENV).ok();
    resolve_tape_length_from(flag, env.as_deref(), file_config().tape_length.as_deref())
}

fn resolve_tape_length_from(
    flag: Option<usize>,
    env: Option<&str>,
    file: Option<&str>,
) -> Result<usize, ConfigError> {
    if let Some(cells) = flag {
        return check_tape_length(cells, &cells.to_string());
    }
    if let Some(raw) = env {
        let cells = raw.trim().parse::<usize>().map_err(|_| ConfigError::InvalidTapeLength {
            value: raw.to_string(),
        })?;
        return check_tape_length(cells, raw);
    }
    // A bad value in the config file is ignored rather than failing every run.
    let from_file = file
        .and_then(|raw| raw.trim().parse::<usize>().ok())
        .filter(|&cells| cells != 0 && cells <= MAX_TAPE_LENGTH);
    Ok(from_file.unwrap_or(DEFAULT_TAPE_LENGTH))
}

/// Longest tape that can be addressed; `Vec<u8>` cannot exceed `isize::MAX` bytes.
pub const MAX_TAPE_LENGTH: usize = isize::MAX as usize;

fn check_tape_length(cells: usize, raw: &str) -> Result<usize, ConfigError> {
    if cells == 0 || cells > MAX_TAPE_LENGTH {
        return Err(ConfigError::InvalidTapeLength { value: raw.to_string() });
    }
    Ok(cells)
}

fn config_path() -> Option<PathBuf> {
    // On Linux: /home/<user>/.config
    // On Windows: C:\Users\<user>\.config
    // On macOS: /Users/<user>/.config
    let base_dirs = BaseDirs::new().into_iter().next()?;
    let mut path = PathBuf::from(base_dirs.config_home());
    path.push(CONFIG_FILE_NAME);
    Some(path)
}

fn parse_color(value: &str) -> Option<Color> {
    let s = value.trim();
    if let Some(hex) = s.strip_prefix('#') {
        if hex.len() == 6 {
            if let (Ok(r), Ok(g), Ok(b)) = (
                u8::from_str_radix(&hex[0..2], 16),
                u8::from_str_radix(&hex[2..4], 16),
                u8::from_str_radix(&hex[4..6], 16),
            ) {
                return Some(Color::Rgb(r, g, b));
            }
        }
        return None;
    }

    let name = s.to_ascii_lowercase();
    Some(match name.as_str() {
        "black" => Color::Black,
        "red" => Color::Red,
        "green" => Color::Green,
        "yellow" => Color::Yellow,
        "blue" => Color::Blue,
        "purple" | "magenta" => Color::Purple,
        "cyan" => Color::Cyan,
        "white" => Color::White,
        "gray" | "grey" | "darkgray" | "dark_gray" => Color::DarkGray,
        "lightred" | "light_red" => Color::LightRed,
        "lightgreen" | "light_green" => Color::LightGreen,
        "lightyellow" | "light_yellow" => Color::LightYellow,
        "lightblue" | "light_blue" => Color::LightBlue,
        "lightcyan" | "light_cyan" => Color::LightCyan,
        _ => return None,
    })
}

/// Parse the `[interpreter]` and `[colors]` sections. Unknown keys, unknown
/// sections and values that do not parse are ignored.
fn parse_config(content: &str) -> FileConfig {
    let mut section = String::new();
    let mut map: HashMap<(String, String), String> = HashMap::new();
    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if line.starts_with('[') && line.ends_with(']') {
            section = line[1..line.len() - 1].trim().to_string();
            continue;
        }
        if let Some(eq) = line.find('=') {
            let key = line[..eq].trim().to_string();
            let val_raw = line[eq + 1..].trim();
            // Accept quoted or unquoted
            let val = if val_raw.starts_with('"') && val_raw.ends_with('"') && val_raw.len() >= 2 {
                val_raw[1..val_raw.len() - 1].to_string()
            } else {
                val_raw.to_string()
            };
            map.insert((section.clone(), key), val);
        }
    }

    let get = |section: &str, key: &str| map.get(&(section.to_string(), key.to_string()));

    let mut cfg = FileConfig {
        tape_length: get("interpreter", "tape_length").cloned(),
        colors: Colors::default(),
    };

    macro_rules! set {
        ($field:ident) => {
            if let Some(v) = get("colors", stringify!($field)).and_then(|s| parse_color(s)) {
                cfg.colors.$field = v;
            }
        };
    }

    set!(error);
    set!(progress);
    set!(done);
    set!(percent);
    set!(help_title);

    cfg
}
