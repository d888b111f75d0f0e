//! Export configuration
//!
//! `Defaults` is read from `config.yaml`, overlaid by `local.yaml` and then by
//! `FEEDSTER__*` environment variables. `ExportConfig` is the validated form
//! that the pipeline works from.

use crate::validation::{ValidityRules, MIN_DURATION_MS, MIN_FILE_SIZE, SKIP_WORDS};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default copyright template, `{year}` and `{artist}` are substituted
pub const DEFAULT_COPYRIGHT_MASK: &str = "Copyright (c) & (p) {year}, {artist}";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(transparent)]
    Load(#[from] ::config::ConfigError),

    #[error("Parse error parsing {key}: invalid boolean {value:?}")]
    InvalidBool { key: &'static str, value: String },

    #[error("Unknown language: {0:?}")]
    UnknownLanguage(String),
}

/// Settings shared by every track and by the feed
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Defaults {
    pub author: String,
    pub base_url: String,
    pub category: String,
    pub complete: String,
    pub copyright: String,
    pub copyright_mask: String,
    pub disc_number: String,
    pub email: String,
    pub encoded_by: String,
    pub explicit: String,
    pub ffprobe: String,
    pub ffmpeg: String,
    pub exiftool: String,
    pub generator: String,
    pub image: String,
    pub input_file: String,
    pub language: String,
    pub managing_editor: String,
    pub output_file: String,
    pub rename_mask: String,
    pub settings_file: String,
    pub total_discs: String,
    pub total_tracks: String,
    pub track_no: String,
    pub ttl: String,
    pub web_master: String,
    pub min_duration_ms: i64,
    pub min_file_size: i64,
    pub skip_words: Vec<String>,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            author: String::new(),
            base_url: String::new(),
            category: String::new(),
            complete: "yes".to_string(),
            copyright: String::new(),
            copyright_mask: DEFAULT_COPYRIGHT_MASK.to_string(),
            disc_number: "1".to_string(),
            email: String::new(),
            encoded_by: String::new(),
            explicit: "no".to_string(),
            ffprobe: "ffprobe".to_string(),
            ffmpeg: "ffmpeg".to_string(),
            exiftool: "exiftool".to_string(),
            generator: String::new(),
            image: "default.jpg".to_string(),
            input_file: "default.csv".to_string(),
            language: "en-us".to_string(),
            managing_editor: String::new(),
            output_file: "default.xml".to_string(),
            rename_mask: String::new(),
            settings_file: "settings.yaml".to_string(),
            total_discs: "true".to_string(),
            total_tracks: "true".to_string(),
            track_no: "1".to_string(),
            ttl: "1".to_string(),
            web_master: String::new(),
            min_duration_ms: MIN_DURATION_MS,
            min_file_size: MIN_FILE_SIZE,
            skip_words: SKIP_WORDS.iter().map(|w| w.to_string()).collect(),
        }
    }
}

impl Defaults {
    /// Load `config_path` and `local_path` (both optional) plus environment overrides
    pub fn load(config_path: &Path, local_path: &Path) -> Result<Self, ConfigError> {
        for path in [config_path, local_path] {
            if path.exists() {
                log::info!("Reading {}", path.display());
            } else {
                log::debug!("No configuration at {}", path.display());
            }
        }

        let cfg = ::config::Config::builder()
            .add_source(yaml_file(config_path))
            .add_source(yaml_file(local_path))
            .add_source(
                ::config::Environment::with_prefix("FEEDSTER")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Ok(cfg.try_deserialize()?)
    }

    /// Validity thresholds for tracks
    pub fn rules(&self) -> ValidityRules {
        ValidityRules {
            min_duration_ms: self.min_duration_ms,
            min_file_size: self.min_file_size,
            skip_words: self.skip_words.clone(),
        }
    }
}

fn yaml_file(path: &Path) -> ::config::File<::config::FileSourceFile, ::config::FileFormat> {
    ::config::File::new(&path.to_string_lossy(), ::config::FileFormat::Yaml).required(false)
}

/// Validated configuration for one export run
#[derive(Debug, Clone)]
pub struct ExportConfig {
    /// Raw defaults, with `base_url` normalized to end in `/`
    pub defaults: Defaults,

    /// Render TPOS as "disc/total"
    pub show_total_discs: bool,

    /// Render TRCK as "track/total"
    pub show_total_tracks: bool,

    /// ISO 639-2 code for COMM frames
    pub language_code: String,

    /// Thresholds used to skip tracks
    pub rules: ValidityRules,

    /// Track list to read
    pub input_file: PathBuf,

    /// Feed to write
    pub output_file: PathBuf,

    /// Channel settings file
    pub settings_file: PathBuf,
}

impl ExportConfig {
    /// Validate `defaults`; boolean and language errors are fatal
    pub fn new(mut defaults: Defaults) -> Result<Self, ConfigError> {
        if !defaults.base_url.is_empty() && !defaults.base_url.ends_with('/') {
            defaults.base_url.push('/');
        }

        let show_total_discs = parse_bool(&defaults.total_discs).ok_or_else(|| {
            ConfigError::InvalidBool {
                key: "total_discs",
                value: defaults.total_discs.clone(),
            }
        })?;
        let show_total_tracks = parse_bool(&defaults.total_tracks).ok_or_else(|| {
            ConfigError::InvalidBool {
                key: "total_tracks",
                value: defaults.total_tracks.clone(),
            }
        })?;
        let language_code = iso639_2(&defaults.language)?;

        Ok(Self {
            show_total_discs,
            show_total_tracks,
            language_code,
            rules: defaults.rules(),
            input_file: expand(&defaults.input_file),
            output_file: expand(&defaults.output_file),
            settings_file: expand(&defaults.settings_file),
            defaults,
        })
    }

    /// Read tracks from `path` instead of `input_file`
    pub fn with_input(mut self, path: &str) -> Self {
        self.input_file = expand(path);
        self
    }

    /// Write the feed to `path` instead of `output_file`
    pub fn with_output(mut self, path: &str) -> Self {
        self.output_file = expand(path);
        self
    }
}

fn expand(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).as_ref())
}

/// Strict boolean parsing: the spellings accepted are 1/0, t/f, true/false
/// in lower, upper or title case
pub fn parse_bool(value: &str) -> Option<bool> {
    match value {
        "1" | "t" | "T" | "true" | "TRUE" | "True" => Some(true),
        "0" | "f" | "F" | "false" | "FALSE" | "False" => Some(false),
        _ => None,
    }
}

/// ISO 639-2 code for a BCP 47 tag such as "en-us"
pub fn iso639_2(tag: &str) -> Result<String, ConfigError> {
    let primary = tag
        .split(['-', '_'])
        .next()
        .unwrap_or_default()
        .to_ascii_lowercase();

    let code = match primary.as_str() {
        "ar" => "ara",
        "ca" => "cat",
        "cs" => "ces",
        "cy" => "cym",
        "da" => "dan",
        "de" => "deu",
        "el" => "ell",
        "en" => "eng",
        "eo" => "epo",
        "es" => "spa",
        "et" => "est",
        "eu" => "eus",
        "fa" => "fas",
        "fi" => "fin",
        "fr" => "fra",
        "ga" => "gle",
        "he" => "heb",
        "hi" => "hin",
        "hr" => "hrv",
        "hu" => "hun",
        "id" => "ind",
        "is" => "isl",
        "it" => "ita",
        "ja" => "jpn",
        "ko" => "kor",
        "la" => "lat",
        "lt" => "lit",
        "lv" => "lav",
        "nl" => "nld",
        "no" => "nor",
        "pl" => "pol",
        "pt" => "por",
        "ro" => "ron",
        "ru" => "rus",
        "sk" => "slk",
        "sl" => "slv",
        "sr" => "srp",
        "sv" => "swe",
        "th" => "tha",
        "tr" => "tur",
        "uk" => "ukr",
        "vi" => "vie",
        "zh" => "zho",
        other if other.len() == 3 && other.chars().all(|c| c.is_ascii_lowercase()) => other,
        _ => return Err(ConfigError::UnknownLanguage(tag.to_string())),
    };

    Ok(code.to_string())
}
