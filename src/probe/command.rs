//! External tool probes (ffprobe, ffmpeg, exiftool)

use super::traits::{DurationProbe, ProbeError};
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;
use std::process::Command;

static FFPROBE_JUNK: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^0-9.]+").unwrap());
static FFMPEG_TIME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r" time=(\d+):(\d+):(\d+)(?:\.(\d+))?").unwrap());
static EXIFTOOL_HMS: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d+):(\d+):(\d+)").unwrap());
static EXIFTOOL_SECONDS: Lazy<Regex> = Lazy::new(|| Regex::new(r"^([\d.]+) s").unwrap());

/// Which external tool to run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tool {
    Ffprobe,
    Ffmpeg,
    Exiftool,
}

impl Tool {
    fn label(self) -> &'static str {
        match self {
            Tool::Ffprobe => "ffprobe",
            Tool::Ffmpeg => "ffmpeg",
            Tool::Exiftool => "exiftool",
        }
    }

    fn args(self, path: &Path) -> Vec<String> {
        let file = path.to_string_lossy().into_owned();
        let args: &[&str] = match self {
            Tool::Ffprobe => &[
                "-v",
                "error",
                "-show_entries",
                "format=duration",
                "-of",
                "default=noprint_wrappers=1:nokey=1",
            ],
            Tool::Ffmpeg => &["-i"],
            Tool::Exiftool => &["-s", "-s", "-s", "-Duration"],
        };
        let mut args: Vec<String> = args.iter().map(|a| a.to_string()).collect();
        args.push(file);
        if self == Tool::Ffmpeg {
            args.extend(["-f", "null", "-", "-y"].iter().map(|a| a.to_string()));
        }
        args
    }

    fn parse(self, stdout: &str, stderr: &str) -> Option<i64> {
        match self {
            Tool::Ffprobe => parse_ffprobe(stdout),
            // ffmpeg reports progress on stderr
            Tool::Ffmpeg => parse_ffmpeg(stderr),
            Tool::Exiftool => parse_exiftool(stdout),
        }
    }
}

/// Runs an external tool and parses the duration from its output
#[derive(Debug, Clone)]
pub struct CommandProbe {
    tool: Tool,
    program: String,
}

impl CommandProbe {
    pub fn new(tool: Tool, program: impl Into<String>) -> Self {
        Self {
            tool,
            program: program.into(),
        }
    }

    pub fn ffprobe(program: impl Into<String>) -> Self {
        Self::new(Tool::Ffprobe, program)
    }

    pub fn ffmpeg(program: impl Into<String>) -> Self {
        Self::new(Tool::Ffmpeg, program)
    }

    pub fn exiftool(program: impl Into<String>) -> Self {
        Self::new(Tool::Exiftool, program)
    }
}

impl DurationProbe for CommandProbe {
    fn name(&self) -> &str {
        self.tool.label()
    }

    fn duration(&self, path: &Path) -> Result<i64, ProbeError> {
        if self.program.is_empty() {
            return Err(ProbeError::NotConfigured(self.tool.label()));
        }

        let args = self.tool.args(path);
        let cmdline = format!("{:?} {}", self.program, args.join(" "));
        log::debug!("Executing: {}", cmdline);

        let output = Command::new(&self.program)
            .args(&args)
            .output()
            .map_err(|source| ProbeError::Spawn {
                command: cmdline.clone(),
                source,
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        if !stdout.is_empty() {
            log::debug!("stdout={}", stdout);
        }
        if !stderr.is_empty() {
            log::debug!("stderr={}", stderr);
        }

        if !output.status.success() {
            return Err(ProbeError::Failed {
                command: cmdline,
                status: output.status,
                stderr,
            });
        }

        self.tool
            .parse(&stdout, &stderr)
            .ok_or(ProbeError::Unparseable {
                command: cmdline,
                output: stdout,
            })
    }
}

/// Seconds as a float, rounded up to the next millisecond
pub fn parse_ffprobe(output: &str) -> Option<i64> {
    let cleaned = FFPROBE_JUNK.replace_all(output, "");
    let seconds: f64 = cleaned.parse().ok()?;
    Some(((seconds + 0.000999) * 1000.0) as i64)
}

/// Last ` time=HH:MM:SS.hh` progress line
pub fn parse_ffmpeg(output: &str) -> Option<i64> {
    let caps = FFMPEG_TIME.captures_iter(output).last()?;
    let hours: i64 = caps[1].parse().ok()?;
    let minutes: i64 = caps[2].parse().ok()?;
    let seconds: i64 = caps[3].parse().ok()?;
    let millis = caps.get(4).map(|m| fraction_to_millis(m.as_str())).unwrap_or(0);
    Some(1000 * (hours * 3600 + minutes * 60 + seconds) + millis)
}

/// `H:MM:SS`, or `12.34 s` for short files
pub fn parse_exiftool(output: &str) -> Option<i64> {
    if let Some(caps) = EXIFTOOL_HMS.captures(output) {
        let hours: i64 = caps[1].parse().ok()?;
        let minutes: i64 = caps[2].parse().ok()?;
        let seconds: i64 = caps[3].parse().ok()?;
        return Some(1000 * (hours * 3600 + minutes * 60 + seconds));
    }
    let caps = EXIFTOOL_SECONDS.captures(output.trim())?;
    let seconds: f64 = caps[1].parse().ok()?;
    Some((seconds * 1000.0).round() as i64)
}

fn fraction_to_millis(digits: &str) -> i64 {
    let mut padded: String = digits.chars().take(3).collect();
    while padded.len() < 3 {
        padded.push('0');
    }
    padded.parse().unwrap_or(0)
}
