//! Filename templates
//!
//! A rename mask such as `{track_no%02d} - {title_}.mp3` is expanded against
//! a track's fields. Each `{name<format>}` token names a field followed by an
//! optional printf-style format. Two marker characters may appear in the
//! format: `_` replaces spaces in the rendered value with underscores and
//! `-` replaces them with hyphens.

mod printf;

pub use printf::{sprintf, Arg};

use crate::export::config::parse_bool;
use crate::model::Track;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use thiserror::Error;

static TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{([^{}]*)\}").unwrap());

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Error parsing rename_mask {mask}: field: {field}: value: {value:?}: {reason}")]
pub struct RenderError {
    pub mask: String,
    pub field: String,
    pub value: String,
    pub reason: String,
}

/// Expand `mask` against `track`; an empty mask keeps the current filename
pub fn render(mask: &str, track: &Track) -> Result<String, RenderError> {
    if mask.is_empty() {
        return Ok(track.filename.clone());
    }

    let fields = track.fields();
    let mut failure = None;

    // Single pass over the mask, so rendered values are never re-expanded
    let rendered = TOKEN.replace_all(mask, |caps: &Captures| {
        let body = &caps[1];
        let Some((name, value)) = fields
            .iter()
            .filter(|(name, _)| is_field_token(body, name))
            .max_by_key(|(name, _)| name.len())
        else {
            return caps[0].to_string();
        };

        log::trace!("token: {:?} field: {} value: {:?}", &caps[0], name, value);
        match render_field(&body[name.len()..], value) {
            Ok(s) => s,
            Err(reason) => {
                failure.get_or_insert_with(|| RenderError {
                    mask: mask.to_string(),
                    field: name.to_string(),
                    value: value.to_string(),
                    reason,
                });
                String::new()
            }
        }
    });

    match failure {
        Some(err) => Err(err),
        None => Ok(rendered.into_owned()),
    }
}

/// Whether `body` names the field `name`, followed by nothing or a format
///
/// A letter right after the name means a different word (`{yearly}` is not
/// `{year}` with format `ly`).
fn is_field_token(body: &str, name: &str) -> bool {
    match body.strip_prefix(name) {
        Some(format) => !format.starts_with(|c: char| c.is_ascii_alphabetic()),
        None => false,
    }
}

/// Render one field value with the format suffix taken from its token
fn render_field(format: &str, value: &str) -> Result<String, String> {
    let underline = format.contains('_');
    let dash = format.contains('-');
    let mut format: String = format.chars().filter(|c| *c != '_' && *c != '-').collect();
    if format.is_empty() {
        format = "%s".to_string();
    } else if !format.starts_with('%') {
        format.insert(0, '%');
    }
    log::trace!("format: {:?}", format);

    let last = format.chars().last().unwrap_or('s');
    let mut s = match last {
        't' => {
            let b = parse_bool(value).ok_or_else(|| format!("invalid boolean {:?}", value))?;
            sprintf(&format, Arg::Bool(b))
        }
        'b' | 'c' | 'd' | 'o' | 'q' | 'x' | 'X' | 'U' => {
            let i: i64 = value.parse().map_err(|e| format!("{}", e))?;
            sprintf(&format, Arg::Int(i))
        }
        'e' | 'E' | 'f' | 'F' | 'g' | 'G' => {
            let f: f64 = value.parse().map_err(|e| format!("{}", e))?;
            sprintf(&format, Arg::Float(f))
        }
        _ => sprintf(&format, Arg::Str(value)),
    };

    if underline {
        s = s.replace(' ', "_");
    }
    if dash {
        s = s.replace(' ', "-");
    }
    Ok(s)
}
