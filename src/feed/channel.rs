//! Channel level feed settings

use crate::export::config::{ConfigError, Defaults};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Contents of the settings file; every key is optional
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ChannelSettings {
    pub title: Option<String>,
    pub link: Option<String>,
    pub description: Option<String>,
    pub subtitle: Option<String>,
    pub summary: Option<String>,
    pub category: Option<String>,
    pub copyright: Option<String>,
    pub language: Option<String>,
    pub generator: Option<String>,
    pub managing_editor: Option<String>,
    pub web_master: Option<String>,
    pub ttl: Option<String>,
    pub author: Option<String>,
    pub explicit: Option<String>,
    pub complete: Option<String>,
    pub block: Option<String>,
    pub new_feed_url: Option<String>,
    pub image_url: Option<String>,
    pub owner_name: Option<String>,
    pub owner_email: Option<String>,
}

impl ChannelSettings {
    /// Read the settings file at `path`; a missing file yields empty settings
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            log::info!("Reading {}", path.display());
        } else {
            log::warn!("Cannot find {}, using configured defaults", path.display());
        }

        let cfg = ::config::Config::builder()
            .add_source(
                ::config::File::new(&path.to_string_lossy(), ::config::FileFormat::Yaml)
                    .required(false),
            )
            .build()?;

        Ok(cfg.try_deserialize()?)
    }
}

/// Resolved channel description used by the feed writer
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Channel {
    pub title: String,
    pub link: String,
    pub description: String,
    pub subtitle: String,
    pub summary: String,

    /// Top level iTunes category
    pub category: String,

    /// Optional iTunes subcategory, from a `"Main,Sub"` category
    pub subcategory: Option<String>,

    pub copyright: String,
    pub language: String,
    pub generator: String,
    pub managing_editor: String,
    pub web_master: String,

    /// Minutes a reader may cache the feed
    pub ttl: Option<u32>,

    pub author: String,
    pub explicit: String,
    pub complete: String,
    pub block: String,

    /// Self link, emitted as `atom:link rel="self"`
    pub new_feed_url: String,

    pub image_url: String,
    pub owner_name: String,
    pub owner_email: String,
}

impl Channel {
    /// Combine the settings file with the configured defaults
    pub fn new(settings: ChannelSettings, defaults: &Defaults) -> Self {
        let pick = |value: Option<String>, fallback: &str| value.unwrap_or_else(|| fallback.to_string());

        let (category, subcategory) = split_category(&pick(settings.category, &defaults.category));

        let ttl_text = pick(settings.ttl, &defaults.ttl);
        let ttl = if ttl_text.is_empty() {
            None
        } else {
            match ttl_text.trim().parse() {
                Ok(ttl) => Some(ttl),
                Err(e) => {
                    log::warn!("Ignoring ttl {:?}: {}", ttl_text, e);
                    None
                }
            }
        };

        let generator = match settings.generator {
            Some(generator) => generator,
            None if !defaults.generator.is_empty() => defaults.generator.clone(),
            None => format!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION")),
        };

        let image_url = match settings.image_url {
            Some(url) => url,
            None if defaults.image.is_empty() => String::new(),
            None => format!("{}{}", defaults.base_url, defaults.image),
        };

        Self {
            title: settings.title.unwrap_or_default(),
            link: pick(settings.link, &defaults.base_url),
            description: settings.description.unwrap_or_default(),
            subtitle: settings.subtitle.unwrap_or_default(),
            summary: settings.summary.unwrap_or_default(),
            category,
            subcategory,
            copyright: pick(settings.copyright, &defaults.copyright),
            language: pick(settings.language, &defaults.language),
            generator,
            managing_editor: pick(settings.managing_editor, &defaults.managing_editor),
            web_master: pick(settings.web_master, &defaults.web_master),
            ttl,
            author: pick(settings.author, &defaults.author),
            explicit: pick(settings.explicit, &defaults.explicit),
            complete: pick(settings.complete, &defaults.complete),
            block: settings.block.unwrap_or_default(),
            new_feed_url: settings.new_feed_url.unwrap_or_default(),
            image_url,
            owner_name: pick(settings.owner_name, &defaults.author),
            owner_email: pick(settings.owner_email, &defaults.email),
        }
    }

    /// Local file the channel image URL refers to (its last path segment)
    pub fn image_file(&self) -> Option<PathBuf> {
        let name = self.image_url.rsplit('/').next()?;
        if name.is_empty() {
            None
        } else {
            Some(PathBuf::from(name))
        }
    }
}

fn split_category(category: &str) -> (String, Option<String>) {
    match category.split_once(',') {
        Some((main, sub)) => (main.to_string(), Some(sub.to_string())),
        None => (category.to_string(), None),
    }
}
