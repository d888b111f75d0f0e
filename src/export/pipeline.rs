//! Main export pipeline orchestration

use super::config::ExportConfig;
use super::organizer;
use crate::artwork::FrontCover;
use crate::feed::{Channel, Feed, FeedItem};
use crate::model::{format_position, Track, TrackList};
use crate::probe::DurationProbe;
use crate::rename;
use crate::resolve::Cascade;
use crate::tags::{TagSettings, TagWriter};
use crate::validation::TrackError;
use anyhow::Result;
use chrono::{Datelike, Local};
use std::path::{Path, PathBuf};

/// Outcome of an export run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSummary {
    /// Rows read from the track list
    pub total: usize,

    /// Tracks tagged and written to the feed
    pub exported: usize,

    /// Feed that was written
    pub output_file: PathBuf,
}

/// Main export pipeline
pub struct ExportPipeline<P: DurationProbe> {
    config: ExportConfig,
    probe: P,
    tags: TagWriter,
}

impl<P: DurationProbe> ExportPipeline<P> {
    /// Create a new export pipeline
    pub fn new(config: ExportConfig, probe: P) -> Result<Self> {
        let cover = FrontCover::load(Path::new(&config.defaults.image))?;
        let tags = TagWriter::new(TagSettings {
            language_code: config.language_code.clone(),
            language: config.defaults.language.clone(),
            encoded_by: config.defaults.encoded_by.clone(),
            cover,
        });

        Ok(Self { config, probe, tags })
    }

    /// Run the complete export process
    pub fn export(&self, tracks: Vec<Track>, channel: &Channel) -> Result<ExportSummary> {
        log::info!("Exporting {} tracks using {} durations", tracks.len(), self.probe.name());

        // Step 1: Normalize file names and resolve defaults
        let mut list = self.preprocess(tracks)?;

        // Step 2: Tag and rename valid tracks
        self.process(&mut list)?;

        // Step 3: Write the feed
        let rules = &self.config.rules;
        let items = list
            .valid_tracks(rules)
            .map(|track| FeedItem::new(track, &self.config.defaults.base_url, &channel.image_url))
            .collect();
        let feed = Feed {
            channel,
            pub_date: list.created_date(rules),
            last_build_date: list.updated_date(rules),
            items,
        };

        log::info!("Creating {}", self.config.output_file.display());
        feed.save(&self.config.output_file)?;

        let summary = ExportSummary {
            total: list.len(),
            exported: list.valid_count(rules),
            output_file: self.config.output_file.clone(),
        };
        log::info!(
            "Saved {} of {} tracks to {}",
            summary.exported,
            summary.total,
            summary.output_file.display()
        );
        Ok(summary)
    }

    /// First pass: stat every file and cascade defaults through the list
    fn preprocess(&self, tracks: Vec<Track>) -> Result<TrackList> {
        let rules = &self.config.rules;
        let current_year = Local::now().year();

        let mut staged = Vec::with_capacity(tracks.len());
        for (i, mut track) in tracks.into_iter().enumerate() {
            if let Some(e @ (TrackError::EmptyFilename | TrackError::MarkedForSkip)) = track.error(rules) {
                log::info!("Skipping track {}: {}", i + 1, e);
                staged.push((track, current_year));
                continue;
            }

            log::info!("Preprocessing track {}: {}", i + 1, track.filename);
            organizer::normalize_track(&mut track)?;

            let stat = organizer::stat(Path::new(&track.filename))?;
            track.mod_time = stat.mod_time;
            track.original_mod_time = stat.mod_time;
            track.file_size = stat.size;
            track.original_file_size = stat.size;
            track.processed = true;

            staged.push((track, stat.year));
        }

        let cascade = Cascade::new(&self.config.defaults, rules, &self.probe);
        Ok(TrackList::from(cascade.run(staged)))
    }

    /// Second pass: tag, then copy to the rendered name
    fn process(&self, list: &mut TrackList) -> Result<()> {
        let rules = &self.config.rules;
        let total_discs = list.total_discs(rules);

        for i in 0..list.len() {
            let track = &list.tracks()[i];
            if let Some(e) = track.error(rules) {
                log::info!("Skipping track {}: {} ({})", i + 1, track.filename, e);
                continue;
            }

            log::info!("Processing track {}: {}", i + 1, track.filename);
            let disc = format_position(&track.disc_number, total_discs, self.config.show_total_discs);
            let position = format_position(
                &track.track,
                list.total_tracks(&track.disc_number, rules),
                self.config.show_total_tracks,
            );
            self.tags.write(track, &disc, &position)?;

            let track = &mut list.tracks_mut()[i];
            track.file_size = organizer::stat(Path::new(&track.filename))?.size;
            self.rename(track)?;
        }

        Ok(())
    }

    /// Copy the track to the name rendered from the rename mask
    ///
    /// A mask that cannot be rendered for this track leaves it where it is.
    fn rename(&self, track: &mut Track) -> Result<()> {
        let mask = &self.config.defaults.rename_mask;
        if mask.is_empty() {
            return Ok(());
        }

        let name = match rename::render(mask, track) {
            Ok(name) => name,
            Err(e) => {
                log::warn!("{}", e);
                return Ok(());
            }
        };

        let source = PathBuf::from(&track.filename);
        let dest = rename_target(&source, &name);
        let dest_name = dest.to_string_lossy().into_owned();
        if dest_name.to_lowercase() == track.filename.to_lowercase() {
            return Ok(());
        }

        log::info!("Copying {} to {}", track.filename, dest_name);
        let bytes = organizer::copy_preserving_mtime(&source, &dest)?;
        track.filename = dest_name;
        track.file_size = i64::try_from(bytes).unwrap_or(i64::MAX);
        Ok(())
    }
}

/// Where a rendered name lands
///
/// A bare file name stays next to the source file. A name with a directory
/// of its own is used as given.
fn rename_target(source: &Path, name: &str) -> PathBuf {
    let rendered = Path::new(name);
    let has_dir = rendered
        .parent()
        .is_some_and(|parent| !parent.as_os_str().is_empty());
    match source.parent() {
        Some(parent) if !has_dir && !parent.as_os_str().is_empty() => parent.join(rendered),
        _ => rendered.to_path_buf(),
    }
}
