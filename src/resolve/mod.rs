//! Cascading track defaults
//!
//! Empty fields are filled from the nearest *valid* earlier track, then from
//! the configured defaults, then from values derived from the file itself.
//! Information only ever flows forward through the list.

use crate::export::config::Defaults;
use crate::model::Track;
use crate::probe::DurationProbe;
use crate::validation::{TrackError, ValidityRules};
use std::path::Path;

fn inherit(field: &mut String, from: &str) {
    if field.is_empty() {
        *field = from.to_string();
    }
}

/// Copyright line from the configured text or mask
pub fn copyright_for(defaults: &Defaults, year: i32, artist: &str) -> String {
    if !defaults.copyright.is_empty() {
        return defaults.copyright.clone();
    }
    defaults
        .copyright_mask
        .replace("{year}", &year.to_string())
        .replace("{artist}", artist)
}

fn default_copyright_and_year(track: &mut Track, last: &Track, defaults: &Defaults, year: i32) {
    inherit(&mut track.copyright, &last.copyright);
    if track.copyright.is_empty() {
        track.copyright = copyright_for(defaults, year, &track.artist);
    }
    inherit(&mut track.year, &last.year);
    if track.year.is_empty() {
        track.year = year.to_string();
    }
}

/// Fill the empty fields of `track` from `last` (the previous valid track)
///
/// `year` is the modification year of the track's file. Returns false when
/// the track has no filename or no title; such tracks are not resolved any
/// further.
pub fn resolve(
    track: &mut Track,
    last: &Track,
    defaults: &Defaults,
    year: i32,
    probe: &dyn DurationProbe,
) -> bool {
    if track.title.is_empty() && !track.filename.is_empty() {
        track.title = track.base_title();
    }

    if track.filename.is_empty() {
        default_copyright_and_year(track, last, defaults, year);
        track.duration_ms = 0;
        return false;
    }
    if track.title.is_empty() {
        log::info!("Skipping track {}: title is empty", track.filename);
        return false;
    }

    if track.description.is_empty() {
        track.description = track.title.clone();
    }
    inherit(&mut track.artist, &last.artist);
    inherit(&mut track.album_artist, &last.album_artist);
    if track.album_artist.is_empty() {
        track.album_artist = track.artist.clone();
    }

    if track.track.is_empty() {
        track.track = match last.track.trim().parse::<i64>() {
            Ok(n) => (n + 1).to_string(),
            Err(_) => defaults.track_no.clone(),
        };
    }

    if track.disc_number.is_empty() {
        track.disc_number = last.disc_number.clone();
    } else if track.disc_number != last.disc_number {
        // A new disc starts numbering over, even over an explicit number
        track.track = "1".to_string();
    }
    if track.disc_number.is_empty() {
        track.disc_number = defaults.disc_number.clone();
    }

    inherit(&mut track.album_title, &last.album_title);
    inherit(&mut track.genre, &last.genre);
    default_copyright_and_year(track, last, defaults, year);

    match probe.duration(Path::new(&track.filename)) {
        Ok(ms) => track.duration_ms = ms,
        Err(e) => {
            log::warn!("Cannot determine duration of {}: {}", track.filename, e);
            track.duration_ms = 0;
        }
    }

    true
}

/// Fold state for the preprocess pass: the last valid track seen so far
pub struct Cascade<'a> {
    defaults: &'a Defaults,
    rules: &'a ValidityRules,
    probe: &'a dyn DurationProbe,
}

impl<'a> Cascade<'a> {
    pub fn new(defaults: &'a Defaults, rules: &'a ValidityRules, probe: &'a dyn DurationProbe) -> Self {
        Self {
            defaults,
            rules,
            probe,
        }
    }

    /// Resolve `track` against `last` and return the next accumulator with
    /// the resolved track
    ///
    /// The accumulator only advances when the resolved track is valid, so
    /// skipped rows never feed defaults into later ones. Rows marked for
    /// skipping are passed through untouched.
    pub fn step(&self, last: Track, mut track: Track, year: i32) -> (Track, Track) {
        if track.error(self.rules) == Some(TrackError::MarkedForSkip) {
            return (last, track);
        }
        let resolved = resolve(&mut track, &last, self.defaults, year, self.probe);
        if resolved && track.is_valid(self.rules) {
            (track.clone(), track)
        } else {
            (last, track)
        }
    }

    /// Run `step` over already-stat'ed tracks in order
    pub fn run<I>(&self, tracks: I) -> Vec<Track>
    where
        I: IntoIterator<Item = (Track, i32)>,
    {
        let (_, resolved) = tracks.into_iter().fold(
            (Track::default(), Vec::new()),
            |(last, mut done), (track, year)| {
                let (next, track) = self.step(last, track, year);
                done.push(track);
                (next, done)
            },
        );
        resolved
    }
}
