use feedster::feed::{Channel, ChannelSettings};
use feedster::input::read_tracks;
use feedster::probe::StubProbe;
use feedster::{Defaults, ExportConfig, ExportPipeline};
use id3::{Tag, TagLike};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Write a fake MP3 of `size` bytes
fn create_dummy_audio_file(dir: &Path, name: &str, size: usize) {
    fs::write(dir.join(name), vec![0u8; size]).expect("Failed to create dummy audio file");
}

/// Track list with valid rows, a too small file and both kinds of skip rows
fn create_track_list(dir: &Path) -> std::path::PathBuf {
    create_dummy_audio_file(dir, "Intro.mp3", 4096);
    create_dummy_audio_file(dir, "Second?.mp3", 4096);
    create_dummy_audio_file(dir, "tiny.mp3", 10);
    create_dummy_audio_file(dir, "Third.mp3", 4096);

    let d = dir.display();
    let csv = format!(
        "filename,title,artist,album_title\n\
         {d}/Intro.mp3,Intro,Jane,The Show\n\
         {d}/Second?.mp3,,,\n\
         {d}/tiny.mp3,Tiny,,\n\
         ,skip,,\n\
         {d}/missing.mp3,skip,,\n\
         {d}/Third.mp3,Third,,\n"
    );
    let path = dir.join("tracks.csv");
    fs::write(&path, csv).expect("Failed to write track list");
    path
}

fn config(dir: &Path, rename_mask: &str) -> ExportConfig {
    let defaults = Defaults {
        base_url: "https://example.com/pod".to_string(),
        image: dir.join("cover.jpg").to_string_lossy().into_owned(),
        output_file: dir.join("feed.xml").to_string_lossy().into_owned(),
        rename_mask: rename_mask.to_string(),
        ..Defaults::default()
    };
    ExportConfig::new(defaults).expect("Invalid configuration")
}

fn channel(config: &ExportConfig) -> Channel {
    let settings = ChannelSettings {
        title: Some("Test Show".to_string()),
        ..ChannelSettings::default()
    };
    Channel::new(settings, &config.defaults)
}

#[test]
fn test_export_tags_renames_and_writes_feed() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let dir = temp_dir.path();

    let tracks = read_tracks(&create_track_list(dir)).unwrap();
    assert_eq!(tracks.len(), 6);

    let config = config(dir, "{track_no%02d} - {title_}.mp3");
    let channel = channel(&config);
    let pipeline = ExportPipeline::new(config, StubProbe::fixed(180_000)).unwrap();
    let summary = pipeline.export(tracks, &channel).unwrap();

    assert_eq!(summary.total, 6);
    assert_eq!(summary.exported, 3);

    // Invalid characters were replaced on disk before anything else
    assert!(dir.join("Second_.mp3").exists());
    assert!(!dir.join("Second?.mp3").exists());

    // Copies carry the rendered names; numbering skips the invalid row
    for name in ["01 - Intro.mp3", "02 - Second_.mp3", "03 - Third.mp3"] {
        assert!(dir.join(name).exists(), "{} was not created", name);
    }
    assert!(!dir.join("03 - Tiny.mp3").exists());

    let tag = Tag::read_from_path(dir.join("03 - Third.mp3")).unwrap();
    assert_eq!(tag.title(), Some("Third"));
    assert_eq!(tag.artist(), Some("Jane"));
    assert_eq!(tag.album(), Some("The Show"));
    assert_eq!(tag.get("TRCK").and_then(|f| f.content().text()), Some("3/3"));
    assert_eq!(tag.get("TPOS").and_then(|f| f.content().text()), Some("1/1"));

    let feed = fs::read_to_string(dir.join("feed.xml")).unwrap();
    assert!(feed.contains("<title>Test Show</title>"));
    assert!(feed.contains("<title>Intro</title>"));
    assert!(feed.contains("<title>Second_</title>"));
    assert!(feed.contains("<title>Third</title>"));
    assert!(!feed.contains("<title>Tiny</title>"));
    assert!(!feed.contains("<title>skip</title>"));
    assert!(feed.contains("https://example.com/pod/01%20-%20Intro.mp3"));
    assert!(feed.contains("<itunes:duration>00:03:00</itunes:duration>"));

    let intro = feed.find("<title>Intro</title>").unwrap();
    let third = feed.find("<title>Third</title>").unwrap();
    assert!(intro < third);
}

#[test]
fn test_export_without_durations_or_renames() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let dir = temp_dir.path();

    let tracks = read_tracks(&create_track_list(dir)).unwrap();
    let config = config(dir, "");
    let channel = channel(&config);
    let pipeline = ExportPipeline::new(config, StubProbe::unavailable()).unwrap();
    let summary = pipeline.export(tracks, &channel).unwrap();

    // Unknown durations do not make a track invalid
    assert_eq!(summary.exported, 3);

    let feed = fs::read_to_string(&summary.output_file).unwrap();
    assert!(!feed.contains("<itunes:duration>"));
    assert!(feed.contains("https://example.com/pod/Intro.mp3"));
    assert!(feed.contains("https://example.com/pod/Second_.mp3"));
    assert!(!dir.join("01 - Intro.mp3").exists());
}

#[test]
fn test_missing_file_aborts_export() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let dir = temp_dir.path();

    let list = dir.join("tracks.csv");
    fs::write(&list, format!("filename,title\n{}/absent.mp3,Absent\n", dir.display())).unwrap();

    let tracks = read_tracks(&list).unwrap();
    let config = config(dir, "");
    let channel = channel(&config);
    let pipeline = ExportPipeline::new(config, StubProbe::fixed(60_000)).unwrap();

    assert!(pipeline.export(tracks, &channel).is_err());
    assert!(!dir.join("feed.xml").exists());
}

fn file_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[test]
fn test_unrenderable_mask_keeps_original_names() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let dir = temp_dir.path();

    let tracks = read_tracks(&create_track_list(dir)).unwrap();
    let config = config(dir, "{title%d}.mp3");
    let channel = channel(&config);
    let pipeline = ExportPipeline::new(config, StubProbe::fixed(60_000)).unwrap();
    let summary = pipeline.export(tracks, &channel).unwrap();

    // Titles are not numbers, so every rename is skipped
    assert_eq!(summary.exported, 3);
    assert_eq!(
        file_names(dir),
        ["Intro.mp3", "Second_.mp3", "Third.mp3", "feed.xml", "tiny.mp3", "tracks.csv"]
    );

    let feed = fs::read_to_string(&summary.output_file).unwrap();
    assert!(feed.contains("https://example.com/pod/Intro.mp3"));
    assert!(feed.contains("https://example.com/pod/Third.mp3"));
}

#[test]
fn test_filename_mask_does_not_copy() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let dir = temp_dir.path();

    let tracks = read_tracks(&create_track_list(dir)).unwrap();
    let config = config(dir, "{filename}");
    let channel = channel(&config);
    let pipeline = ExportPipeline::new(config, StubProbe::fixed(60_000)).unwrap();
    let summary = pipeline.export(tracks, &channel).unwrap();

    assert_eq!(summary.exported, 3);
    assert_eq!(
        file_names(dir),
        ["Intro.mp3", "Second_.mp3", "Third.mp3", "feed.xml", "tiny.mp3", "tracks.csv"]
    );
}

#[test]
fn test_mask_with_directory_is_used_as_given() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let dir = temp_dir.path();

    let tracks = read_tracks(&create_track_list(dir)).unwrap();
    let mask = format!("{}/out/{{track_no%02d}}.mp3", dir.display());
    let config = config(dir, &mask);
    let channel = channel(&config);
    let pipeline = ExportPipeline::new(config, StubProbe::fixed(60_000)).unwrap();
    let summary = pipeline.export(tracks, &channel).unwrap();

    assert_eq!(summary.exported, 3);
    assert_eq!(file_names(&dir.join("out")), ["01.mp3", "02.mp3", "03.mp3"]);

    let feed = fs::read_to_string(&summary.output_file).unwrap();
    assert!(feed.contains("https://example.com/pod/01.mp3"));
}
