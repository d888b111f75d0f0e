use anyhow::Result;
use clap::Parser;
use feedster::artwork::check_channel_image;
use feedster::feed::{Channel, ChannelSettings};
use feedster::probe::{ProbeChain, StubProbe};
use feedster::{Defaults, ExportConfig, ExportPipeline};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "feedster", version)]
#[command(about = "Tag MP3s from a track list and generate a podcast feed", long_about = None)]
struct Args {
    /// Track list to read (.csv, .xls or .xlsx), overrides input_file
    input: Option<String>,

    /// Configuration file
    #[arg(short = 'c', long, default_value = "config.yaml")]
    config: String,

    /// Local overrides for the configuration file
    #[arg(short = 'l', long, default_value = "local.yaml")]
    local: String,

    /// Feed to write, overrides output_file
    #[arg(short = 'o', long)]
    output: Option<String>,

    /// Don't run external tools to measure durations
    #[arg(long)]
    no_probe: bool,

    /// Verbose logging
    #[arg(short = 'v', long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let log_level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    log::info!("feedster {}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config_path = PathBuf::from(shellexpand::tilde(&args.config).as_ref());
    let local_path = PathBuf::from(shellexpand::tilde(&args.local).as_ref());
    let defaults = Defaults::load(&config_path, &local_path)?;
    log::debug!("defaults: {:#?}", defaults);

    let mut config = ExportConfig::new(defaults)?;
    if let Some(input) = &args.input {
        config = config.with_input(input);
    }
    if let Some(output) = &args.output {
        config = config.with_output(output);
    }

    // Channel settings
    let settings = ChannelSettings::load(&config.settings_file)?;
    let channel = Channel::new(settings, &config.defaults);
    log::debug!("channel: {:#?}", channel);

    if let Some(image) = channel.image_file() {
        match check_channel_image(&image) {
            Ok((width, height)) => log::debug!("Channel image {} is {}x{}", image.display(), width, height),
            Err(e) => log::warn!("{}", e),
        }
    }

    let tracks = feedster::input::read_tracks(&config.input_file)?;

    let summary = if args.no_probe {
        log::info!("Duration probing disabled");
        let pipeline = ExportPipeline::new(config, StubProbe::unavailable())?;
        pipeline.export(tracks, &channel)?
    } else {
        let probe = ProbeChain::from_defaults(&config.defaults);
        log::debug!("Using {} duration probes", probe.len());
        let pipeline = ExportPipeline::new(config, probe)?;
        pipeline.export(tracks, &channel)?
    };

    if summary.exported == 0 {
        log::warn!("No tracks were exported");
    }

    Ok(())
}
