use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use spectra_canvas::audio::DEFAULT_FFT_SIZE;
use spectra_canvas::pipeline::{FixedStepTicks, TickSource};
use spectra_canvas::{
    DesignType, ManualClock, Pipeline, Scheduler, TextRenderer, TrackAnalyser, VisualizerConfig,
};

#[derive(Parser, Debug)]
#[command(name = "spectra-render", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render an audio file to a numbered PNG sequence.
    Render(RenderArgs),
    /// List the available designs.
    Designs,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Input audio file (WAV, MP3, FLAC, AAC).
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output directory for `frame_00000.png` files.
    #[arg(long)]
    out: PathBuf,

    /// Visualizer config JSON.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Design override, e.g. `circular-ring`.
    #[arg(long)]
    design: Option<String>,

    /// LRC lyrics file.
    #[arg(long)]
    lyrics: Option<PathBuf>,

    /// Background images, in slideshow order.
    #[arg(long = "background")]
    backgrounds: Vec<PathBuf>,

    /// Extra font directory.
    #[arg(long)]
    fonts: Option<PathBuf>,

    #[arg(long, default_value_t = 30.0)]
    fps: f64,

    /// Stop after this many seconds.
    #[arg(long)]
    duration: Option<f64>,

    #[arg(long, default_value_t = DEFAULT_FFT_SIZE)]
    fft_size: usize,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Designs => {
            for design in DesignType::all() {
                println!("{:<18} {}", design.name(), design.description());
            }
            Ok(())
        }
    }
}

fn load_config(args: &RenderArgs) -> anyhow::Result<VisualizerConfig> {
    let mut config = match &args.config {
        Some(path) => VisualizerConfig::from_json_file(path)
            .with_context(|| format!("load config '{}'", path.display()))?,
        None => VisualizerConfig::default(),
    };
    if let Some(name) = &args.design {
        config.design = DesignType::from_str(name)
            .with_context(|| format!("unknown design '{name}'"))?;
    }
    config
        .background
        .images
        .extend(args.backgrounds.iter().cloned());
    Ok(config)
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let config = load_config(&args)?;

    let analyser = TrackAnalyser::open(&args.in_path, args.fft_size)
        .with_context(|| format!("analyse '{}'", args.in_path.display()))?;
    let duration = args
        .duration
        .map_or(analyser.duration(), |d| d.min(analyser.duration()));
    let total_frames = (duration * args.fps).ceil() as u64;

    let fonts: Vec<&Path> = args.fonts.as_deref().into_iter().collect();
    let mut pipeline = Pipeline::with_text_renderer(config, TextRenderer::with_system_fonts(&fonts))?;
    if let Some(lyrics) = &args.lyrics {
        let lines = pipeline
            .load_subtitles(lyrics)
            .with_context(|| format!("load lyrics '{}'", lyrics.display()))?;
        log::info!("loaded {lines} lyric lines");
    }

    std::fs::create_dir_all(&args.out)
        .with_context(|| format!("create output directory '{}'", args.out.display()))?;

    let mut scheduler = Scheduler::new(pipeline, analyser, ManualClock::default());
    scheduler.play();
    let mut ticks = FixedStepTicks::new(args.fps, Some(total_frames));

    log::info!("rendering {total_frames} frames at {} fps", args.fps);
    while let Some(now) = ticks.next_tick() {
        scheduler.source_mut().seek(now);
        scheduler.clock_mut().set_time(now);
        let Some(info) = scheduler.step(now) else {
            continue;
        };
        let path = args.out.join(format!("frame_{:05}.png", info.frame_index));
        scheduler
            .pipeline()
            .canvas()
            .to_rgba_image()
            .save(&path)
            .with_context(|| format!("write '{}'", path.display()))?;
        if info.frame_index % 100 == 0 {
            log::info!("frame {}/{}", info.frame_index, total_frames);
        }
    }
    log::info!("wrote {} frames to {}", scheduler.frame_index(), args.out.display());
    Ok(())
}
