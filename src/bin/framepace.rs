use std::{
    fs,
    io::{self, Read},
    path::{Path, PathBuf},
    sync::Arc,
    time::Duration,
};

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use colored::Colorize;
use env_logger::Env;
use framepace::{
    AnalysisEvent, AnalysisOptions, FfmpegLogLevel, FramePaceError, FrameTimingReport, JsonSink,
    LogObserver, PacketPolicy, RenderSink, TextSummarySink, TimingObserver,
};
use indicatif::{ProgressBar, ProgressStyle};

const CLI_AFTER_HELP: &str = "Examples:\n  framepace analyze input.mp4\n  framepace analyze input.mp4 --json --out timing.json\n  ffprobe -show_streams -show_packets -of json input.mp4 > probe.json\n  framepace analyze probe.json --from-ffprobe --track 0\n  framepace batch a.mp4 b.mkv c.mov\n  framepace completions zsh > _framepace";

#[derive(Debug, Parser)]
#[command(
    name = "framepace",
    version,
    about = "Inspect frame durations, DTS/PTS intervals, and frame rate of video files",
    after_help = CLI_AFTER_HELP
)]
struct Cli {
    #[command(flatten)]
    global: GlobalOptions,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Parser, Clone, Default)]
struct GlobalOptions {
    /// Show debug logging, including each analysis stage.
    #[arg(long, global = true)]
    verbose: bool,

    /// Show a spinner while packets are read.
    #[arg(long, global = true)]
    progress: bool,

    /// Allow overwriting existing output files.
    #[arg(long, global = true)]
    overwrite: bool,

    /// FFmpeg log level (quiet, panic, fatal, error, warning, info, verbose, debug, trace).
    #[arg(long, global = true)]
    log_level: Option<String>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Analyse the frame timing of one file.
    #[command(
        about = "Analyse frame timing",
        after_help = "Examples:\n  framepace analyze input.mp4\n  framepace analyze input.mkv --track 1 --json\n  framepace analyze probe.json --from-ffprobe --skip-incomplete"
    )]
    Analyze {
        /// Input media path, or an ffprobe JSON document with --from-ffprobe ("-" for stdin).
        input: String,

        /// Output the report as JSON.
        #[arg(long)]
        json: bool,

        /// Write output to this file instead of stdout.
        #[arg(long)]
        out: Option<PathBuf>,

        /// Treat the input as `ffprobe -of json` output instead of a media file.
        #[arg(long)]
        from_ffprobe: bool,

        /// Drop packets with missing timestamps instead of failing.
        #[arg(long)]
        skip_incomplete: bool,

        /// Zero-based video track to analyse (defaults to the best stream, or
        /// the first video stream of an ffprobe document).
        #[arg(long)]
        track: Option<usize>,
    },

    /// Print a one-line summary for each of several files.
    #[command(about = "Summarise frame timing for many files")]
    Batch {
        /// Input media paths.
        #[arg(required = true)]
        inputs: Vec<String>,

        /// Drop packets with missing timestamps instead of failing.
        #[arg(long)]
        skip_incomplete: bool,
    },

    /// Generate shell completion scripts.
    #[command(about = "Generate shell completions")]
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Forwards stage events to the log and ticks an optional spinner.
struct CliObserver {
    spinner: Option<ProgressBar>,
}

impl CliObserver {
    fn new(show_spinner: bool) -> Self {
        let spinner = show_spinner.then(|| {
            let bar = ProgressBar::new_spinner();
            if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
                bar.set_style(style);
            }
            bar.enable_steady_tick(Duration::from_millis(100));
            bar.set_message("reading packets");
            bar
        });
        Self { spinner }
    }

    fn finish(&self) {
        if let Some(spinner) = &self.spinner {
            spinner.finish_and_clear();
        }
    }
}

impl TimingObserver for CliObserver {
    fn on_event(&self, event: &AnalysisEvent) {
        LogObserver.on_event(event);
        if let (Some(spinner), AnalysisEvent::PacketsRead { count }) = (&self.spinner, event) {
            spinner.set_message(format!("{count} packets read"));
        }
    }
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_filter))
        .format_timestamp_secs()
        .init();
}

fn apply_global_options(global: &GlobalOptions) -> Result<(), Box<dyn std::error::Error>> {
    init_logging(global.verbose);

    if let Some(level) = &global.log_level {
        let parsed: FfmpegLogLevel = level.parse()?;
        framepace::set_ffmpeg_log_level(parsed);
    }

    Ok(())
}

fn packet_policy(skip_incomplete: bool) -> PacketPolicy {
    if skip_incomplete {
        PacketPolicy::SkipIncomplete
    } else {
        PacketPolicy::Strict
    }
}

fn ensure_writable_path(path: &Path, overwrite: bool) -> Result<(), Box<dyn std::error::Error>> {
    if path.exists() {
        if overwrite {
            eprintln!(
                "{} {}",
                "warning:".yellow().bold(),
                format!("overwriting {}", path.display()).yellow()
            );
        } else {
            return Err(format!(
                "output already exists: {} (use --overwrite to replace)",
                path.display()
            )
            .into());
        }
    }
    Ok(())
}

fn read_ffprobe_document(input: &str) -> Result<String, Box<dyn std::error::Error>> {
    if input == "-" {
        let mut document = String::new();
        io::stdin().read_to_string(&mut document)?;
        Ok(document)
    } else {
        Ok(fs::read_to_string(input)?)
    }
}

/// The `--track` option selects among the document's video streams.
fn analyze_ffprobe_document(
    document: &str,
    options: &AnalysisOptions,
) -> Result<FrameTimingReport, FramePaceError> {
    let output = framepace::probe_output_from_str_for_track(document, options.video_track())?;
    framepace::analyze_probe_output(output, options)
}

fn render_report(
    report: &FrameTimingReport,
    json: bool,
    out: Option<&Path>,
    overwrite: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    match out {
        Some(path) => {
            ensure_writable_path(path, overwrite)?;
            let file = io::BufWriter::new(fs::File::create(path)?);
            if json {
                JsonSink::new(file).render(report)?;
            } else {
                TextSummarySink::new(file).render(report)?;
            }
            println!(
                "{} {}",
                "success:".green().bold(),
                format!("Wrote frame timing to {}", path.display()).green()
            );
        }
        None => {
            let stdout = io::stdout().lock();
            if json {
                JsonSink::new(stdout).render(report)?;
            } else {
                TextSummarySink::new(stdout).render(report)?;
            }
        }
    }
    Ok(())
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    apply_global_options(&cli.global)?;

    match cli.command {
        Commands::Analyze {
            input,
            json,
            out,
            from_ffprobe,
            skip_incomplete,
            track,
        } => {
            let observer = Arc::new(CliObserver::new(cli.global.progress && !from_ffprobe));
            let mut options = AnalysisOptions::new()
                .with_observer(observer.clone())
                .with_packet_policy(packet_policy(skip_incomplete));
            if let Some(track) = track {
                options = options.with_video_track(track);
            }

            let result = if from_ffprobe {
                let document = read_ffprobe_document(&input)?;
                analyze_ffprobe_document(&document, &options)
            } else {
                framepace::analyze_file(&input, &options)
            };
            observer.finish();

            render_report(&result?, json, out.as_deref(), cli.global.overwrite)?;
        }
        Commands::Batch {
            inputs,
            skip_incomplete,
        } => {
            let options = AnalysisOptions::new()
                .with_observer(Arc::new(LogObserver))
                .with_packet_policy(packet_policy(skip_incomplete));

            #[cfg(feature = "rayon")]
            let results = framepace::analyze_many_parallel(&inputs, &options);
            #[cfg(not(feature = "rayon"))]
            let results = framepace::analyze_many(&inputs, &options);

            let mut failures = 0usize;
            for (input, result) in inputs.iter().zip(results) {
                match result {
                    Ok(report) => println!(
                        "{} {} frames, {:.3} ms average, {} fps nominal",
                        format!("{input}:").bold(),
                        report.frame_count(),
                        report.average_frame_duration_ms(),
                        report.nominal_fps(),
                    ),
                    Err(error) => {
                        failures += 1;
                        eprintln!("{} {}", format!("{input}:").red().bold(), error);
                    }
                }
            }

            if failures > 0 {
                return Err(format!("{failures} of {} file(s) failed", inputs.len()).into());
            }
        }
        Commands::Completions { shell } => {
            let mut command = Cli::command();
            clap_complete::generate(shell, &mut command, "framepace", &mut io::stdout());
        }
    }

    Ok(())
}

fn main() {
    if let Err(error) = run() {
        eprintln!("{} {error}", "error:".red().bold());
        std::process::exit(1);
    }
}
