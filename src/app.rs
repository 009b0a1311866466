use crate::cli::{Cli, Commands, ConvertArgs};
use mkvconv::config::{CONFIG_FILE, Config, ConfigStore};
use mkvconv::engine::{self, Encoder, GpuInfo, QueueController, QueueEntry, WorkerMessage};
use mkvconv::ui;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process;

pub fn run(cli: Cli) {
    let store = ConfigStore::new(cli.config.unwrap_or_else(|| PathBuf::from(CONFIG_FILE)));

    // Handle subcommands first
    if let Some(command) = cli.command {
        match command {
            Commands::Convert(args) => handle_convert(&store, args),
            Commands::DryRun(args) => handle_dry_run(&store, args),
            Commands::Probe { file, ffmpeg } => handle_probe(&store, file, ffmpeg),
            Commands::Gpu => handle_gpu(&store),
            Commands::CheckFfmpeg { ffmpeg } => handle_check_ffmpeg(&store, ffmpeg),
            Commands::InitConfig => handle_init_config(&store),
        }
        return;
    }

    // Launch TUI (default behavior)
    if let Err(e) = ui::run_ui(store) {
        eprintln!("Error running UI: {}", e);
        process::exit(1);
    }
}

/// ffmpeg to use for one-off commands: flag, then config, then PATH lookup
fn resolve_ffmpeg(flag: Option<String>, config: &Config) -> PathBuf {
    match flag {
        Some(path) => PathBuf::from(path),
        None if !config.last_ffmpeg_path.is_empty() => PathBuf::from(&config.last_ffmpeg_path),
        None => PathBuf::from("ffmpeg"),
    }
}

/// Load config for a command that saves it. An unreadable file is kept as a backup.
fn load_for_update_or_exit(store: &ConfigStore) -> Config {
    match store.load_for_update() {
        Ok((config, backup)) => {
            if let Some(backup) = backup {
                eprintln!(
                    "Warning: {} could not be read and was moved to {}",
                    store.path().display(),
                    backup.display()
                );
            }
            config
        }
        Err(e) => {
            eprintln!("Error: {:#}", e);
            process::exit(1);
        }
    }
}

/// Load config, apply command-line overrides and persist them
fn load_with_overrides(store: &ConfigStore, args: &ConvertArgs) -> Config {
    let mut config = load_for_update_or_exit(store);
    if let Some(dir) = &args.output_dir {
        config.set_output_dir(dir);
    }
    if let Some(ffmpeg) = &args.ffmpeg {
        config.set_ffmpeg_path(ffmpeg);
    }
    if let Some(first) = args.paths.first() {
        if first.is_file() {
            config.record_input_file(first);
        }
    }
    save_or_warn(store, &config);
    config
}

fn save_or_warn(store: &ConfigStore, config: &Config) {
    if let Err(e) = store.save(config) {
        eprintln!("Warning: {:#}", e);
    }
}

/// Detect the GPU and remember the vendor in config
fn detect_and_store_gpu(store: &ConfigStore, config: &mut Config) -> GpuInfo {
    let gpu = engine::detect_gpu();
    config.set_gpu_vendor(gpu.vendor);
    save_or_warn(store, config);
    gpu
}

fn expand_or_exit(paths: &[PathBuf]) -> Vec<PathBuf> {
    match engine::expand_inputs(paths) {
        Ok(files) => files,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            process::exit(1);
        }
    }
}

fn handle_convert(store: &ConfigStore, args: ConvertArgs) {
    let mut config = load_with_overrides(store, &args);
    let files = expand_or_exit(&args.paths);
    if files.is_empty() {
        println!("No videos in the queue to convert.");
        process::exit(0);
    }

    let gpu = detect_and_store_gpu(store, &mut config);
    println!("Detected GPU: {}", gpu.label());

    let mut queue = QueueController::new(PathBuf::from(engine::ERROR_LOG_FILE));
    for file in files {
        queue.enqueue(file);
    }
    let settings = config.settings(gpu.vendor);

    let result = queue.run_to_completion(&settings, |msg| match msg {
        WorkerMessage::JobStarted { command, .. } => {
            println!("{}", command);
        }
        WorkerMessage::Output {
            progress_pct: Some(pct),
            ..
        } => {
            print!("\rProgress: {:.2}%", pct);
            let _ = io::stdout().flush();
        }
        WorkerMessage::Output { .. } => {}
        WorkerMessage::JobCompleted { .. } => {
            println!("\rProgress: 100.00%");
            println!("Video conversion completed successfully!");
        }
        WorkerMessage::JobFailed { error, .. } => {
            println!();
            eprintln!("{}", error);
            eprintln!("Details written to {}", engine::ERROR_LOG_FILE);
        }
    });

    match result {
        Ok(summary) => {
            println!(
                "Converted: {}, failed: {}",
                summary.completed, summary.failed
            );
            if summary.failed > 0 {
                process::exit(1);
            }
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}

fn handle_dry_run(store: &ConfigStore, args: ConvertArgs) {
    let mut config = load_with_overrides(store, &args);
    let files = expand_or_exit(&args.paths);
    let gpu = detect_and_store_gpu(store, &mut config);
    println!("Dry run: building ffmpeg commands ({})", gpu.label());

    let settings = config.settings(gpu.vendor);
    let mut failures = 0;
    for file in files {
        let entry = QueueEntry::new(file);
        match engine::prepare_job(&entry, &settings) {
            Ok(job) => println!("{}", engine::format_cmd(&engine::build_convert_cmd(&job))),
            Err(e) => {
                eprintln!("{}: {}", entry.input_path.display(), e);
                failures += 1;
            }
        }
    }

    if failures > 0 {
        process::exit(1);
    }
}

fn handle_probe(store: &ConfigStore, file: PathBuf, ffmpeg: Option<String>) {
    let ffmpeg = resolve_ffmpeg(ffmpeg, &store.load());

    match engine::probe_input(&ffmpeg, &file) {
        Ok(info) => {
            println!("Video streams: {}", info.video_streams.len());
            for stream in &info.video_streams {
                println!("  {}", stream);
            }
            println!("Audio streams: {}", info.audio_streams.len());
            for stream in &info.audio_streams {
                println!("  {}", stream);
            }
            match info.duration {
                Some(duration) => println!("Duration: {:.2} seconds", duration),
                None => println!("Duration: unavailable"),
            }
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}

fn handle_gpu(store: &ConfigStore) {
    let mut config = load_for_update_or_exit(store);
    let gpu = detect_and_store_gpu(store, &mut config);

    println!("GPU: {}", gpu.label());
    match Encoder::for_vendor(gpu.vendor) {
        Some(encoder) => println!(
            "Encoder: {} ({})",
            encoder.ffmpeg_name(),
            encoder.display_name()
        ),
        None => println!("Encoder: none (unsupported GPU type)"),
    }
}

fn handle_check_ffmpeg(store: &ConfigStore, ffmpeg: Option<String>) {
    let ffmpeg = resolve_ffmpeg(ffmpeg, &store.load());

    match engine::ffmpeg_version(&ffmpeg) {
        Ok(version) => {
            println!("ffmpeg found: {}", version);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("Error: {:#}", e);
            process::exit(1);
        }
    }
}

fn handle_init_config(store: &ConfigStore) {
    match store.try_load() {
        Ok(Some(cfg)) => {
            println!("Config loaded successfully from {}", display_path(store.path()));
            println!("{:#?}", cfg);
        }
        Ok(None) => {
            println!("Config missing, creating an empty one...");
            if let Err(err) = store.save(&Config::default()) {
                eprintln!("Failed to save default config: {:#}", err);
                process::exit(1);
            }
            println!("Default config saved to {}", display_path(store.path()));
        }
        Err(e) => {
            // Left in place: the dashboard and convert fall back to empty preferences
            eprintln!("Config invalid: {:#}", e);
            process::exit(1);
        }
    }
}

fn display_path(path: &Path) -> String {
    std::fs::canonicalize(path)
        .unwrap_or_else(|_| path.to_path_buf())
        .display()
        .to_string()
}
