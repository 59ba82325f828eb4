//! Murmur - mood-driven ambient tone synthesis

use anyhow::{bail, Context, Result};
use clap::Parser;
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::Write;
use std::sync::mpsc;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use murmur::catalog::{Catalog, MoodPreset, SuggestionAdvisor, SuggestionPopup};
use murmur::config::{self, MurmurConfig};
use murmur::engine::{
    default_device_name, list_output_devices, AmbientController, AmbientEngine, CpalDevice,
    OfflineDevice, Recorder,
};

mod cli;

use cli::{Cli, Commands, PresetChoice};

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "murmur=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Play { choice, duration } => {
            let cfg = config::load_or_default(&cli.config)?;
            let catalog = Arc::new(Catalog::from_config(&cfg.catalog)?);
            let preset = resolve_preset(&catalog, &choice, &cfg)?;

            let device = match CpalDevice::open(cfg.audio.device.as_deref(), cfg.master.volume) {
                Ok(device) => device,
                Err(e) => {
                    warn!(error = %e, "no audio output, nothing to play");
                    println!("Audio unavailable: {}", e);
                    return Ok(());
                }
            };

            println!("Playing {} ({}) on {}", preset.display_name, preset.id, device.name());
            println!("  Sample rate: {} Hz", device.sample_rate());
            println!("  Tones: {}", preset.tones.len());
            println!("  Fade-in: {} ms", cfg.master.fade_in_ms);
            println!("  Master volume: {:.0}%", cfg.master.volume * 100.0);

            let engine = AmbientEngine::new(device, Arc::clone(&catalog))
                .with_fade_in(cfg.master.fade_in());
            let mut controller = AmbientController::new(engine);

            let rt = tokio::runtime::Runtime::new()?;
            let playing = rt.block_on(async {
                controller.select(preset).await;
                controller.toggle().await
            });
            if !playing {
                println!("Audio unavailable, staying silent.");
                return Ok(());
            }

            let (tx, rx) = mpsc::channel();
            ctrlc::set_handler(move || {
                let _ = tx.send(());
            })
            .context("failed to install Ctrl-C handler")?;

            match duration {
                Some(secs) => {
                    println!("\nPlaying for {}s (Ctrl-C to stop early)...", secs);
                    let _ = rx.recv_timeout(Duration::from_secs(secs));
                }
                None => {
                    println!("\nPress Ctrl-C to stop.");
                    let _ = rx.recv();
                }
            }

            rt.block_on(controller.toggle());
            println!("Stopped.");
        }

        Commands::Record {
            choice,
            output,
            duration,
        } => {
            let cfg = config::load_or_default(&cli.config)?;
            let catalog = Arc::new(Catalog::from_config(&cfg.catalog)?);
            let preset = resolve_preset(&catalog, &choice, &cfg)?;
            let sample_rate = cfg.audio.sample_rate;

            println!(
                "Recording {} ({}) for {}s to {:?}...",
                preset.display_name, preset.id, duration, output
            );

            let device = OfflineDevice::new(sample_rate, cfg.master.volume);
            let mut engine = AmbientEngine::new(device, catalog).with_fade_in(cfg.master.fade_in());

            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(engine.start(&preset))?;

            let mut recorder = Recorder::new(&output, sample_rate)?;
            let mut last_second = u64::MAX;
            recorder.capture(
                engine.device(),
                Duration::from_secs(duration),
                cfg.audio.buffer_size,
                |written| {
                    let second = written / sample_rate as u64;
                    if second != last_second {
                        last_second = second;
                        print!("\r  Progress: {}s / {}s", second, duration);
                        let _ = std::io::stdout().flush();
                    }
                },
            )?;
            engine.stop();

            let secs = recorder.duration_secs();
            recorder.finalize()?;
            println!("\nRecorded {:.1}s to {:?}", secs, output);
            info!(path = ?output, seconds = secs, "recording finished");
        }

        Commands::Presets { json } => {
            let cfg = config::load_or_default(&cli.config)?;
            let catalog = Catalog::from_config(&cfg.catalog)?;

            if json {
                let listing = CatalogListing {
                    fallback: &catalog.fallback().id,
                    routes: catalog.routes().into_iter().collect(),
                    presets: catalog.presets(),
                };
                println!("{}", serde_json::to_string_pretty(&listing)?);
                return Ok(());
            }

            println!("Presets:");
            for preset in catalog.presets() {
                println!(
                    "  {:<10} {:<16} {} tones  {}",
                    preset.id,
                    preset.display_name,
                    preset.tones.len(),
                    preset.description
                );
                for tone in &preset.tones {
                    print!(
                        "      {:>8.2} Hz  {:<8}  gain {:.2}",
                        tone.frequency_hz,
                        tone.waveform.as_str(),
                        tone.relative_gain
                    );
                    if let Some(cutoff) = tone.cutoff_hz {
                        print!("  low-pass {:.0} Hz", cutoff);
                    }
                    println!();
                }
            }

            println!("\nSection routes:");
            for (section, id) in catalog.routes() {
                println!("  {:<12} -> {}", section, id);
            }
            println!("  {:<12} -> {}", "(other)", catalog.fallback().id);
        }

        Commands::Suggest { section, current } => {
            let cfg = config::load_or_default(&cli.config)?;
            let catalog = Arc::new(Catalog::from_config(&cfg.catalog)?);
            let advisor = SuggestionAdvisor::from_config(catalog, &cfg.suggestions);
            let popup = SuggestionPopup::from_config(&cfg.suggestions);

            println!("Analyzing mood for section '{}'...", section);
            let rt = tokio::runtime::Runtime::new()?;
            let suggestion = rt.block_on(advisor.analyze(&section, current.as_deref()));

            println!("{}", suggestion.message());
            if suggestion.is_new() {
                println!(
                    "  (the widget shows this for {}s)",
                    popup.dismiss_after().as_secs_f64()
                );
            } else {
                println!("  Already playing this preset.");
            }
        }

        Commands::Devices => {
            match default_device_name() {
                Some(name) => println!("Default output: {}\n", name),
                None => println!("No default output device.\n"),
            }

            let devices = list_output_devices();
            if devices.is_empty() {
                println!("No output devices found.");
            } else {
                println!("Output devices:");
                for (name, config) in devices {
                    println!(
                        "  - {} ({} Hz, {} ch)",
                        name, config.sample_rate.0, config.channels
                    );
                }
            }
        }

        Commands::Check => {
            println!("Checking configuration at {:?}...", cli.config);

            match config::load_config(&cli.config) {
                Ok(cfg) => {
                    println!("Configuration is valid!");
                    print_summary(&cfg)?;
                }
                Err(e) => {
                    println!("Configuration is invalid: {:#}", e);
                    std::process::exit(1);
                }
            }
        }

        Commands::Init => {
            let example_config = include_str!("../murmur.example.yaml");

            if cli.config.exists() {
                println!("{:?} already exists. Not overwriting.", cli.config);
            } else {
                std::fs::write(&cli.config, example_config)?;
                println!("Created {:?} with example configuration.", cli.config);
            }
        }
    }

    Ok(())
}

#[derive(Serialize)]
struct CatalogListing<'a> {
    fallback: &'a str,
    routes: BTreeMap<&'a str, &'a str>,
    presets: &'a [MoodPreset],
}

/// Pick the preset named on the command line, or the one suggested for a section.
/// With neither, the fallback preset is used.
fn resolve_preset(catalog: &Catalog, choice: &PresetChoice, cfg: &MurmurConfig) -> Result<MoodPreset> {
    if let Some(id) = &choice.preset {
        return match catalog.get(id) {
            Some(preset) => Ok(preset.clone()),
            None => {
                let known: Vec<&str> = catalog.presets().iter().map(|p| p.id.as_str()).collect();
                bail!("Unknown preset '{}' (known: {})", id, known.join(", "))
            }
        };
    }

    if let Some(section) = &choice.section {
        let advisor = SuggestionAdvisor::from_config(Arc::new(catalog.clone()), &cfg.suggestions);
        let suggestion = advisor.suggest_now(section, None);
        println!("{}", suggestion.message());
        return Ok(suggestion.preset);
    }

    Ok(catalog.fallback().clone())
}

fn print_summary(cfg: &MurmurConfig) -> Result<()> {
    let catalog = Catalog::from_config(&cfg.catalog)?;

    println!("  Sample rate: {} Hz", cfg.audio.sample_rate);
    println!("  Buffer size: {}", cfg.audio.buffer_size);
    println!(
        "  Device: {}",
        cfg.audio.device.as_deref().unwrap_or("(default)")
    );
    println!("  Master volume: {:.0}%", cfg.master.volume * 100.0);
    println!("  Fade-in: {} ms", cfg.master.fade_in_ms);
    println!(
        "  Suggestions: {} ms analysis, {} ms popup",
        cfg.suggestions.analysis_delay_ms, cfg.suggestions.dismiss_after_ms
    );
    println!("  Presets: {}", catalog.len());
    for preset in catalog.presets() {
        println!("    - {} ({} tones)", preset.id, preset.tones.len());
    }
    println!("  Fallback: {}", catalog.fallback().id);
    Ok(())
}
