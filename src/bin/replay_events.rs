use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use gestos::action::{ActionError, ActionSink, CommandRunner};
use gestos::command_table::{config_search_paths, locate_config, CommandTable};
use gestos::demux::{DemuxError, EventDemux};
use gestos::dispatch::DispatchTrace;

/// Reproduce una captura de `libinput debug-events` contra la configuración
#[derive(Parser, Debug)]
#[command(name = "replay_events")]
struct ReplayOptions {
    /// Captura guardada de libinput debug-events
    transcript: PathBuf,

    /// Fichero de configuración
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Ejecuta de verdad los comandos resueltos
    #[arg(long)]
    execute: bool,
}

/// Imprime cada traza y, si se pide, ejecuta los comandos
struct ReplaySink {
    runner: Option<CommandRunner>,
}

impl ActionSink for ReplaySink {
    fn execute(&mut self, argv: &[String]) -> Result<(), ActionError> {
        println!("  ▶ {}", argv.join(" "));
        match self.runner.as_mut() {
            Some(runner) => runner.execute(argv),
            None => Ok(()),
        }
    }

    fn trace(&mut self, trace: &DispatchTrace<'_>) {
        println!("  · {}", trace);
    }
}

fn main() -> Result<()> {
    let opts = ReplayOptions::parse();

    let config_path = match opts.config {
        Some(path) => path,
        None => locate_config(&config_search_paths())?,
    };
    let table = CommandTable::load(&config_path)
        .with_context(|| format!("Configuración inválida en {:?}", config_path))?;
    let text = fs::read_to_string(&opts.transcript)
        .with_context(|| format!("No se pudo leer {:?}", opts.transcript))?;

    println!(
        "🎞️  Reproduciendo {:?} con {} gestos de {:?}",
        opts.transcript,
        table.len(),
        config_path
    );

    let sink = ReplaySink {
        runner: opts.execute.then(CommandRunner::new),
    };
    let mut demux = EventDemux::new(&table, sink, !opts.execute);

    for (idx, line) in text.lines().enumerate() {
        match demux.feed_line(line) {
            Ok(Some(motion)) => println!("{:>5}: ✅ {}", idx + 1, motion),
            Ok(None) => {}
            Err(DemuxError::Anomaly(err)) => println!("{:>5}: ⚠️  {}", idx + 1, err),
            Err(err) => println!("{:>5}: ❌ {}", idx + 1, err),
        }
    }

    let stats = demux.stats();
    println!("\nResumen:");
    println!("  líneas       {:>6}", stats.lines);
    println!("  gestos       {:>6}", stats.gestures);
    println!("  disparados   {:>6}", stats.dispatched);
    println!("  anomalías    {:>6}", stats.anomalies);
    println!("  fallos       {:>6}", stats.action_failures);

    Ok(())
}
