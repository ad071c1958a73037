/*
Gestos de touchpad en tiempo real

1. Carga la tabla (dedos, movimiento) → comando desde gestos.conf
2. Localiza el touchpad (libinput list-devices, o /dev/input como respaldo)
3. Lanza `libinput debug-events` y clasifica cada swipe / pinch
4. Ejecuta como mucho un comando por gesto

Para probar sin ejecutar nada:
    ./target/debug/gestos --dry-run -v

Para reproducir una captura guardada:
    libinput debug-events --device /dev/input/event6 > captura.txt
    ./target/debug/gestos --dry-run --events captura.txt
*/

use std::fs::File;
use std::io;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use crossbeam_channel::bounded;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use gestos::action::CommandRunner;
use gestos::capture::{join_reader, spawn_capture, spawn_line_reader};
use gestos::command_table::{config_search_paths, locate_config, CommandTable};
use gestos::demux::EventDemux;
use gestos::device::find_touchpad;

const LINE_QUEUE: usize = 256;

#[derive(Parser, Debug)]
#[command(name = "gestos", version, about = "Acciones para gestos de touchpad")]
struct Cli {
    /// Fichero de configuración (por defecto $XDG_CONFIG_HOME/gestos.conf, ~/.config/gestos.conf o /etc/gestos.conf)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Modo diagnóstico: traza cada gesto pero no ejecuta comandos
    #[arg(short, long)]
    dry_run: bool,

    /// Salida detallada (nivel debug)
    #[arg(short, long)]
    verbose: bool,

    /// Muestra los gestos configurados y sale
    #[arg(short, long)]
    list: bool,

    /// Dispositivo de entrada, p.ej. /dev/input/event6
    #[arg(long)]
    device: Option<PathBuf>,

    /// Lee eventos de un fichero ('-' = stdin) en lugar de lanzar libinput
    #[arg(long, value_name = "FILE")]
    events: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    let config_path = match &cli.config {
        Some(path) => path.clone(),
        None => locate_config(&config_search_paths())?,
    };
    let table = CommandTable::load(&config_path)
        .with_context(|| format!("Configuración inválida en {:?}", config_path))?;
    info!("{} gestos cargados de {:?}", table.len(), config_path);

    if cli.list {
        for (fingers, motion, argv) in table.iter() {
            println!("{} {:<13} {}", fingers, motion, argv.join(" "));
        }
        return Ok(());
    }
    if table.is_empty() {
        warn!("La configuración no define ningún gesto");
    }

    let (tx, rx) = bounded::<String>(LINE_QUEUE);
    let mut demux = EventDemux::new(&table, CommandRunner::new(), cli.dry_run);
    if cli.dry_run {
        info!("Modo diagnóstico: no se ejecutará ningún comando");
    }

    if let Some(events) = &cli.events {
        let reader = if events.as_os_str() == "-" {
            spawn_line_reader(io::stdin(), tx)
        } else {
            let file =
                File::open(events).with_context(|| format!("No se pudo abrir {:?}", events))?;
            spawn_line_reader(file, tx)
        };

        let stats = demux.run(rx.iter());
        join_reader(reader);
        info!("Fin de {:?}: {:?}", events, stats);
        return Ok(());
    }

    let device = match cli.device {
        Some(path) => path,
        None => find_touchpad().context("No se pudo determinar el touchpad")?,
    };
    info!("Escuchando gestos en {}", device.display());

    let capture = spawn_capture(&device, tx)
        .with_context(|| format!("No se pudo iniciar libinput en {}", device.display()))?;
    let stats = demux.run(rx.iter());
    let status = capture.finish()?;
    info!("Captura terminada: {:?}", stats);

    bail!("libinput debug-events terminó inesperadamente ({})", status)
}
