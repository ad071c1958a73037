use std::io::{BufRead, BufReader, Read};
use std::path::Path;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread::{self, JoinHandle};

use crossbeam_channel::Sender;
use tracing::{debug, warn};

use crate::device::DeviceError;

/// Lanza un hilo que lee líneas de `source` y las envía por el canal.
/// El hilo termina al llegar a EOF o cuando el receptor se cierra.
pub fn spawn_line_reader<R>(source: R, tx: Sender<String>) -> JoinHandle<()>
where
    R: Read + Send + 'static,
{
    thread::spawn(move || {
        for line in BufReader::new(source).lines() {
            match line {
                Ok(line) => {
                    if tx.send(line).is_err() {
                        debug!("Receptor cerrado, fin del lector");
                        return;
                    }
                }
                Err(e) => {
                    warn!("Error leyendo eventos: {}", e);
                    return;
                }
            }
        }
    })
}

/// Espera al hilo lector. Un pánico se registra y se devuelve `false`.
pub fn join_reader(reader: JoinHandle<()>) -> bool {
    let clean = reader.join().is_ok();
    if !clean {
        warn!("El hilo lector terminó con pánico");
    }
    clean
}

/// Lanza `libinput debug-events` sobre `device` y reenvía su salida por `tx`
pub fn spawn_capture(device: &Path, tx: Sender<String>) -> Result<Capture, DeviceError> {
    Capture::spawn_command(Capture::command_for(device), tx)
}

/// Proceso `libinput debug-events` con su hilo lector
pub struct Capture {
    child: Child,
    reader: JoinHandle<()>,
}

impl Capture {
    /// `stdbuf -oL` fuerza salida por líneas aunque stdout sea una tubería
    pub fn command_for(device: &Path) -> Command {
        let mut cmd = Command::new("stdbuf");
        cmd.args(["-oL", "--", "libinput", "debug-events", "--device"])
            .arg(device);
        cmd
    }

    pub fn spawn_command(mut cmd: Command, tx: Sender<String>) -> Result<Self, DeviceError> {
        let program = format!("{:?}", cmd.get_program());
        let mut child = cmd
            .stdout(Stdio::piped())
            .stdin(Stdio::null())
            .spawn()
            .map_err(|source| DeviceError::Spawn {
                program: program.clone(),
                source,
            })?;

        let stdout = child.stdout.take().ok_or_else(|| DeviceError::Spawn {
            program,
            source: std::io::Error::new(std::io::ErrorKind::BrokenPipe, "sin stdout"),
        })?;
        let reader = spawn_line_reader(stdout, tx);

        Ok(Self { child, reader })
    }

    /// Espera a que termine la captura y devuelve su código de salida
    pub fn finish(mut self) -> Result<ExitStatus, DeviceError> {
        let status = self.child.wait()?;
        join_reader(self.reader);
        Ok(status)
    }
}
