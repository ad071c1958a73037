use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use evdev::Device;
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Error, Debug)]
pub enum DeviceError {
    #[error("No se pudo lanzar {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} terminó con {status}")]
    ToolFailed { program: String, status: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("No se encontró ningún touchpad con soporte de gestos")]
    NotFound,
}

/// Busca en la salida de `libinput list-devices` el primer dispositivo con
/// capacidad `gesture` y devuelve su ruta `Kernel:`.
pub fn parse_device_listing(text: &str) -> Option<PathBuf> {
    let mut kernel: Option<&str> = None;
    let mut has_gesture = false;

    for line in text.lines().chain(std::iter::once("")) {
        let line = line.trim();
        if line.is_empty() {
            if let (Some(path), true) = (kernel, has_gesture) {
                return Some(PathBuf::from(path));
            }
            kernel = None;
            has_gesture = false;
            continue;
        }

        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        match key.trim() {
            "Kernel" => kernel = Some(value.trim()),
            "Capabilities" => {
                has_gesture = value.split_whitespace().any(|cap| cap == "gesture");
            }
            _ => {}
        }
    }

    None
}

/// Ejecuta `libinput list-devices` y devuelve su salida
fn list_devices() -> Result<String, DeviceError> {
    let program = "libinput";
    let output = Command::new(program)
        .arg("list-devices")
        .output()
        .map_err(|source| DeviceError::Spawn {
            program: program.to_string(),
            source,
        })?;

    if !output.status.success() {
        return Err(DeviceError::ToolFailed {
            program: format!("{} list-devices", program),
            status: output.status.to_string(),
        });
    }
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Alternativa sin libinput: recorre /dev/input/event* buscando un
/// dispositivo cuyo nombre contenga "touchpad".
pub fn scan_input_devices(dir: impl AsRef<Path>) -> Result<Option<PathBuf>, DeviceError> {
    let mut candidates: Vec<PathBuf> = fs::read_dir(dir.as_ref())?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.file_name()
                .map(|name| name.to_string_lossy().starts_with("event"))
                .unwrap_or(false)
        })
        .collect();
    candidates.sort();

    for path in candidates {
        let Ok(device) = Device::open(&path) else {
            continue;
        };
        if let Some(name) = device.name() {
            if name.to_lowercase().contains("touchpad") {
                info!("Touchpad encontrado: {} ({})", name, path.display());
                return Ok(Some(path));
            }
        }
    }
    Ok(None)
}

/// Localiza el touchpad: primero con libinput, después escaneando evdev
pub fn find_touchpad() -> Result<PathBuf, DeviceError> {
    match list_devices() {
        Ok(listing) => {
            if let Some(path) = parse_device_listing(&listing) {
                info!("Touchpad con gestos: {}", path.display());
                return Ok(path);
            }
            debug!("libinput list-devices no muestra dispositivos con gestos");
        }
        Err(e) => warn!("{}; probando /dev/input directamente", e),
    }

    scan_input_devices("/dev/input")?.ok_or(DeviceError::NotFound)
}

#[cfg(test)]
mod tests {
    use super::*;

    const LISTING: &str = "\
Device:           Power Button
Kernel:           /dev/input/event2
Group:            2
Seat:             seat0, default
Capabilities:     keyboard

Device:           SynPS/2 Synaptics TouchPad
Kernel:           /dev/input/event6
Group:            8
Seat:             seat0, default
Size:             70x50mm
Capabilities:     pointer gesture
Tap-to-click:     disabled

Device:           Other TouchPad
Kernel:           /dev/input/event9
Capabilities:     pointer gesture
";

    #[test]
    fn first_gesture_device_wins() {
        assert_eq!(
            parse_device_listing(LISTING),
            Some(PathBuf::from("/dev/input/event6"))
        );
    }

    #[test]
    fn last_block_without_trailing_blank_line() {
        let text = "Device: Touchpad\nKernel: /dev/input/event11\nCapabilities: pointer gesture";
        assert_eq!(
            parse_device_listing(text),
            Some(PathBuf::from("/dev/input/event11"))
        );
    }

    #[test]
    fn no_gesture_capability_means_none() {
        let text = "Device: Mouse\nKernel: /dev/input/event3\nCapabilities: pointer\n\n";
        assert_eq!(parse_device_listing(text), None);
        assert_eq!(parse_device_listing(""), None);
    }

    #[test]
    fn scanning_ignores_non_event_entries() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("mice"), b"").unwrap();
        fs::write(dir.path().join("event0"), b"").unwrap();
        // Ficheros normales: evdev no puede abrirlos como dispositivo
        assert_eq!(scan_input_devices(dir.path()).unwrap(), None);
    }
}
