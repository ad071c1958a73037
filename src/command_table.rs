use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::types::{Motion, UnknownMotion};

pub const CONFIG_FILE_NAME: &str = "gestos.conf";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("No se pudo leer {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Línea {line}: se esperaba '<dedos> <movimiento> <comando...>'")]
    MissingFields { line: usize },

    #[error("Línea {line}: número de dedos inválido '{token}'")]
    InvalidFingers { line: usize, token: String },

    #[error("Línea {line}: {source}")]
    InvalidMotion {
        line: usize,
        #[source]
        source: UnknownMotion,
    },

    #[error("Línea {line}: comillas sin cerrar en el comando")]
    UnterminatedQuote { line: usize },

    #[error("No se encontró fichero de configuración (buscado en {searched:?})")]
    NotFound { searched: Vec<PathBuf> },
}

/// Tabla (dedos, movimiento) → argv. Se construye una vez al arrancar y
/// después sólo se consulta.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommandTable {
    bindings: BTreeMap<(u8, Motion), Vec<String>>,
}

impl CommandTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserta un binding; una clave repetida sobrescribe la anterior
    pub fn insert(&mut self, fingers: u8, motion: Motion, argv: Vec<String>) {
        self.bindings.insert((fingers, motion), argv);
    }

    pub fn get(&self, fingers: u8, motion: Motion) -> Option<&[String]> {
        self.bindings.get(&(fingers, motion)).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Recorre los bindings ordenados por (dedos, movimiento)
    pub fn iter(&self) -> impl Iterator<Item = (u8, Motion, &[String])> {
        self.bindings
            .iter()
            .map(|(&(fingers, motion), argv)| (fingers, motion, argv.as_slice()))
    }

    /// Parsea el texto completo de configuración. Cualquier línea mal formada
    /// aborta la carga entera.
    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        let mut table = Self::new();

        for (idx, raw) in text.lines().enumerate() {
            let line_no = idx + 1;
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let (fingers_tok, rest) = split_token(line).ok_or(ConfigError::MissingFields {
                line: line_no,
            })?;
            let (motion_tok, command) = split_token(rest).ok_or(ConfigError::MissingFields {
                line: line_no,
            })?;

            let fingers = parse_fingers(fingers_tok).ok_or_else(|| ConfigError::InvalidFingers {
                line: line_no,
                token: fingers_tok.to_string(),
            })?;
            let motion: Motion = motion_tok
                .parse()
                .map_err(|source| ConfigError::InvalidMotion {
                    line: line_no,
                    source,
                })?;

            let argv = split_command(command)
                .ok_or(ConfigError::UnterminatedQuote { line: line_no })?;
            if argv.first().map_or(true, |prog| prog.is_empty()) {
                return Err(ConfigError::MissingFields { line: line_no });
            }

            table.insert(fingers, motion, argv);
        }

        Ok(table)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text)
    }
}

/// Rutas candidatas de configuración, en orden de preferencia.
/// `dirs::config_dir` ya aplica `$XDG_CONFIG_HOME` con `~/.config` de respaldo.
pub fn config_search_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();
    let candidates = [
        dirs::config_dir(),
        dirs::home_dir().map(|home| home.join(".config")),
        Some(PathBuf::from("/etc")),
    ];
    for dir in candidates.into_iter().flatten() {
        let path = dir.join(CONFIG_FILE_NAME);
        if !paths.contains(&path) {
            paths.push(path);
        }
    }
    paths
}

/// Primera ruta existente entre las candidatas
pub fn locate_config(candidates: &[PathBuf]) -> Result<PathBuf, ConfigError> {
    candidates
        .iter()
        .find(|p| p.is_file())
        .cloned()
        .ok_or_else(|| ConfigError::NotFound {
            searched: candidates.to_vec(),
        })
}

fn split_token(s: &str) -> Option<(&str, &str)> {
    let s = s.trim_start();
    if s.is_empty() {
        return None;
    }
    match s.find(char::is_whitespace) {
        Some(pos) => Some((&s[..pos], s[pos..].trim_start())),
        None => Some((s, "")),
    }
}

/// Los dedos se escriben como un único dígito
fn parse_fingers(token: &str) -> Option<u8> {
    let mut chars = token.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => c.to_digit(10).map(|d| d as u8),
        _ => None,
    }
}

/// Divide el comando en argv respetando comillas simples y dobles.
/// Devuelve None si quedan comillas abiertas.
pub fn split_command(command: &str) -> Option<Vec<String>> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut in_token = false;
    let mut quote: Option<char> = None;

    for c in command.chars() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => current.push(c),
            None if c == '"' || c == '\'' => {
                quote = Some(c);
                in_token = true;
            }
            None if c.is_whitespace() => {
                if in_token {
                    args.push(std::mem::take(&mut current));
                    in_token = false;
                }
            }
            None => {
                current.push(c);
                in_token = true;
            }
        }
    }

    if quote.is_some() {
        return None;
    }
    if in_token {
        args.push(current);
    }
    Some(args)
}
