use std::process::Command;

use thiserror::Error;
use tracing::{debug, info};

use crate::dispatch::DispatchTrace;

#[derive(Error, Debug)]
pub enum ActionError {
    #[error("No se pudo lanzar {program:?}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{program:?} terminó con {status}")]
    Failed { program: String, status: String },

    #[error("Comando vacío")]
    EmptyCommand,
}

/// Destino de los gestos ya resueltos: ejecuta el argv asociado y recibe
/// las trazas del modo diagnóstico.
pub trait ActionSink {
    fn execute(&mut self, argv: &[String]) -> Result<(), ActionError>;

    fn trace(&mut self, trace: &DispatchTrace<'_>) {
        info!(target: "gestos::trace", "{}", trace);
    }
}

/// Lanza el comando y espera a que termine. Sin timeout: un comando colgado
/// bloquea el bucle de eventos.
#[derive(Debug, Default)]
pub struct CommandRunner;

impl CommandRunner {
    pub fn new() -> Self {
        Self
    }
}

impl ActionSink for CommandRunner {
    fn execute(&mut self, argv: &[String]) -> Result<(), ActionError> {
        let (program, args) = argv.split_first().ok_or(ActionError::EmptyCommand)?;
        debug!("Ejecutando {:?}", argv);

        let status = Command::new(program)
            .args(args)
            .status()
            .map_err(|source| ActionError::Spawn {
                program: program.clone(),
                source,
            })?;

        if status.success() {
            Ok(())
        } else {
            Err(ActionError::Failed {
                program: program.clone(),
                status: status.to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn successful_command_is_ok() {
        let mut runner = CommandRunner::new();
        assert!(runner.execute(&argv(&["true"])).is_ok());
    }

    #[test]
    fn non_zero_exit_is_reported() {
        let mut runner = CommandRunner::new();
        let err = runner.execute(&argv(&["false"])).unwrap_err();
        assert!(matches!(err, ActionError::Failed { ref program, .. } if program == "false"));
    }

    #[test]
    fn missing_program_is_a_spawn_error() {
        let mut runner = CommandRunner::new();
        let err = runner
            .execute(&argv(&["/nonexistent/gestos-no-such-binary"]))
            .unwrap_err();
        assert!(matches!(err, ActionError::Spawn { .. }));
    }

    #[test]
    fn empty_argv_is_rejected() {
        let mut runner = CommandRunner::new();
        assert!(matches!(runner.execute(&[]), Err(ActionError::EmptyCommand)));
    }
}
