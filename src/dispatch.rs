use std::fmt;

use tracing::debug;

use crate::action::{ActionError, ActionSink};
use crate::command_table::CommandTable;
use crate::types::Motion;

/// Lo que necesita un clasificador para disparar acciones
pub struct Dispatcher<'a> {
    pub table: &'a CommandTable,
    pub sink: &'a mut dyn ActionSink,
    /// Modo diagnóstico: se resuelve y se marca el commit pero no se ejecuta nada
    pub dry_run: bool,
}

/// Traza de diagnóstico emitida en cada llamada a `dispatch`
#[derive(Debug, Clone, PartialEq)]
pub struct DispatchTrace<'a> {
    pub classifier: &'static str,
    pub motion: Motion,
    pub fingers: u8,
    pub state: String,
    pub command: Option<&'a [String]>,
    pub committed: bool,
}

impl fmt::Display for DispatchTrace<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} [{}]",
            self.classifier, self.motion, self.fingers, self.state
        )?;
        match self.command {
            Some(argv) if self.committed => write!(f, " ya resuelto, ignorado {:?}", argv),
            Some(argv) => write!(f, " -> {:?}", argv),
            None => write!(f, " sin comando"),
        }
    }
}

/// Puerta de disparo compartida por todos los clasificadores.
///
/// Como mucho una ejecución por sesión: si `committed` ya está activo no hace
/// nada. Un movimiento sin binding NO marca la sesión, así que un movimiento
/// posterior que sí tenga comando todavía puede dispararse.
///
/// Devuelve `Ok(true)` si esta llamada ha hecho el commit.
pub fn dispatch(
    dispatcher: &mut Dispatcher<'_>,
    committed: &mut bool,
    classifier: &'static str,
    fingers: u8,
    motion: Motion,
    state: &dyn fmt::Display,
) -> Result<bool, ActionError> {
    let table = dispatcher.table;

    if dispatcher.dry_run {
        dispatcher.sink.trace(&DispatchTrace {
            classifier,
            motion,
            fingers,
            state: state.to_string(),
            command: table.get(fingers, motion),
            committed: *committed,
        });
    }

    if *committed {
        return Ok(false);
    }

    let Some(argv) = table.get(fingers, motion) else {
        debug!("{} {} con {} dedos sin binding", classifier, motion, fingers);
        return Ok(false);
    };

    *committed = true;
    if !dispatcher.dry_run {
        dispatcher.sink.execute(argv)?;
    }
    Ok(true)
}
