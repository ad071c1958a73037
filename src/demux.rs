use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::action::{ActionError, ActionSink};
use crate::command_table::CommandTable;
use crate::dispatch::Dispatcher;
use crate::event::{parse_line, EventBody, EventError};
use crate::gesture_classifier::Classifier;
use crate::types::Motion;

#[derive(Error, Debug)]
pub enum DemuxError {
    /// Línea anómala: se registra y se descarta
    #[error(transparent)]
    Anomaly(#[from] EventError),

    #[error("Acción de {classifier} ({fingers} dedos) falló: {source}")]
    Action {
        classifier: &'static str,
        fingers: u8,
        #[source]
        source: ActionError,
    },
}

/// Contadores del bucle de eventos
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DemuxStats {
    pub lines: u64,
    pub gestures: u64,
    pub dispatched: u64,
    pub anomalies: u64,
    pub action_failures: u64,
}

/// Reparte las líneas de `libinput debug-events` al clasificador activo.
///
/// Sólo hay una sesión viva: un BEGIN la reemplaza, un END la descarta.
pub struct EventDemux<'a, S: ActionSink> {
    table: &'a CommandTable,
    sink: S,
    dry_run: bool,
    active: Option<Classifier>,
    stats: DemuxStats,
}

impl<'a, S: ActionSink> EventDemux<'a, S> {
    pub fn new(table: &'a CommandTable, sink: S, dry_run: bool) -> Self {
        Self {
            table,
            sink,
            dry_run,
            active: None,
            stats: DemuxStats::default(),
        }
    }

    pub fn active(&self) -> Option<&Classifier> {
        self.active.as_ref()
    }

    pub fn stats(&self) -> DemuxStats {
        self.stats
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Procesa una línea. Devuelve el movimiento si esta línea disparó una
    /// acción.
    pub fn feed_line(&mut self, line: &str) -> Result<Option<Motion>, DemuxError> {
        self.stats.lines += 1;

        let event = match parse_line(line) {
            Ok(Some(event)) => event,
            Ok(None) => return Ok(None),
            Err(err) => {
                self.stats.anomalies += 1;
                if matches!(err, EventError::UnknownKind { .. }) {
                    // BEGIN sin clasificador: el UPDATE/END que sigan se ignoran
                    self.active = None;
                }
                return Err(err.into());
            }
        };

        match event.body {
            EventBody::Begin { fingers } => {
                self.stats.gestures += 1;
                debug!("BEGIN {} con {} dedos", event.kind.as_str(), fingers);
                self.active = Some(Classifier::begin(event.kind, fingers));
                Ok(None)
            }
            EventBody::Update { sample, .. } => {
                let Some(classifier) = self.active.as_mut() else {
                    return Ok(None);
                };
                if classifier.kind() != event.kind {
                    self.stats.anomalies += 1;
                    return Err(EventError::KindMismatch {
                        active: classifier.name(),
                        got: event.kind.as_str(),
                    }
                    .into());
                }

                let mut dispatcher = Dispatcher {
                    table: self.table,
                    sink: &mut self.sink,
                    dry_run: self.dry_run,
                };
                match classifier.update(sample, &mut dispatcher) {
                    Ok(fired) => {
                        if fired.is_some() {
                            self.stats.dispatched += 1;
                        }
                        Ok(fired)
                    }
                    Err(source) => {
                        self.stats.dispatched += 1;
                        self.stats.action_failures += 1;
                        Err(DemuxError::Action {
                            classifier: classifier.name(),
                            fingers: classifier.fingers(),
                            source,
                        })
                    }
                }
            }
            EventBody::End { cancelled, .. } => {
                if let Some(mut classifier) = self.active.take() {
                    classifier.end(cancelled);
                    debug!(
                        "END {} [{}]{}",
                        classifier.name(),
                        classifier,
                        if cancelled { " cancelado" } else { "" }
                    );
                }
                Ok(None)
            }
        }
    }

    /// Bucle principal: consume líneas hasta que se cierra la fuente.
    /// Ni las anomalías ni los fallos de acción lo detienen.
    pub fn run<I>(&mut self, lines: I) -> DemuxStats
    where
        I: IntoIterator<Item = String>,
    {
        for line in lines {
            match self.feed_line(&line) {
                Ok(Some(motion)) => {
                    info!("Gesto {} ejecutado", motion);
                }
                Ok(None) => {}
                Err(DemuxError::Anomaly(err @ EventError::UnknownKind { .. })) => {
                    error!("{}", err);
                }
                Err(DemuxError::Anomaly(err)) => {
                    warn!("Línea descartada: {} ({:?})", err, line.trim());
                }
                Err(err) => {
                    error!("{}", err);
                }
            }
        }
        self.stats
    }
}
