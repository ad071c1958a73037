use thiserror::Error;

use crate::types::{GestureKind, MotionSample};

const GESTURE_PREFIX: &str = "GESTURE_";

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EventError {
    #[error("Gesto desconocido {kind} ({event})")]
    UnknownKind { kind: String, event: String },

    #[error("Evento desconocido {event} para {kind}")]
    UnknownEvent { kind: &'static str, event: String },

    #[error("Línea de gesto incompleta: {0:?}")]
    Truncated(String),

    #[error("Número de dedos inválido '{0}'")]
    InvalidFingers(String),

    #[error("Parámetro no numérico o no finito '{0}'")]
    InvalidParam(String),

    #[error("{kind} espera {expected} parámetros, recibidos {actual}")]
    WrongArity {
        kind: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("UPDATE de {got} con un {active} activo")]
    KindMismatch {
        active: &'static str,
        got: &'static str,
    },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EventBody {
    Begin { fingers: u8 },
    Update { fingers: u8, sample: MotionSample },
    End { fingers: u8, cancelled: bool },
}

/// Evento de gesto ya decodificado de una línea de `libinput debug-events`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureEvent {
    pub kind: GestureKind,
    pub body: EventBody,
}

/// Decodifica una línea `<dispositivo> GESTURE_<TIPO>_<EVENTO> <tiempo> <resto>`.
///
/// Las líneas que no son de gestos (punteros, teclado, cabeceras) devuelven
/// `Ok(None)`.
pub fn parse_line(line: &str) -> Result<Option<GestureEvent>, EventError> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    let Some(name) = fields.get(1).and_then(|f| f.strip_prefix(GESTURE_PREFIX)) else {
        return Ok(None);
    };

    let (kind_tok, event_tok) = name
        .rsplit_once('_')
        .ok_or_else(|| EventError::Truncated(line.trim().to_string()))?;

    let kind = match kind_tok {
        "SWIPE" => GestureKind::Swipe,
        "PINCH" => GestureKind::Pinch,
        // Sólo el BEGIN de un tipo desconocido es anómalo; su UPDATE/END no
        // tienen clasificador al que llegar y se ignoran
        other if event_tok == "BEGIN" => {
            return Err(EventError::UnknownKind {
                kind: other.to_string(),
                event: event_tok.to_string(),
            })
        }
        _ => return Ok(None),
    };

    // fields[2] es la marca de tiempo
    let rest = fields.get(3..).unwrap_or_default();
    let (fingers_tok, params) = rest
        .split_first()
        .ok_or_else(|| EventError::Truncated(line.trim().to_string()))?;
    let fingers: u8 = fingers_tok
        .parse()
        .map_err(|_| EventError::InvalidFingers(fingers_tok.to_string()))?;

    let body = match event_tok {
        "BEGIN" => EventBody::Begin { fingers },
        "UPDATE" => EventBody::Update {
            fingers,
            sample: parse_sample(kind, &params.join(" "))?,
        },
        "END" => EventBody::End {
            fingers,
            cancelled: params.first() == Some(&"cancelled"),
        },
        other => {
            return Err(EventError::UnknownEvent {
                kind: kind.as_str(),
                event: other.to_string(),
            })
        }
    };

    Ok(Some(GestureEvent { kind, body }))
}

/// Parámetros de un UPDATE: se descartan las anotaciones entre paréntesis y
/// se separan por espacios, '/' o '@'.
fn parse_sample(kind: GestureKind, text: &str) -> Result<MotionSample, EventError> {
    let values = strip_annotations(text)
        .split(|c: char| c.is_whitespace() || c == '/' || c == '@')
        .filter(|tok| !tok.is_empty())
        .map(|tok| match tok.parse::<f64>() {
            Ok(v) if v.is_finite() => Ok(v),
            _ => Err(EventError::InvalidParam(tok.to_string())),
        })
        .collect::<Result<Vec<f64>, _>>()?;

    let expected = kind.update_arity();
    if values.len() != expected {
        return Err(EventError::WrongArity {
            kind: kind.as_str(),
            expected,
            actual: values.len(),
        });
    }

    Ok(match kind {
        GestureKind::Swipe => MotionSample::Swipe {
            dx: values[0],
            dy: values[1],
        },
        GestureKind::Pinch => MotionSample::Pinch {
            dx: values[0],
            dy: values[1],
            radius: values[2],
            dangle: values[3],
        },
    })
}

fn strip_annotations(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut depth = 0usize;
    for c in text.chars() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth = depth.saturating_sub(1);
                out.push(' ');
            }
            _ if depth == 0 => out.push(c),
            _ => {}
        }
    }
    out
}
