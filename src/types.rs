use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Movimiento clasificado al final de un swipe o pinch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Motion {
    Left,
    Right,
    Up,
    Down,
    In,
    Out,
    Clockwise,
    Anticlockwise,
}

impl Motion {
    /// Todos los movimientos, en el orden en que se listan los bindings
    pub const ALL: [Motion; 8] = [
        Motion::Left,
        Motion::Right,
        Motion::Up,
        Motion::Down,
        Motion::In,
        Motion::Out,
        Motion::Clockwise,
        Motion::Anticlockwise,
    ];

    /// Nombre canónico usado en el fichero de configuración
    pub fn as_str(&self) -> &'static str {
        match self {
            Motion::Left => "left",
            Motion::Right => "right",
            Motion::Up => "up",
            Motion::Down => "down",
            Motion::In => "in",
            Motion::Out => "out",
            Motion::Clockwise => "clockwise",
            Motion::Anticlockwise => "anticlockwise",
        }
    }

    /// Dirección dominante de un desplazamiento acumulado.
    /// Empate de magnitudes → eje vertical.
    pub fn from_axes(dx: f64, dy: f64) -> Motion {
        if dx.abs() > dy.abs() {
            if dx < 0.0 {
                Motion::Left
            } else {
                Motion::Right
            }
        } else if dy < 0.0 {
            Motion::Up
        } else {
            Motion::Down
        }
    }
}

impl fmt::Display for Motion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("movimiento desconocido '{0}'")]
pub struct UnknownMotion(pub String);

impl FromStr for Motion {
    type Err = UnknownMotion;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "left" => Ok(Motion::Left),
            "right" => Ok(Motion::Right),
            "up" => Ok(Motion::Up),
            "down" => Ok(Motion::Down),
            "in" => Ok(Motion::In),
            "out" => Ok(Motion::Out),
            "clockwise" | "clockwise-turn" => Ok(Motion::Clockwise),
            "anticlockwise" | "counterclockwise" | "counter-clockwise-turn" => {
                Ok(Motion::Anticlockwise)
            }
            other => Err(UnknownMotion(other.to_string())),
        }
    }
}

/// Familia de gesto reportada por libinput
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureKind {
    Swipe,
    Pinch,
}

impl GestureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            GestureKind::Swipe => "swipe",
            GestureKind::Pinch => "pinch",
        }
    }

    /// Número de componentes numéricos que trae cada UPDATE
    pub fn update_arity(&self) -> usize {
        match self {
            GestureKind::Swipe => 2,
            GestureKind::Pinch => 4,
        }
    }
}

/// Muestra de un UPDATE ya decodificada
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MotionSample {
    Swipe { dx: f64, dy: f64 },
    Pinch { dx: f64, dy: f64, radius: f64, dangle: f64 },
}

/// Constantes de clasificación
pub const SWIPE_MIN_DISTANCE: f64 = 70.0; // Diferencia mínima entre ejes para un swipe
pub const PINCH_MIN_ANGLE: f64 = 30.0; // Grados acumulados para considerar rotación
pub const PINCH_MIN_RATIO: f64 = 1.5; // Escala relativa al radio inicial
