use std::fmt;

use crate::action::ActionError;
use crate::dispatch::{dispatch, Dispatcher};
use crate::types::{
    GestureKind, Motion, MotionSample, PINCH_MIN_ANGLE, PINCH_MIN_RATIO, SWIPE_MIN_DISTANCE,
};

/// Swipe lineal: acumula (dx, dy) hasta que un eje domina
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SwipeClassifier {
    fingers: u8,
    dx: f64,
    dy: f64,
    committed: bool,
}

impl fmt::Display for SwipeClassifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "x={:.2} y={:.2}", self.dx, self.dy)
    }
}

impl SwipeClassifier {
    pub const NAME: &'static str = "swipe";

    pub fn begin(&mut self, fingers: u8) {
        *self = Self {
            fingers,
            ..Self::default()
        };
    }

    pub fn update(
        &mut self,
        dx: f64,
        dy: f64,
        dispatcher: &mut Dispatcher<'_>,
    ) -> Result<Option<Motion>, ActionError> {
        self.dx += dx;
        self.dy += dy;
        if self.committed {
            return Ok(None);
        }
        self.check(dispatcher)
    }

    /// Cancelado o no, no hay nada que deshacer
    pub fn end(&mut self, _cancelled: bool) {}

    /// La condición compara la diferencia de los acumulados, no sus módulos
    pub fn check(&mut self, dispatcher: &mut Dispatcher<'_>) -> Result<Option<Motion>, ActionError> {
        // Escrita en positivo: un acumulado NaN nunca alcanza el umbral
        let reached = (self.dx - self.dy).abs() >= SWIPE_MIN_DISTANCE;
        if !reached {
            return Ok(None);
        }

        let motion = Motion::from_axes(self.dx, self.dy);
        let mut committed = self.committed;
        let result = dispatch(
            dispatcher,
            &mut committed,
            Self::NAME,
            self.fingers,
            motion,
            &*self,
        );
        self.committed = committed;
        Ok(result?.then_some(motion))
    }
}

/// Pinch: rotación, escala y desplazamiento evaluados en ese orden
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PinchClassifier {
    fingers: u8,
    dx: f64,
    dy: f64,
    dangle: f64,
    /// Radio del primer UPDATE; referencia fija para la escala
    initial_radius: Option<f64>,
    ratio: f64,
    committed: bool,
}

impl fmt::Display for PinchClassifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "x={:.2} y={:.2} angle={:.2} ratio={:.3}",
            self.dx, self.dy, self.dangle, self.ratio
        )
    }
}

impl PinchClassifier {
    pub const NAME: &'static str = "pinch";

    pub fn begin(&mut self, fingers: u8) {
        *self = Self {
            fingers,
            ratio: 1.0,
            ..Self::default()
        };
    }

    pub fn update(
        &mut self,
        dx: f64,
        dy: f64,
        radius: f64,
        dangle: f64,
        dispatcher: &mut Dispatcher<'_>,
    ) -> Result<Option<Motion>, ActionError> {
        self.dx += dx;
        self.dy += dy;
        self.dangle += dangle;

        let initial = *self.initial_radius.get_or_insert(radius);
        // Radio inicial nulo: no hay referencia, la escala se queda en 1
        self.ratio = if initial > 0.0 { radius / initial } else { 1.0 };

        if self.committed {
            return Ok(None);
        }
        self.check(dispatcher)
    }

    pub fn end(&mut self, _cancelled: bool) {}

    /// Tres comprobaciones independientes. Cada una pasa por la puerta de
    /// disparo, así que en un empate gana la rotación, luego la escala.
    pub fn check(&mut self, dispatcher: &mut Dispatcher<'_>) -> Result<Option<Motion>, ActionError> {
        let mut fired = None;

        if self.dangle.abs() > PINCH_MIN_ANGLE {
            let motion = if self.dangle < 0.0 {
                Motion::Anticlockwise
            } else {
                Motion::Clockwise
            };
            fired = fired.or(self.fire(motion, dispatcher)?);
        }

        if self.ratio > PINCH_MIN_RATIO || self.ratio < 1.0 / PINCH_MIN_RATIO {
            let motion = if self.ratio > 1.0 { Motion::Out } else { Motion::In };
            fired = fired.or(self.fire(motion, dispatcher)?);
        }

        if (self.dx.abs() - self.dy.abs()).abs() > SWIPE_MIN_DISTANCE {
            let motion = Motion::from_axes(self.dx, self.dy);
            fired = fired.or(self.fire(motion, dispatcher)?);
        }

        Ok(fired)
    }

    fn fire(
        &mut self,
        motion: Motion,
        dispatcher: &mut Dispatcher<'_>,
    ) -> Result<Option<Motion>, ActionError> {
        // El estado sólo se formatea si hay traza; el commit se devuelve
        // aunque la acción falle
        let mut committed = self.committed;
        let result = dispatch(
            dispatcher,
            &mut committed,
            Self::NAME,
            self.fingers,
            motion,
            &*self,
        );
        self.committed = committed;
        Ok(result?.then_some(motion))
    }
}

/// Clasificador activo de la sesión en curso
#[derive(Debug, Clone, PartialEq)]
pub enum Classifier {
    Swipe(SwipeClassifier),
    Pinch(PinchClassifier),
}

impl Classifier {
    /// BEGIN: sesión nueva, acumuladores a cero y sin commit
    pub fn begin(kind: GestureKind, fingers: u8) -> Self {
        match kind {
            GestureKind::Swipe => {
                let mut c = SwipeClassifier::default();
                c.begin(fingers);
                Classifier::Swipe(c)
            }
            GestureKind::Pinch => {
                let mut c = PinchClassifier::default();
                c.begin(fingers);
                Classifier::Pinch(c)
            }
        }
    }

    pub fn kind(&self) -> GestureKind {
        match self {
            Classifier::Swipe(_) => GestureKind::Swipe,
            Classifier::Pinch(_) => GestureKind::Pinch,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Classifier::Swipe(_) => SwipeClassifier::NAME,
            Classifier::Pinch(_) => PinchClassifier::NAME,
        }
    }

    pub fn fingers(&self) -> u8 {
        match self {
            Classifier::Swipe(c) => c.fingers,
            Classifier::Pinch(c) => c.fingers,
        }
    }

    pub fn is_committed(&self) -> bool {
        match self {
            Classifier::Swipe(c) => c.committed,
            Classifier::Pinch(c) => c.committed,
        }
    }

    /// Muestra de otra familia: se ignora
    pub fn update(
        &mut self,
        sample: MotionSample,
        dispatcher: &mut Dispatcher<'_>,
    ) -> Result<Option<Motion>, ActionError> {
        match (self, sample) {
            (Classifier::Swipe(c), MotionSample::Swipe { dx, dy }) => c.update(dx, dy, dispatcher),
            (
                Classifier::Pinch(c),
                MotionSample::Pinch {
                    dx,
                    dy,
                    radius,
                    dangle,
                },
            ) => c.update(dx, dy, radius, dangle, dispatcher),
            _ => Ok(None),
        }
    }

    pub fn end(&mut self, cancelled: bool) {
        match self {
            Classifier::Swipe(c) => c.end(cancelled),
            Classifier::Pinch(c) => c.end(cancelled),
        }
    }
}

impl fmt::Display for Classifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Classifier::Swipe(c) => fmt::Display::fmt(c, f),
            Classifier::Pinch(c) => fmt::Display::fmt(c, f),
        }
    }
}
