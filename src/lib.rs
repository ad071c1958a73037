//! Gestos de touchpad para Linux: clasifica los swipes y pinch que reporta
//! `libinput debug-events` y ejecuta el comando asociado a cada uno.

pub mod action;
pub mod capture;
pub mod command_table;
pub mod demux;
pub mod device;
pub mod dispatch;
pub mod event;
pub mod gesture_classifier;
pub mod types;
