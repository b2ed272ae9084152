//! Hardware initialisation and peripheral drivers.

pub mod hw_init;
pub mod keypad;
