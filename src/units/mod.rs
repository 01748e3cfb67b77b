//! Unit value types

pub mod unit;

pub use unit::{Unit, UnitKey, UnitProfile};
