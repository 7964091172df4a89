//! Command implementations

pub mod inspect;
pub mod matrix;
pub mod resolve;
pub mod stage;
pub mod version;
