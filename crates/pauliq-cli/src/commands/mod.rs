//! CLI command implementations.

pub mod common;
pub mod compare;
pub mod energy;
pub mod evolve;
pub mod ground;
pub mod learn;
pub mod optimize;
pub mod profiles;
pub mod show;
pub mod version;
