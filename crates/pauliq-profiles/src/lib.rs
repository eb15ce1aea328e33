//! `pauliq-profiles` - named Hamiltonian families on a fixed register.
//!
//! A [`ProfileStrategy`] turns a register size into a term list. The
//! [`ProfileRegistry`] maps names and aliases to strategies, and the
//! [`ProfileManager`] keeps one instantiated [`Profile`] per strategy,
//! tracks the active one, and compares energies across all of them.
//!
//! ```rust
//! use pauliq_profiles::ProfileManager;
//!
//! let mut manager = ProfileManager::with_defaults("stabilizer", 3).unwrap();
//! let energies = manager.compare_profiles(None).unwrap();
//! assert_eq!(energies.len(), 5);
//! ```

pub mod config;
pub mod error;
pub mod manager;
pub mod profile;
pub mod registry;
pub mod strategy;

pub use config::PauliqConfig;
pub use error::{ProfileError, ProfileResult};
pub use manager::{ManagerSummary, ProfileManager};
pub use profile::Profile;
pub use registry::ProfileRegistry;
pub use strategy::{
    AllToAll, BalancedMultibody, Hierarchical, ProfileParams, ProfileStrategy, Stabilizer,
    TransverseField,
};
