//! Switching between, and comparing, named profiles on one register.
//!
//! Profiles are instantiated on first use and kept for the lifetime of the
//! manager, so coefficient changes and evolved states survive a switch.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use std::fmt;
use std::sync::Arc;

use pauliq_core::{HamiltonianObserver, QuantumState};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::ProfileResult;
use crate::profile::Profile;
use crate::registry::ProfileRegistry;
use crate::strategy::ProfileParams;

/// Serializable snapshot of a [`ProfileManager`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManagerSummary {
    /// Canonical name of the active profile.
    pub active_profile: String,
    /// Register size.
    pub num_qubits: usize,
    /// Every registered profile.
    pub available_profiles: Vec<String>,
    /// Profiles instantiated so far.
    pub initialized_profiles: Vec<String>,
    /// Terms in the active Hamiltonian.
    pub hamiltonian_terms: usize,
    /// Energy of the active profile's current state.
    pub current_energy: f64,
}

/// Owns one [`Profile`] per registered strategy (created lazily) and
/// tracks which one is active.
pub struct ProfileManager {
    registry: ProfileRegistry,
    num_qubits: usize,
    params: ProfileParams,
    // Invariant: always contains `active`.
    profiles: BTreeMap<String, Profile>,
    active: String,
    observers: Vec<Arc<dyn HamiltonianObserver>>,
}

impl ProfileManager {
    /// Create a manager with `default_profile` active.
    pub fn new(
        registry: ProfileRegistry,
        default_profile: &str,
        num_qubits: usize,
        params: ProfileParams,
    ) -> ProfileResult<Self> {
        let active = registry.resolve(default_profile)?.to_string();
        let mut manager = Self {
            registry,
            num_qubits,
            params,
            profiles: BTreeMap::new(),
            active,
            observers: Vec::new(),
        };
        let active = manager.active.clone();
        manager.ensure(&active)?;
        Ok(manager)
    }

    /// Manager over the built-in strategies with default parameters.
    pub fn with_defaults(default_profile: &str, num_qubits: usize) -> ProfileResult<Self> {
        Self::new(
            ProfileRegistry::with_defaults(),
            default_profile,
            num_qubits,
            ProfileParams::default(),
        )
    }

    /// The profile for `name`, instantiated on first use.
    fn ensure(&mut self, name: &str) -> ProfileResult<&mut Profile> {
        let strategy = self.registry.get(name)?;
        match self.profiles.entry(strategy.name().to_string()) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => {
                let mut profile =
                    Profile::from_strategy(strategy.as_ref(), self.num_qubits, &self.params)?;
                for observer in &self.observers {
                    profile.hamiltonian_mut().subscribe(Arc::clone(observer));
                }
                debug!(
                    profile = %profile.name(),
                    n_terms = profile.hamiltonian().n_terms(),
                    "instantiated profile"
                );
                Ok(entry.insert(profile))
            }
        }
    }

    /// Attach an observer to every current and future profile Hamiltonian.
    pub fn subscribe(&mut self, observer: Arc<dyn HamiltonianObserver>) {
        for profile in self.profiles.values_mut() {
            profile.hamiltonian_mut().subscribe(Arc::clone(&observer));
        }
        self.observers.push(observer);
    }

    /// Make `name` active. With `preserve_state` the previous profile's
    /// current state is copied into it.
    pub fn switch_profile(&mut self, name: &str, preserve_state: bool) -> ProfileResult<()> {
        let previous = preserve_state.then(|| self.active().state().clone());
        let profile = self.ensure(name)?;
        if let Some(state) = previous {
            profile.set_state(state)?;
        }
        let target = profile.name().to_string();
        info!(from = %self.active, to = %target, preserve_state, "switched profile");
        self.active = target;
        Ok(())
    }

    /// Energy of `state` (or the active profile's current state) under every
    /// registered profile, keyed by canonical name.
    pub fn compare_profiles(
        &mut self,
        state: Option<&QuantumState>,
    ) -> ProfileResult<BTreeMap<String, f64>> {
        let state = match state {
            Some(s) => s.clone(),
            None => self.active().state().clone(),
        };
        let mut energies = BTreeMap::new();
        for name in self.registry.names() {
            let energy = self.ensure(&name)?.compute_energy(Some(&state))?;
            energies.insert(name, energy);
        }
        Ok(energies)
    }

    /// The active profile.
    pub fn active(&self) -> &Profile {
        &self.profiles[&self.active]
    }

    /// The active profile, mutably.
    pub fn active_mut(&mut self) -> &mut Profile {
        self.profiles
            .get_mut(&self.active)
            .unwrap_or_else(|| unreachable!("active profile is always instantiated"))
    }

    /// Canonical name of the active profile.
    pub fn active_name(&self) -> &str {
        &self.active
    }

    /// Register size.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Every registered canonical name.
    pub fn list_profiles(&self) -> Vec<String> {
        self.registry.names()
    }

    /// Profiles instantiated so far.
    pub fn initialized_profiles(&self) -> Vec<String> {
        self.profiles.keys().cloned().collect()
    }

    /// A profile by name or alias, instantiating it if needed.
    pub fn profile_mut(&mut self, name: &str) -> ProfileResult<&mut Profile> {
        self.ensure(name)
    }

    /// A profile by name or alias, if already instantiated.
    pub fn profile(&self, name: &str) -> Option<&Profile> {
        let canonical = self.registry.resolve(name).ok()?;
        self.profiles.get(canonical)
    }

    /// Snapshot of the manager.
    pub fn summary(&mut self) -> ProfileResult<ManagerSummary> {
        let current_energy = self.active_mut().compute_energy(None)?;
        Ok(ManagerSummary {
            active_profile: self.active.clone(),
            num_qubits: self.num_qubits,
            available_profiles: self.list_profiles(),
            initialized_profiles: self.initialized_profiles(),
            hamiltonian_terms: self.active().hamiltonian().n_terms(),
            current_energy,
        })
    }
}

impl fmt::Debug for ProfileManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProfileManager")
            .field("active", &self.active)
            .field("num_qubits", &self.num_qubits)
            .field("initialized", &self.profiles.len())
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl fmt::Display for ProfileManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ProfileManager(active={}, n_qubits={}, {} initialized)",
            self.active,
            self.num_qubits,
            self.profiles.len()
        )
    }
}
