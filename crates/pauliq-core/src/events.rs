//! Read-only event notifications published by a [`Hamiltonian`].
//!
//! Observers are passive: they receive a borrowed [`HamiltonianEvent`] and
//! cannot reach back into the Hamiltonian that emitted it. Any number of
//! observers may subscribe; they are called in subscription order.
//!
//! [`Hamiltonian`]: crate::hamiltonian::Hamiltonian

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::term::Term;

/// Something that happened to, or was computed by, a Hamiltonian.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum HamiltonianEvent {
    /// A term was appended.
    TermAdded {
        /// Position of the new term.
        index: usize,
        /// The term.
        term: Term,
    },
    /// A coefficient was replaced in place.
    CoefficientChanged {
        /// Term index.
        index: usize,
        /// Previous value.
        old: f64,
        /// New value.
        new: f64,
    },
    /// The dense matrix was rebuilt.
    MatrixRebuilt {
        /// Matrix dimension (2^n).
        dimension: usize,
        /// Number of terms summed.
        n_terms: usize,
    },
    /// An expectation value was computed.
    EnergyComputed {
        /// ⟨ψ|H|ψ⟩.
        energy: f64,
        /// Coefficients at the time of evaluation.
        coefficients: Vec<f64>,
    },
    /// A state was evolved in time.
    StateEvolved {
        /// Evolution time.
        time: f64,
        /// Norm of the evolved state before renormalization.
        norm_before_renormalization: f64,
    },
}

impl HamiltonianEvent {
    /// Short kind name, used as a log field.
    pub fn kind(&self) -> &'static str {
        match self {
            HamiltonianEvent::TermAdded { .. } => "term_added",
            HamiltonianEvent::CoefficientChanged { .. } => "coefficient_changed",
            HamiltonianEvent::MatrixRebuilt { .. } => "matrix_rebuilt",
            HamiltonianEvent::EnergyComputed { .. } => "energy_computed",
            HamiltonianEvent::StateEvolved { .. } => "state_evolved",
        }
    }
}

/// A listener for [`HamiltonianEvent`]s.
pub trait HamiltonianObserver: Send + Sync {
    /// Called synchronously for every published event.
    fn on_event(&self, event: &HamiltonianEvent);
}

/// Ordered list of subscribed observers.
#[derive(Clone, Default)]
pub struct EventBus {
    observers: Vec<Arc<dyn HamiltonianObserver>>,
}

impl EventBus {
    /// Create an empty bus.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an observer.
    pub fn subscribe(&mut self, observer: Arc<dyn HamiltonianObserver>) {
        self.observers.push(observer);
    }

    /// Remove every observer.
    pub fn clear(&mut self) {
        self.observers.clear();
    }

    /// Number of subscribed observers.
    pub fn len(&self) -> usize {
        self.observers.len()
    }

    /// True if nobody is listening.
    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }

    /// Deliver an event to every observer. The event is only constructed
    /// when someone is listening.
    pub fn publish_with<F>(&self, make: F)
    where
        F: FnOnce() -> HamiltonianEvent,
    {
        if self.observers.is_empty() {
            return;
        }
        let event = make();
        for observer in &self.observers {
            observer.on_event(&event);
        }
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("observers", &self.observers.len())
            .finish()
    }
}

/// Forwards events to `tracing` at debug level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl HamiltonianObserver for TracingObserver {
    fn on_event(&self, event: &HamiltonianEvent) {
        debug!(kind = event.kind(), ?event, "hamiltonian event");
    }
}

/// Stores every event it receives.
#[derive(Debug, Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<HamiltonianEvent>>,
}

impl RecordingObserver {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the recorded events.
    pub fn events(&self) -> Vec<HamiltonianEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of recorded events of the given kind.
    pub fn count(&self, kind: &str) -> usize {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|e| e.kind() == kind)
            .count()
    }
}

impl HamiltonianObserver for RecordingObserver {
    fn on_event(&self, event: &HamiltonianEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event.clone());
    }
}
