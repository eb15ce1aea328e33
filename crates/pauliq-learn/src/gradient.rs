//! Central finite differences with respect to term coefficients.
//!
//!   ∂E/∂θ_k ≈ (E(θ_k + ε) − E(θ_k − ε)) / 2ε
//!
//! The Hamiltonian is perturbed in place through
//! [`Hamiltonian::set_coefficient`], so every evaluation goes through the
//! matrix cache. The original coefficient is always restored, including
//! when an evaluation fails.

use pauliq_core::{CoreError, Hamiltonian, QuantumState};

use crate::error::{LearnError, LearnResult};

/// `∂⟨ψ|H|ψ⟩/∂c_index` by central difference with step `step`.
pub fn finite_difference_gradient(
    hamiltonian: &mut Hamiltonian,
    state: &QuantumState,
    index: usize,
    step: f64,
) -> LearnResult<f64> {
    let derivatives = energy_derivatives(hamiltonian, std::slice::from_ref(state), index, step)?;
    Ok(derivatives[0])
}

/// Gradient with respect to every coefficient, in term order.
pub fn gradient(
    hamiltonian: &mut Hamiltonian,
    state: &QuantumState,
    step: f64,
) -> LearnResult<Vec<f64>> {
    (0..hamiltonian.n_terms())
        .map(|index| finite_difference_gradient(hamiltonian, state, index, step))
        .collect()
}

/// `∂E_j/∂c_index` for each state `j`, sharing one perturbation of the
/// coefficient across all states.
pub fn energy_derivatives(
    hamiltonian: &mut Hamiltonian,
    states: &[QuantumState],
    index: usize,
    step: f64,
) -> LearnResult<Vec<f64>> {
    if !(step > 0.0 && step.is_finite()) {
        return Err(LearnError::InvalidConfig(format!(
            "finite-difference step must be positive, got {step}"
        )));
    }
    let original = hamiltonian
        .terms()
        .get(index)
        .map(|t| t.coefficient)
        .ok_or(CoreError::InvalidTermIndex {
            index,
            n_terms: hamiltonian.n_terms(),
        })?;

    let evaluated = energies_at(hamiltonian, states, index, original + step).and_then(|plus| {
        energies_at(hamiltonian, states, index, original - step).map(|minus| (plus, minus))
    });
    hamiltonian.set_coefficient(index, original)?;

    let (plus, minus) = evaluated?;
    Ok(plus
        .iter()
        .zip(&minus)
        .map(|(ep, em)| (ep - em) / (2.0 * step))
        .collect())
}

fn energies_at(
    hamiltonian: &mut Hamiltonian,
    states: &[QuantumState],
    index: usize,
    coefficient: f64,
) -> LearnResult<Vec<f64>> {
    hamiltonian.set_coefficient(index, coefficient)?;
    states
        .iter()
        .map(|state| -> LearnResult<f64> { Ok(hamiltonian.compute_energy(state)?) })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gradient_is_pauli_expectation() {
        // E is linear in c, so ∂E/∂c_k = ⟨ψ|P_k|ψ⟩.
        let mut h = Hamiltonian::new(2).unwrap();
        h.add_term(0.3, "ZI").unwrap();
        h.add_term(-0.8, "IZ").unwrap();
        let psi = QuantumState::from_bitstring("01").unwrap();

        let g = gradient(&mut h, &psi, 1e-5).unwrap();
        assert!((g[0] - 1.0).abs() < 1e-8);
        assert!((g[1] + 1.0).abs() < 1e-8);
    }

    #[test]
    fn test_coefficient_restored() {
        let mut h = Hamiltonian::new(1).unwrap();
        h.add_term(0.42, "X").unwrap();
        let psi = QuantumState::uniform(1).unwrap();
        finite_difference_gradient(&mut h, &psi, 0, 1e-3).unwrap();
        assert_eq!(h.coefficients(), vec![0.42]);
    }

    #[test]
    fn test_restored_after_failed_evaluation() {
        let mut h = Hamiltonian::new(2).unwrap();
        h.add_term(0.42, "XX").unwrap();
        let wrong = QuantumState::zero(1).unwrap();
        assert!(finite_difference_gradient(&mut h, &wrong, 0, 1e-3).is_err());
        assert_eq!(h.coefficients(), vec![0.42]);
    }

    #[test]
    fn test_bad_index_and_step() {
        let mut h = Hamiltonian::new(1).unwrap();
        let psi = QuantumState::zero(1).unwrap();
        assert!(matches!(
            finite_difference_gradient(&mut h, &psi, 0, 1e-5),
            Err(LearnError::Core(CoreError::InvalidTermIndex { .. }))
        ));
        h.add_term(1.0, "Z").unwrap();
        assert!(matches!(
            finite_difference_gradient(&mut h, &psi, 0, 0.0),
            Err(LearnError::InvalidConfig(_))
        ));
    }
}
