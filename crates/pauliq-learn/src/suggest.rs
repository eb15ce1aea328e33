//! Heuristic proposal of a new term.

use pauliq_core::{CoreResult, PauliOp, PauliString, Term};
use rand::Rng;

/// Coefficient given to suggested terms.
pub const SUGGESTED_COEFFICIENT: f64 = 0.5;

/// Propose a single-qubit term using the non-identity operator that occurs
/// least often in `existing` (ties resolved X, then Y, then Z), placed on a
/// random qubit.
pub fn suggest_term<R: Rng + ?Sized>(
    num_qubits: usize,
    existing: &[PauliString],
    rng: &mut R,
) -> CoreResult<Term> {
    let least_used = least_used_operator(existing);
    let qubit = rng.gen_range(0..num_qubits.max(1));
    Ok(Term::new(
        SUGGESTED_COEFFICIENT,
        PauliString::single(num_qubits, qubit, least_used)?,
    ))
}

/// The non-identity operator with the fewest occurrences across `strings`.
pub fn least_used_operator(strings: &[PauliString]) -> PauliOp {
    let mut counts = [0usize; 3];
    for op in strings.iter().flat_map(|s| s.ops()) {
        match op {
            PauliOp::X => counts[0] += 1,
            PauliOp::Y => counts[1] += 1,
            PauliOp::Z => counts[2] += 1,
            PauliOp::I => {}
        }
    }
    let candidates = [PauliOp::X, PauliOp::Y, PauliOp::Z];
    // min_by_key keeps the first minimum
    candidates
        .into_iter()
        .zip(counts)
        .min_by_key(|&(_, count)| count)
        .map_or(PauliOp::Z, |(op, _)| op)
}
