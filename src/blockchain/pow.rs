use sha2::{Digest, Sha256};

use super::DIFFICULTY_PREFIX;

fn square(proof: i64) -> i64 {
    proof.checked_mul(proof).expect("proof square overflows i64")
}

/// Digest of the PoW puzzle for a `(proof, previous_proof)` pair.
///
/// The puzzle input is the decimal rendering of `proof² - previous_proof²`,
/// which may be negative. Squares use checked arithmetic: the search stays
/// far below `i64::MAX` in practice, and a wrapped value would silently
/// change the puzzle, so overflow aborts instead.
pub fn pow_digest(proof: i64, previous_proof: i64) -> String {
    let delta = square(proof)
        .checked_sub(square(previous_proof))
        .expect("proof difference overflows i64");
    let mut hasher = Sha256::new();
    hasher.update(delta.to_string().as_bytes());
    hex::encode(hasher.finalize())
}

/// Whether `proof` solves the puzzle against `previous_proof`.
/// A single digest evaluation; this is the cheap direction of PoW.
pub fn verifies(proof: i64, previous_proof: i64) -> bool {
    pow_digest(proof, previous_proof).starts_with(DIFFICULTY_PREFIX)
}

/// Find the next proof by sequential search from candidate 1.
///
/// Deterministic for a given `previous_proof`: the search order is fixed and
/// the predicate is pure. CPU-bound, roughly 65536 digests on average at the
/// fixed difficulty; callers must not hold the ledger lock while this runs.
pub fn solve(previous_proof: i64) -> i64 {
    let mut candidate: i64 = 1;
    while !verifies(candidate, previous_proof) {
        candidate += 1;
    }
    candidate
}

#[cfg(test)]
mod tests {
    use sha2::{Digest, Sha256};

    use super::{pow_digest, solve, verifies};
    use crate::blockchain::DIFFICULTY_PREFIX;

    #[test]
    fn solve_satisfies_the_predicate() {
        let proof = solve(1);
        assert!(pow_digest(proof, 1).starts_with(DIFFICULTY_PREFIX));
    }

    #[test]
    fn solve_returns_the_smallest_solution() {
        let proof = solve(1);
        for candidate in 1..proof {
            assert!(!verifies(candidate, 1));
        }
    }

    #[test]
    fn solve_is_deterministic() {
        assert_eq!(solve(7), solve(7));
    }

    #[test]
    fn puzzle_input_is_the_signed_difference() {
        // proof 1 against previous proof 2: 1 - 4 = -3
        let mut hasher = Sha256::new();
        hasher.update(b"-3");
        assert_eq!(pow_digest(1, 2), hex::encode(hasher.finalize()));
    }
}
