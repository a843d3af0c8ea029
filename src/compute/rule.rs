//! Transition kernel for the Rule 30 elementary cellular automaton.
//!
//! Maps each three-cell neighborhood of a row to the next state of its
//! center cell. Neighbors beyond the lattice edges are fixed at the
//! inactive state, so the characteristic pyramid stays free of edge
//! artifacts while the simulated horizon is shorter than half the width.

/// Wolfram encoding of Rule 30: bit `left << 2 | center << 1 | right` of
/// this byte is the successor state of the center cell.
///
/// Truth table: 111→0, 110→0, 101→0, 100→1, 011→1, 010→1, 001→1, 000→0.
pub const RULE_30: u8 = 0b0001_1110;

/// Next state of a cell from its neighborhood.
///
/// Equivalent to `left XOR (center OR right)`. Inputs must be 0 or 1.
#[inline]
pub fn transition(left: u8, center: u8, right: u8) -> u8 {
    let pattern = left << 2 | center << 1 | right;
    (RULE_30 >> pattern) & 1
}

/// Compute cells `[start, start + out.len())` of the successor generation.
///
/// `prev` is the complete prior row; `out` receives one contiguous chunk of
/// the next row. Neighbors outside `prev` read as inactive. Chunks have no
/// dependency on each other, so disjoint output slices of the same row can
/// be filled concurrently.
pub fn step_into(prev: &[u8], start: usize, out: &mut [u8]) {
    let width = prev.len();
    for (offset, cell) in out.iter_mut().enumerate() {
        let i = start + offset;
        let left = if i == 0 { 0 } else { prev[i - 1] };
        let right = if i + 1 < width { prev[i + 1] } else { 0 };
        *cell = transition(left, prev[i], right);
    }
}
