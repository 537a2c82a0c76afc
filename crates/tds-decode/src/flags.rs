//! Bit-position flag extraction.
//!
//! Several TDS header fields pack independent flags into a single byte.
//! Instead of hand-writing one conditional per flag, callers describe the
//! byte layout as an ordered candidate list and let [`extract_flags`] pick
//! out the flags whose bits are set.

use smallvec::SmallVec;

/// Flags extracted from a single byte. A byte holds at most 8 flags.
pub type FlagSet<F> = SmallVec<[F; 8]>;

/// Return the candidates whose bit is set in `byte`.
///
/// The candidate at index `i` maps to bit `i` (bit 0 is the least
/// significant). A `None` entry reserves that bit position without
/// producing a flag. Candidates past index 7 never match.
///
/// ```
/// use tds_decode::flags::extract_flags;
///
/// let set = extract_flags(0b0000_0101, &[Some('a'), Some('b'), Some('c')]);
/// assert_eq!(set.as_slice(), &['a', 'c']);
/// ```
#[must_use]
pub fn extract_flags<F: Copy>(byte: u8, candidates: &[Option<F>]) -> FlagSet<F> {
    candidates
        .iter()
        .take(u8::BITS as usize)
        .enumerate()
        .filter(|&(bit, _)| byte & (1 << bit) != 0)
        .filter_map(|(_, candidate)| *candidate)
        .collect()
}
