//! Stack growth for recursive walks over nested types.
//!
//! Type shapes nest arbitrarily (`map[string][]*[4]map[int]T`), and both the
//! graph builder and strategy resolver recurse over them.

/// Keep at least this much stack available before recursing.
const RED_ZONE: usize = 64 * 1024;

/// Grow by this much when the red zone is hit.
const STACK_PER_RECURSION: usize = 1024 * 1024;

#[inline]
pub(crate) fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}
