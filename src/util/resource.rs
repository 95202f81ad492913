//! Hardware parallelism detection
//!
//! The executor sizes its pool to the number of hardware execution units.
//! The count is detected once per process and cached.

use std::sync::OnceLock;

static PARALLELISM: OnceLock<usize> = OnceLock::new();

/// Number of hardware execution units available to this process
///
/// Uses the logical CPU count from the `num_cpus` crate, never less than 1.
pub fn available_parallelism() -> usize {
    *PARALLELISM.get_or_init(|| num_cpus::get().max(1))
}

/// Number of physical cores, for diagnostics
pub fn physical_cores() -> usize {
    num_cpus::get_physical().max(1)
}
