//! Cycle basis configuration.

/// Knobs for [`CycleBasis::compute`](crate::CycleBasis::compute).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleBasisConfig {
    /// Step cap for each tree path search. `None` uses
    /// [`default_step_limit`](crate::path::default_step_limit), which no
    /// consistent forest can exceed.
    pub max_path_steps: Option<usize>,
    /// Run the per-closing-edge path searches on the rayon pool.
    /// Output is identical either way.
    pub parallel: bool,
}

impl Default for CycleBasisConfig {
    fn default() -> Self {
        Self {
            max_path_steps: None,
            parallel: true,
        }
    }
}

impl CycleBasisConfig {
    pub fn sequential() -> Self {
        Self {
            parallel: false,
            ..Self::default()
        }
    }
}
