/// Runtime knobs for a [`crate::Simulation`].
///
/// Set once at construction. Per-character tuning lives in `sim::constants`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HostSettings {
    /// Live character instances allowed at once. Creation past this fails softly.
    pub max_instances: usize,

    /// Give every new instance a synthetic floor far below it, so a character
    /// that walks off the level still lands somewhere.
    pub world_floor_enabled: bool,
}

impl Default for HostSettings {
    fn default() -> Self {
        Self {
            max_instances: 64,
            world_floor_enabled: true,
        }
    }
}
