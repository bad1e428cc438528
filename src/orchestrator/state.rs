/// Where the orchestrator is in its load lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouterPhase {
    Uninitialized,
    DefaultRoutesInstalled,
    NotLoaded,
    Loading,
    Loaded,
}

/// Mutable state owned by the orchestrator; collaborators only ever see snapshots
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrchestratorState {
    pub routes_loaded: bool,
    pub default_routes_installed: bool,
    pub pending_navigation: Option<String>,
    /// Loads currently awaiting the loader (overlapping guards may start several)
    pub loads_in_flight: usize,
    pub loads_started: usize,
}

impl OrchestratorState {
    pub fn phase(&self) -> RouterPhase {
        if !self.default_routes_installed {
            RouterPhase::Uninitialized
        } else if self.loads_in_flight > 0 {
            RouterPhase::Loading
        } else if self.routes_loaded {
            RouterPhase::Loaded
        } else if self.loads_started == 0 {
            RouterPhase::DefaultRoutesInstalled
        } else {
            RouterPhase::NotLoaded
        }
    }
}
