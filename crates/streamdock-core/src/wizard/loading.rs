use super::types::Operation;

/// Tracks the commit in flight to prevent double-dispatch.
///
/// Create and attach share one slot: at most one commit runs at a time.
#[derive(Clone, Debug, Default)]
pub struct LoadingState {
    in_flight: Option<Operation>,
}

impl LoadingState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the slot for `op`. Returns `false` if another commit holds it.
    pub fn begin(&mut self, op: Operation) -> bool {
        if self.in_flight.is_some() {
            return false;
        }
        self.in_flight = Some(op);
        true
    }

    /// Release the slot if `op` holds it.
    pub fn finish(&mut self, op: Operation) {
        if self.in_flight == Some(op) {
            self.in_flight = None;
        }
    }

    pub fn is_loading(&self, op: Operation) -> bool {
        self.in_flight == Some(op)
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.is_some()
    }
}
