//! # Crash-recovery policy for the worker pool.
//!
//! [`RestartPolicy`] decides what the supervisor does when the pool reports a
//! fatal [`EventKind::PoolFailure`](crate::EventKind::PoolFailure). The decision
//! depends only on whether a stop has already been requested.
//!
//! ```text
//!                      running            stop requested
//! Never            ─► Escalate (stop)   ─► Ignore
//! WhileRunning     ─► Restart           ─► Ignore
//! WhileStopping    ─► Ignore            ─► Restart
//! ```
//!
//! A restart is attempted **once** per failure event. If it fails, the supervisor
//! escalates by calling `stop`.

/// Outcome of a [`RestartPolicy`] decision.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Recovery {
    /// Start the pool again; escalate to `stop` if that fails.
    Restart,
    /// Stop the service.
    Escalate,
    /// Do nothing.
    Ignore,
}

/// Policy controlling pool restarts after a fatal failure.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RestartPolicy {
    /// Never restart: a failure while running stops the service.
    Never,
    /// Restart while the service is running; ignore failures once stopping (default).
    #[default]
    WhileRunning,
    /// Restart only after a stop has been requested.
    WhileStopping,
}

impl RestartPolicy {
    /// Decides how to react to a pool failure.
    ///
    /// # Example
    /// ```
    /// use httpvisor::{Recovery, RestartPolicy};
    ///
    /// assert_eq!(RestartPolicy::WhileRunning.decide(false), Recovery::Restart);
    /// assert_eq!(RestartPolicy::WhileRunning.decide(true), Recovery::Ignore);
    /// ```
    pub fn decide(self, stopping: bool) -> Recovery {
        match (self, stopping) {
            (RestartPolicy::Never, false) => Recovery::Escalate,
            (RestartPolicy::WhileRunning, false) => Recovery::Restart,
            (RestartPolicy::WhileStopping, true) => Recovery::Restart,
            _ => Recovery::Ignore,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(RestartPolicy::Never, false, Recovery::Escalate)]
    #[case(RestartPolicy::Never, true, Recovery::Ignore)]
    #[case(RestartPolicy::WhileRunning, false, Recovery::Restart)]
    #[case(RestartPolicy::WhileRunning, true, Recovery::Ignore)]
    #[case(RestartPolicy::WhileStopping, false, Recovery::Ignore)]
    #[case(RestartPolicy::WhileStopping, true, Recovery::Restart)]
    fn decision_table(
        #[case] policy: RestartPolicy,
        #[case] stopping: bool,
        #[case] expected: Recovery,
    ) {
        assert_eq!(policy.decide(stopping), expected);
    }

    #[test]
    fn default_restarts_while_running() {
        assert_eq!(RestartPolicy::default(), RestartPolicy::WhileRunning);
    }
}
