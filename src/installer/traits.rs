// SPDX-License-Identifier: GPL-3.0-only

/// Receives human-readable progress lines as a download advances
///
/// Implementations must be cheap and non-blocking; the orchestrator calls
/// this synchronously at every state transition.
pub trait StatusSink: Send + Sync {
    fn report_status(&self, status: &str);
}
