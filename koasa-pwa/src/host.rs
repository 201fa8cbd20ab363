//! Worker host.
//!
//! Page-side registration table for service workers: lifecycle state
//! per registration, scope matching for fetch routing, and the update
//! check cadence. The host participates in the platform's worker
//! lifecycle (`Parsed → Installing → Waiting → Activated → Redundant`)
//! without reimplementing it.

use std::collections::BTreeMap;

use crate::worker::WorkerMessage;

// ── Types ───────────────────────────────────────────────────

/// Unique identifier for a worker registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WorkerId(pub u64);

/// Worker lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    /// Script parsed, not yet installed.
    Parsed,
    /// `install` in progress.
    Installing,
    /// Installed, waiting for old clients to go away.
    Waiting,
    /// Controlling clients.
    Activated,
    /// Replaced or unregistered.
    Redundant,
}

/// A single worker registration.
#[derive(Debug, Clone)]
pub struct WorkerRegistration {
    pub id: WorkerId,
    /// URL scope this worker controls.
    pub scope: String,
    /// URL of the worker script.
    pub script_url: String,
    pub state: WorkerState,
    /// Whether immediate activation was requested.
    pub skip_waiting: bool,
    /// Whether the worker claimed the open clients.
    pub clients_claimed: bool,
    /// Registration timestamp (ms).
    pub registered_at: u64,
    /// Last update check timestamp (ms).
    pub last_update_check: u64,
}

/// Registration errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum HostError {
    #[error("worker already registered for this scope")]
    AlreadyRegistered,
    #[error("worker registration not found")]
    NotFound,
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
}

/// Re-check cadence for worker script updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdatePolicy {
    pub interval_ms: u64,
}

impl UpdatePolicy {
    /// The release cadence: re-check every hour.
    pub const HOURLY: UpdatePolicy = UpdatePolicy {
        interval_ms: 3_600_000,
    };
}

impl Default for UpdatePolicy {
    fn default() -> Self {
        Self::HOURLY
    }
}

/// Registration table for one page's workers.
pub struct WorkerHost {
    registrations: BTreeMap<u64, WorkerRegistration>,
    /// scope → registration id for quick lookup.
    scope_index: BTreeMap<String, u64>,
    next_id: u64,
    update_policy: UpdatePolicy,
}

// ── Implementation ──────────────────────────────────────────

impl WorkerHost {
    pub fn new() -> Self {
        Self::with_update_policy(UpdatePolicy::default())
    }

    pub fn with_update_policy(update_policy: UpdatePolicy) -> Self {
        Self {
            registrations: BTreeMap::new(),
            scope_index: BTreeMap::new(),
            next_id: 1,
            update_policy,
        }
    }

    /// Register a worker script for a scope.
    pub fn register(
        &mut self,
        scope: &str,
        script_url: &str,
        now_ms: u64,
    ) -> Result<WorkerId, HostError> {
        if scope.is_empty() || script_url.is_empty() {
            return Err(HostError::InvalidUrl(String::from(
                "empty scope or script URL",
            )));
        }
        if self.scope_index.contains_key(scope) {
            return Err(HostError::AlreadyRegistered);
        }

        let id = WorkerId(self.next_id);
        self.next_id += 1;

        let registration = WorkerRegistration {
            id,
            scope: String::from(scope),
            script_url: String::from(script_url),
            state: WorkerState::Parsed,
            skip_waiting: false,
            clients_claimed: false,
            registered_at: now_ms,
            last_update_check: now_ms,
        };

        self.registrations.insert(id.0, registration);
        self.scope_index.insert(String::from(scope), id.0);

        // Parsed → Installing happens as soon as the script is fetched.
        self.transition(id, WorkerState::Installing);
        log::info!("[SW] registered {} for scope {}", script_url, scope);

        Ok(id)
    }

    /// Unregister by scope; the worker becomes redundant.
    pub fn unregister(&mut self, scope: &str) -> Result<(), HostError> {
        let id = self.scope_index.remove(scope).ok_or(HostError::NotFound)?;
        if let Some(reg) = self.registrations.get_mut(&id) {
            reg.state = WorkerState::Redundant;
        }
        Ok(())
    }

    /// Registration for an exact scope.
    pub fn get_registration(&self, scope: &str) -> Option<&WorkerRegistration> {
        let id = self.scope_index.get(scope)?;
        self.registrations.get(id)
    }

    /// The activated worker controlling a URL: longest matching scope
    /// prefix wins.
    pub fn match_scope(&self, url: &str) -> Option<&WorkerRegistration> {
        let mut best: Option<&WorkerRegistration> = None;
        for reg in self.registrations.values() {
            if reg.state == WorkerState::Activated && url.starts_with(&reg.scope) {
                match best {
                    Some(b) if b.scope.len() >= reg.scope.len() => {}
                    _ => best = Some(reg),
                }
            }
        }
        best
    }

    /// Advance a registration's lifecycle state.
    pub fn transition(&mut self, id: WorkerId, new_state: WorkerState) {
        if let Some(reg) = self.registrations.get_mut(&id.0) {
            reg.state = new_state;
        }
    }

    /// The `install` handler finished: move to `Waiting`, or straight
    /// to `Activated` when immediate activation was requested.
    pub fn on_install_complete(&mut self, id: WorkerId) {
        if let Some(reg) = self.registrations.get_mut(&id.0) {
            if reg.state == WorkerState::Installing {
                reg.state = if reg.skip_waiting {
                    WorkerState::Activated
                } else {
                    WorkerState::Waiting
                };
            }
        }
    }

    /// The `activate` handler finished.
    pub fn on_activate_complete(&mut self, id: WorkerId) {
        if let Some(reg) = self.registrations.get_mut(&id.0) {
            if matches!(reg.state, WorkerState::Installing | WorkerState::Waiting) {
                reg.state = WorkerState::Activated;
            }
        }
    }

    /// Immediate-activation request: a waiting worker activates now.
    pub fn skip_waiting(&mut self, id: WorkerId) {
        if let Some(reg) = self.registrations.get_mut(&id.0) {
            reg.skip_waiting = true;
            if reg.state == WorkerState::Waiting {
                reg.state = WorkerState::Activated;
            }
        }
    }

    /// The worker claimed all in-scope clients.
    pub fn clients_claim(&mut self, id: WorkerId) {
        if let Some(reg) = self.registrations.get_mut(&id.0) {
            reg.clients_claimed = true;
        }
    }

    /// Route a page-posted message to a registration.
    pub fn post_message(&mut self, id: WorkerId, message: WorkerMessage) {
        match message {
            WorkerMessage::SkipWaiting => self.skip_waiting(id),
        }
    }

    /// Whether a registration's periodic update check is due.
    pub fn update_due(&self, id: WorkerId, now_ms: u64) -> bool {
        self.registrations
            .get(&id.0)
            .map(|reg| now_ms.saturating_sub(reg.last_update_check) >= self.update_policy.interval_ms)
            .unwrap_or(false)
    }

    /// Record that an update check ran.
    pub fn mark_update_checked(&mut self, id: WorkerId, now_ms: u64) {
        if let Some(reg) = self.registrations.get_mut(&id.0) {
            reg.last_update_check = now_ms;
        }
    }

    /// All registrations.
    pub fn list(&self) -> Vec<&WorkerRegistration> {
        self.registrations.values().collect()
    }

    pub fn count(&self) -> usize {
        self.registrations.len()
    }
}

impl Default for WorkerHost {
    fn default() -> Self {
        Self::new()
    }
}

// ── Tests ───────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_and_lookup() {
        let mut host = WorkerHost::new();
        let id = host
            .register("https://koasa.example/", "/static/js/service-worker.js", 0)
            .unwrap();
        assert_eq!(id.0, 1);

        let reg = host.get_registration("https://koasa.example/").unwrap();
        assert_eq!(reg.state, WorkerState::Installing);
    }

    #[test]
    fn duplicate_scope_rejected() {
        let mut host = WorkerHost::new();
        host.register("https://koasa.example/", "/sw.js", 0).unwrap();
        let err = host.register("https://koasa.example/", "/sw2.js", 0);
        assert!(matches!(err, Err(HostError::AlreadyRegistered)));
    }

    #[test]
    fn empty_scope_rejected() {
        let mut host = WorkerHost::new();
        assert!(matches!(
            host.register("", "/sw.js", 0),
            Err(HostError::InvalidUrl(_))
        ));
    }

    #[test]
    fn lifecycle_transitions() {
        let mut host = WorkerHost::new();
        let id = host.register("https://koasa.example/", "/sw.js", 0).unwrap();

        host.on_install_complete(id);
        assert_eq!(
            host.get_registration("https://koasa.example/").unwrap().state,
            WorkerState::Waiting
        );

        host.skip_waiting(id);
        assert_eq!(
            host.get_registration("https://koasa.example/").unwrap().state,
            WorkerState::Activated
        );
    }

    #[test]
    fn skip_waiting_before_install_completes() {
        let mut host = WorkerHost::new();
        let id = host.register("https://koasa.example/", "/sw.js", 0).unwrap();

        // The worker script calls skipWaiting() during install.
        host.skip_waiting(id);
        host.on_install_complete(id);

        assert_eq!(
            host.get_registration("https://koasa.example/").unwrap().state,
            WorkerState::Activated
        );
    }

    #[test]
    fn post_message_skip_waiting() {
        let mut host = WorkerHost::new();
        let id = host.register("https://koasa.example/", "/sw.js", 0).unwrap();
        host.on_install_complete(id);

        host.post_message(id, WorkerMessage::SkipWaiting);
        assert_eq!(
            host.get_registration("https://koasa.example/").unwrap().state,
            WorkerState::Activated
        );
    }

    #[test]
    fn unregister_marks_redundant() {
        let mut host = WorkerHost::new();
        let id = host.register("https://koasa.example/", "/sw.js", 0).unwrap();
        host.on_install_complete(id);
        host.skip_waiting(id);

        host.unregister("https://koasa.example/").unwrap();
        assert!(host.get_registration("https://koasa.example/").is_none());
        // Still listed, but redundant — no longer matches any scope.
        assert_eq!(host.list()[0].state, WorkerState::Redundant);
        assert!(host.match_scope("https://koasa.example/panier").is_none());
    }

    #[test]
    fn match_scope_longest_prefix() {
        let mut host = WorkerHost::new();
        let id1 = host.register("https://koasa.example/", "/sw1.js", 0).unwrap();
        let id2 = host
            .register("https://koasa.example/admin/", "/sw2.js", 0)
            .unwrap();

        for id in [id1, id2] {
            host.skip_waiting(id);
            host.on_install_complete(id);
        }

        let matched = host
            .match_scope("https://koasa.example/admin/produits")
            .unwrap();
        assert_eq!(matched.id, id2);
    }

    #[test]
    fn hourly_update_cadence() {
        let mut host = WorkerHost::new();
        let id = host.register("https://koasa.example/", "/sw.js", 1_000).unwrap();

        assert!(!host.update_due(id, 1_000));
        assert!(!host.update_due(id, 3_600_999 - 1));
        assert!(host.update_due(id, 3_601_000));

        host.mark_update_checked(id, 3_601_000);
        assert!(!host.update_due(id, 3_601_001));
        assert!(host.update_due(id, 7_201_000));
    }
}
