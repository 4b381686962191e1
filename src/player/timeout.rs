use std::collections::HashMap;

use crate::director::lingo::datum::TimeoutRef;

use super::DatumRef;

pub struct TimeoutManager {
    pub timeouts: HashMap<TimeoutRef, Timeout>,
}

pub struct Timeout {
    pub name: TimeoutRef,
    pub period: u32,
    pub handler: String,
    pub target_ref: DatumRef,
    pub is_scheduled: bool,
    pub scheduled_at_ms: Option<i64>,
}

impl TimeoutManager {
    pub fn new() -> TimeoutManager {
        TimeoutManager {
            timeouts: HashMap::new(),
        }
    }

    pub fn add_timeout(&mut self, timeout: Timeout) {
        self.timeouts.insert(timeout.name.to_owned(), timeout);
    }

    #[allow(dead_code)]
    pub fn forget_timeout(&mut self, timeout_name: &TimeoutRef) {
        let timeout = &mut self.timeouts.remove(timeout_name);
        if let Some(timeout) = timeout {
            timeout.cancel();
        }
    }

    #[allow(dead_code)]
    pub fn get_timeout(&self, timeout_name: &TimeoutRef) -> Option<&Timeout> {
        self.timeouts.get(timeout_name)
    }

    pub fn get_timeout_mut(&mut self, timeout_name: &TimeoutRef) -> Option<&mut Timeout> {
        self.timeouts.get_mut(timeout_name)
    }

    pub fn clear(&mut self) {
        for (_, timeout) in self.timeouts.iter_mut() {
            timeout.cancel();
        }
        self.timeouts.clear();
    }

    /// Timeouts due at `now_ms`, rescheduling each for its next period.
    /// Polled once per `Engine::tick` instead of a browser `setTimeout`.
    pub fn poll_due(&mut self, now_ms: i64) -> Vec<TimeoutRef> {
        let mut due = vec![];
        for (name, timeout) in self.timeouts.iter_mut() {
            if timeout.is_due(now_ms) {
                due.push(name.clone());
                timeout.scheduled_at_ms = Some(now_ms);
            }
        }
        due
    }
}

impl Timeout {
    pub fn cancel(&mut self) {
        self.is_scheduled = false;
        self.scheduled_at_ms = None;
    }

    pub fn schedule(&mut self, now_ms: i64) {
        self.is_scheduled = true;
        self.scheduled_at_ms = Some(now_ms);
    }

    pub fn is_due(&self, now_ms: i64) -> bool {
        self.is_scheduled
            && self
                .scheduled_at_ms
                .is_some_and(|at| now_ms.saturating_sub(at) >= self.period as i64)
    }
}
