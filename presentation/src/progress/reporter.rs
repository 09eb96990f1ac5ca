//! Progress reporting for in-flight requests
//!
//! Both reporters observe session snapshots and react when a busy flag
//! is raised or lowered.

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use stack_application::SessionObserver;
use stack_domain::{BusyFlags, OperationKind, Session};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

const KINDS: [OperationKind; 3] = [
    OperationKind::Compare,
    OperationKind::FollowUp,
    OperationKind::Assess,
];

/// What is in flight, for display
fn activity(session: &Session, kind: OperationKind) -> String {
    let names = session
        .pair()
        .map(|p| format!("{} and {}", p.agent1_name, p.agent2_name))
        .unwrap_or_else(|| "both agents".to_string());
    match kind {
        OperationKind::Compare => format!("Asking {}", names),
        OperationKind::FollowUp => {
            let index = session
                .turns()
                .last()
                .map(|t| t.index())
                .unwrap_or_default();
            format!("Follow-up {} with {}", index, names)
        }
        OperationKind::Assess => format!("Cross-assessing {}", names),
    }
}

/// Reports in-flight requests with an animated spinner
pub struct ProgressReporter {
    spinner: Mutex<Option<ProgressBar>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            spinner: Mutex::new(None),
        }
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg} {elapsed:.dim}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    fn message(session: &Session) -> Option<String> {
        let busy = session.busy();
        let active: Vec<String> = KINDS
            .into_iter()
            .filter(|kind| busy.is_set(*kind))
            .map(|kind| activity(session, kind))
            .collect();
        (!active.is_empty()).then(|| active.join(" · "))
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionObserver for ProgressReporter {
    fn on_snapshot(&self, session: &Session) {
        let mut spinner = self.spinner.lock().unwrap_or_else(PoisonError::into_inner);
        match (Self::message(session), spinner.as_ref()) {
            (Some(message), Some(pb)) => pb.set_message(message),
            (Some(message), None) => {
                let pb = ProgressBar::new_spinner();
                pb.set_style(Self::spinner_style());
                pb.set_message(message);
                pb.enable_steady_tick(Duration::from_millis(100));
                *spinner = Some(pb);
            }
            (None, _) => {
                if let Some(pb) = spinner.take() {
                    pb.finish_and_clear();
                }
            }
        }
    }
}

/// Simple text-based progress (no fancy UI)
pub struct SimpleProgress {
    last: Mutex<BusyFlags>,
}

impl SimpleProgress {
    pub fn new() -> Self {
        Self {
            last: Mutex::new(BusyFlags::default()),
        }
    }
}

impl Default for SimpleProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionObserver for SimpleProgress {
    fn on_snapshot(&self, session: &Session) {
        let now = session.busy();
        let mut last = self.last.lock().unwrap_or_else(PoisonError::into_inner);
        for kind in KINDS {
            match (last.is_set(kind), now.is_set(kind)) {
                (false, true) => eprintln!("{} {}...", "->".cyan(), activity(session, kind)),
                (true, false) => eprintln!("  {} {} done", "v".green(), kind),
                _ => {}
            }
        }
        *last = now;
    }
}
