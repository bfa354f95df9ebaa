/// An action the [`Scheduler`](crate::scheduler::Scheduler) can run.
pub trait Command: Send + Sync {
    fn name(&self) -> &str;

    /// Whether the command may run while the robot is disabled.
    fn runs_when_disabled(&self) -> bool {
        false
    }

    fn execute(&self);
}

/// Runs its action once and finishes immediately.
pub struct InstantCommand {
    name: String,
    action: Box<dyn Fn() + Send + Sync>,
    runs_when_disabled: bool,
}

impl InstantCommand {
    pub fn new<F>(name: impl Into<String>, action: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            action: Box::new(action),
            runs_when_disabled: false,
        }
    }

    pub fn ignoring_disable(mut self, runs_when_disabled: bool) -> Self {
        self.runs_when_disabled = runs_when_disabled;
        self
    }
}

impl Command for InstantCommand {
    fn name(&self) -> &str {
        &self.name
    }

    fn runs_when_disabled(&self) -> bool {
        self.runs_when_disabled
    }

    fn execute(&self) {
        (self.action)()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_instant_command() {
        let runs = Arc::new(AtomicUsize::new(0));
        let counter = runs.clone();
        let command = InstantCommand::new("Count", move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        assert_eq!(command.name(), "Count");
        assert!(!command.runs_when_disabled());

        command.execute();
        command.execute();
        assert_eq!(runs.load(Ordering::SeqCst), 2);

        assert!(command.ignoring_disable(true).runs_when_disabled());
    }
}
