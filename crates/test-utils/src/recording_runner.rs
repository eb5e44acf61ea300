use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use pollwatch::config::CommandSpec;
use pollwatch::exec::{CommandOutcome, CommandRunner};

/// A fake runner that:
/// - records every command it was asked to run
/// - immediately returns a fixed outcome without spawning anything.
#[derive(Debug, Clone)]
pub struct RecordingRunner {
    executed: Arc<Mutex<Vec<CommandSpec>>>,
    outcome: CommandOutcome,
}

impl RecordingRunner {
    /// Runner whose every invocation exits with status 0.
    pub fn new() -> Self {
        Self::with_outcome(CommandOutcome::Exited(0))
    }

    /// Runner whose every invocation reports `outcome`.
    pub fn with_outcome(outcome: CommandOutcome) -> Self {
        Self {
            executed: Arc::new(Mutex::new(Vec::new())),
            outcome,
        }
    }

    /// Shared handle to the list of executed commands.
    pub fn executed(&self) -> Arc<Mutex<Vec<CommandSpec>>> {
        Arc::clone(&self.executed)
    }

    pub fn count(&self) -> usize {
        self.executed.lock().unwrap().len()
    }
}

impl Default for RecordingRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandRunner for RecordingRunner {
    fn run<'a>(
        &'a mut self,
        spec: &'a CommandSpec,
    ) -> Pin<Box<dyn Future<Output = CommandOutcome> + Send + 'a>> {
        let executed = Arc::clone(&self.executed);
        let outcome = self.outcome;

        Box::pin(async move {
            executed.lock().unwrap().push(spec.clone());
            outcome
        })
    }
}
