//! Recording command runner for tests.
//!
//! Captures every invocation and replays configured outcomes instead of
//! spawning processes. An optional side effect lets a fake `git clone`
//! or `tar -x` leave files behind the way the real tools would.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::RwLock;

use crate::error::{GpcError, GpcResult};
use crate::runner::CommandRunner;

type SideEffect = Arc<dyn Fn(&CapturedCommand) -> GpcResult<()> + Send + Sync>;

/// One recorded invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedCommand {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: Option<PathBuf>,
}

/// Fake [`CommandRunner`].
#[derive(Clone, Default)]
pub struct MockCommandRunner {
    calls: Arc<RwLock<Vec<CapturedCommand>>>,
    failures: Arc<RwLock<VecDeque<String>>>,
    side_effect: Option<SideEffect>,
}

impl MockCommandRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next call fail with `message`.
    pub fn fail_next(self, message: impl Into<String>) -> Self {
        self.failures.write().push_back(message.into());
        self
    }

    /// Run `effect` on every successful call.
    pub fn with_side_effect<F>(mut self, effect: F) -> Self
    where
        F: Fn(&CapturedCommand) -> GpcResult<()> + Send + Sync + 'static,
    {
        self.side_effect = Some(Arc::new(effect));
        self
    }

    pub fn calls(&self) -> Vec<CapturedCommand> {
        self.calls.read().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.read().len()
    }
}

impl CommandRunner for MockCommandRunner {
    fn run(&self, program: &str, args: &[String], cwd: Option<&Path>) -> GpcResult<()> {
        let call = CapturedCommand {
            program: program.to_string(),
            args: args.to_vec(),
            cwd: cwd.map(Path::to_path_buf),
        };
        self.calls.write().push(call.clone());

        if let Some(message) = self.failures.write().pop_front() {
            return Err(GpcError::CommandSpawn {
                program: program.to_string(),
                source: std::io::Error::other(message),
            });
        }

        match &self.side_effect {
            Some(effect) => effect(&call),
            None => Ok(()),
        }
    }
}
