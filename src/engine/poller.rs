// src/engine/poller.rs

use tracing::{debug, info, trace};

use crate::config::WatchConfig;
use crate::errors::Result;
use crate::exec::{CommandOutcome, CommandRunner};
use crate::watch::{ChangeDetector, ExcludeSet, ScanOutcome, TreeWalker, detector_for};

/// Summary of one poll cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleReport {
    /// 1-based cycle number.
    pub cycle: u64,
    pub scan: ScanOutcome,
    /// Set when the scan triggered and the command ran.
    pub command: Option<CommandOutcome>,
}

impl CycleReport {
    pub fn triggered(&self) -> bool {
        self.command.is_some()
    }
}

/// The poll-detect-execute loop.
///
/// Responsibilities:
/// - Walk the tree once per cycle and feed the walk to the detector.
/// - Run the command (and wait for it) when the detector reports a change.
/// - Re-arm the detector after the command, then sleep.
///
/// Walk errors end the loop; command failures never do.
pub struct PollLoop<R: CommandRunner> {
    config: WatchConfig,
    walker: TreeWalker,
    detector: Box<dyn ChangeDetector>,
    runner: R,
    cycles: u64,
    runs: u64,
}

impl<R: CommandRunner> PollLoop<R> {
    /// Build a loop using the detector selected by `config.policy`.
    ///
    /// Fails if an exclude pattern does not compile.
    pub fn new(config: WatchConfig, runner: R) -> Result<Self> {
        let detector = detector_for(config.policy);
        Self::with_detector(config, detector, runner)
    }

    /// Build a loop around an explicit detector.
    pub fn with_detector(
        config: WatchConfig,
        detector: Box<dyn ChangeDetector>,
        runner: R,
    ) -> Result<Self> {
        let exclude = ExcludeSet::build(&config.exclude)?;
        let walker = TreeWalker::new(config.root.clone(), config.recursive, exclude);
        Ok(Self {
            config,
            walker,
            detector,
            runner,
            cycles: 0,
            runs: 0,
        })
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Number of cycles completed so far.
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Number of times the command has been run.
    pub fn runs(&self) -> u64 {
        self.runs
    }

    /// One walk, and the command if the walk found a change. No sleep.
    pub async fn poll_once(&mut self) -> Result<CycleReport> {
        self.cycles += 1;

        let scan = {
            let mut entries = self.walker.entries();
            self.detector.scan(&mut entries)?
        };
        trace!(cycle = self.cycles, ?scan, "scan finished");

        let command = match &scan {
            ScanOutcome::Changed { path, .. } => {
                info!(
                    cycle = self.cycles,
                    path = %path.display(),
                    cmd = %self.config.command,
                    "change detected, running command"
                );
                let outcome = self.runner.run(&self.config.command).await;
                self.runs += 1;
                debug!(?outcome, success = outcome.success(), "command returned");
                self.detector.rearm();
                Some(outcome)
            }
            ScanOutcome::Baseline { visited } => {
                debug!(cycle = self.cycles, visited, "recorded baseline");
                None
            }
            ScanOutcome::Unchanged { .. } => None,
        };

        Ok(CycleReport {
            cycle: self.cycles,
            scan,
            command,
        })
    }

    /// Poll forever, sleeping `config.interval` after every cycle.
    ///
    /// Only returns on a walk error.
    pub async fn run(mut self) -> Result<()> {
        info!(
            root = %self.walker.root().display(),
            recursive = self.walker.is_recursive(),
            policy = ?self.config.policy,
            cmd = %self.config.command,
            "watching"
        );

        loop {
            self.poll_once().await?;
            tokio::time::sleep(self.config.interval).await;
        }
    }
}
