use engine::{SyncMode, SyncOptions};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default sleep interval between passes.
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(5 * 60);

/// Runtime configuration, immutable for the daemon's lifetime.
///
/// The scheduler reads it on every iteration and hands the engine-facing
/// subset down by value on each pass.
#[derive(Clone, Debug)]
pub struct DaemonConfig {
    source: PathBuf,
    destination: PathBuf,
    interval: Duration,
    mode: SyncMode,
    threshold: u64,
}

impl DaemonConfig {
    /// Starts building a configuration for the given directory pair.
    pub fn builder(
        source: impl Into<PathBuf>,
        destination: impl Into<PathBuf>,
    ) -> DaemonConfigBuilder {
        DaemonConfigBuilder {
            source: source.into(),
            destination: destination.into(),
            interval: DEFAULT_INTERVAL,
            mode: SyncMode::Flat,
            threshold: u64::MAX,
        }
    }

    /// Source directory, the tree that wins every reconciliation.
    #[must_use]
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Destination directory, the tree being made to match.
    #[must_use]
    pub fn destination(&self) -> &Path {
        &self.destination
    }

    /// Sleep interval between passes.
    #[must_use]
    pub const fn interval(&self) -> Duration {
        self.interval
    }

    /// Flat or recursive reconciliation.
    #[must_use]
    pub const fn mode(&self) -> SyncMode {
        self.mode
    }

    /// Minimal size at which a file is copied through a memory mapping.
    #[must_use]
    pub const fn threshold(&self) -> u64 {
        self.threshold
    }

    /// Pass options handed to the engine.
    #[must_use]
    pub const fn sync_options(&self) -> SyncOptions {
        SyncOptions {
            threshold: self.threshold,
            mode: self.mode,
        }
    }
}

/// Builder for [`DaemonConfig`]; unset fields keep the documented defaults:
/// a 300 second interval, flat reconciliation, and a threshold high enough
/// that every file takes the buffered strategy.
#[derive(Clone, Debug)]
pub struct DaemonConfigBuilder {
    source: PathBuf,
    destination: PathBuf,
    interval: Duration,
    mode: SyncMode,
    threshold: u64,
}

impl DaemonConfigBuilder {
    /// Overrides the sleep interval between passes.
    #[must_use]
    pub const fn interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Enables or disables recursive reconciliation.
    #[must_use]
    pub const fn recursive(mut self, recursive: bool) -> Self {
        self.mode = if recursive {
            SyncMode::Recursive
        } else {
            SyncMode::Flat
        };
        self
    }

    /// Overrides the big-file threshold in bytes.
    #[must_use]
    pub const fn threshold(mut self, threshold: u64) -> Self {
        self.threshold = threshold;
        self
    }

    /// Finalizes the configuration.
    #[must_use]
    pub fn build(self) -> DaemonConfig {
        DaemonConfig {
            source: self.source,
            destination: self.destination,
            interval: self.interval,
            mode: self.mode,
            threshold: self.threshold,
        }
    }
}
