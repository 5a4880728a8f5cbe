//! Signal-aware scheduling of synchronization passes.
//!
//! The loop alternates between an interruptible sleep and one engine pass.
//! SIGUSR1 and SIGTERM stay deliverable during the sleep and are blocked for
//! the duration of a pass, so the request flags cannot change while a pass
//! runs. The resync flag is cleared inside the blocked window, after the
//! pass; only then is delivery reopened, and the flags are read immediately
//! afterwards. That ordering gives the documented precedence: a resync
//! request arriving during a pass always earns one more full pass before a
//! pending stop is honored, and chained requests extend the series until a
//! pass completes with no resync requested.

use crate::config::DaemonConfig;
use crate::error::DaemonError;
use crate::signal;
use logging_sink::LogSink;
use std::path::Path;

/// Runs the scheduler until a stop request is honored.
///
/// Never returns on its own otherwise; synchronization failures are logged
/// with the pass status and retried on the next scheduled pass.
pub fn run(
    source: &Path,
    destination: &Path,
    config: &DaemonConfig,
    log: &dyn LogSink,
) -> Result<(), DaemonError> {
    signal::reset_requests();
    let interval = sleep_seconds(config);
    loop {
        if !signal::resync_requested() {
            log.line("falling asleep");
            let unslept = interruptible_sleep(interval);
            log.line(&format!("waking up; slept {} s", interval - unslept));
            if signal::stop_requested() && !signal::resync_requested() {
                break;
            }
        }

        signal::block_sync_signals().map_err(DaemonError::BlockSignals)?;
        let status = match engine::synchronize(source, destination, config.sync_options(), log) {
            Ok(()) => 0,
            Err(error) => error.code(),
        };
        log.line(&format!("finishing synchronization; {status}"));
        // The clear must precede the unblock: requests deferred during the
        // pass are delivered by the unblock and must survive into the next
        // iteration's decision.
        signal::clear_resync_request();
        signal::unblock_sync_signals().map_err(DaemonError::UnblockSignals)?;

        if should_stop() {
            break;
        }
    }
    Ok(())
}

/// Stop is honored only when no resync is pending.
pub(crate) fn should_stop() -> bool {
    signal::stop_requested() && !signal::resync_requested()
}

fn sleep_seconds(config: &DaemonConfig) -> u32 {
    u32::try_from(config.interval().as_secs()).unwrap_or(u32::MAX)
}

/// Sleeps up to `seconds`, returning the unslept remainder when a signal
/// handler cuts the nap short.
fn interruptible_sleep(seconds: u32) -> u32 {
    // SAFETY: sleep(3) has no preconditions.
    unsafe { libc::sleep(seconds) }
}
