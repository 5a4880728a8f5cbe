//! Deferred signal requests.
//!
//! SIGUSR1 requests an immediate resync, SIGTERM a graceful stop. The
//! handlers do nothing but store into one atomic flag each, which keeps
//! them async-signal-safe under arbitrary interruption: no I/O, no
//! allocation, no locking. The scheduler blocks both signals for the
//! duration of a pass, so the flags cannot change while the pass runs;
//! whatever arrived in the meantime is delivered synchronously when the
//! signals are unblocked, and the scheduler reads the flags right after.
//! The blocked window is the only synchronization in the process; it stands
//! in for a mutex between the single scheduling thread and signal delivery.

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};

static RESYNC_REQUESTED: AtomicBool = AtomicBool::new(false);
static STOP_REQUESTED: AtomicBool = AtomicBool::new(false);

extern "C" fn handle_sigusr1(_signum: libc::c_int) {
    RESYNC_REQUESTED.store(true, Ordering::SeqCst);
}

extern "C" fn handle_sigterm(_signum: libc::c_int) {
    STOP_REQUESTED.store(true, Ordering::SeqCst);
}

/// Installs the SIGUSR1 and SIGTERM handlers.
pub fn install_handlers() -> io::Result<()> {
    install(libc::SIGUSR1, handle_sigusr1 as libc::sighandler_t)?;
    install(libc::SIGTERM, handle_sigterm as libc::sighandler_t)
}

fn install(signum: libc::c_int, handler: libc::sighandler_t) -> io::Result<()> {
    // SAFETY: the handler only stores into an atomic. SA_RESTART matches
    // the BSD semantics of signal(2); sleep(3) still returns early when a
    // handler runs, which is what interrupts the nap between passes.
    unsafe {
        let mut action: libc::sigaction = std::mem::zeroed();
        action.sa_sigaction = handler;
        action.sa_flags = libc::SA_RESTART;
        libc::sigemptyset(&mut action.sa_mask);
        if libc::sigaction(signum, &action, std::ptr::null_mut()) != 0 {
            return Err(io::Error::last_os_error());
        }
    }
    Ok(())
}

fn sync_signal_set() -> io::Result<libc::sigset_t> {
    // SAFETY: sigemptyset and sigaddset write only into the local set.
    unsafe {
        let mut set: libc::sigset_t = std::mem::zeroed();
        if libc::sigemptyset(&mut set) != 0
            || libc::sigaddset(&mut set, libc::SIGUSR1) != 0
            || libc::sigaddset(&mut set, libc::SIGTERM) != 0
        {
            return Err(io::Error::last_os_error());
        }
        Ok(set)
    }
}

/// Blocks SIGUSR1 and SIGTERM. Delivery is deferred, never discarded.
pub fn block_sync_signals() -> io::Result<()> {
    mask(libc::SIG_BLOCK)
}

/// Unblocks SIGUSR1 and SIGTERM.
///
/// Anything that arrived while the window was closed is delivered before
/// this returns, so the flags reflect mid-pass requests immediately after.
pub fn unblock_sync_signals() -> io::Result<()> {
    mask(libc::SIG_UNBLOCK)
}

fn mask(how: libc::c_int) -> io::Result<()> {
    let set = sync_signal_set()?;
    // SAFETY: the set was initialized by sigemptyset above.
    if unsafe { libc::sigprocmask(how, &set, std::ptr::null_mut()) } != 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(())
}

/// True if a resync was requested since the last clear.
#[must_use]
pub fn resync_requested() -> bool {
    RESYNC_REQUESTED.load(Ordering::SeqCst)
}

/// True if a graceful stop was requested.
#[must_use]
pub fn stop_requested() -> bool {
    STOP_REQUESTED.load(Ordering::SeqCst)
}

/// Clears the resync request.
///
/// Called exactly once per completed pass, while delivery is still blocked,
/// so a request that arrives mid-pass survives the clear and earns its own
/// pass.
pub fn clear_resync_request() {
    RESYNC_REQUESTED.store(false, Ordering::SeqCst);
}

/// Zeroes both request flags.
///
/// The scheduler does this once before its first iteration so that stale
/// requests from a previous run cannot leak into a fresh one.
pub(crate) fn reset_requests() {
    RESYNC_REQUESTED.store(false, Ordering::SeqCst);
    STOP_REQUESTED.store(false, Ordering::SeqCst);
}

#[cfg(test)]
pub(crate) fn tests_deliver_sigusr1() {
    handle_sigusr1(libc::SIGUSR1);
}

#[cfg(test)]
pub(crate) fn tests_deliver_sigterm() {
    handle_sigterm(libc::SIGTERM);
}

#[cfg(test)]
pub(crate) static TEST_FLAG_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handlers_only_set_their_flag() {
        let _guard = TEST_FLAG_LOCK.lock().expect("flag lock");
        reset_requests();

        handle_sigusr1(libc::SIGUSR1);
        assert!(resync_requested());
        assert!(!stop_requested());

        handle_sigterm(libc::SIGTERM);
        assert!(resync_requested());
        assert!(stop_requested());
    }

    #[test]
    fn clearing_the_resync_request_leaves_stop_untouched() {
        let _guard = TEST_FLAG_LOCK.lock().expect("flag lock");
        reset_requests();

        handle_sigusr1(libc::SIGUSR1);
        handle_sigterm(libc::SIGTERM);
        clear_resync_request();
        assert!(!resync_requested());
        assert!(stop_requested());
    }

    #[test]
    fn install_handlers_succeeds() {
        install_handlers().expect("handlers install");
    }

    #[test]
    fn block_and_unblock_round_trip() {
        block_sync_signals().expect("block succeeds");
        unblock_sync_signals().expect("unblock succeeds");
    }
}
