//! Exit-status and signal passthrough.
//!
//! The launcher waits for exactly one child. When the child exits, the
//! launcher exits with the same code. When the child is killed by a signal,
//! the launcher restores that signal's default disposition and raises it
//! against itself, so the invoking shell observes a signal death rather than
//! a translated numeric status.

use rqlup_core::Termination;

/// Terminate the current process the same way the child terminated.
pub fn propagate(termination: Termination) -> ! {
    match termination {
        Termination::Exited(code) => std::process::exit(code),
        Termination::Signaled(sig) => reraise(sig),
    }
}

#[cfg(unix)]
fn reraise(sig: i32) -> ! {
    use nix::sys::signal::{raise, sigaction, SaFlags, SigAction, SigHandler, SigSet, Signal};

    if let Ok(signal) = Signal::try_from(sig) {
        let default = SigAction::new(SigHandler::SigDfl, SaFlags::empty(), SigSet::empty());
        // SAFETY: installing SIG_DFL does not run any code in signal context.
        #[allow(unsafe_code)]
        let _ = unsafe { sigaction(signal, &default) };
        let mut mask = SigSet::empty();
        mask.add(signal);
        let _ = mask.thread_unblock();
        tracing::debug!(signal = %signal, "re-raising child's terminating signal");
        let _ = raise(signal);
    }
    // Ignored or non-fatal signal: fall back to the shell convention.
    std::process::exit(128 + sig)
}

#[cfg(not(unix))]
fn reraise(sig: i32) -> ! {
    std::process::exit(128 + sig)
}

/// Ignores SIGINT and SIGQUIT while the child runs; restores on drop.
///
/// The terminal sends these to the whole foreground process group. Only the
/// child should react; the launcher learns the outcome from `wait`.
/// Install before spawning and call [`restore_in_child`] on the command:
/// ignored dispositions survive `exec`.
///
/// [`restore_in_child`]: InteractiveSignalGuard::restore_in_child
#[cfg(unix)]
pub struct InteractiveSignalGuard {
    saved: Vec<(nix::sys::signal::Signal, nix::sys::signal::SigAction)>,
}

#[cfg(unix)]
impl InteractiveSignalGuard {
    pub fn install() -> Self {
        use nix::sys::signal::{sigaction, SaFlags, SigAction, SigHandler, SigSet, Signal};

        let ignore = SigAction::new(SigHandler::SigIgn, SaFlags::empty(), SigSet::empty());
        let mut saved = Vec::new();
        for signal in [Signal::SIGINT, Signal::SIGQUIT] {
            // SAFETY: SIG_IGN installs no handler code.
            #[allow(unsafe_code)]
            let previous = unsafe { sigaction(signal, &ignore) };
            match previous {
                Ok(previous) => saved.push((signal, previous)),
                Err(e) => tracing::warn!(signal = %signal, error = %e, "could not ignore signal"),
            }
        }
        Self { saved }
    }

    /// Reinstate the saved dispositions in `cmd`'s child between fork and exec.
    pub fn restore_in_child(&self, cmd: &mut std::process::Command) {
        use std::os::unix::process::CommandExt;

        let saved = self.saved.clone();
        // SAFETY: the hook only calls sigaction, which is async-signal-safe,
        // and does not allocate.
        #[allow(unsafe_code)]
        unsafe {
            cmd.pre_exec(move || {
                for (signal, previous) in &saved {
                    nix::sys::signal::sigaction(*signal, previous).map_err(std::io::Error::from)?;
                }
                Ok(())
            });
        }
    }
}

#[cfg(unix)]
impl Drop for InteractiveSignalGuard {
    fn drop(&mut self) {
        for (signal, previous) in self.saved.drain(..) {
            // SAFETY: restores the disposition that was in place before `install`.
            #[allow(unsafe_code)]
            let _ = unsafe { nix::sys::signal::sigaction(signal, &previous) };
        }
    }
}

#[cfg(not(unix))]
pub struct InteractiveSignalGuard;

#[cfg(not(unix))]
impl InteractiveSignalGuard {
    pub fn install() -> Self {
        InteractiveSignalGuard
    }

    pub fn restore_in_child(&self, _cmd: &mut std::process::Command) {}
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::os::unix::process::ExitStatusExt;
    use std::process::Command;

    const HELPER_ENV: &str = "RQLUP_TEST_PROPAGATE";

    /// Runs only when re-executed by the tests below.
    #[test]
    fn test_propagate_helper() {
        let Ok(spec) = std::env::var(HELPER_ENV) else {
            return;
        };
        let termination = match spec.split_once(':') {
            Some(("exit", code)) => Termination::Exited(code.parse().unwrap()),
            Some(("signal", sig)) => Termination::Signaled(sig.parse().unwrap()),
            _ => panic!("bad helper spec {spec:?}"),
        };
        propagate(termination);
    }

    fn run_helper(spec: &str) -> std::process::ExitStatus {
        let _lock = crate::TEST_SIGNAL_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        Command::new(std::env::current_exe().unwrap())
            .args([
                "--exact",
                "signal::tests::test_propagate_helper",
                "--test-threads=1",
                "--quiet",
            ])
            .env(HELPER_ENV, spec)
            .status()
            .unwrap()
    }

    #[test]
    fn test_propagate_exit_code() {
        let status = run_helper("exit:42");
        assert_eq!(status.code(), Some(42));
    }

    #[test]
    fn test_propagate_redelivers_signal() {
        let status = run_helper("signal:15");
        assert_eq!(status.code(), None);
        assert_eq!(status.signal(), Some(15));
    }

    #[test]
    fn test_propagate_sigint() {
        let status = run_helper("signal:2");
        assert_eq!(status.signal(), Some(2));
    }

    #[test]
    fn test_guard_restores_disposition() {
        use nix::sys::signal::{sigaction, SaFlags, SigAction, SigHandler, SigSet, Signal};

        let _lock = crate::TEST_SIGNAL_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        {
            let _guard = InteractiveSignalGuard::install();
        }
        let probe = SigAction::new(SigHandler::SigDfl, SaFlags::empty(), SigSet::empty());
        #[allow(unsafe_code)]
        let current = unsafe { sigaction(Signal::SIGQUIT, &probe) }.unwrap();
        assert_eq!(current.handler(), SigHandler::SigDfl);
    }
}
