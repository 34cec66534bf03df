use nix::libc::c_int;
use nix::sys::signal::{SaFlags, SigAction, SigHandler, SigSet, Signal, sigaction};

extern "C" fn on_interrupt(_signal: c_int) {}

/// Keep Ctrl-C from terminating the interpreter.
///
/// A handler (rather than ignoring the signal) is installed so that `exec` resets
/// it: children still get the default SIGINT behaviour. Blocking reads and waits
/// interrupted by the signal are restarted.
pub fn install_interrupt_handler() -> nix::Result<()> {
    let action = SigAction::new(
        SigHandler::Handler(on_interrupt),
        SaFlags::SA_RESTART,
        SigSet::empty(),
    );
    // SAFETY: the handler does nothing, so it is async-signal-safe.
    unsafe { sigaction(Signal::SIGINT, &action) }?;
    Ok(())
}
