use libc::{c_int, sighandler_t, SA_RESTART, SIGINT, SIGTSTP};

use crate::process::ProcessError;

pub extern "C" fn handle_noop(_: c_int) {
    // Delivery must neither kill nor suspend the interpreter; children get
    // their reaction back when execvp resets caught signals to default.
}

/// The interpreter's signal dispositions form a two-state machine.
///
/// Baseline: SIGINT and SIGTSTP run `handle_noop` with `SA_RESTART`, so a
/// blocking `waitpid` rides out any delivery. Read phase: SIGINT's handler
/// is re-installed without `SA_RESTART`, so only the blocking line-read
/// aborts with an interruption indication. `enter_read`/`leave_read`
/// bracket every read.
pub struct SignalDiscipline;

impl SignalDiscipline {
    /// Installs the baseline dispositions. Failure here is fatal to the
    /// interpreter; nothing can run safely without them.
    pub fn install_baseline() -> Result<Self, ProcessError> {
        install(SIGINT, SA_RESTART)?;
        install(SIGTSTP, SA_RESTART)?;
        Ok(SignalDiscipline)
    }

    pub fn enter_read(&mut self) -> Result<(), ProcessError> {
        install(SIGINT, 0)
    }

    pub fn leave_read(&mut self) -> Result<(), ProcessError> {
        install(SIGINT, SA_RESTART)
    }
}

fn install(signum: c_int, flags: c_int) -> Result<(), ProcessError> {
    let mut action: libc::sigaction = unsafe { std::mem::zeroed() };
    action.sa_sigaction = handle_noop as sighandler_t;
    action.sa_flags = flags;

    unsafe {
        libc::sigfillset(&mut action.sa_mask);
        if libc::sigaction(signum, &action, std::ptr::null_mut()) < 0 {
            return Err(ProcessError::Signal(
                std::io::Error::last_os_error().to_string(),
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_discipline_toggles() {
        let mut discipline = SignalDiscipline::install_baseline().expect("baseline");
        discipline.enter_read().expect("enter read");
        discipline.leave_read().expect("leave read");
    }
}
