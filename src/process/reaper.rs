use nix::errno::Errno;
use nix::sys::signal::{kill, Signal};
use nix::sys::wait::{waitpid, WaitPidFlag, WaitStatus};
use nix::unistd::Pid;

use crate::state::ShellState;

/// Non-blocking sweep over every child in the interpreter's process group,
/// run once at the top of each cycle. Finished children are reported,
/// stopped ones are reported, continued, and become the tracked background
/// pid. A child that finishes between sweeps is picked up on the next one.
pub fn reap_background(state: &mut ShellState) {
    let flags = WaitPidFlag::WNOHANG | WaitPidFlag::WUNTRACED;

    loop {
        // Pid 0 targets the caller's own process group, not one tracked pid.
        match waitpid(Pid::from_raw(0), Some(flags)) {
            Ok(WaitStatus::Exited(pid, code)) => {
                eprintln!("Child process {} done. Exit status {}", pid, code);
            }
            Ok(WaitStatus::Signaled(pid, sig, _)) => {
                eprintln!("Child process {} done. Signaled {}.", pid, sig as i32);
            }
            Ok(WaitStatus::Stopped(pid, _)) => {
                eprintln!("Child process {} stopped. Continuing.", pid);
                if let Err(e) = kill(pid, Signal::SIGCONT) {
                    eprintln!("kill: {}", e);
                }
                state.last_background_pid = pid.to_string();
            }
            Ok(WaitStatus::StillAlive) => break,
            Ok(_) => continue,
            Err(Errno::EINTR) => continue,
            Err(Errno::ECHILD) => break,
            Err(e) => {
                eprintln!("waitpid: {}", e);
                break;
            }
        }
    }
}
