use std::env;
use std::process;

use nix::sys::signal::{kill, Signal};
use nix::unistd::Pid;

use crate::error::ShellError;
use crate::state::ShellState;

/// `cd` — change the interpreter's working directory. With no argument the
/// target is the home directory; extra arguments are ignored. Failure is
/// reported by the caller and the interpreter carries on.
pub fn run_cd(state: &ShellState, args: &[String]) -> Result<(), ShellError> {
    let target = args
        .first()
        .map(String::as_str)
        .unwrap_or(state.home_dir.as_str());

    env::set_current_dir(target).map_err(|e| ShellError::ChangeDir(target.to_string(), e))
}

/// `exit` — also the end-of-input path, where `args` is empty. Validates
/// before signaling anyone, then sends SIGINT to the whole process group as
/// best-effort cleanup of still-running children. The interpreter itself
/// rides that signal out on its no-op disposition and terminates with the
/// resolved status.
pub fn run_exit(state: &ShellState, args: &[String]) -> ! {
    let status = match parse_exit_status(args) {
        Ok(Some(status)) => status,
        Ok(None) => state.last_foreground_status.parse().unwrap_or(0),
        Err(msg) => {
            eprintln!("exit: {}", msg);
            process::exit(2);
        }
    };

    if let Err(e) = kill(Pid::from_raw(0), Signal::SIGINT) {
        eprintln!("kill: {}", e);
        process::exit(2);
    }

    eprint!("\nexit\n");
    process::exit(status);
}

/// `Ok(None)` means no argument was given and the last foreground status
/// applies. More than one argument, or a non-integer, is a usage error.
pub fn parse_exit_status(args: &[String]) -> Result<Option<i32>, String> {
    if args.len() > 1 {
        return Err("too many arguments".to_string());
    }
    match args.first() {
        None => Ok(None),
        Some(arg) => arg
            .parse::<i32>()
            .map(Some)
            .map_err(|_| format!("argument is not an integer: {}", arg)),
    }
}
