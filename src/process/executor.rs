use std::ffi::CString;
use std::fs::{File, OpenOptions};
use std::io;
use std::os::fd::AsRawFd;
use std::os::unix::fs::OpenOptionsExt;
use std::process;

use nix::errno::Errno;
use nix::sys::wait::{waitpid, WaitPidFlag, WaitStatus};
use nix::unistd::{execvp, fork, ForkResult, Pid};

use super::ProcessError;
use crate::parse::Command;
use crate::state::ShellState;

/// Runs one external command. Foreground commands block until the child
/// changes state and leave its result in `last_foreground_status`;
/// background commands record the pid into `last_background_pid` and
/// return immediately.
///
/// Only fork failure (and argv conversion) can surface here: everything
/// that goes wrong after the fork dies with the child and is observed as
/// an exit status.
pub fn execute(cmd: &Command, state: &mut ShellState) -> Result<(), ProcessError> {
    // The C argv is built before forking; the child only redirects and execs.
    let program = CString::new(cmd.program.as_str())?;
    let argv = cmd
        .argv
        .iter()
        .map(|arg| CString::new(arg.as_str()))
        .collect::<Result<Vec<_>, _>>()?;

    match unsafe { fork() }.map_err(ProcessError::Fork)? {
        ForkResult::Child => exec_child(cmd, &program, &argv),
        ForkResult::Parent { child } => {
            if cmd.background {
                state.last_background_pid = child.to_string();
                // One opportunistic poll in case it finished instantly.
                let _ = waitpid(child, Some(WaitPidFlag::WNOHANG));
                Ok(())
            } else {
                wait_foreground(child, state)
            }
        }
    }
}

fn wait_foreground(child: Pid, state: &mut ShellState) -> Result<(), ProcessError> {
    loop {
        match waitpid(child, None) {
            Ok(WaitStatus::Exited(_, code)) => {
                state.last_foreground_status = code.to_string();
                return Ok(());
            }
            Ok(WaitStatus::Signaled(_, sig, _)) => {
                state.last_foreground_status = (128 + sig as i32).to_string();
                return Ok(());
            }
            Ok(_) => continue,
            Err(Errno::EINTR) => continue,
            Err(e) => return Err(ProcessError::Wait(e)),
        }
    }
}

/// Child side of the fork. Applies redirections, then replaces the image.
/// Any failure is reported on stderr and terminates the child with a
/// nonzero status; it never returns to the interpreter's loop.
fn exec_child(cmd: &Command, program: &CString, argv: &[CString]) -> ! {
    if let Some(path) = &cmd.output_path {
        if let Err(e) = redirect_output(path) {
            eprintln!("{}: {}", path, e);
            process::exit(1);
        }
    }
    if let Some(path) = &cmd.input_path {
        if let Err(e) = redirect_input(path) {
            eprintln!("{}: {}", path, e);
            process::exit(1);
        }
    }

    let err = match execvp(program, argv) {
        Ok(never) => match never {},
        Err(e) => e,
    };
    eprintln!("{}: {}", cmd.program, err);
    process::exit(1);
}

fn redirect_output(path: &str) -> io::Result<()> {
    let file = OpenOptions::new()
        .write(true)
        .create(true)
        .append(true)
        .mode(0o777)
        .open(path)?;
    dup_onto(file.as_raw_fd(), libc::STDOUT_FILENO)
}

fn redirect_input(path: &str) -> io::Result<()> {
    let file = File::open(path)?;
    dup_onto(file.as_raw_fd(), libc::STDIN_FILENO)
}

fn dup_onto(fd: libc::c_int, target: libc::c_int) -> io::Result<()> {
    if unsafe { libc::dup2(fd, target) } < 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::parse_words;
    use std::fs;
    use std::path::PathBuf;

    fn command(line: &[&str]) -> Command {
        let words: Vec<String> = line.iter().map(|w| w.to_string()).collect();
        parse_words(&words).expect("parse").expect("command")
    }

    fn temp_path(stem: &str) -> PathBuf {
        std::env::temp_dir().join(format!("arteriole_{}_{}", stem, std::process::id()))
    }

    #[test]
    fn test_foreground_exit_status_recorded() {
        let mut state = ShellState::from_env();
        execute(&command(&["true"]), &mut state).expect("run true");
        assert_eq!(state.last_foreground_status, "0");

        execute(&command(&["false"]), &mut state).expect("run false");
        assert_eq!(state.last_foreground_status, "1");
    }

    #[test]
    fn test_signal_termination_recorded_as_128_plus_signal() {
        let mut state = ShellState::from_env();
        let cmd = command(&["sh", "-c", "kill -TERM $$"]);
        execute(&cmd, &mut state).expect("run sh");
        assert_eq!(state.last_foreground_status, "143");
    }

    #[test]
    fn test_exec_failure_exits_child_nonzero() {
        let mut state = ShellState::from_env();
        let cmd = command(&["arteriole-no-such-program-xyz"]);
        execute(&cmd, &mut state).expect("fork still succeeds");
        assert_eq!(state.last_foreground_status, "1");
    }

    #[test]
    fn test_output_redirection_appends() {
        let out = temp_path("append");
        let _ = fs::remove_file(&out);
        let out_str = out.to_string_lossy().into_owned();

        let mut state = ShellState::from_env();
        let cmd = command(&["sh", "-c", "echo hi", ">", &out_str]);
        execute(&cmd, &mut state).expect("first run");
        execute(&cmd, &mut state).expect("second run");

        assert_eq!(fs::read_to_string(&out).expect("read back"), "hi\nhi\n");
        let _ = fs::remove_file(&out);
    }

    #[test]
    fn test_input_redirection() {
        let src = temp_path("src");
        let sink = temp_path("sink");
        fs::write(&src, "through the cat\n").expect("write source");
        let _ = fs::remove_file(&sink);
        let src_str = src.to_string_lossy().into_owned();
        let sink_str = sink.to_string_lossy().into_owned();

        let mut state = ShellState::from_env();
        let cmd = command(&["cat", "<", &src_str, ">", &sink_str]);
        execute(&cmd, &mut state).expect("run cat");

        assert_eq!(state.last_foreground_status, "0");
        assert_eq!(
            fs::read_to_string(&sink).expect("read back"),
            "through the cat\n"
        );
        let _ = fs::remove_file(&src);
        let _ = fs::remove_file(&sink);
    }

    #[test]
    fn test_missing_input_file_fails_the_child_only() {
        let mut state = ShellState::from_env();
        let cmd = command(&["cat", "<", "/no/such/file/anywhere"]);
        execute(&cmd, &mut state).expect("parent unaffected");
        assert_eq!(state.last_foreground_status, "1");
    }

    #[test]
    fn test_background_records_pid_without_blocking() {
        let mut state = ShellState::from_env();
        let cmd = command(&["sleep", "1", "&"]);
        let before = std::time::Instant::now();
        execute(&cmd, &mut state).expect("launch");
        assert!(before.elapsed() < std::time::Duration::from_secs(1));
        assert!(!state.last_background_pid.is_empty());
        let pid: i32 = state.last_background_pid.parse().expect("pid digits");
        assert!(pid > 0);

        let _ = waitpid(Pid::from_raw(pid), None);
    }
}
