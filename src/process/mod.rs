use std::fmt;

use nix::errno::Errno;

pub mod executor;
pub mod reaper;
pub mod signal;

#[derive(Debug)]
pub enum ProcessError {
    Fork(Errno),
    Wait(Errno),
    Signal(String),
    NulByte(std::ffi::NulError),
}

impl From<std::ffi::NulError> for ProcessError {
    fn from(e: std::ffi::NulError) -> Self {
        ProcessError::NulByte(e)
    }
}

impl fmt::Display for ProcessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProcessError::Fork(e) => write!(f, "fork failed: {}", e),
            ProcessError::Wait(e) => write!(f, "waitpid failed: {}", e),
            ProcessError::Signal(msg) => write!(f, "signal error: {}", msg),
            ProcessError::NulByte(e) => write!(f, "argument contains a nul byte: {}", e),
        }
    }
}

impl std::error::Error for ProcessError {}
