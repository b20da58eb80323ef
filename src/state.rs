use std::env;

/// Interpreter-wide state: the environment snapshot taken at startup plus
/// the two result registers the expander reads back.
///
/// Exactly one instance exists per interpreter; the executor and the reaper
/// are the only writers.
pub struct ShellState {
    pub field_separator: Option<String>,
    pub prompt: Option<String>,
    pub home_dir: String,
    pub own_pid: u32,
    pub last_foreground_status: String,
    pub last_background_pid: String,
}

impl ShellState {
    /// Snapshots `IFS`, `PS1` and `HOME` once. The pid is captured here and
    /// never re-read, so a forked child carrying this struct still reports
    /// the interpreter's pid.
    pub fn from_env() -> Self {
        let home_dir = env::var("HOME").ok().unwrap_or_else(|| {
            dirs::home_dir()
                .map(|p| p.to_string_lossy().into_owned())
                .unwrap_or_default()
        });

        ShellState {
            field_separator: env::var("IFS").ok(),
            prompt: env::var("PS1").ok(),
            home_dir,
            own_pid: std::process::id(),
            last_foreground_status: "0".to_string(),
            last_background_pid: String::new(),
        }
    }

    pub fn prompt_string(&self) -> String {
        match &self.prompt {
            Some(ps1) => format!("{} ", ps1),
            None => "$ ".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_registers() {
        let state = ShellState::from_env();
        assert_eq!(state.last_foreground_status, "0");
        assert_eq!(state.last_background_pid, "");
        assert_eq!(state.own_pid, std::process::id());
    }

    #[test]
    fn test_default_prompt() {
        let mut state = ShellState::from_env();
        state.prompt = None;
        assert_eq!(state.prompt_string(), "$ ");

        state.prompt = Some(":::".to_string());
        assert_eq!(state.prompt_string(), "::: ");
    }
}
