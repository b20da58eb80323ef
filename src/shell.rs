use rustyline::DefaultEditor;

use crate::builtin;
use crate::error::ShellError;
use crate::expand;
use crate::flags::Flags;
use crate::highlight::DiagnosticStyle;
use crate::parse;
use crate::process::executor;
use crate::process::reaper;
use crate::process::signal::SignalDiscipline;
use crate::process::ProcessError;
use crate::state::ShellState;

pub struct Shell {
    editor: DefaultEditor,
    state: ShellState,
    signals: SignalDiscipline,
    style: DiagnosticStyle,
    flags: Flags,
}

impl Shell {
    pub fn new(flags: Flags) -> Result<Self, ShellError> {
        let editor = DefaultEditor::new()?;
        let state = ShellState::from_env();
        let signals = SignalDiscipline::install_baseline()?;

        Ok(Shell {
            editor,
            state,
            signals,
            style: DiagnosticStyle::new(),
            flags,
        })
    }

    /// One cycle: reap finished/stopped background children, prompt and
    /// read a line (SIGINT switched to its read-phase disposition for
    /// exactly that window), split and expand, parse, dispatch. Repeats
    /// until end-of-input or the exit builtin terminates the process.
    pub fn run(&mut self) -> Result<(), ShellError> {
        loop {
            reaper::reap_background(&mut self.state);

            let prompt = self.state.prompt_string();
            self.signals.enter_read()?;
            let readline = self.editor.readline(&prompt);
            self.signals.leave_read()?;

            match readline {
                Ok(line) => {
                    if let Err(e) = self.editor.add_history_entry(line.as_str()) {
                        if !self.flags.is_set("quiet") {
                            eprintln!("Warning: Couldn't add to history: {}", e);
                        }
                    }

                    if let Err(e) = self.run_line(&line) {
                        eprintln!("{}", self.style.error(&e.to_string()));
                        // Fork failure is fatal; everything else abandons
                        // the line and the loop continues.
                        if matches!(e, ShellError::Process(ProcessError::Fork(_))) {
                            return Err(e);
                        }
                    }
                }
                Err(rustyline::error::ReadlineError::Interrupted) => {
                    // Interrupted read: abandon the partial line, new cycle.
                    eprintln!();
                    continue;
                }
                Err(rustyline::error::ReadlineError::Eof) => {
                    builtin::run_exit(&self.state, &[]);
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    fn run_line(&mut self, line: &str) -> Result<(), ShellError> {
        let mut words = expand::split_words(line, &self.state);
        expand::expand_words(&mut words, &self.state);

        let Some(cmd) = parse::parse_words(&words)? else {
            return Ok(());
        };

        if self.flags.is_set("debug") {
            eprintln!("{:?}", cmd);
        }

        match cmd.program.as_str() {
            "cd" => builtin::run_cd(&self.state, &cmd.args),
            "exit" => builtin::run_exit(&self.state, &cmd.args),
            _ => executor::execute(&cmd, &mut self.state).map_err(ShellError::from),
        }
    }
}
