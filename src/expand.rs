use crate::state::ShellState;

const DEFAULT_SEPARATORS: &str = " \t\n";

/// Splits a raw line on any character of the configured separator set,
/// collapsing runs of separators. `IFS` overrides the default set.
pub fn split_words(line: &str, state: &ShellState) -> Vec<String> {
    let separators = state
        .field_separator
        .as_deref()
        .unwrap_or(DEFAULT_SEPARATORS);

    line.split(|c| separators.contains(c))
        .filter(|word| !word.is_empty())
        .map(String::from)
        .collect()
}

/// Rewrites variable references in every word, in place. Runs after
/// splitting and before command construction.
pub fn expand_words(words: &mut [String], state: &ShellState) {
    for word in words.iter_mut() {
        *word = expand_word(word, state);
    }
}

/// Literal, global substitution within one word, applied in fixed order:
/// `~/` then `$$` then `$?` then `$!`. A `$` or `~` that matches none of
/// these stays as typed; there is no escaping.
fn expand_word(word: &str, state: &ShellState) -> String {
    let home = if state.home_dir.is_empty() {
        String::new()
    } else {
        format!("{}/", state.home_dir)
    };

    word.replace("~/", &home)
        .replace("$$", &state.own_pid.to_string())
        .replace("$?", &state.last_foreground_status)
        .replace("$!", &state.last_background_pid)
}
