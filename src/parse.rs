use std::fmt;

/// Upper bound on words per line. Oversized input is rejected up front
/// instead of being truncated.
pub const MAX_WORDS: usize = 512;

#[derive(Debug, PartialEq, Eq)]
pub enum ParseError {
    MultipleInputRedirects,
    MultipleOutputRedirects,
    MissingRedirectOperand(char),
    TooManyWords(usize),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::MultipleInputRedirects => {
                write!(f, "multiple input redirection operators provided")
            }
            ParseError::MultipleOutputRedirects => {
                write!(f, "multiple output redirection operators provided")
            }
            ParseError::MissingRedirectOperand(op) => {
                write!(f, "redirection operator {} has no following word", op)
            }
            ParseError::TooManyWords(n) => {
                write!(f, "input has {} words, limit is {}", n, MAX_WORDS)
            }
        }
    }
}

impl std::error::Error for ParseError {}

/// One fully parsed input line, consumed once by the executor and then
/// discarded. `argv` is exactly what reaches `execvp`: the program followed
/// by the pre-redirection arguments, background sentinel already removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    pub program: String,
    pub args: Vec<String>,
    pub argv: Vec<String>,
    pub input_path: Option<String>,
    pub output_path: Option<String>,
    pub background: bool,
}

/// Builds a `Command` from the expanded word sequence. `Ok(None)` means the
/// line held nothing to run (blank, comment-only, or a lone `&`) and the
/// cycle should simply restart.
pub fn parse_words(words: &[String]) -> Result<Option<Command>, ParseError> {
    if words.len() > MAX_WORDS {
        return Err(ParseError::TooManyWords(words.len()));
    }

    // Everything from a standalone `#` on is dead, including a trailing `&`.
    let words = match words.iter().position(|w| w == "#") {
        Some(cut) => &words[..cut],
        None => words,
    };
    if words.is_empty() {
        return Ok(None);
    }

    let background = words[words.len() - 1] == "&";
    let words = if background {
        &words[..words.len() - 1]
    } else {
        words
    };
    let Some(program) = words.first() else {
        return Ok(None);
    };

    // Argument collection stops at the first redirection operator even if
    // plain words follow it; those are only visible to the operator scan.
    let mut args = Vec::new();
    for word in &words[1..] {
        if word == "<" || word == ">" {
            break;
        }
        args.push(word.clone());
    }

    let mut input_path = None;
    let mut output_path = None;
    for (i, word) in words.iter().enumerate().skip(1) {
        match word.as_str() {
            "<" => {
                if input_path.is_some() {
                    return Err(ParseError::MultipleInputRedirects);
                }
                match words.get(i + 1) {
                    Some(operand) => input_path = Some(operand.clone()),
                    None => return Err(ParseError::MissingRedirectOperand('<')),
                }
            }
            ">" => {
                if output_path.is_some() {
                    return Err(ParseError::MultipleOutputRedirects);
                }
                match words.get(i + 1) {
                    Some(operand) => output_path = Some(operand.clone()),
                    None => return Err(ParseError::MissingRedirectOperand('>')),
                }
            }
            _ => {}
        }
    }

    let mut argv = Vec::with_capacity(args.len() + 1);
    argv.push(program.clone());
    argv.extend(args.iter().cloned());

    Ok(Some(Command {
        program: program.clone(),
        args,
        argv,
        input_path,
        output_path,
        background,
    }))
}
