use crate::error::CliError;

pub const HELP: &str = "\
Type your answer and press Enter. Commands:
  :back            revisit the previous question
  :forward         move to the next visited question
  :goto N          jump to question N
  :accept N        take suggestion N
  :keep            keep your original answer
  :retry           resend the last failed request
  :preview         show the job posting so far
  :turns           list the questions answered so far
  :schema          list the fields the interview collects
  :help            show this help
  :quit            leave (the session can be resumed later)
Start a line with '::' to send text that begins with ':'.";

/// One line of REPL input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    Answer(String),
    Back,
    Forward,
    /// 0-based turn index
    Goto(usize),
    /// 0-based suggestion index
    Accept(usize),
    Keep,
    Retry,
    Preview,
    Turns,
    Schema,
    Help,
    Quit,
}

impl ReplCommand {
    /// `Ok(None)` for a blank line
    pub fn parse(line: &str) -> Result<Option<Self>, CliError> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }
        if let Some(escaped) = line.strip_prefix("::") {
            return Ok(Some(Self::Answer(format!(":{}", escaped))));
        }
        let Some(command) = line.strip_prefix(':') else {
            return Ok(Some(Self::Answer(line.to_string())));
        };

        let mut parts = command.split_whitespace();
        let name = parts.next().unwrap_or_default().to_lowercase();
        let arg = parts.next();

        let parsed = match name.as_str() {
            "back" | "b" => Self::Back,
            "forward" | "f" => Self::Forward,
            "goto" | "g" => Self::Goto(one_based(arg, "goto")?),
            "accept" | "a" => Self::Accept(one_based(arg.or(Some("1")), "accept")?),
            "keep" | "k" => Self::Keep,
            "retry" | "r" => Self::Retry,
            "preview" | "p" => Self::Preview,
            "turns" | "t" => Self::Turns,
            "schema" => Self::Schema,
            "help" | "h" | "?" => Self::Help,
            "quit" | "q" | "exit" => Self::Quit,
            other => {
                return Err(CliError::Command(format!(
                    "Unknown command :{}, type :help",
                    other
                )))
            }
        };
        Ok(Some(parsed))
    }
}

fn one_based(arg: Option<&str>, command: &str) -> Result<usize, CliError> {
    arg.and_then(|a| a.parse::<usize>().ok())
        .and_then(|n| n.checked_sub(1))
        .ok_or_else(|| CliError::Command(format!("Usage: :{} N (N starts at 1)", command)))
}
