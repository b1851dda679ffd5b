use std::collections::VecDeque;

/// Operator input.
///
/// Fix rules that need a value they cannot derive ask through this port, so
/// they can be driven by a terminal, a script, or nothing at all.
pub trait Prompter {
    /// Whether a human can answer. Rules treat `false` as "leave it alone
    /// and warn".
    fn interactive(&self) -> bool;

    /// Ask for free-form text. `None` when no answer is available.
    fn ask(&mut self, question: &str) -> anyhow::Result<Option<String>>;

    /// Ask a yes/no question.
    fn confirm(&mut self, question: &str, default: bool) -> anyhow::Result<bool>;
}

/// Prompter for unattended runs: never answers, confirms with the default.
#[derive(Debug, Clone, Copy, Default)]
pub struct NonInteractive;

impl Prompter for NonInteractive {
    fn interactive(&self) -> bool {
        false
    }

    fn ask(&mut self, _question: &str) -> anyhow::Result<Option<String>> {
        Ok(None)
    }

    fn confirm(&mut self, _question: &str, default: bool) -> anyhow::Result<bool> {
        Ok(default)
    }
}

/// Prompter that replays canned answers, for embedding and tests.
///
/// Every question asked is kept in `asked`. Once the answers run out, `ask`
/// returns `None` and `confirm` returns the default.
#[derive(Debug, Clone, Default)]
pub struct ScriptedPrompter {
    answers: VecDeque<String>,
    pub asked: Vec<String>,
}

impl ScriptedPrompter {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            asked: Vec::new(),
        }
    }
}

impl Prompter for ScriptedPrompter {
    fn interactive(&self) -> bool {
        true
    }

    fn ask(&mut self, question: &str) -> anyhow::Result<Option<String>> {
        self.asked.push(question.to_string());
        Ok(self.answers.pop_front())
    }

    fn confirm(&mut self, question: &str, default: bool) -> anyhow::Result<bool> {
        self.asked.push(question.to_string());
        Ok(match self.answers.pop_front() {
            Some(answer) => parse_yes_no(&answer).unwrap_or(default),
            None => default,
        })
    }
}

/// `y`/`yes` and `n`/`no`, case-insensitive. Anything else is `None`.
pub fn parse_yes_no(answer: &str) -> Option<bool> {
    match answer.trim().to_ascii_lowercase().as_str() {
        "y" | "yes" => Some(true),
        "n" | "no" => Some(false),
        _ => None,
    }
}
