use snapscout_core::types::ActiveTab;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Capture,
    Upload(PathBuf),
    Retake,
    Flip,
    Tab(ActiveTab),
    Ask(String),
    /// `None` lists the prompts; `Some(i)` sends prompt `i` (zero-based).
    Suggest(Option<usize>),
    Health,
    Show,
    Help,
    Quit,
    Say(String),
    Empty,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    #[error("{0} needs an argument")]
    MissingArgument(&'static str),

    #[error("unknown tab {0:?} (expected capture or chat)")]
    UnknownTab(String),

    #[error(
        "no suggestion {0:?} (expected 1-{max})",
        max = snapscout_core::chat::SUGGESTED_PROMPTS.len()
    )]
    BadSuggestion(String),

    #[error("unknown command {0:?}; type `help`")]
    Unknown(String),
}

/// Parses one input line. On the chat tab, text that is not a command is a message.
pub fn parse(line: &str, tab: ActiveTab) -> Result<Command, CommandError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(Command::Empty);
    }

    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((w, r)) => (w, r.trim()),
        None => (line, ""),
    };

    let cmd = match word.to_ascii_lowercase().as_str() {
        "capture" | "snap" if rest.is_empty() => Command::Capture,
        "upload" => Command::Upload(PathBuf::from(required(rest, "upload")?)),
        "retake" if rest.is_empty() => Command::Retake,
        "flip" if rest.is_empty() => Command::Flip,
        "tab" => {
            let name = required(rest, "tab")?;
            let tab = ActiveTab::parse(name)
                .ok_or_else(|| CommandError::UnknownTab(name.into()))?;
            Command::Tab(tab)
        }
        "ask" => Command::Ask(required(rest, "ask")?.to_string()),
        "suggest" => Command::Suggest(parse_suggestion(rest)?),
        "health" if rest.is_empty() => Command::Health,
        "show" if rest.is_empty() => Command::Show,
        "help" | "?" if rest.is_empty() => Command::Help,
        "quit" | "exit" if rest.is_empty() => Command::Quit,
        "say" => Command::Say(required(rest, "say")?.to_string()),
        _ if tab == ActiveTab::Chat => Command::Say(line.to_string()),
        _ => return Err(CommandError::Unknown(word.to_string())),
    };
    Ok(cmd)
}

fn required<'a>(rest: &'a str, name: &'static str) -> Result<&'a str, CommandError> {
    if rest.is_empty() {
        Err(CommandError::MissingArgument(name))
    } else {
        Ok(rest)
    }
}

fn parse_suggestion(rest: &str) -> Result<Option<usize>, CommandError> {
    if rest.is_empty() {
        return Ok(None);
    }
    let n: usize = rest
        .parse()
        .map_err(|_| CommandError::BadSuggestion(rest.into()))?;
    if n == 0 || n > snapscout_core::chat::SUGGESTED_PROMPTS.len() {
        return Err(CommandError::BadSuggestion(rest.into()));
    }
    Ok(Some(n - 1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_commands_on_either_tab() {
        for tab in [ActiveTab::Capture, ActiveTab::Chat] {
            assert_eq!(parse("capture", tab), Ok(Command::Capture));
            assert_eq!(parse("  flip ", tab), Ok(Command::Flip));
            assert_eq!(parse("tab chat", tab), Ok(Command::Tab(ActiveTab::Chat)));
            assert_eq!(
                parse("upload ./shoe photo.jpg", tab),
                Ok(Command::Upload(PathBuf::from("./shoe photo.jpg")))
            );
            assert_eq!(parse("say hi there", tab), Ok(Command::Say("hi there".into())));
            assert_eq!(parse("", tab), Ok(Command::Empty));
        }
    }

    #[test]
    fn free_text_is_a_message_only_on_chat_tab() {
        assert_eq!(
            parse("is this a good deal?", ActiveTab::Chat),
            Ok(Command::Say("is this a good deal?".into()))
        );
        assert_eq!(
            parse("is this a good deal?", ActiveTab::Capture),
            Err(CommandError::Unknown("is".into()))
        );
        // A command word followed by text is still a message on the chat tab.
        assert_eq!(
            parse("show me cheaper ones", ActiveTab::Chat),
            Ok(Command::Say("show me cheaper ones".into()))
        );
    }

    #[test]
    fn suggestions_are_one_based() {
        assert_eq!(parse("suggest", ActiveTab::Chat), Ok(Command::Suggest(None)));
        assert_eq!(parse("suggest 1", ActiveTab::Chat), Ok(Command::Suggest(Some(0))));
        assert_eq!(parse("suggest 4", ActiveTab::Chat), Ok(Command::Suggest(Some(3))));
        assert!(matches!(
            parse("suggest 5", ActiveTab::Chat),
            Err(CommandError::BadSuggestion(_))
        ));
        assert!(matches!(
            parse("suggest x", ActiveTab::Chat),
            Err(CommandError::BadSuggestion(_))
        ));
    }

    #[test]
    fn missing_arguments_and_bad_tabs() {
        assert_eq!(
            parse("upload", ActiveTab::Capture),
            Err(CommandError::MissingArgument("upload"))
        );
        assert_eq!(
            parse("ask", ActiveTab::Chat),
            Err(CommandError::MissingArgument("ask"))
        );
        assert_eq!(
            parse("tab settings", ActiveTab::Capture),
            Err(CommandError::UnknownTab("settings".into()))
        );
    }
}
