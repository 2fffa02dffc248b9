//! Log entry types and the line grammar of action log files.
//!
//! Every line is one of:
//! - `// <text>` - a comment
//! - `<KIND> <payload>` - an action
//!
//! Blank lines carry nothing and are skipped.

use std::borrow::Cow;
use std::hash::{Hash, Hasher};

/// Kind of a logged action.
///
/// Unknown kinds found in older or newer log files load as [`ActionKind::Other`]
/// and are written back unchanged.
///
/// Kinds compare by the token they are written as, so an `Other` spelling
/// of a known kind, or one containing whitespace, equals what it reloads as.
#[derive(Debug, Clone)]
pub enum ActionKind {
    /// A source item archived after a successful copy.
    Moved,
    /// A destination item created by a copy.
    Create,
    /// A destination item updated by a copy.
    Update,
    /// An item archived outside of a move.
    Archive,
    /// Free-text annotation.
    Comment,
    Other(String),
}

impl ActionKind {
    /// Token written at the start of an action line.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Moved => "MOVED",
            Self::Create => "CREATE",
            Self::Update => "UPDATE",
            Self::Archive => "ARCHIVE",
            Self::Comment => "//",
            Self::Other(kind) => kind,
        }
    }

    /// A kind from free text, normalized to what a log file can hold.
    #[must_use]
    pub fn other(token: &str) -> Self {
        Self::parse(&normalize_token(token))
    }

    /// Token as written to a log file.
    ///
    /// Whitespace becomes `_`, and an `Other` kind that merely starts with
    /// `//` gets `__` instead so it cannot reload as a comment.
    #[must_use]
    pub fn token(&self) -> Cow<'_, str> {
        match self {
            Self::Other(kind) => {
                let normalized = normalize_token(kind);
                if normalized == *kind {
                    Cow::Borrowed(kind.as_str())
                } else {
                    Cow::Owned(normalized)
                }
            }
            _ => Cow::Borrowed(self.as_str()),
        }
    }

    /// Parse an action token.
    #[must_use]
    pub fn parse(token: &str) -> Self {
        match token {
            "MOVED" => Self::Moved,
            "CREATE" => Self::Create,
            "UPDATE" => Self::Update,
            "ARCHIVE" => Self::Archive,
            "//" => Self::Comment,
            other => Self::Other(other.to_string()),
        }
    }
}

fn normalize_token(token: &str) -> String {
    let mut normalized: String = token
        .chars()
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .collect();
    if normalized.len() > 2 && normalized.starts_with("//") {
        normalized.replace_range(..2, "__");
    }
    normalized
}

impl PartialEq for ActionKind {
    fn eq(&self, other: &Self) -> bool {
        self.token() == other.token()
    }
}

impl Eq for ActionKind {}

impl Hash for ActionKind {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.token().hash(state);
    }
}

impl std::fmt::Display for ActionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single immutable log record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub kind: ActionKind,
    pub payload: String,
}

impl LogEntry {
    pub fn new(kind: ActionKind, payload: &str) -> Self {
        Self {
            kind,
            payload: payload.to_string(),
        }
    }

    pub fn comment(text: &str) -> Self {
        Self::new(ActionKind::Comment, text)
    }

    /// Format as a single line, without the trailing newline.
    ///
    /// Line breaks inside the payload become spaces, so one entry is always
    /// one line.
    #[must_use]
    pub fn to_line(&self) -> String {
        let payload = self.payload.replace(['\r', '\n'], " ");
        match &self.kind {
            ActionKind::Comment => format!("// {payload}"),
            kind => {
                let token = kind.token();
                if payload.is_empty() {
                    token.into_owned()
                } else {
                    format!("{token} {payload}")
                }
            }
        }
    }

    /// Parse one line. Returns `None` for blank lines.
    #[must_use]
    pub fn from_line(line: &str) -> Option<Self> {
        let line = line.trim_end_matches(['\r', '\n']);
        if line.trim().is_empty() {
            return None;
        }

        if let Some(rest) = line.strip_prefix("//") {
            let text = rest.strip_prefix(' ').unwrap_or(rest);
            return Some(Self::comment(text));
        }

        let (token, payload) = line.split_once(' ').unwrap_or((line, ""));
        Some(Self::new(ActionKind::parse(token), payload))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_line() {
        let entry = LogEntry::new(ActionKind::Moved, "item-1");
        assert_eq!(entry.to_line(), "MOVED item-1");
        assert_eq!(LogEntry::from_line("MOVED item-1"), Some(entry));
    }

    #[test]
    fn test_comment_line() {
        let entry = LogEntry::comment("Failed to archive item-2: timeout");
        assert_eq!(entry.to_line(), "// Failed to archive item-2: timeout");
        assert_eq!(
            LogEntry::from_line("// Failed to archive item-2: timeout"),
            Some(entry)
        );
    }

    #[test]
    fn test_payload_keeps_inner_spaces() {
        let entry = LogEntry::from_line("UPDATE item-3 4 5").unwrap();
        assert_eq!(entry.kind, ActionKind::Update);
        assert_eq!(entry.payload, "item-3 4 5");
    }

    #[test]
    fn test_unknown_kind_preserved() {
        let entry = LogEntry::from_line("PUBLISH item-9").unwrap();
        assert_eq!(entry.kind, ActionKind::Other("PUBLISH".to_string()));
        assert_eq!(entry.to_line(), "PUBLISH item-9");
    }

    #[test]
    fn test_other_kinds_round_trip() {
        let cases = [
            ActionKind::Other("PUBLISH ITEM".to_string()),
            ActionKind::Other("MOVED".to_string()),
            ActionKind::Other("//".to_string()),
            ActionKind::Other("PUBLISH".to_string()),
            ActionKind::other("tab\tseparated"),
            ActionKind::Other("//NOTE".to_string()),
        ];

        for kind in cases {
            let line = LogEntry::new(kind.clone(), "x").to_line();
            let reloaded = LogEntry::from_line(&line).unwrap();
            assert_eq!(reloaded.kind, kind, "kind {kind:?} via {line:?}");
            assert_eq!(reloaded.payload, "x");
        }
    }

    #[test]
    fn test_other_constructor_maps_known_tokens() {
        assert!(matches!(ActionKind::other("MOVED"), ActionKind::Moved));
        assert!(matches!(ActionKind::other("//"), ActionKind::Comment));
        assert_eq!(ActionKind::other("A B").as_str(), "A_B");
    }

    #[test]
    fn test_kind_equality_follows_written_token() {
        use std::collections::HashSet;

        assert_eq!(ActionKind::Other("MOVED".to_string()), ActionKind::Moved);
        assert_eq!(
            ActionKind::Other("A B".to_string()),
            ActionKind::Other("A_B".to_string())
        );
        assert_ne!(ActionKind::Create, ActionKind::Moved);

        let set: HashSet<ActionKind> = [ActionKind::Moved, ActionKind::Other("MOVED".to_string())]
            .into_iter()
            .collect();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_multiline_payload_is_flattened() {
        let entry = LogEntry::comment("first\nsecond");
        assert_eq!(entry.to_line(), "// first second");
    }

    #[test]
    fn test_blank_line_is_none() {
        assert_eq!(LogEntry::from_line(""), None);
        assert_eq!(LogEntry::from_line("   \r\n"), None);
    }

    #[test]
    fn test_kind_without_payload() {
        let entry = LogEntry::from_line("CREATE").unwrap();
        assert_eq!(entry.kind, ActionKind::Create);
        assert!(entry.payload.is_empty());
    }
}
