//! Parsing of the command grammar addressed to the bot.
//!
//! Messages look like `<bot> <command> <rest>` or `<bot> <command>`, where `<bot>` is
//! the configured address token (`Groupbot` by default).

use std::sync::LazyLock;

use regex::Regex;

use crate::base::types::Res;

static GROUP_NAME: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9]+").expect("group name pattern is valid"));

/// Every command the bot understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    Create,
    Delete,
    GroupAdd,
    GroupDel,
    GroupList,
    Tag,
    List,
    Help,
    Hello,
    /// Addressed to the bot, but not a command it knows.
    Unknown,
}

impl CommandKind {
    /// Looks up a command by its exact, case-sensitive token.
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "create" => Some(Self::Create),
            "delete" => Some(Self::Delete),
            "groupadd" => Some(Self::GroupAdd),
            "groupdel" => Some(Self::GroupDel),
            "grouplist" => Some(Self::GroupList),
            "tag" => Some(Self::Tag),
            "list" => Some(Self::List),
            "help" => Some(Self::Help),
            "hello" => Some(Self::Hello),
            _ => None,
        }
    }
}

/// A parsed command and the rest of the line after it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub kind: CommandKind,
    pub args: Option<String>,
}

impl Invocation {
    fn new(kind: CommandKind, args: Option<&str>) -> Self {
        Self {
            kind,
            args: args.map(str::to_string),
        }
    }
}

/// Recognizes messages addressed to the bot.
#[derive(Debug, Clone)]
pub struct CommandParser {
    with_args: Regex,
    bare: Regex,
    help: Regex,
    addressed: Regex,
}

impl CommandParser {
    pub fn new(bot_name: &str) -> Res<Self> {
        let bot = regex::escape(bot_name);

        Ok(Self {
            with_args: Regex::new(&format!(r"^\s*{bot}\s([a-zA-Z0-9]*) ([^\r\n]*)$"))?,
            bare: Regex::new(&format!(r"^\s*{bot}\s([a-zA-Z0-9]*)$"))?,
            help: Regex::new(&format!(r"^\s*{bot}\s+help$"))?,
            addressed: Regex::new(&format!(r"^\s*{bot}\s"))?,
        })
    }

    /// Parses the message text.
    ///
    /// Returns `None` when the message is not addressed to the bot at all.
    pub fn parse(&self, text: &str) -> Option<Invocation> {
        let captures = self.with_args.captures(text).or_else(|| self.bare.captures(text));

        if let Some(captures) = &captures {
            let token = captures.get(1).map(|m| m.as_str()).unwrap_or_default();
            let rest = captures.get(2).map(|m| m.as_str());

            if let Some(kind) = CommandKind::from_token(token) {
                return Some(Invocation::new(kind, rest));
            }
        }

        if self.help.is_match(text) {
            return Some(Invocation::new(CommandKind::Help, None));
        }

        if self.addressed.is_match(text) {
            return Some(Invocation::new(CommandKind::Unknown, None));
        }

        None
    }
}

/// Extracts the group name: the leading run of ASCII alphanumerics.
///
/// Anything after the first other character is ignored.
pub fn group_name(input: Option<&str>) -> Option<&str> {
    GROUP_NAME.find(input?).map(|m| m.as_str())
}
