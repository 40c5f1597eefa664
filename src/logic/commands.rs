//! Chat commands: parse the text of one inbound command and apply it to the store.
//!
//! Replies are plain data. Rendering them (markup, emoji, wording) is the transport's job.

use crate::models::{
    normalize_role, Award, Hints, Outcome, PlayerId, PlayerRecord, StatsOverview, WeeklySummary,
};
use crate::store::StatsStore;
use serde::Serialize;

/// Who sent the command, as reported by the chat transport.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Caller {
    pub id: PlayerId,
    pub username: Option<String>,
    pub first_name: Option<String>,
}

impl Caller {
    pub fn new(id: impl Into<PlayerId>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    pub fn with_first_name(mut self, first_name: impl Into<String>) -> Self {
        self.first_name = Some(first_name.into());
        self
    }

    fn hints(&self) -> Hints<'_> {
        Hints::new(self.username.as_deref(), self.first_name.as_deref())
    }
}

/// A parsed chat command.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Command {
    Outcome(Outcome),
    /// Award to the caller, or to `target` (a handle without '@').
    Award { award: Award, target: Option<String> },
    Role(String),
    Stats,
    Weekly,
    Me,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ParseError {
    Empty,
    Unknown(String),
    MissingArgument { command: &'static str },
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::Empty => write!(f, "Empty command"),
            ParseError::Unknown(name) => write!(f, "Unknown command: {}", name),
            ParseError::MissingArgument { command } => {
                write!(f, "/{} needs an argument", command)
            }
        }
    }
}

impl std::error::Error for ParseError {}

impl Command {
    /// Parse "/name[@bot] args...". The leading '/' is optional and the name is case-insensitive.
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        let mut tokens = text.split_whitespace();
        let head = tokens.next().ok_or(ParseError::Empty)?;
        let name = head.trim_start_matches('/');
        let name = name.split('@').next().unwrap_or(name).to_lowercase();
        let args: Vec<&str> = tokens.collect();

        let command = match name.as_str() {
            "win" => Command::Outcome(Outcome::Win),
            "lose" | "loss" => Command::Outcome(Outcome::Loss),
            "mvp" => Command::Award {
                award: Award::Mvp,
                target: target_handle(&args),
            },
            "lvm" | "lvp" => Command::Award {
                award: Award::Lvm,
                target: target_handle(&args),
            },
            "role" => {
                if args.is_empty() {
                    return Err(ParseError::MissingArgument { command: "role" });
                }
                Command::Role(args.join(" "))
            }
            "stats" => Command::Stats,
            "weekly" => Command::Weekly,
            "me" => Command::Me,
            "" => return Err(ParseError::Empty),
            _ => return Err(ParseError::Unknown(name)),
        };
        Ok(command)
    }
}

/// Handle from an "@handle" first argument. Plain words are not treated as targets.
fn target_handle(args: &[&str]) -> Option<String> {
    args.first()
        .filter(|arg| arg.starts_with('@'))
        .map(|arg| arg.trim_start_matches('@'))
        .filter(|handle| !handle.is_empty())
        .map(String::from)
}

/// Data produced by a command, ready for the transport to render.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CommandReply {
    OutcomeRecorded {
        outcome: Outcome,
        display_name: String,
        record: PlayerRecord,
    },
    AwardGiven {
        award: Award,
        target: PlayerId,
        display_name: String,
        self_award: bool,
    },
    RoleWinRecorded {
        role: String,
        wins: u32,
    },
    Stats(StatsOverview),
    Weekly(WeeklySummary),
    Profile {
        display_name: String,
        record: PlayerRecord,
    },
}

/// Apply `command` on behalf of `caller`. Leaderboards in the reply are cut to `top_n`.
pub fn dispatch(store: &StatsStore, caller: &Caller, command: Command, top_n: usize) -> CommandReply {
    match command {
        Command::Outcome(outcome) => {
            let record = store.record_outcome(&caller.id, outcome, caller.hints());
            log::info!("Recorded {:?} for {}", outcome, caller.id);
            CommandReply::OutcomeRecorded {
                outcome,
                display_name: store.display_name(&caller.id),
                record,
            }
        }
        Command::Award { award, target } => {
            let awarded = target
                .as_deref()
                .and_then(|handle| store.record_award_by_handle(handle, award));
            let (target, self_award) = match awarded {
                Some(id) => {
                    let self_award = id == caller.id;
                    (id, self_award)
                }
                None => {
                    store.record_award(&caller.id, award, caller.hints());
                    (caller.id.clone(), true)
                }
            };
            log::info!("{:?} awarded to {} by {}", award, target, caller.id);
            CommandReply::AwardGiven {
                award,
                display_name: store.display_name(&target),
                target,
                self_award,
            }
        }
        Command::Role(role) => {
            let wins = store.record_role_win(&caller.id, &role).unwrap_or_default();
            CommandReply::RoleWinRecorded {
                role: normalize_role(&role),
                wins,
            }
        }
        Command::Stats => CommandReply::Stats(store.stats_overview(top_n)),
        Command::Weekly => CommandReply::Weekly(store.weekly_summary()),
        Command::Me => CommandReply::Profile {
            record: store.get_or_create_player(&caller.id, caller.hints()),
            display_name: store.display_name(&caller.id),
        },
    }
}
