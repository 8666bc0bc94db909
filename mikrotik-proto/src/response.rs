//! Reply classification and response folding (spec §3 "Reply record",
//! "Response", §4.5 "Reply loop").

use alloc::string::{String, ToString};
use alloc::vec::Vec;
use hashbrown::HashMap;

use crate::error::{Error, MultiTrapError, ProtocolError};
use crate::word::{classify, Value, WordKind};

/// A mapping from attribute key to typed value. Key order is not
/// significant (spec §3).
pub type ReplyRecord = HashMap<String, Value>;

/// A finite ordered sequence of reply records (spec §3 "Response").
pub type Response = Vec<ReplyRecord>;

/// Category code carried by a `!trap` sentence's optional `category`
/// attribute. Values 0–7 are documented by RouterOS; anything else is kept
/// rather than rejected, since a newer firmware revision may emit a code
/// this crate doesn't know about yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrapCategory {
    /// 0 — missing item or command.
    MissingItemOrCommand,
    /// 1 — argument value failure.
    ArgumentValueFailure,
    /// 2 — execution of command interrupted.
    CommandExecutionInterrupted,
    /// 3 — scripting related failure.
    ScriptingFailure,
    /// 4 — general failure.
    GeneralFailure,
    /// 5 — API related failure.
    ApiFailure,
    /// 6 — TTY related failure.
    TtyFailure,
    /// 7 — value generated with `:return`.
    ReturnValue,
    /// A category code outside the documented 0–7 range.
    Unknown(u8),
}

impl From<i64> for TrapCategory {
    fn from(n: i64) -> Self {
        match n {
            0 => Self::MissingItemOrCommand,
            1 => Self::ArgumentValueFailure,
            2 => Self::CommandExecutionInterrupted,
            3 => Self::ScriptingFailure,
            4 => Self::GeneralFailure,
            5 => Self::ApiFailure,
            6 => Self::TtyFailure,
            7 => Self::ReturnValue,
            n => Self::Unknown(n.clamp(0, u8::MAX as i64) as u8),
        }
    }
}

/// A command-level rejection (spec §7 `TrapError`). Does not close the
/// connection.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[error("trap: {message}")]
pub struct TrapResponse {
    /// Human-readable rejection reason.
    pub message: String,
    /// Optional machine-readable category.
    pub category: Option<TrapCategory>,
}

/// The reply word of a decoded sentence, spec §3/§6.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyWord {
    /// `!re` — one reply record.
    Reply,
    /// `!done` — end of response, optionally carrying a final record.
    Done,
    /// `!trap` — command-level rejection.
    Trap,
}

impl ReplyWord {
    /// Parses the first word of a reply sentence. `!fatal` is intentionally
    /// excluded: the framer intercepts it before this function ever sees a
    /// sentence (spec §4.3).
    pub fn parse(word: &str) -> Option<Self> {
        match word {
            "!re" => Some(Self::Reply),
            "!done" => Some(Self::Done),
            "!trap" => Some(Self::Trap),
            _ => None,
        }
    }
}

/// Builds a [`ReplyRecord`] out of the attribute words following a reply
/// word. Non-attribute words (stray query/command/unclassified words) are
/// ignored rather than rejected — a sans-IO core should not fail a whole
/// response over a single cosmetic out-of-place word.
pub fn record_from_words(words: &[String]) -> ReplyRecord {
    let mut record = ReplyRecord::new();
    for word in words {
        if let WordKind::Attribute(key, value) = classify(word) {
            record.insert(key, value);
        }
    }
    record
}

/// Builds a [`TrapResponse`] out of a `!trap` sentence's attribute words.
/// Fails if the mandatory `message` attribute is missing (spec §6: `!trap`
/// records contain `message` and optional `category`).
pub fn trap_from_words(words: &[String]) -> Result<TrapResponse, ProtocolError> {
    let record = record_from_words(words);
    let message = match record.get("message") {
        Some(Value::Str(s)) => s.clone(),
        Some(other) => crate::word::value_to_api(other),
        None => return Err(ProtocolError::TrapMissingMessage),
    };
    let category = match record.get("category") {
        Some(Value::Int(n)) => Some(TrapCategory::from(*n)),
        Some(Value::Str(s)) => s.parse::<i64>().ok().map(TrapCategory::from),
        _ => None,
    };
    Ok(TrapResponse { message, category })
}

/// Accumulates reply sentences for one command into a final [`Response`],
/// implementing spec §4.5's reply loop: records from non-empty `!re`/`!done`
/// sentences are collected; `!trap`s are collected separately and raised
/// (singly or as [`MultiTrapError`]) only once the loop has reached `!done`.
#[derive(Debug, Default)]
pub struct ResponseFolder {
    response: Response,
    traps: Vec<TrapResponse>,
}

/// What the caller of [`ResponseFolder::feed`] should do next.
pub enum FoldStep {
    /// Keep reading; more sentences are expected.
    Continue,
    /// `!done` was reached; call [`ResponseFolder::finish`].
    Done,
}

impl ResponseFolder {
    /// Creates an empty folder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds one decoded reply sentence (reply word, attribute word list).
    pub fn feed(&mut self, reply_word: ReplyWord, words: &[String]) -> Result<FoldStep, ProtocolError> {
        match reply_word {
            ReplyWord::Trap => {
                self.traps.push(trap_from_words(words)?);
                Ok(FoldStep::Continue)
            }
            ReplyWord::Reply => {
                let record = record_from_words(words);
                if !record.is_empty() {
                    self.response.push(record);
                }
                Ok(FoldStep::Continue)
            }
            ReplyWord::Done => {
                let record = record_from_words(words);
                if !record.is_empty() {
                    self.response.push(record);
                }
                Ok(FoldStep::Done)
            }
        }
    }

    /// Finalizes the fold: raises the accumulated traps, or returns the
    /// accumulated response if there were none.
    pub fn finish(self) -> Result<Response, Error> {
        match self.traps.len() {
            0 => Ok(self.response),
            1 => Err(Error::Trap(self.traps.into_iter().next().unwrap())),
            _ => Err(Error::MultiTrap(MultiTrapError(self.traps))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(strs: &[&str]) -> Vec<String> {
        strs.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn p4_n_re_then_done_yields_n_records() {
        let mut folder = ResponseFolder::new();
        for _ in 0..3 {
            let step = folder.feed(ReplyWord::Reply, &words(&["=name=ether1"])).unwrap();
            assert!(matches!(step, FoldStep::Continue));
        }
        let step = folder.feed(ReplyWord::Done, &words(&[])).unwrap();
        assert!(matches!(step, FoldStep::Done));
        assert_eq!(folder.finish().unwrap().len(), 3);
    }

    #[test]
    fn p4_done_with_payload_counts_as_one_record() {
        let mut folder = ResponseFolder::new();
        folder.feed(ReplyWord::Done, &words(&["=ret=*1"])).unwrap();
        assert_eq!(folder.finish().unwrap().len(), 1);
    }

    #[test]
    fn empty_re_records_are_discarded() {
        let mut folder = ResponseFolder::new();
        folder.feed(ReplyWord::Reply, &words(&[])).unwrap();
        folder.feed(ReplyWord::Done, &words(&[])).unwrap();
        assert_eq!(folder.finish().unwrap().len(), 0);
    }

    #[test]
    fn scenario_s5_multi_trap() {
        let mut folder = ResponseFolder::new();
        folder
            .feed(ReplyWord::Trap, &words(&["=message=first", "=category=1"]))
            .unwrap();
        folder
            .feed(ReplyWord::Trap, &words(&["=message=second"]))
            .unwrap();
        folder.feed(ReplyWord::Done, &words(&[])).unwrap();
        match folder.finish() {
            Err(Error::MultiTrap(MultiTrapError(traps))) => {
                assert_eq!(traps.len(), 2);
                assert_eq!(traps[0].message, "first");
                assert_eq!(traps[1].message, "second");
            }
            other => panic!("expected MultiTrap, got {other:?}"),
        }
    }

    #[test]
    fn single_trap_raises_trap_error() {
        let mut folder = ResponseFolder::new();
        folder.feed(ReplyWord::Trap, &words(&["=message=no such item"])).unwrap();
        folder.feed(ReplyWord::Done, &words(&[])).unwrap();
        assert!(matches!(folder.finish(), Err(Error::Trap(_))));
    }

    #[test]
    fn trap_without_message_is_protocol_error() {
        assert!(trap_from_words(&words(&["=category=0"])).is_err());
    }
}
