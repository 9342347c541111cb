use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A transfer queued for inclusion in a block.
///
/// `amount` is carried opaquely: the node records whatever JSON value the
/// submitter sent (number or string) and never interprets it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub sender: String,
    pub receiver: String,
    pub amount: Value,
}

impl Transaction {
    pub fn new(sender: impl Into<String>, receiver: impl Into<String>, amount: Value) -> Self {
        Self {
            sender: sender.into(),
            receiver: receiver.into(),
            amount,
        }
    }
}
