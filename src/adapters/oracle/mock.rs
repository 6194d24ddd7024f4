//! Scripted oracle for tests and development.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

use crate::ports::{Oracle, OracleError};

/// Oracle that replays a fixed script of replies.
///
/// Each call pops the next scripted reply and records the prompt it was
/// given. An exhausted script returns `OracleError::Empty`, which downstream
/// parsing treats like any other unusable reply.
#[derive(Default)]
pub struct ScriptedOracle {
    replies: Mutex<VecDeque<String>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedOracle {
    /// Creates an oracle with no scripted replies.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an oracle that will return the given replies in order.
    pub fn with_replies<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            replies: Mutex::new(replies.into_iter().map(Into::into).collect()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Appends one reply to the script.
    pub fn push_reply(&self, reply: impl Into<String>) {
        self.replies.lock().unwrap().push_back(reply.into());
    }

    /// Returns every prompt seen so far.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    /// Returns how many scripted replies remain unconsumed.
    pub fn remaining(&self) -> usize {
        self.replies.lock().unwrap().len()
    }
}

#[async_trait]
impl Oracle for ScriptedOracle {
    async fn call(&self, prompt: &str, _persona: &str) -> Result<String, OracleError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .ok_or(OracleError::Empty)
    }
}

/// Oracle that fails every call, for exercising degradation paths.
pub struct FailingOracle;

#[async_trait]
impl Oracle for FailingOracle {
    async fn call(&self, _prompt: &str, _persona: &str) -> Result<String, OracleError> {
        Err(OracleError::Timeout { timeout_secs: 30 })
    }
}
