//! Scripted in-memory store for integration tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Mutex;

use weft::prelude::*;

/// A store that replays queued row sets and records every statement it
/// receives, so tests can assert exact SQL text, bind maps, and the
/// number of round trips.
#[derive(Default)]
pub struct MemStore {
    calls: Mutex<Vec<(String, Binds)>>,
    responses: Mutex<VecDeque<Vec<Row>>>,
    fail: Option<String>,
}

impl MemStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose every execution fails with the given message.
    pub fn failing(message: &str) -> Self {
        Self {
            fail: Some(message.to_string()),
            ..Self::default()
        }
    }

    /// Queue the row set returned by the next execution.
    pub fn respond(self, rows: Vec<Row>) -> Self {
        self.responses.lock().unwrap().push_back(rows);
        self
    }

    /// Every statement executed so far, with its bind map.
    pub fn calls(&self) -> Vec<(String, Binds)> {
        self.calls.lock().unwrap().clone()
    }
}

impl Store for MemStore {
    fn execute<'a>(&'a self, sql: &'a str, binds: &'a Binds) -> BoxFuture<'a, WeftResult<Vec<Row>>> {
        Box::pin(async move {
            self.calls
                .lock()
                .unwrap()
                .push((sql.to_string(), binds.clone()));
            if let Some(message) = &self.fail {
                return Err(WeftError::Execution(message.clone()));
            }
            Ok(self.responses.lock().unwrap().pop_front().unwrap_or_default())
        })
    }
}

/// Build a row from column/value pairs.
pub fn row(pairs: &[(&str, Value)]) -> Row {
    pairs
        .iter()
        .map(|(name, value)| (name.to_string(), value.clone()))
        .collect()
}

/// A registry with the User/Post/Comment models the suites share.
pub fn registry() -> Registry {
    Registry::new()
        .model("User", "users")
        .entity("UserEntity")
        .model("Post", "posts")
        .entity("PostEntity")
        .model("Comment", "comments")
        .entity("CommentEntity")
}
