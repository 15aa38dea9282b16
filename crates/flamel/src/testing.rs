//! In-memory executor for unit tests.

use crate::error::OrmResult;
use crate::executor::{Executor, Row};
use crate::value::Value;
use std::cell::RefCell;
use std::collections::VecDeque;

/// Records every statement and replays queued responses in order.
///
/// Once the queue is empty each call returns no rows.
#[derive(Default)]
pub(crate) struct RecordingExecutor {
    log: RefCell<Vec<(String, Vec<Value>)>>,
    responses: RefCell<VecDeque<OrmResult<Vec<Row>>>>,
}

impl RecordingExecutor {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn respond(&self, response: OrmResult<Vec<Row>>) -> &Self {
        self.responses.borrow_mut().push_back(response);
        self
    }

    /// Queue a single-row, single-column `COUNT(*)` result.
    pub(crate) fn respond_count(&self, count: i64) -> &Self {
        self.respond(Ok(vec![vec![Value::Integer(count)]]))
    }

    pub(crate) fn calls(&self) -> Vec<(String, Vec<Value>)> {
        self.log.borrow().clone()
    }

    pub(crate) fn statements(&self) -> Vec<String> {
        self.log.borrow().iter().map(|(sql, _)| sql.clone()).collect()
    }
}

impl Executor for RecordingExecutor {
    fn execute(&self, sql: &str, params: &[Value]) -> OrmResult<Vec<Row>> {
        self.log
            .borrow_mut()
            .push((sql.to_string(), params.to_vec()));
        self.responses
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Ok(Vec::new()))
    }
}
