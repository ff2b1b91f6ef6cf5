use std::fmt;

use crate::browser::{Page, PageError};

/// Result of running one test body
pub type CaseResult = Result<(), CaseError>;

/// Body of a test case, run against a fresh page
pub type CaseFn = Box<dyn FnMut(&mut dyn Page) -> CaseResult>;

/// Why a test body did not pass
#[derive(Debug)]
pub enum CaseError {
    /// Assertion or flow failure; the text becomes the record's failure detail
    Failed(String),

    /// The test chose not to run (e.g. missing credentials)
    Skipped(String),
}

impl CaseError {
    pub fn failed(msg: impl Into<String>) -> Self {
        CaseError::Failed(msg.into())
    }

    pub fn skipped(reason: impl Into<String>) -> Self {
        CaseError::Skipped(reason.into())
    }
}

impl fmt::Display for CaseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaseError::Failed(msg) => write!(f, "Failed: {}", msg),
            CaseError::Skipped(reason) => write!(f, "Skipped: {}", reason),
        }
    }
}

impl std::error::Error for CaseError {}

/// Page errors that escape a flow fail the test with the error as detail
impl From<PageError> for CaseError {
    fn from(err: PageError) -> Self {
        CaseError::Failed(err.to_string())
    }
}

/// Fail with `msg` unless `condition` holds
pub fn ensure(condition: bool, msg: impl Into<String>) -> CaseResult {
    if condition {
        Ok(())
    } else {
        Err(CaseError::failed(msg))
    }
}

/// A named test case
pub struct TestCase {
    /// Hierarchical test identifier (`path::Class::test`)
    pub id: String,
    pub body: CaseFn,
}

impl TestCase {
    pub fn new<F>(id: impl Into<String>, body: F) -> Self
    where
        F: FnMut(&mut dyn Page) -> CaseResult + 'static,
    {
        Self {
            id: id.into(),
            body: Box::new(body),
        }
    }
}

impl fmt::Debug for TestCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestCase").field("id", &self.id).finish_non_exhaustive()
    }
}
