pub mod demo;
pub mod suite;
pub mod types;

pub use demo::{demo_cases, demo_page, fail_all};
pub use suite::run_suite;
pub use types::{CaseError, CaseFn, CaseResult, TestCase, ensure};
