//! Ordered fallback chains for locators that vary between UI builds.

use std::time::Duration;

use tracing::debug;

use super::page::{Page, PageError, PageResult, WaitState};

type Strategy<'a, T> = Box<dyn Fn(&mut dyn Page) -> PageResult<T> + 'a>;

/// An ordered list of named strategies, tried in sequence.
///
/// The first strategy that succeeds wins. A closed page aborts the chain
/// immediately; any other error moves on to the next strategy. When every
/// strategy fails the chain returns [`PageError::NotResolved`].
pub struct Fallback<'a, T> {
    what: String,
    strategies: Vec<(String, Strategy<'a, T>)>,
}

impl<'a, T> Fallback<'a, T> {
    /// Create an empty chain; `what` names the target in the final error
    pub fn new(what: impl Into<String>) -> Self {
        Self {
            what: what.into(),
            strategies: Vec::new(),
        }
    }

    /// Append a strategy
    pub fn or_try<F>(mut self, name: impl Into<String>, strategy: F) -> Self
    where
        F: Fn(&mut dyn Page) -> PageResult<T> + 'a,
    {
        self.strategies.push((name.into(), Box::new(strategy)));
        self
    }

    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }

    /// Run the strategies in order against `page`
    pub fn resolve(&self, page: &mut dyn Page) -> PageResult<T> {
        let mut tried = Vec::with_capacity(self.strategies.len());
        for (name, strategy) in &self.strategies {
            match strategy(page) {
                Ok(value) => {
                    debug!(target_name = %self.what, strategy = %name, "fallback resolved");
                    return Ok(value);
                }
                Err(PageError::Closed) => return Err(PageError::Closed),
                Err(e) => {
                    debug!(target_name = %self.what, strategy = %name, error = %e, "fallback strategy failed");
                    tried.push(name.clone());
                }
            }
        }
        Err(PageError::NotResolved {
            what: self.what.clone(),
            tried,
        })
    }
}

/// Return the first selector that becomes visible within `timeout`
pub fn first_visible(
    page: &mut dyn Page,
    what: &str,
    selectors: &[&str],
    timeout: Duration,
) -> PageResult<String> {
    selectors
        .iter()
        .fold(Fallback::new(what), |chain, selector| {
            let selector = selector.to_string();
            chain.or_try(selector.clone(), move |page: &mut dyn Page| {
                page.wait_for(&selector, WaitState::Visible, timeout)?;
                Ok(selector.clone())
            })
        })
        .resolve(page)
}
