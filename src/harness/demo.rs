//! Built-in demonstration suite.
//!
//! Runs a small login/organization-setup suite against [`MockPage`] so the
//! whole reporting pipeline can be exercised without a browser. The mock
//! setup page has no reachable ownership control, so the setup test fails
//! and produces a screenshot.

use std::time::Duration;

use crate::browser::{MockPage, Page, PageResult, WaitState, first_visible};
use crate::config::SiteSettings;
use crate::harness::types::{CaseError, TestCase, ensure};

const EMAIL_INPUT: &str = "input[placeholder=\"Enter your email\"]";
const PASSWORD_INPUT: &str = "input[placeholder=\"Enter your password\"]";
const LOGIN_BUTTON: &str = "button:has-text(\"Login\")";
const LOGIN_HEADING: &str = "h1:has-text(\"Login\")";
const ADDRESS_INPUT: &str = "input[placeholder=\"Type to search address...\"]";

const OWNERSHIP_LOCATORS: &[&str] = &[
    "label=Ownership Type",
    "input[placeholder=\"Select an option\"]",
    "role=combobox >> nth=0",
];

const ELEMENT_TIMEOUT: Duration = Duration::from_secs(5);
const LOCATOR_TIMEOUT: Duration = Duration::from_secs(2);

fn url(base: &str, path: &str) -> String {
    format!("{}{}", base.trim_end_matches('/'), path)
}

/// Page factory for the demo suite: a mock of the login page whose Login
/// button leads to the welcome page
pub fn demo_page(site: &SiteSettings) -> PageResult<Box<dyn Page>> {
    let base = &site.website_url;
    let page = MockPage::new(url(base, "/login"))
        .with_element(LOGIN_HEADING)
        .with_element(EMAIL_INPUT)
        .with_element(PASSWORD_INPUT)
        .with_element(ADDRESS_INPUT)
        .with_hidden_element(OWNERSHIP_LOCATORS[2])
        .with_link(LOGIN_BUTTON, url(base, "/welcome"));
    Ok(Box::new(page))
}

/// Make every case fail after its body has run, so each row gets a
/// screenshot and a failure detail
pub fn fail_all(cases: Vec<TestCase>) -> Vec<TestCase> {
    cases
        .into_iter()
        .map(|mut case| {
            let name = case.id.clone();
            TestCase::new(case.id, move |page: &mut dyn Page| match (case.body)(page) {
                Err(CaseError::Failed(detail)) => Err(CaseError::Failed(detail)),
                Ok(()) | Err(CaseError::Skipped(_)) => {
                    Err(CaseError::failed(format!("forced failure of {}", name)))
                }
            })
        })
        .collect()
}

/// The demo test cases
pub fn demo_cases(site: &SiteSettings) -> Vec<TestCase> {
    let base = site.website_url.clone();
    let credentials = site.email.clone().zip(site.password.clone());

    let login_base = base.clone();
    let setup_base = base.clone();
    vec![
        TestCase::new(
            "tests/test_login.py::TestLoginFlow::test_login_page_loads",
            move |page: &mut dyn Page| {
                page.navigate(&url(&base, "/login"), ELEMENT_TIMEOUT)?;
                page.wait_for(LOGIN_HEADING, WaitState::Visible, ELEMENT_TIMEOUT)?;
                Ok(())
            },
        ),
        TestCase::new(
            "tests/test_login.py::TestLoginFlow::test_type_email",
            |page: &mut dyn Page| {
                let sample = "test@example.com";
                page.fill(EMAIL_INPUT, sample, ELEMENT_TIMEOUT)?;
                let value = page.input_value(EMAIL_INPUT, ELEMENT_TIMEOUT)?;
                ensure(value == sample, format!("expected {sample:?} in email field, got {value:?}"))
            },
        ),
        TestCase::new(
            "tests/test_login.py::TestLoginFlow::test_login_with_valid_credentials",
            move |page: &mut dyn Page| {
                let Some((email, password)) = credentials.as_ref() else {
                    return Err(CaseError::skipped("TEST_EMAIL and TEST_PASSWORD must be set in .env"));
                };
                page.navigate(&url(&login_base, "/login"), ELEMENT_TIMEOUT)?;
                page.fill(EMAIL_INPUT, email, ELEMENT_TIMEOUT)?;
                page.fill(PASSWORD_INPUT, password, ELEMENT_TIMEOUT)?;
                page.click(LOGIN_BUTTON, ELEMENT_TIMEOUT)?;
                let current = page.current_url()?;
                ensure(
                    !current.to_lowercase().contains("login"),
                    format!("Should not stay on login page, current URL: {current}"),
                )
            },
        ),
        TestCase::new(
            "tests/test_organization.py::TestOrganizationFlow::test_setup_form_ownership",
            move |page: &mut dyn Page| {
                page.navigate(&url(&setup_base, "/organization/setup/demo"), ELEMENT_TIMEOUT)?;
                page.wait_for(ADDRESS_INPUT, WaitState::Visible, ELEMENT_TIMEOUT)?;
                let dropdown = first_visible(page, "ownership dropdown", OWNERSHIP_LOCATORS, LOCATOR_TIMEOUT)?;
                page.click(&dropdown, ELEMENT_TIMEOUT)?;
                Ok(())
            },
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::harness::run_suite;
    use crate::report::Outcome;
    use crate::session::ReportSession;

    #[test]
    fn test_demo_without_credentials() {
        let dir = tempfile::tempdir().unwrap();
        let site = Config::defaults().site;
        let mut session = ReportSession::in_dir(dir.path());

        let summary = run_suite(&mut session, demo_cases(&site), |_| demo_page(&site));

        assert_eq!((summary.passed, summary.failed, summary.skipped), (2, 1, 1));
        let failed = session
            .store()
            .all()
            .iter()
            .find(|r| r.outcome() == Outcome::Failed)
            .unwrap();
        assert!(failed.failure_detail().unwrap().contains("Could not find ownership dropdown"));
        assert!(failed.page_url.as_deref().unwrap().ends_with("/organization/setup/demo"));
        assert_eq!(session.list_captures().unwrap().len(), 1);
    }

    #[test]
    fn test_demo_with_credentials_logs_in() {
        let dir = tempfile::tempdir().unwrap();
        let mut site = Config::defaults().site;
        site.email = Some("me@example.com".to_string());
        site.password = Some("secret".to_string());
        let mut session = ReportSession::in_dir(dir.path());

        let summary = run_suite(&mut session, demo_cases(&site), |_| demo_page(&site));

        assert_eq!((summary.passed, summary.failed, summary.skipped), (3, 1, 0));
    }

    #[test]
    fn test_fail_all_fails_every_case_with_screenshots() {
        let dir = tempfile::tempdir().unwrap();
        let site = Config::defaults().site;
        let mut session = ReportSession::in_dir(dir.path());

        let summary = run_suite(&mut session, fail_all(demo_cases(&site)), |_| demo_page(&site));

        assert_eq!((summary.total, summary.failed), (4, 4));
        for record in session.store().all() {
            assert!(record.failure_detail().is_some());
            assert!(record.screenshot_path.is_some());
        }
        let skipped = session
            .store()
            .find("tests/test_login.py::TestLoginFlow::test_login_with_valid_credentials")
            .unwrap();
        assert_eq!(
            skipped.failure_detail(),
            Some("forced failure of tests/test_login.py::TestLoginFlow::test_login_with_valid_credentials")
        );
        assert_eq!(session.list_captures().unwrap().len(), 4);
    }
}
