use clap::{Parser, Subcommand};
use std::error::Error;
use std::path::PathBuf;

use tracing::info;

use ui_harness_report::config::{self, Config};
use ui_harness_report::envfile::EnvFile;
use ui_harness_report::harness::{demo_cases, demo_page, fail_all, run_suite};
use ui_harness_report::logging::init_tracing;
use ui_harness_report::report::archive_report_dir;
use ui_harness_report::session::ReportSession;

/// UI Harness Report - outcome records, failure screenshots and HTML/ZIP reports for browser UI tests
#[derive(Parser, Debug)]
#[command(
    name = "ui-harness-report",
    about = "Collect browser UI test outcomes into per-test records, an HTML report and a zip archive",
    after_help = "ENVIRONMENT VARIABLES:\n\
        REPORT_DIR       Directory for reports (default: reports)\n\
        WEBSITE_URL      Base URL of the application under test\n\
        TEST_EMAIL       Login e-mail used by authenticated flows\n\
        TEST_PASSWORD    Login password used by authenticated flows\n\
        COMPANY_NAME     Organization name used by the setup flow\n\
        UI_REPORT_LOG    Log filter (e.g. ui_harness_report=debug)"
)]
struct Args {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log level or filter directive (overrides --verbose)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    log_json: bool,

    /// .env file consulted for variables missing from the environment
    #[arg(long, global = true, default_value = config::DEFAULT_ENV_FILE)]
    env_file: PathBuf,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the built-in demo suite against a mock page and write the full report
    Demo {
        /// Report directory (default: REPORT_DIR or "reports")
        #[arg(short, long)]
        report_dir: Option<PathBuf>,

        /// Force every demo test to fail (exercises screenshots and failure details)
        #[arg(long)]
        fail_all: bool,

        /// Print the run summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Rebuild report.html and report.zip from the per-test records in a report directory
    Render {
        /// Report directory (default: REPORT_DIR or "reports")
        #[arg(short, long)]
        report_dir: Option<PathBuf>,

        /// Exit status shown in the report header (default: derived from the records)
        #[arg(long)]
        exit_status: Option<i32>,
    },

    /// Rebuild report.zip only
    Archive {
        /// Report directory (default: REPORT_DIR or "reports")
        #[arg(short, long)]
        report_dir: Option<PathBuf>,
    },

    /// Update (or add) keys in a .env file
    Env {
        /// Path to the .env file
        #[arg(long, default_value = config::DEFAULT_ENV_FILE)]
        env: PathBuf,

        /// TEST_EMAIL value
        #[arg(long)]
        email: Option<String>,

        /// TEST_PASSWORD value
        #[arg(long)]
        password: Option<String>,

        /// COMPANY_NAME value
        #[arg(long)]
        company: Option<String>,

        /// WEBSITE_URL value
        #[arg(long)]
        website: Option<String>,
    },
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    init_tracing(args.verbose, args.log_level.as_deref(), args.log_json)?;

    let config = Config::load(&args.env_file);
    let resolve_dir = |dir: Option<PathBuf>| dir.unwrap_or_else(|| config.report.dir.clone());

    match args.command {
        Some(Commands::Demo {
            report_dir,
            fail_all: force_failures,
            json,
        }) => {
            let mut session = match report_dir {
                Some(dir) => ReportSession::in_dir(dir),
                None => ReportSession::from_config(&config),
            };
            let site = config.site.clone();
            let mut cases = demo_cases(&site);
            if force_failures {
                cases = fail_all(cases);
            }
            let summary = run_suite(&mut session, cases, |_| demo_page(&site));

            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                println!(
                    "Ran {} tests: {} passed, {} failed, {} skipped, {} errored",
                    summary.total, summary.passed, summary.failed, summary.skipped, summary.errored
                );
                println!("\nReport: {}", session.dir.display());
            }
            std::process::exit(summary.exit_status);
        }

        Some(Commands::Render {
            report_dir,
            exit_status,
        }) => {
            let dir = resolve_dir(report_dir);
            let session = ReportSession::resume(&dir)?;
            let exit_status = exit_status.unwrap_or_else(|| session.summary().exit_status);
            let artifacts = session.finish(exit_status)?;
            println!("Rendered {} records: {}", session.store().len(), artifacts.report.display());
            println!("Archive: {} ({} entries)", artifacts.archive.path.display(), artifacts.archive.entries.len());
        }

        Some(Commands::Archive { report_dir }) => {
            let dir = resolve_dir(report_dir);
            let summary = archive_report_dir(&dir)?;
            println!("Archive: {} ({} entries)", summary.path.display(), summary.entries.len());
        }

        Some(Commands::Env {
            env,
            email,
            password,
            company,
            website,
        }) => {
            let mut file = EnvFile::read(&env)?;
            let mut updated = Vec::new();
            for (key, value) in [
                (config::ENV_TEST_EMAIL, email),
                (config::ENV_TEST_PASSWORD, password),
                (config::ENV_COMPANY_NAME, company),
                (config::ENV_WEBSITE_URL, website),
            ] {
                if let Some(value) = value {
                    file.set(key, &value);
                    updated.push(key);
                }
            }
            file.write()?;
            info!(path = %file.path().display(), keys = updated.len(), "updated env file");

            let list = if updated.is_empty() {
                "(no changes requested)".to_string()
            } else {
                updated.join(", ")
            };
            println!("Updated {} with: {}", file.path().display(), list);
        }

        None => {
            println!("UI Harness Report - browser UI test reporting");
            println!();
            println!("Usage: ui-harness-report <COMMAND>");
            println!();
            println!("Commands:");
            println!("  demo     Run the built-in demo suite and write the full report");
            println!("  render   Rebuild report.html and report.zip from per-test records");
            println!("  archive  Rebuild report.zip only");
            println!("  env      Update keys in a .env file");
            println!();
            println!("Run with --help for more information.");
        }
    }

    Ok(())
}
