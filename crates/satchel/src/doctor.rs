// SPDX-FileCopyrightText: 2026 Satchel Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `satchel doctor` command implementation.
//!
//! Runs diagnostic checks against the configuration, the database file and
//! the platform keychain.

use std::io::IsTerminal;
use std::path::Path;
use std::time::{Duration, Instant};

use satchel_config::SatchelConfig;
use satchel_core::{SatchelError, SecretTier};
use satchel_storage::Database;
use satchel_vault::KeyringTier;

/// Status of a diagnostic check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckStatus {
    Pass,
    Warn,
    Fail,
}

/// Result of a single diagnostic check.
#[derive(Debug, Clone)]
pub struct CheckResult {
    pub name: &'static str,
    pub status: CheckStatus,
    pub message: String,
    pub duration: Duration,
}

impl CheckResult {
    fn new(name: &'static str, status: CheckStatus, message: impl Into<String>, start: Instant) -> Self {
        Self {
            name,
            status,
            message: message.into(),
            duration: start.elapsed(),
        }
    }
}

/// Run every check and print a report to stdout.
pub async fn run_doctor(
    config: &SatchelConfig,
    config_path: Option<&Path>,
    plain: bool,
) -> Result<(), SatchelError> {
    let use_color = !plain && std::io::stdout().is_terminal();

    let mut results = vec![check_config(config_path)];
    results.extend(check_database(&config.storage.database_path).await);
    results.push(check_keychain(config).await);

    print!("{}", render(&results, use_color));
    Ok(())
}

fn check_config(config_path: Option<&Path>) -> CheckResult {
    let start = Instant::now();
    let loaded = match config_path {
        Some(path) => satchel_config::load_and_validate_path(path),
        None => satchel_config::load_and_validate(),
    };
    match loaded {
        Ok(_) => CheckResult::new("Configuration", CheckStatus::Pass, "valid", start),
        Err(errors) => CheckResult::new(
            "Configuration",
            CheckStatus::Fail,
            format!("{} error(s)", errors.len()),
            start,
        ),
    }
}

/// Database reachability, schema version and integrity.
async fn check_database(db_path: &str) -> Vec<CheckResult> {
    let start = Instant::now();
    if !Path::new(db_path).exists() {
        return vec![CheckResult::new(
            "Database",
            CheckStatus::Warn,
            format!("not found: {db_path} (created on first use)"),
            start,
        )];
    }

    let db = match Database::open(db_path).await {
        Ok(db) => db,
        Err(e) => {
            return vec![CheckResult::new(
                "Database",
                CheckStatus::Fail,
                format!("cannot open: {e}"),
                start,
            )];
        }
    };

    let mut results = Vec::new();
    results.push(match db.schema_version().await {
        Ok(version) => CheckResult::new(
            "Database",
            CheckStatus::Pass,
            format!("schema version {version}"),
            start,
        ),
        Err(e) => CheckResult::new("Database", CheckStatus::Fail, e.to_string(), start),
    });

    let start = Instant::now();
    results.push(match db.integrity_check().await {
        Ok(report) if report.len() == 1 && report[0] == "ok" => {
            CheckResult::new("Integrity", CheckStatus::Pass, "ok", start)
        }
        Ok(report) => CheckResult::new(
            "Integrity",
            CheckStatus::Fail,
            format!("{} problem(s): {}", report.len(), report.join("; ")),
            start,
        ),
        Err(e) => CheckResult::new("Integrity", CheckStatus::Fail, e.to_string(), start),
    });

    let start = Instant::now();
    results.extend(close_check(db.close().await, start));
    results
}

/// A checkpoint or close failure is reported rather than dropped.
fn close_check(closed: Result<(), SatchelError>, start: Instant) -> Option<CheckResult> {
    closed.err().map(|e| {
        CheckResult::new(
            "Close",
            CheckStatus::Warn,
            format!("checkpoint or close failed: {e}"),
            start,
        )
    })
}

/// Looking up the secure category tells an empty keychain from an unreachable one.
async fn check_keychain(config: &SatchelConfig) -> CheckResult {
    let start = Instant::now();
    if !config.vault.use_keyring {
        return CheckResult::new(
            "Keychain",
            CheckStatus::Pass,
            "disabled; keys are kept in the plain store",
            start,
        );
    }

    let tier = KeyringTier::new(config.app.id.clone());
    match tier.load(&config.vault.secure_category).await {
        Ok(Some(_)) => CheckResult::new(
            "Keychain",
            CheckStatus::Pass,
            format!("key present for {}", tier.service(&config.vault.secure_category)),
            start,
        ),
        Ok(None) => CheckResult::new(
            "Keychain",
            CheckStatus::Pass,
            "reachable (no key yet)",
            start,
        ),
        Err(e) => CheckResult::new(
            "Keychain",
            CheckStatus::Warn,
            format!("unavailable, falling back to the plain store: {e}"),
            start,
        ),
    }
}

fn render(results: &[CheckResult], use_color: bool) -> String {
    use colored::Colorize;

    let mut out = String::new();
    out.push_str("\n  satchel doctor\n");
    out.push_str(&format!("  {}\n", "-".repeat(50)));

    let mut issues = 0;
    for result in results {
        let duration_ms = result.duration.as_millis();
        let (symbol, message) = match (result.status, use_color) {
            (CheckStatus::Pass, true) => ("✓".green().to_string(), result.message.clone()),
            (CheckStatus::Warn, true) => ("!".yellow().to_string(), result.message.yellow().to_string()),
            (CheckStatus::Fail, true) => ("✗".red().to_string(), result.message.red().to_string()),
            (CheckStatus::Pass, false) => ("[OK]  ".to_string(), result.message.clone()),
            (CheckStatus::Warn, false) => ("[WARN]".to_string(), result.message.clone()),
            (CheckStatus::Fail, false) => ("[FAIL]".to_string(), result.message.clone()),
        };
        if result.status != CheckStatus::Pass {
            issues += 1;
        }
        out.push_str(&format!(
            "    {symbol} {:<15} {message} ({duration_ms}ms)\n",
            result.name
        ));
    }

    out.push('\n');
    match issues {
        0 => out.push_str("  All checks passed.\n"),
        1 => out.push_str("  1 issue found.\n"),
        n => out.push_str(&format!("  {n} issues found.\n")),
    }
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_database_is_a_warning() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.db");
        let results = check_database(path.to_str().unwrap()).await;
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].status, CheckStatus::Warn);
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn healthy_database_passes_both_checks() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ok.db");
        let path = path.to_str().unwrap();
        Database::open(path).await.unwrap().close().await.unwrap();

        let results = check_database(path).await;
        let statuses: Vec<_> = results.iter().map(|r| (r.name, r.status)).collect();
        assert_eq!(
            statuses,
            [("Database", CheckStatus::Pass), ("Integrity", CheckStatus::Pass)]
        );
        assert_eq!(results[0].message, "schema version 1");
    }

    #[tokio::test]
    async fn close_failure_becomes_a_warning() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::open(dir.path().join("c.db").to_str().unwrap())
            .await
            .unwrap();
        db.clone().close().await.unwrap();

        let result = close_check(db.close().await, Instant::now()).unwrap();
        assert_eq!(result.name, "Close");
        assert_eq!(result.status, CheckStatus::Warn);
        assert!(close_check(Ok(()), Instant::now()).is_none());
    }

    #[tokio::test]
    async fn disabled_keyring_passes_without_touching_it() {
        let mut config = SatchelConfig::default();
        config.vault.use_keyring = false;
        assert_eq!(check_keychain(&config).await.status, CheckStatus::Pass);
    }

    #[test]
    fn plain_render_counts_issues() {
        let start = Instant::now();
        let results = vec![
            CheckResult::new("Configuration", CheckStatus::Pass, "valid", start),
            CheckResult::new("Keychain", CheckStatus::Warn, "unavailable", start),
        ];
        let report = render(&results, false);
        assert!(report.contains("[OK]   Configuration"));
        assert!(report.contains("[WARN] Keychain"));
        assert!(report.contains("1 issue found."));
    }
}
