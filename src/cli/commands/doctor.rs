//! Doctor command - verify configuration and local state.

use crate::cli::Output;
use crate::config::{Prompts, Settings};
use console::style;

/// Check result for a single item.
#[derive(Debug)]
pub struct CheckResult {
    pub name: String,
    pub status: CheckStatus,
    pub message: String,
    pub hint: Option<String>,
}

#[derive(Debug, PartialEq)]
pub enum CheckStatus {
    Ok,
    Warning,
    Error,
}

impl CheckResult {
    fn ok(name: &str, message: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Ok,
            message: message.to_string(),
            hint: None,
        }
    }

    fn warning(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Warning,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn error(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Error,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn print(&self) {
        let icon = match self.status {
            CheckStatus::Ok => style("✓").green(),
            CheckStatus::Warning => style("!").yellow(),
            CheckStatus::Error => style("✗").red(),
        };

        println!("  {} {} - {}", icon, style(&self.name).bold(), self.message);

        if let Some(hint) = &self.hint {
            println!("    {} {}", style("→").dim(), style(hint).dim());
        }
    }
}

/// Run all diagnostic checks.
pub fn run_doctor(settings: &Settings) -> anyhow::Result<()> {
    Output::header("Ragdesk Doctor");
    println!();
    println!("Checking configuration...\n");

    let mut checks = Vec::new();

    let mut section = |title: &str, results: Vec<CheckResult>| {
        println!("{}", style(title).bold());
        for check in &results {
            check.print();
        }
        println!();
        checks.extend(results);
    };

    section(
        "API Configuration",
        vec![check_openai_api_key(std::env::var("OPENAI_API_KEY").ok().as_deref())],
    );
    section("Directories", check_directories(settings));
    section("Answering", check_answering(settings));
    section("Configuration", vec![check_config_file()]);

    let errors = checks.iter().filter(|c| c.status == CheckStatus::Error).count();
    let warnings = checks.iter().filter(|c| c.status == CheckStatus::Warning).count();

    if errors > 0 {
        Output::error(&format!(
            "{} error(s) found. Please fix them before using Ragdesk.",
            errors
        ));
        std::process::exit(1);
    } else if warnings > 0 {
        Output::warning(&format!("All checks passed with {} warning(s).", warnings));
    } else {
        Output::success("All checks passed! Ragdesk is ready to use.");
    }

    Ok(())
}

/// Check the OpenAI API key value.
fn check_openai_api_key(key: Option<&str>) -> CheckResult {
    match key {
        Some(key) if key.starts_with("sk-") && key.chars().count() > 20 => {
            CheckResult::ok("OPENAI_API_KEY", &format!("configured ({})", mask_key(key)))
        }
        Some("") => CheckResult::error(
            "OPENAI_API_KEY",
            "empty",
            "Set with: export OPENAI_API_KEY='sk-...'",
        ),
        Some(_) => CheckResult::warning(
            "OPENAI_API_KEY",
            "set but format looks unusual",
            "Expected format: sk-... (fine for compatible proxies)",
        ),
        None => CheckResult::error(
            "OPENAI_API_KEY",
            "not set",
            "Set with: export OPENAI_API_KEY='sk-...' or add it to .env",
        ),
    }
}

/// Keep the first 7 and last 4 characters of a key.
fn mask_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    let head: String = chars.iter().take(7).collect();
    let tail: String = chars[chars.len().saturating_sub(4)..].iter().collect();
    format!("{}...{}", head, tail)
}

/// Check data directory and vector database.
fn check_directories(settings: &Settings) -> Vec<CheckResult> {
    let mut results = Vec::new();

    let data_dir = settings.data_dir();
    if data_dir.exists() {
        results.push(CheckResult::ok(
            "Data directory",
            &format!("{}", data_dir.display()),
        ));
    } else {
        results.push(CheckResult::warning(
            "Data directory",
            &format!("{} (will be created)", data_dir.display()),
            "Directory will be created on first use",
        ));
    }

    if settings.vector_store.provider == "memory" {
        results.push(CheckResult::warning(
            "Database",
            "in-memory store",
            "Indexed documents are lost on exit; set vector_store.provider = \"sqlite\"",
        ));
        return results;
    }

    let db_path = settings.sqlite_path();
    if db_path.exists() {
        let size = std::fs::metadata(&db_path)
            .map(|m| format_size(m.len()))
            .unwrap_or_else(|_| "unknown size".to_string());
        results.push(CheckResult::ok(
            "Database",
            &format!("{} ({})", db_path.display(), size),
        ));
    } else {
        results.push(CheckResult::warning(
            "Database",
            &format!("{} (not created yet)", db_path.display()),
            "Run 'ragdesk ingest <path>' to index documents",
        ));
    }

    results
}

/// Check the configured answer profile resolves.
fn check_answering(settings: &Settings) -> Vec<CheckResult> {
    let prompts = match Prompts::load(
        settings.prompts.custom_dir.as_deref(),
        Some(&settings.prompts.variables),
    ) {
        Ok(prompts) => prompts,
        Err(e) => {
            return vec![CheckResult::error(
                "Prompts",
                &e.to_string(),
                "Fix the custom prompt files in prompts.custom_dir",
            )]
        }
    };

    let profile = match prompts.profile(&settings.rag.profile) {
        Some(_) => CheckResult::ok("Profile", &settings.rag.profile),
        None => CheckResult::error(
            "Profile",
            &format!("unknown profile '{}'", settings.rag.profile),
            &format!("Use one of: {}", Prompts::profile_names().join(", ")),
        ),
    };

    vec![
        profile,
        CheckResult::ok("Completion model", &settings.completion.model),
        CheckResult::ok("Script", &settings.normalize.script.to_string()),
    ]
}

/// Check if config file exists.
fn check_config_file() -> CheckResult {
    let config_path = Settings::default_config_path();
    if config_path.exists() {
        CheckResult::ok("Config file", &format!("{}", config_path.display()))
    } else {
        CheckResult::warning(
            "Config file",
            "using defaults",
            "Create with: ragdesk init (or ragdesk config edit)",
        )
    }
}

/// Format file size in human-readable format.
fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.1} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_key_checks() {
        assert_eq!(check_openai_api_key(None).status, CheckStatus::Error);
        assert_eq!(check_openai_api_key(Some("")).status, CheckStatus::Error);
        assert_eq!(check_openai_api_key(Some("proxy-key")).status, CheckStatus::Warning);

        let ok = check_openai_api_key(Some("sk-abcdefghijklmnopqrstuvwxyz"));
        assert_eq!(ok.status, CheckStatus::Ok);
        assert!(!ok.message.contains("ghijklmnop"));
    }

    #[test]
    fn test_non_ascii_key_is_masked_by_chars() {
        let key = "sk-密鑰密鑰密鑰密鑰密鑰密鑰密鑰密鑰密鑰";
        let ok = check_openai_api_key(Some(key));
        assert_eq!(ok.status, CheckStatus::Ok);
        assert_eq!(ok.message, "configured (sk-密鑰密鑰...密鑰密鑰)");
    }

    #[test]
    fn test_unknown_profile_is_error() {
        let mut settings = Settings::default();
        settings.rag.profile = "bursar".to_string();
        let checks = check_answering(&settings);
        assert_eq!(checks[0].status, CheckStatus::Error);

        settings.rag.profile = "global_affairs".to_string();
        assert_eq!(check_answering(&settings)[0].status, CheckStatus::Ok);
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(500), "500 B");
        assert_eq!(format_size(1024), "1.0 KB");
        assert_eq!(format_size(1024 * 1024), "1.0 MB");
        assert_eq!(format_size(1024 * 1024 * 1024), "1.0 GB");
    }
}
