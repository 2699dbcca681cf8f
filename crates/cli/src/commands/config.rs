use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use partnerfit_core::config::{AppConfig, LoadOptions};
use toml::Value;

pub fn run() -> String {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => return format!("config validation failed: {error}"),
    };

    let config_file_path = detect_config_path();
    let config_file_doc = load_config_file_doc(config_file_path.as_deref());
    let source = |key_path: &str, env_keys: &[&str]| {
        field_source(key_path, env_keys, config_file_doc.as_ref(), config_file_path.as_deref())
    };

    let engine = &config.engine;
    let entries = [
        entry(
            "storage.backend",
            config.storage.backend.as_str(),
            &["PARTNERFIT_STORAGE_BACKEND"],
        ),
        entry("storage.url", &config.storage.url, &["PARTNERFIT_STORAGE_URL"]),
        entry(
            "storage.max_connections",
            config.storage.max_connections,
            &["PARTNERFIT_STORAGE_MAX_CONNECTIONS"],
        ),
        entry(
            "storage.timeout_secs",
            config.storage.timeout_secs,
            &["PARTNERFIT_STORAGE_TIMEOUT_SECS"],
        ),
        entry(
            "server.bind_address",
            &config.server.bind_address,
            &["PARTNERFIT_SERVER_BIND_ADDRESS"],
        ),
        entry("server.port", config.server.port, &["PARTNERFIT_SERVER_PORT"]),
        entry(
            "server.graceful_shutdown_secs",
            config.server.graceful_shutdown_secs,
            &["PARTNERFIT_SERVER_GRACEFUL_SHUTDOWN_SECS"],
        ),
        entry(
            "engine.compatibility_weight",
            engine.compatibility_weight,
            &["PARTNERFIT_ENGINE_COMPATIBILITY_WEIGHT"],
        ),
        entry(
            "engine.profitability_weight",
            engine.profitability_weight,
            &["PARTNERFIT_ENGINE_PROFITABILITY_WEIGHT"],
        ),
        entry("engine.default_limit", engine.default_limit, &["PARTNERFIT_ENGINE_DEFAULT_LIMIT"]),
        entry(
            "engine.default_min_score",
            engine.default_min_score,
            &["PARTNERFIT_ENGINE_DEFAULT_MIN_SCORE"],
        ),
        entry(
            "engine.focus_min_score",
            engine.focus_min_score,
            &["PARTNERFIT_ENGINE_FOCUS_MIN_SCORE"],
        ),
        entry("engine.focus_top_n", engine.focus_top_n, &["PARTNERFIT_ENGINE_FOCUS_TOP_N"]),
        entry(
            "engine.maturity_seed",
            engine.maturity_seed.map_or_else(|| "<unset>".to_string(), |seed| seed.to_string()),
            &["PARTNERFIT_ENGINE_MATURITY_SEED"],
        ),
        entry(
            "logging.level",
            &config.logging.level,
            &["PARTNERFIT_LOGGING_LEVEL", "PARTNERFIT_LOG_LEVEL"],
        ),
        entry(
            "logging.format",
            format!("{:?}", config.logging.format).to_ascii_lowercase(),
            &["PARTNERFIT_LOGGING_FORMAT", "PARTNERFIT_LOG_FORMAT"],
        ),
    ];

    let mut lines = vec!["effective config (source precedence: env > file > default):".to_string()];
    lines.extend(
        entries
            .into_iter()
            .map(|(key, value, env_keys)| render_line(key, &value, source(key, env_keys))),
    );
    lines.join("\n")
}

type ConfigEntry = (&'static str, String, &'static [&'static str]);

fn entry(
    key: &'static str,
    value: impl ToString,
    env_keys: &'static [&'static str],
) -> ConfigEntry {
    (key, value.to_string(), env_keys)
}

fn detect_config_path() -> Option<PathBuf> {
    let root = PathBuf::from("partnerfit.toml");
    if root.exists() {
        return Some(root);
    }

    let nested = PathBuf::from("config/partnerfit.toml");
    if nested.exists() {
        return Some(nested);
    }

    None
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let path = path?;
    let raw = fs::read_to_string(path).ok()?;
    raw.parse::<Value>().ok()
}

fn field_source(
    key_path: &str,
    env_keys: &[&str],
    config_file_doc: Option<&Value>,
    config_file_path: Option<&Path>,
) -> String {
    if let Some(env_key) = env_keys.iter().find(|key| env::var_os(key).is_some()) {
        return format!("env ({env_key})");
    }

    if let Some(doc) = config_file_doc {
        if contains_path(doc, key_path) {
            let file_path = config_file_path
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "config file".to_string());
            return format!("file ({file_path})");
        }
    }

    "default".to_string()
}

fn contains_path(root: &Value, key_path: &str) -> bool {
    let mut current = root;
    for key in key_path.split('.') {
        let Some(next) = current.get(key) else {
            return false;
        };
        current = next;
    }
    true
}

fn render_line(key: &str, value: &str, source: String) -> String {
    format!("- {key} = {value} (source: {source})")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contains_path_walks_nested_tables() {
        let doc: Value = "[engine]\nfocus_top_n = 5\n".parse().expect("valid toml");
        assert!(contains_path(&doc, "engine.focus_top_n"));
        assert!(!contains_path(&doc, "engine.default_limit"));
        assert!(!contains_path(&doc, "storage.url"));
    }

    #[test]
    fn file_source_wins_over_default_when_key_present() {
        let doc: Value = "[storage]\nbackend = \"sqlite\"\n".parse().expect("valid toml");
        let source = field_source(
            "storage.backend",
            &["PARTNERFIT_TEST_UNSET_BACKEND"],
            Some(&doc),
            Some(Path::new("partnerfit.toml")),
        );
        assert_eq!(source, "file (partnerfit.toml)");

        let source = field_source("storage.url", &[], Some(&doc), None);
        assert_eq!(source, "default");
    }
}
