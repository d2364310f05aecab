use crate::config::{LoggingConfig, Section};
use std::{
    collections::HashMap,
    io::{IsTerminal, Write},
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};
use tracing::{level_filters::LevelFilter, Level};
use tracing_subscriber::{
    filter::{FilterFn, Targets},
    fmt,
    layer::SubscriberExt,
    util::SubscriberInitExt,
    Layer, Registry,
};

use file_rotate::{
    compression::Compression,
    suffix::{AppendTimestamp, FileLimit},
    ContentLimit, FileRotate,
};

const DEFAULT_SECTION: &str = "default";
const DEFAULT_MAX_SIZE_MB: u64 = 100;
const DEFAULT_MAX_BACKUPS: usize = 3;

// -------- level helpers --------

fn parse_tracing_level(s: &str) -> Option<Level> {
    match s.to_ascii_lowercase().as_str() {
        "trace" => Some(Level::TRACE),
        "debug" => Some(Level::DEBUG),
        "info" => Some(Level::INFO),
        "warn" => Some(Level::WARN),
        "error" => Some(Level::ERROR),
        "off" | "none" => None,
        _ => Some(Level::INFO),
    }
}

/// Returns true if target == crate_name or target starts with "crate_name::"
fn matches_crate_prefix(target: &str, crate_name: &str) -> bool {
    target == crate_name
        || (target.starts_with(crate_name) && target[crate_name.len()..].starts_with("::"))
}

type BoxedFilter = FilterFn<Box<dyn Fn(&tracing::Metadata<'_>) -> bool + Send + Sync>>;

/// Filter for the "default" section: everything that no explicit section claims.
fn unclaimed_targets_filter(claimed: Vec<String>, max_level: Level) -> BoxedFilter {
    FilterFn::new(Box::new(move |meta: &tracing::Metadata<'_>| {
        let target = meta.target();
        if claimed.iter().any(|c| matches_crate_prefix(target, c)) {
            return false;
        }
        meta.level() <= &max_level
    }))
}

// -------- rotating file writer --------

#[derive(Clone)]
struct RotWriter(Arc<Mutex<FileRotate<AppendTimestamp>>>);

impl Write for RotWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        match self.0.lock() {
            Ok(mut file) => file.write(buf),
            // A panicked writer must not take logging down with it.
            Err(_) => Ok(buf.len()),
        }
    }

    fn flush(&mut self) -> std::io::Result<()> {
        match self.0.lock() {
            Ok(mut file) => file.flush(),
            Err(_) => Ok(()),
        }
    }
}

impl<'a> fmt::MakeWriter<'a> for RotWriter {
    type Writer = RotWriter;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Resolve a log file path against `base_dir` (home_dir).
/// Absolute paths are kept as-is; relative paths are joined with `base_dir`.
fn resolve_log_path(file: &str, base_dir: &Path) -> PathBuf {
    let p = Path::new(file);
    if p.is_absolute() {
        p.to_path_buf()
    } else {
        base_dir.join(p)
    }
}

/// Create a rotating writer, ensuring the parent directory exists.
fn create_rotating_writer_at_path(
    log_path: &Path,
    max_bytes: usize,
    max_backups: usize,
) -> std::io::Result<RotWriter> {
    if let Some(parent) = log_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let rot = FileRotate::new(
        log_path,
        AppendTimestamp::default(FileLimit::MaxFiles(max_backups)),
        ContentLimit::BytesSurpassed(max_bytes),
        Compression::None,
        #[cfg(unix)]
        None,
    );

    Ok(RotWriter(Arc::new(Mutex::new(rot))))
}

fn writer_for_section(name: &str, section: &Section, base_dir: &Path) -> Option<RotWriter> {
    if section.file.trim().is_empty() {
        return None;
    }

    let max_bytes = section.max_size_mb.unwrap_or(DEFAULT_MAX_SIZE_MB) * 1024 * 1024;
    let backups = section.max_backups.unwrap_or(DEFAULT_MAX_BACKUPS);
    let log_path = resolve_log_path(&section.file, base_dir);

    match create_rotating_writer_at_path(&log_path, max_bytes as usize, backups) {
        Ok(writer) => Some(writer),
        Err(e) => {
            eprintln!(
                "Failed to init log file for '{}': {} ({})",
                name,
                log_path.to_string_lossy(),
                e
            );
            None
        }
    }
}

// -------- public init --------

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Initialize logging from a configuration.
/// - `cfg`: LoggingConfig containing the logging sections
/// - `base_dir`: base directory used to resolve relative log file paths (usually server.home_dir)
///
/// Safe to call more than once; only the first call installs a subscriber.
pub fn init_logging_from_config(cfg: &LoggingConfig, base_dir: &Path) {
    // Bridge `log` → `tracing` before installing the subscriber
    let _ = tracing_log::LogTracer::init();

    if cfg.is_empty() {
        let _ = fmt()
            .with_target(true)
            .with_timer(fmt::time::UtcTime::rfc_3339())
            .try_init();
        return;
    }

    let layers = build_layers(cfg, base_dir);
    let _ = Registry::default().with(layers).try_init();
}

fn build_layers(cfg: &LoggingConfig, base_dir: &Path) -> Vec<BoxedLayer> {
    let ansi = std::io::stdout().is_terminal();
    let mut explicit: HashMap<&str, &Section> = cfg
        .iter()
        .filter(|(k, _)| k.as_str() != DEFAULT_SECTION)
        .map(|(k, v)| (k.as_str(), v))
        .collect();
    let claimed: Vec<String> = explicit.keys().map(|k| (*k).to_string()).collect();

    let mut layers: Vec<BoxedLayer> = Vec::new();

    // Explicit per-crate sections: console + optional JSON file.
    let mut console_targets = Targets::new().with_default(LevelFilter::OFF);
    for (name, section) in explicit.drain() {
        if let Some(level) = parse_tracing_level(&section.console_level) {
            console_targets = console_targets.with_target(name, LevelFilter::from_level(level));
        }
        if let (Some(writer), Some(level)) = (
            writer_for_section(name, section, base_dir),
            parse_tracing_level(&section.file_level),
        ) {
            layers.push(
                fmt::layer()
                    .json()
                    .with_ansi(false)
                    .with_target(true)
                    .with_timer(fmt::time::UtcTime::rfc_3339())
                    .with_writer(writer)
                    .with_filter(Targets::new().with_target(name, LevelFilter::from_level(level)))
                    .boxed(),
            );
        }
    }
    layers.push(
        fmt::layer()
            .with_ansi(ansi)
            .with_target(true)
            .with_timer(fmt::time::UtcTime::rfc_3339())
            .with_filter(console_targets)
            .boxed(),
    );

    // Catch-all "default" section.
    if let Some(section) = cfg.get(DEFAULT_SECTION) {
        if let Some(level) = parse_tracing_level(&section.console_level) {
            layers.push(
                fmt::layer()
                    .with_ansi(ansi)
                    .with_target(true)
                    .with_timer(fmt::time::UtcTime::rfc_3339())
                    .with_filter(unclaimed_targets_filter(claimed.clone(), level))
                    .boxed(),
            );
        }
        if let (Some(writer), Some(level)) = (
            writer_for_section(DEFAULT_SECTION, section, base_dir),
            parse_tracing_level(&section.file_level),
        ) {
            layers.push(
                fmt::layer()
                    .json()
                    .with_ansi(false)
                    .with_target(true)
                    .with_timer(fmt::time::UtcTime::rfc_3339())
                    .with_writer(writer)
                    .with_filter(unclaimed_targets_filter(claimed, level))
                    .boxed(),
            );
        }
    }

    layers
}

// =================== tests ===================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::default_logging_config;
    use tempfile::tempdir;

    #[test]
    fn test_logging_level_parsing() {
        assert_eq!(parse_tracing_level("trace"), Some(Level::TRACE));
        assert_eq!(parse_tracing_level("DEBUG"), Some(Level::DEBUG));
        assert_eq!(parse_tracing_level("Info"), Some(Level::INFO));
        assert_eq!(parse_tracing_level("warn"), Some(Level::WARN));
        assert_eq!(parse_tracing_level("ERROR"), Some(Level::ERROR));
        assert_eq!(parse_tracing_level("off"), None);
        assert_eq!(parse_tracing_level("none"), None);
        assert_eq!(parse_tracing_level("bogus"), Some(Level::INFO));
    }

    #[test]
    fn test_crate_prefix_matching() {
        assert!(matches_crate_prefix("users_info", "users_info"));
        assert!(matches_crate_prefix("users_info::domain", "users_info"));
        assert!(!matches_crate_prefix("users_info_extra", "users_info"));
        assert!(!matches_crate_prefix("sqlx::query", "users_info"));
    }

    #[test]
    fn test_file_paths_resolved_against_home_dir() {
        let tmp = tempdir().unwrap();
        let resolved = resolve_log_path("logs/test.log", tmp.path());
        assert!(resolved.starts_with(tmp.path()));
        assert!(resolved.ends_with("logs/test.log"));

        let abs = tmp.path().join("abs.log");
        assert_eq!(resolve_log_path(&abs.to_string_lossy(), Path::new("/x")), abs);
    }

    #[test]
    fn test_create_rotating_writer_at_path_creates_parent() {
        let tmp = tempdir().unwrap();
        let p = tmp.path().join("nested/dir/app.log");

        let res = create_rotating_writer_at_path(&p, 128 * 1024, 2);
        assert!(res.is_ok(), "writer should be created");
        assert!(p.parent().unwrap().exists(), "parent dir must be created");
    }

    #[test]
    fn test_build_layers_for_default_and_crate_sections() {
        let tmp = tempdir().unwrap();
        let mut cfg = default_logging_config();
        cfg.insert(
            "users_info".into(),
            Section {
                console_level: "debug".into(),
                file: "logs/users_info.log".into(),
                file_level: "info".into(),
                max_backups: Some(1),
                max_size_mb: Some(1),
            },
        );

        let layers = build_layers(&cfg, tmp.path());

        // crate file + shared console + default console + default file
        assert_eq!(layers.len(), 4);
        assert!(tmp.path().join("logs").exists());
    }

    #[test]
    fn test_empty_file_disables_file_sink() {
        let tmp = tempdir().unwrap();
        let mut cfg = default_logging_config();
        if let Some(section) = cfg.get_mut(DEFAULT_SECTION) {
            section.file = String::new();
        }

        let layers = build_layers(&cfg, tmp.path());

        assert_eq!(layers.len(), 2);
        assert!(!tmp.path().join("logs").exists());
    }
}
