use std::path::{Path, PathBuf};

pub const NOTIFY_ENV: &str = "CLAUDE_ORCHESTRA_LOG_NOTIFY";
pub const PROJECT_DIR_ENV: &str = "CLAUDE_PROJECT_DIR";

/// Log location relative to the project root.
pub const LOG_RELATIVE_PATH: &str = ".claude/logs/cli-tools.jsonl";

pub const DEFAULT_MAX_FIELD_CHARS: usize = 2000;

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct ReaderLimits {
    pub max_input_bytes: usize,
}

impl Default for ReaderLimits {
    fn default() -> Self {
        Self {
            max_input_bytes: 8 * 1024 * 1024,
        }
    }
}

/// Immutable settings for one hook invocation.
///
/// Built once at process start and passed by reference to every stage.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct HookConfig {
    pub log_path: PathBuf,
    pub notify_on_success: bool,
    pub max_field_chars: usize,
    pub limits: ReaderLimits,
}

impl HookConfig {
    pub fn new(log_path: impl Into<PathBuf>) -> Self {
        Self {
            log_path: log_path.into(),
            notify_on_success: false,
            max_field_chars: DEFAULT_MAX_FIELD_CHARS,
            limits: ReaderLimits::default(),
        }
    }

    /// Resolves the log path and notification toggle from the process
    /// environment.
    pub fn from_env() -> Self {
        let root = std::env::var_os(PROJECT_DIR_ENV)
            .filter(|value| !value.is_empty())
            .map(PathBuf::from)
            .or_else(|| std::env::current_dir().ok())
            .unwrap_or_else(|| PathBuf::from("."));
        let notify = std::env::var(NOTIFY_ENV).ok();
        Self::from_parts(&root, notify.as_deref())
    }

    pub(crate) fn from_parts(project_root: &Path, notify: Option<&str>) -> Self {
        Self::new(project_root.join(LOG_RELATIVE_PATH))
            .with_notify_on_success(notify.map(is_truthy).unwrap_or(false))
    }

    pub fn with_log_path(mut self, log_path: impl Into<PathBuf>) -> Self {
        self.log_path = log_path.into();
        self
    }

    pub fn with_notify_on_success(mut self, enabled: bool) -> Self {
        self.notify_on_success = enabled;
        self
    }

    pub fn with_max_field_chars(mut self, max_field_chars: usize) -> Self {
        self.max_field_chars = max_field_chars;
        self
    }

    pub fn with_limits(mut self, limits: ReaderLimits) -> Self {
        self.limits = limits;
        self
    }
}

fn is_truthy(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
