#![forbid(unsafe_code)]

use std::path::PathBuf;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Backend {
    JsonFile,
    Sqlite,
}

impl Backend {
    pub(crate) fn parse(value: Option<&str>) -> Result<Self, String> {
        match value.map(|v| v.trim().to_ascii_lowercase()).as_deref() {
            None | Some("") | Some("json") => Ok(Self::JsonFile),
            Some("sqlite") => Ok(Self::Sqlite),
            Some(other) => Err(format!("unknown backend {other:?} (expected json|sqlite)")),
        }
    }

    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Self::JsonFile => "json",
            Self::Sqlite => "sqlite",
        }
    }
}

#[derive(Clone, Debug)]
pub(crate) struct ServerConfig {
    pub(crate) data_dir: PathBuf,
    pub(crate) backend: Backend,
    pub(crate) log_json: bool,
}

impl ServerConfig {
    /// Flags win over `DASHBOARD_*` environment variables, which win over defaults.
    pub(crate) fn from_env_and_args(args: &[String]) -> Result<Self, String> {
        let data_dir = flag_value(args, "--data-dir")
            .or_else(|| std::env::var("DASHBOARD_DATA_DIR").ok())
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("data"));
        let backend = Backend::parse(
            flag_value(args, "--backend")
                .or_else(|| std::env::var("DASHBOARD_BACKEND").ok())
                .as_deref(),
        )?;
        let log_json = args.iter().any(|arg| arg == "--log-json")
            || parse_bool_env("DASHBOARD_LOG_JSON");
        Ok(Self {
            data_dir,
            backend,
            log_json,
        })
    }
}

fn flag_value(args: &[String], flag: &str) -> Option<String> {
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if arg == flag {
            return iter.next().cloned();
        }
        if let Some(value) = arg.strip_prefix(flag).and_then(|rest| rest.strip_prefix('=')) {
            return Some(value.to_string());
        }
    }
    None
}

fn parse_bool_env(name: &str) -> bool {
    std::env::var(name)
        .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(false)
}
