//! Логгер поверх `console` браузера с фильтром по уровню.
//!
//! Минимальный уровень задаётся при сборке через `WASM_LOG_LEVEL`
//! (`debug`, `info`, `warn`, `error`), по умолчанию `debug`. В релизной
//! сборке всё ниже `warn` отбрасывается.
#![cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) enum Level {
    Debug,
    Info,
    Warn,
    Error,
}

impl Level {
    pub(crate) fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "debug" | "trace" => Some(Self::Debug),
            "info" => Some(Self::Info),
            "warn" | "warning" => Some(Self::Warn),
            "error" => Some(Self::Error),
            _ => None,
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Warn => "WARN",
            Self::Error => "ERROR",
        }
    }
}

const CONFIGURED_LEVEL: Option<&str> = option_env!("WASM_LOG_LEVEL");

fn min_level_for(configured: Option<&str>, release: bool) -> Level {
    let level = configured.and_then(Level::parse).unwrap_or(Level::Debug);
    if release { level.max(Level::Warn) } else { level }
}

fn min_level() -> Level {
    min_level_for(CONFIGURED_LEVEL, !cfg!(debug_assertions))
}

fn format_line(level: Level, scope: &str, message: &str) -> String {
    format!("[{}] {scope}: {message}", level.as_str())
}

pub(crate) fn log(level: Level, scope: &str, message: &str) {
    if level < min_level() {
        return;
    }
    let line = format_line(level, scope, message);

    #[cfg(target_arch = "wasm32")]
    {
        let line = wasm_bindgen::JsValue::from_str(&line);
        match level {
            Level::Debug => web_sys::console::debug_1(&line),
            Level::Info => web_sys::console::info_1(&line),
            Level::Warn => web_sys::console::warn_1(&line),
            Level::Error => web_sys::console::error_1(&line),
        }
    }
    #[cfg(not(target_arch = "wasm32"))]
    eprintln!("{line}");
}

pub(crate) fn debug(scope: &str, message: &str) {
    log(Level::Debug, scope, message);
}

pub(crate) fn info(scope: &str, message: &str) {
    log(Level::Info, scope, message);
}

pub(crate) fn warn(scope: &str, message: &str) {
    log(Level::Warn, scope, message);
}

pub(crate) fn error(scope: &str, message: &str) {
    log(Level::Error, scope, message);
}
