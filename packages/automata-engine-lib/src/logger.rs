use std::{
    fmt::Display,
    fs::{self, File},
    io::{BufWriter, Write},
    str::FromStr,
    sync::Mutex,
};

use anyhow::Context;
use chrono::Local;
use colored::{ColoredString, Colorize};
use serde::{Deserialize, Serialize};

use crate::config::LoggerConfig;

/// Log levels, ordered from most to least verbose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn tag(&self) -> &'static str {
        match self {
            LogLevel::Debug => "DBG",
            LogLevel::Info => "INF",
            LogLevel::Warn => "WAR",
            LogLevel::Error => "ERR",
        }
    }

    pub fn colored_tag(&self) -> ColoredString {
        match self {
            LogLevel::Debug => self.tag().bright_cyan(),
            LogLevel::Info => self.tag().bright_green(),
            LogLevel::Warn => self.tag().yellow(),
            LogLevel::Error => self.tag().bright_red(),
        }
    }

    /// Whether a message of this level passes a logger set to `threshold`.
    pub fn passes(&self, threshold: LogLevel) -> bool {
        *self >= threshold
    }

    pub fn as_tracing_level(&self) -> tracing::Level {
        match self {
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Error => tracing::Level::ERROR,
        }
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "debug" | "dbg" => Ok(LogLevel::Debug),
            "info" | "inf" => Ok(LogLevel::Info),
            "warn" | "warning" | "war" => Ok(LogLevel::Warn),
            "error" | "err" => Ok(LogLevel::Error),
            _ => Err(format!("Invalid log level: {}", s)),
        }
    }
}

impl Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Debug => write!(f, "Debug"),
            LogLevel::Info => write!(f, "Info"),
            LogLevel::Warn => write!(f, "Warn"),
            LogLevel::Error => write!(f, "Error"),
        }
    }
}

/// Writes leveled messages to stderr and, optionally, to a log file. The
/// file receives every message regardless of level.
#[derive(Debug)]
pub struct Logger {
    level: LogLevel,
    name: String,
    file: Option<Mutex<BufWriter<File>>>,
}

impl Logger {
    pub fn new(level: LogLevel, name: String, log_file_path: Option<String>) -> anyhow::Result<Self> {
        let file = match log_file_path {
            Some(path) => {
                let file = File::create(&path)
                    .with_context(|| format!("failed to create log file {path}"))?;
                Some(Mutex::new(BufWriter::new(file)))
            }
            None => None,
        };

        Ok(Logger { level, name, file })
    }

    /// Builds the logger described by `config`, `None` if logging is
    /// disabled.
    pub fn from_config(config: &LoggerConfig, name: String) -> anyhow::Result<Option<Self>> {
        if !*config.get_enabled() {
            return Ok(None);
        }

        let log_file_path = if *config.get_log_file() {
            fs::create_dir_all("./logs").context("failed to create ./logs")?;
            Some(format!(
                "./logs/automata_run_{}.txt",
                Local::now().format("%Y-%m-%d_%H-%M-%S")
            ))
        } else {
            None
        };

        Logger::new(*config.get_log_level(), name, log_file_path).map(Some)
    }

    pub fn level(&self) -> LogLevel {
        self.level
    }

    pub fn log(&self, level: LogLevel, message: &str) {
        self.write_to_file(&format!("[{}] {}: {}", level.tag(), self.name, message));

        if level.passes(self.level) {
            eprintln!(
                "[{}] {} {}",
                level.colored_tag(),
                format!("{}:", self.name).dimmed(),
                message
            );
        }
    }

    pub fn debug(&self, message: &str) {
        self.log(LogLevel::Debug, message);
    }

    pub fn info(&self, message: &str) {
        self.log(LogLevel::Info, message);
    }

    pub fn warn(&self, message: &str) {
        self.log(LogLevel::Warn, message);
    }

    pub fn error(&self, message: &str) {
        self.log(LogLevel::Error, message);
    }

    fn write_to_file(&self, line: &str) {
        if let Some(file) = &self.file
            && let Ok(mut f) = file.lock()
        {
            // a failing log file must not abort the run
            let _ = writeln!(f, "{line}");
        }
    }

    pub fn object<'a>(&'a self, name: &'a str) -> ObjectBuilder<'a> {
        ObjectBuilder::new(name, self)
    }
}

/// Logs a named group of `key: value` lines as one message.
#[derive(Debug, Clone)]
pub struct ObjectBuilder<'a> {
    logger: &'a Logger,
    name: &'a str,
    fields: Vec<(&'a str, String)>,
}

impl<'a> ObjectBuilder<'a> {
    fn new(name: &'a str, logger: &'a Logger) -> Self {
        ObjectBuilder {
            logger,
            name,
            fields: vec![],
        }
    }

    pub fn add_field(mut self, name: &'a str, value: impl Display) -> Self {
        self.fields.push((name, value.to_string()));
        self
    }

    fn build(&self) -> String {
        let mut result = format!("{} {{", self.name);
        for (name, value) in &self.fields {
            result.push_str(&format!("\n  {}: {}", name, value));
        }
        result.push_str("\n}");
        result
    }

    pub fn log(&self, level: LogLevel) {
        self.logger.log(level, &self.build());
    }
}
