//! 事件日志 - 只追加的文本日志，每行 `[HH:MM:SS] message`

use anyhow::{Context, Result};
use chrono::{DateTime, Local, NaiveTime};
use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use tracing::{debug, warn};

/// 日志行格式，与 `LogEntry` 的 Display 对应；模式是常量，编译结果恒为 Some
static LINE_RE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^\[(\d{2}:\d{2}:\d{2})\] (.*)$").ok());

/// 日志条目，创建后不可变
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub timestamp: DateTime<Local>,
    pub message: String,
}

impl LogEntry {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            timestamp: Local::now(),
            message: message.into(),
        }
    }

    /// 解析一行日志，格式不符返回 None
    pub fn parse(line: &str) -> Option<RecordedEntry> {
        let re = LINE_RE.as_ref()?;
        let caps = re.captures(line.trim_end_matches(['\r', '\n']))?;
        let time = NaiveTime::parse_from_str(&caps[1], "%H:%M:%S").ok()?;
        Some(RecordedEntry {
            time,
            message: caps[2].to_string(),
        })
    }
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.timestamp.format("%H:%M:%S"), self.message)
    }
}

/// 从日志文件读回的条目（文件里只有时分秒）
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordedEntry {
    pub time: NaiveTime,
    pub message: String,
}

/// 只追加的事件日志
///
/// 每次写入都重新打开文件、加独占锁、一次性写入整行后释放，
/// 不在调用之间持有文件句柄，多个后台任务可直接并发调用。
#[derive(Debug, Clone)]
pub struct EventLogger {
    path: PathBuf,
}

impl EventLogger {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 追加一条事件，I/O 失败只报告不向上传播
    pub fn append(&self, message: &str) -> LogEntry {
        let entry = LogEntry::new(message);
        if let Err(e) = self.write_entry(&entry) {
            warn!(
                path = %self.path.display(),
                error = %format!("{e:#}"),
                "Error writing to event log"
            );
        }
        entry
    }

    /// 追加一条事件，返回 I/O 错误
    pub fn try_append(&self, message: &str) -> Result<LogEntry> {
        let entry = LogEntry::new(message);
        self.write_entry(&entry)?;
        Ok(entry)
    }

    fn write_entry(&self, entry: &LogEntry) -> Result<()> {
        use fs2::FileExt;

        // 整行先拼好，保证单次 write
        let line = format!("{entry}\n");

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("Failed to open {}", self.path.display()))?;

        file.lock_exclusive()
            .with_context(|| format!("Failed to lock {}", self.path.display()))?;
        let mut file = file;
        let written = file.write_all(line.as_bytes());
        // 关闭句柄同样会释放锁，解锁失败不掩盖写入结果
        if let Err(e) = file.unlock() {
            debug!(error = %e, "Failed to unlock event log");
        }
        written.with_context(|| format!("Failed to write {}", self.path.display()))?;

        debug!(message = %entry.message, "Event logged");
        Ok(())
    }

    /// 读取最近 N 条记录，跳过无法解析的行
    pub fn read_recent(&self, n: usize) -> Result<Vec<RecordedEntry>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&self.path)
            .with_context(|| format!("Failed to open {}", self.path.display()))?;
        let entries: Vec<RecordedEntry> = BufReader::new(file)
            .lines()
            .map_while(|line| line.ok())
            .filter_map(|line| LogEntry::parse(&line))
            .collect();

        let start = entries.len().saturating_sub(n);
        Ok(entries[start..].to_vec())
    }
}

/// 启动失败日志（进程外层边界）
#[derive(Debug, Clone)]
pub struct ErrorLog {
    path: PathBuf,
}

impl ErrorLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// 写入 `<timestamp>: <error>` 及完整错误链
    pub fn record(&self, err: &anyhow::Error) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("Failed to open {}", self.path.display()))?;
        let report = format!(
            "{}: {}\n{:?}\n",
            Local::now().format("%Y-%m-%d %H:%M:%S%.6f"),
            err,
            err
        );
        file.write_all(report.as_bytes())?;
        Ok(())
    }
}
