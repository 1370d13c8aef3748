//! boot phase diagnostic ring
//! bounded to the last 6 lines, oldest dropped first, no functional effect
//! milestone variant keeps repeated pre-ready cycles from flooding the ring

use std::collections::{HashSet, VecDeque};

use crate::util::time;

pub const BOOT_LOG_CAPACITY: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LogSeverityEnum {
    Info,
    Error,
}

/// boot milestones narrated exactly once each
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MilestoneEnum {
    SystemStart,
    IdentityDetected,
    IpDetecting,
    IpDetected,
    Connecting,
    ResponseReceived,
    StatusReported,
}

#[derive(Debug, Clone)]
pub struct LogEntryDto {
    pub ts_secs: u64,
    pub msg: String,
    pub severity: LogSeverityEnum,
}

impl LogEntryDto {
    /// "[HH:MM] message" line for the boot screen
    pub fn formatted(&self) -> String {
        format!("[{}] {}", time::format_hhmm(self.ts_secs), self.msg)
    }
}

pub struct BootLogBuffer {
    entries: VecDeque<LogEntryDto>,
    reached: HashSet<MilestoneEnum>,
}

impl BootLogBuffer {
    pub fn new() -> Self {
        BootLogBuffer {
            entries: VecDeque::with_capacity(BOOT_LOG_CAPACITY),
            reached: HashSet::new(),
        }
    }

    pub fn append(&mut self, msg: &str, severity: LogSeverityEnum) {
        if self.entries.len() == BOOT_LOG_CAPACITY {
            self.entries.pop_front();
        }
        self.entries.push_back(LogEntryDto {
            ts_secs: time::now_secs(),
            msg: msg.to_string(),
            severity,
        });
    }

    /// append only the first time the milestone is reached
    pub fn append_once(&mut self, milestone: MilestoneEnum, msg: &str, severity: LogSeverityEnum) {
        if self.reached.insert(milestone) {
            self.append(msg, severity);
        }
    }

    pub fn entries(&self) -> impl Iterator<Item = &LogEntryDto> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}
