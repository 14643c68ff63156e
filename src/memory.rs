//! Periodic memory report for on-screen diagnostics.

use crate::{
    constants::{BYTES_PER_MB, MEMORY_MONITOR_STARTED},
    scope::ShutdownSignal,
};
use log::{debug, info, warn};
use std::fmt;
use std::time::Duration;
use sysinfo::{Pid, System};
use tokio::sync::watch;

/// Memory figures in mebibytes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryReport {
    /// System memory in use
    pub used_mb: u64,
    /// Total system memory
    pub total_mb: u64,
    /// Memory available to new allocations
    pub available_mb: u64,
    /// Resident memory of this process, if readable
    pub process_mb: Option<u64>,
}

impl fmt::Display for MemoryReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "memory used: {}MB / total: {}MB (available: {}MB)",
            self.used_mb, self.total_mb, self.available_mb
        )?;
        if let Some(process) = self.process_mb {
            write!(f, ", process: {process}MB")?;
        }
        Ok(())
    }
}

/// Latest state published by the memory monitor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MemoryStatus {
    /// No report yet
    #[default]
    Started,
    /// Most recent report
    Report(MemoryReport),
}

impl fmt::Display for MemoryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Started => f.write_str(MEMORY_MONITOR_STARTED),
            Self::Report(report) => report.fmt(f),
        }
    }
}

/// Samples system and process memory
pub struct MemoryMonitor {
    system: System,
    pid: Option<Pid>,
}

impl Default for MemoryMonitor {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryMonitor {
    /// Monitor for the current process
    #[must_use]
    pub fn new() -> Self {
        let pid = match sysinfo::get_current_pid() {
            Ok(pid) => Some(pid),
            Err(e) => {
                warn!("Process memory unavailable: {}", e);
                None
            }
        };
        Self {
            system: System::new(),
            pid,
        }
    }

    /// Refresh statistics and build a report
    pub fn sample(&mut self) -> MemoryReport {
        self.system.refresh_memory();
        let process_mb = self.pid.and_then(|pid| {
            self.system.refresh_process(pid);
            self.system.process(pid).map(|process| process.memory() / BYTES_PER_MB)
        });

        MemoryReport {
            used_mb: self.system.used_memory() / BYTES_PER_MB,
            total_mb: self.system.total_memory() / BYTES_PER_MB,
            available_mb: self.system.available_memory() / BYTES_PER_MB,
            process_mb,
        }
    }

    /// Publish a report every `interval` until `shutdown` fires
    pub async fn run(mut self, interval: Duration, status: watch::Sender<MemoryStatus>, mut shutdown: ShutdownSignal) {
        info!("Memory monitor running every {:?}", interval);
        loop {
            tokio::select! {
                biased;
                () = shutdown.cancelled() => break,
                () = tokio::time::sleep(interval) => {}
            }
            let report = self.sample();
            debug!("{}", report);
            status.send_replace(MemoryStatus::Report(report));
        }
        debug!("Memory monitor stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_text() {
        assert_eq!(MemoryStatus::default().to_string(), MEMORY_MONITOR_STARTED);
        let report = MemoryReport {
            used_mb: 100,
            total_mb: 400,
            available_mb: 300,
            process_mb: None,
        };
        assert_eq!(
            MemoryStatus::Report(report).to_string(),
            "memory used: 100MB / total: 400MB (available: 300MB)"
        );
        let with_process = MemoryReport {
            process_mb: Some(12),
            ..report
        };
        assert!(with_process.to_string().ends_with(", process: 12MB"));
    }

    #[test]
    fn test_sample_is_consistent() {
        let mut monitor = MemoryMonitor::new();
        let report = monitor.sample();
        assert!(report.used_mb <= report.total_mb);
    }
}
