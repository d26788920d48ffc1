//! sysinfo-backed metric provider.

use crate::error::{Result, SystemError};
use crate::metrics::{
    data::*,
    traits::MetricProvider,
};
use async_trait::async_trait;
use std::time::Duration;
use sysinfo::{System, MINIMUM_CPU_UPDATE_INTERVAL};
use tokio::time;

#[cfg(feature = "host-info")]
use sysinfo::{Disks, ProcessRefreshKind, RefreshKind};

/// System metrics collector using sysinfo.
pub struct SystemCollector {
    system: System,
    #[cfg(feature = "host-info")]
    disks: Disks,
    cpu_window: Duration,
}

impl SystemCollector {
    /// Create a new system collector instance.
    pub fn new() -> Result<Self> {
        let mut system = System::new_all();
        system.refresh_all();

        if system.cpus().is_empty() {
            return Err(SystemError::provider_error("No CPU information available"));
        }

        Ok(Self {
            system,
            #[cfg(feature = "host-info")]
            disks: Disks::new_with_refreshed_list(),
            cpu_window: Duration::from_millis(crate::CPU_SAMPLE_WINDOW_MS),
        })
    }

    /// Measure global CPU usage over the sampling window.
    async fn measure_cpu(&mut self) -> Result<f64> {
        self.system.refresh_cpu_usage();
        time::sleep(self.cpu_window.max(MINIMUM_CPU_UPDATE_INTERVAL)).await;
        self.system.refresh_cpu_usage();

        if self.system.cpus().is_empty() {
            return Err(SystemError::provider_error("No CPU information available"));
        }
        Ok(f64::from(self.system.global_cpu_usage()))
    }

    /// Read the virtual memory snapshot.
    fn read_memory(&mut self) -> MemoryDetails {
        self.system.refresh_memory();
        MemoryDetails {
            total: self.system.total_memory(),
            available: self.system.available_memory(),
            used: self.system.used_memory(),
            free: self.system.free_memory(),
        }
    }

    /// Collect CPU details.
    fn collect_cpu_details(&self) -> Result<CpuDetails> {
        let cpus = self.system.cpus();
        let first = cpus
            .first()
            .ok_or_else(|| SystemError::provider_error("No CPU information available"))?;
        let load = System::load_average();

        Ok(CpuDetails {
            cores: cpus.len() as u32,
            model_name: first.brand().trim().to_string(),
            load1: load.one,
            load5: load.five,
            load15: load.fifteen,
        })
    }

    /// Collect host identity.
    #[cfg(feature = "host-info")]
    fn collect_host_details(&mut self) -> HostDetails {
        self.system
            .refresh_specifics(RefreshKind::new().with_processes(ProcessRefreshKind::new()));

        HostDetails {
            hostname: System::host_name().unwrap_or_default(),
            uptime_seconds: System::uptime(),
            process_count: self.system.processes().len() as u64,
            os: std::env::consts::OS.to_string(),
            kernel_version: System::kernel_version().unwrap_or_default(),
            kernel_arch: std::env::consts::ARCH.to_string(),
            platform: System::name().unwrap_or_default(),
            platform_version: System::os_version().unwrap_or_default(),
        }
    }

    /// Collect mounted partitions.
    #[cfg(feature = "host-info")]
    fn collect_disks(&mut self) -> Vec<DiskInfo> {
        // Re-list so partitions mounted since the last cycle show up.
        self.disks.refresh_list();

        self.disks
            .iter()
            .map(|disk| {
                let total = disk.total_space();
                let free = disk.available_space();

                DiskInfo {
                    device: disk.name().to_string_lossy().to_string(),
                    mount_point: disk.mount_point().to_string_lossy().to_string(),
                    fs_type: disk.file_system().to_string_lossy().to_string(),
                    total,
                    used: total.saturating_sub(free),
                    free,
                }
            })
            .collect()
    }
}

#[async_trait]
impl MetricProvider for SystemCollector {
    async fn sample_basic(&mut self) -> Result<Reading> {
        let cpu_percent = self.measure_cpu().await?;
        let mem_percent = self
            .read_memory()
            .used_percent()
            .ok_or_else(|| SystemError::provider_error("Total memory reported as zero"))?;

        Reading::from_measurements(cpu_percent, mem_percent)
    }

    async fn sample_extended(&mut self) -> Result<ExtendedInfo> {
        let memory = self.read_memory();
        if memory.total == 0 {
            return Err(SystemError::provider_error("Total memory reported as zero"));
        }

        Ok(ExtendedInfo {
            cpu: self.collect_cpu_details()?,
            memory,
            #[cfg(feature = "host-info")]
            host: self.collect_host_details(),
            #[cfg(feature = "host-info")]
            disks: self.collect_disks(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_system_collector_creation() {
        let collector = SystemCollector::new();
        assert!(collector.is_ok());
    }

    #[tokio::test]
    async fn test_basic_sample_in_range() {
        let mut collector = SystemCollector::new().unwrap();
        let reading = collector.sample_basic().await.unwrap();
        assert!(reading.cpu_usage_percent <= 100);
        assert!(reading.mem_usage_percent <= 100);
    }

    #[tokio::test]
    async fn test_basic_sample_waits_for_window() {
        let mut collector = SystemCollector::new().unwrap();
        let started = std::time::Instant::now();
        collector.sample_basic().await.unwrap();
        assert!(started.elapsed() >= Duration::from_millis(crate::CPU_SAMPLE_WINDOW_MS));
    }

    #[tokio::test]
    async fn test_extended_sample() {
        let mut collector = SystemCollector::new().unwrap();
        let info = collector.sample_extended().await.unwrap();
        assert!(info.cpu.cores > 0);
        assert!(info.memory.total > 0);
        assert!(info.memory.used <= info.memory.total);

        #[cfg(feature = "host-info")]
        {
            assert!(!info.host.os.is_empty());
            for disk in &info.disks {
                assert_eq!(disk.used + disk.free, disk.total);
            }
        }
    }
}
