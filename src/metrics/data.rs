//! Data structures for published samples.

use crate::error::{Result, SystemError};
use serde::{Deserialize, Serialize};

/// Upper bound of a utilization percentage.
const MAX_PERCENT: f64 = 100.0;

/// One CPU/memory utilization pair, produced once per sampling cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reading {
    /// Whole-machine CPU usage (0 to 100)
    #[serde(rename = "cpu_usage_per")]
    pub cpu_usage_percent: u8,
    /// Virtual memory usage (0 to 100)
    #[serde(rename = "mem_usage_per")]
    pub mem_usage_percent: u8,
}

impl Reading {
    /// Build a reading from raw floating point measurements.
    ///
    /// Both values are rounded half-up. A NaN, infinite or negative input is
    /// rejected rather than published; values marginally above 100 (counter
    /// jitter) are clamped.
    pub fn from_measurements(cpu_percent: f64, mem_percent: f64) -> Result<Self> {
        Ok(Self {
            cpu_usage_percent: round_percent(cpu_percent)
                .ok_or_else(|| invalid_measurement("cpu", cpu_percent))?,
            mem_usage_percent: round_percent(mem_percent)
                .ok_or_else(|| invalid_measurement("memory", mem_percent))?,
        })
    }
}

/// Round a percentage half-up into `0..=100`.
///
/// Returns `None` for values that cannot be a utilization.
pub fn round_percent(value: f64) -> Option<u8> {
    if !value.is_finite() || value < 0.0 {
        return None;
    }
    let rounded = (value + 0.5).floor().min(MAX_PERCENT);
    Some(rounded as u8)
}

fn invalid_measurement(what: &str, value: f64) -> SystemError {
    SystemError::provider_error(format!("invalid {} measurement: {}", what, value))
}

/// Extended host facts served by `/v1/moreInfo`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtendedInfo {
    /// Processor details and load averages
    pub cpu: CpuDetails,
    /// Memory totals in bytes
    pub memory: MemoryDetails,
    /// Host identity (only with the `host-info` feature)
    #[cfg(feature = "host-info")]
    pub host: HostDetails,
    /// Mounted partitions (only with the `host-info` feature)
    #[cfg(feature = "host-info")]
    pub disks: Vec<DiskInfo>,
}

/// Processor details.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CpuDetails {
    /// Number of logical cores
    pub cores: u32,
    /// CPU brand string, e.g. "Intel(R) Core(TM) i7-8700 CPU @ 3.20GHz"
    pub model_name: String,
    #[serde(rename = "load_1")]
    pub load1: f64,
    #[serde(rename = "load_5")]
    pub load5: f64,
    #[serde(rename = "load_15")]
    pub load15: f64,
}

/// Memory totals in bytes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryDetails {
    pub total: u64,
    pub available: u64,
    pub used: u64,
    pub free: u64,
}

impl MemoryDetails {
    /// Used memory as a percentage of total, or `None` when the total is unknown.
    pub fn used_percent(&self) -> Option<f64> {
        if self.total == 0 {
            return None;
        }
        Some(self.used as f64 / self.total as f64 * 100.0)
    }
}

/// Host identity.
#[cfg(feature = "host-info")]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostDetails {
    pub hostname: String,
    pub uptime_seconds: u64,
    pub process_count: u64,
    /// Operating system family, e.g. "linux"
    pub os: String,
    pub kernel_version: String,
    /// Machine architecture, e.g. "x86_64" or "aarch64"
    pub kernel_arch: String,
    /// Distribution name, e.g. "Debian GNU/Linux"
    pub platform: String,
    pub platform_version: String,
}

/// One mounted partition.
#[cfg(feature = "host-info")]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiskInfo {
    /// Device name (e.g., "/dev/sda1")
    pub device: String,
    /// Mount point (e.g., "/", "/boot")
    pub mount_point: String,
    /// Filesystem type (e.g., "ext4", "vfat")
    pub fs_type: String,
    pub total: u64,
    pub used: u64,
    pub free: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_half_up() {
        assert_eq!(round_percent(72.5), Some(73));
        assert_eq!(round_percent(72.4), Some(72));
        assert_eq!(round_percent(72.49999), Some(72));
        assert_eq!(round_percent(0.0), Some(0));
        assert_eq!(round_percent(0.5), Some(1));
        assert_eq!(round_percent(99.5), Some(100));
    }

    #[test]
    fn test_round_rejects_and_clamps() {
        assert_eq!(round_percent(f64::NAN), None);
        assert_eq!(round_percent(f64::INFINITY), None);
        assert_eq!(round_percent(-0.1), None);
        assert_eq!(round_percent(100.4), Some(100));
        assert_eq!(round_percent(250.0), Some(100));
    }

    #[test]
    fn test_reading_from_measurements() {
        let reading = Reading::from_measurements(72.5, 41.2).unwrap();
        assert_eq!(reading.cpu_usage_percent, 73);
        assert_eq!(reading.mem_usage_percent, 41);

        let err = Reading::from_measurements(f64::NAN, 10.0).unwrap_err();
        assert!(err.to_string().contains("cpu"));
        let err = Reading::from_measurements(10.0, -3.0).unwrap_err();
        assert!(err.to_string().contains("memory"));
    }

    #[test]
    fn test_reading_wire_names() {
        let reading = Reading {
            cpu_usage_percent: 12,
            mem_usage_percent: 34,
        };
        let json = serde_json::to_value(reading).unwrap();
        assert_eq!(json, serde_json::json!({"cpu_usage_per": 12, "mem_usage_per": 34}));
    }

    #[test]
    fn test_memory_used_percent() {
        let memory = MemoryDetails {
            total: 8 * 1024 * 1024 * 1024,
            available: 6 * 1024 * 1024 * 1024,
            used: 2 * 1024 * 1024 * 1024,
            free: 5 * 1024 * 1024 * 1024,
        };
        assert_eq!(memory.used_percent(), Some(25.0));
        assert_eq!(MemoryDetails::default().used_percent(), None);
    }

    #[test]
    fn test_extended_info_shape() {
        let json = serde_json::to_value(ExtendedInfo::default()).unwrap();
        let cpu = json.get("cpu").unwrap();
        assert!(cpu.get("load_1").is_some());
        assert!(cpu.get("model_name").is_some());
        assert!(json.get("memory").unwrap().get("available").is_some());

        #[cfg(feature = "host-info")]
        {
            assert!(json.get("host").unwrap().get("kernel_arch").is_some());
            assert_eq!(json.get("disks").unwrap(), &serde_json::json!([]));
        }
        #[cfg(not(feature = "host-info"))]
        {
            assert!(json.get("host").is_none());
            assert!(json.get("disks").is_none());
        }
    }
}
