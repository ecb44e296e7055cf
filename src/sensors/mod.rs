//! Platform sensor access for the CPU monitor
//!
//! Provides:
//! - Instantaneous CPU utilization percentage (point sample, non-blocking)
//! - Temperature sensor enumeration, flattened across all sensor groupings
//!
//! Temperature support is hardware- and platform-dependent. Callers probe
//! once via [`SensorSource::temperature_entries`] and treat any query error
//! as "no sensors" rather than a fault.

use anyhow::Result;
use sysinfo::{Components, System};

/// One flattened temperature sensor entry, in the library's enumeration order.
///
/// `current` is `None` when the sensor exists but exposes no usable numeric
/// reading right now.
#[derive(Debug, Clone, PartialEq)]
pub struct TemperatureReading {
    pub label: String,
    pub current: Option<f64>,
}

/// Seam over the platform sensor library.
///
/// Methods take `&mut self` because the backing library keeps refresh state
/// between point samples.
pub trait SensorSource: Send {
    /// Instantaneous CPU utilization in `[0, 100]`.
    fn cpu_percent(&mut self) -> Result<f32>;

    /// Fresh query of every temperature sensor across all groupings.
    ///
    /// An empty vec means no sensors; an error means the query itself failed
    /// this time (existence was not disproven).
    fn temperature_entries(&mut self) -> Result<Vec<TemperatureReading>>;
}

/// `sysinfo`-backed sensor source used on real hosts.
pub struct SysinfoSensors {
    system: System,
    components: Components,
}

impl SysinfoSensors {
    pub fn new() -> Self {
        Self {
            system: System::new(),
            components: Components::new(),
        }
    }
}

impl Default for SysinfoSensors {
    fn default() -> Self {
        Self::new()
    }
}

impl SensorSource for SysinfoSensors {
    fn cpu_percent(&mut self) -> Result<f32> {
        self.system.refresh_cpu_usage();
        Ok(self.system.global_cpu_info().cpu_usage())
    }

    fn temperature_entries(&mut self) -> Result<Vec<TemperatureReading>> {
        // Re-enumerate every time: sensors can appear or vanish with hardware
        // state, and values are only fresh after a refresh.
        self.components.refresh_list();
        Ok(self
            .components
            .iter()
            .map(|component| TemperatureReading {
                label: component.label().to_string(),
                current: usable_reading(component.temperature()),
            })
            .collect())
    }
}

/// Coerce a raw sensor value to `f64`, rejecting NaN/infinite placeholders
/// some drivers report.
fn usable_reading(value: f32) -> Option<f64> {
    if value.is_finite() {
        Some(f64::from(value))
    } else {
        None
    }
}
