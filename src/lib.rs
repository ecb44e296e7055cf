//! CPU telemetry component for Lucid agents
//!
//! Samples host CPU utilization (and temperature where the hardware exposes
//! it) on a fixed interval and publishes each reading to the agent's MQTT
//! status topic. The component is owned and driven by the agent's lifecycle
//! manager; it brings no process bootstrap, config loading, or logging setup
//! of its own.
//!
//! Modules:
//! - `component` — start/stop lifecycle and the background sampling loop
//! - `sample` — published metrics record, topic template, timestamps
//! - `sensors` — platform sensor access (CPU usage, temperature probing)
//! - `bus` — message-bus publish abstraction over `rumqttc`
//! - `context` — agent identity and shared bus handle

pub mod bus;
pub mod component;
pub mod context;
pub mod sample;
pub mod sensors;

pub use bus::{MessageBus, MqttBus, QoS};
pub use component::{Component, CpuMonitor};
pub use context::AgentContext;
pub use sample::{metrics_topic, MetricsSample, SampleError};
pub use sensors::{SensorSource, SysinfoSensors, TemperatureReading};
