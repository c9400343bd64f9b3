//! Configuration system for the emulator.
//!
//! This module defines the configuration structures used to parameterize a
//! machine. It provides:
//! 1. **Defaults:** Baseline hardware constants (memory capacity, tracing).
//! 2. **Structures:** Hierarchical config for general behavior and memory.
//!
//! Configuration is supplied as JSON (`Config::from_json`) or built with
//! `Config::default()`.

use serde::Deserialize;

use crate::common::constants::DEFAULT_MEMORY_SIZE;

/// Default configuration constants for the emulator.
mod defaults {
    /// Capacity of the flat guest address space (1 MiB).
    pub const MEMORY_SIZE: usize = super::DEFAULT_MEMORY_SIZE;

    /// Per-stage instruction tracing is off unless requested.
    pub const TRACE_INSTRUCTIONS: bool = false;
}

/// General emulator behavior.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Emit a trace event for every pipeline stage of every instruction.
    pub trace_instructions: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            trace_instructions: defaults::TRACE_INSTRUCTIONS,
        }
    }
}

/// Memory subsystem parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MemoryConfig {
    /// Capacity of the flat address space in bytes.
    pub size: usize,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            size: defaults::MEMORY_SIZE,
        }
    }
}

/// Root configuration for one machine instance.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General emulator behavior.
    pub general: GeneralConfig,
    /// Memory subsystem parameters.
    pub memory: MemoryConfig,
}

impl Config {
    /// Deserializes a configuration from JSON text.
    ///
    /// Absent fields keep their defaults, so `{}` is a valid configuration.
    ///
    /// # Errors
    ///
    /// Returns the underlying `serde_json` error for malformed input.
    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }
}
