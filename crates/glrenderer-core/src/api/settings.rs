// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Device configuration.

use serde::{Deserialize, Serialize};

/// Settings chosen when a device is created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceSettings {
    /// If `true`, linked programs are checked against the vertex layouts and render pass.
    pub validate_pipelines: bool,
    /// If `true`, every replayed command is logged at trace level.
    pub trace_commands: bool,
    /// Timeout of fence waits that do not give one, in nanoseconds.
    pub default_fence_timeout_ns: u64,
    /// Number of indices in the dummy index buffer backing the empty geometry.
    pub dummy_index_count: u32,
}

impl Default for DeviceSettings {
    fn default() -> Self {
        Self {
            validate_pipelines: cfg!(debug_assertions),
            trace_commands: false,
            default_fence_timeout_ns: 1_000_000_000,
            dummy_index_count: 6,
        }
    }
}

impl DeviceSettings {
    /// Parses settings from JSON. Missing fields keep their default value.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let settings = DeviceSettings::from_json(r#"{ "trace_commands": true }"#)
            .expect("valid settings");
        assert!(settings.trace_commands);
        assert_eq!(settings.dummy_index_count, 6);
        assert_eq!(settings.default_fence_timeout_ns, 1_000_000_000);
    }

    #[test]
    fn malformed_json_is_rejected() {
        assert!(DeviceSettings::from_json("{ trace_commands: yes }").is_err());
    }
}
