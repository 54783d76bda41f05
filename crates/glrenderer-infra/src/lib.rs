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

//! # GlRenderer Infra
//!
//! Concrete OpenGL plumbing for `glrenderer-core`: a [`GraphicsContext`](glrenderer_core::GraphicsContext)
//! over a live glow context, plus the logging setup used by applications.

#![warn(missing_docs)]

pub mod graphics;

#[cfg(feature = "graphics")]
pub use graphics::glow::GlowContext;

use env_logger::{Builder, Env};

/// Installs the global logger, reading `RUST_LOG` and falling back to `info`.
///
/// Calling it more than once is harmless; later calls report the error and
/// leave the first logger in place.
pub fn init_logging() -> Result<(), log::SetLoggerError> {
    Builder::from_env(Env::default().default_filter_or("info")).try_init()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn logging_can_be_initialized_twice() {
        let _ = init_logging();
        assert!(init_logging().is_err());
    }
}
