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

//! Fences and semaphores.

use super::registry::lock;
use crate::api::{FenceId, SemaphoreId, WaitResult};
use crate::gl::enums as gl;
use crate::gl::{GlSync, GraphicsContext};
use std::sync::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FenceState {
    Unsignaled,
    Signaled,
    Pending(GlSync),
}

/// A host-waitable fence backed by a lazily created sync object.
#[derive(Debug)]
pub(crate) struct FenceObject {
    pub id: FenceId,
    state: Mutex<FenceState>,
}

impl FenceObject {
    pub(crate) fn new(id: FenceId, signaled: bool) -> Self {
        let state = if signaled {
            FenceState::Signaled
        } else {
            FenceState::Unsignaled
        };
        Self {
            id,
            state: Mutex::new(state),
        }
    }

    /// Inserts a sync object after the commands submitted so far.
    pub(crate) fn signal_after_submit(&self, ctx: &mut dyn GraphicsContext) {
        let mut state = lock(&self.state);
        if let FenceState::Pending(previous) = *state {
            ctx.delete_sync(previous);
        }
        *state = match ctx.fence_sync() {
            Ok(sync) => FenceState::Pending(sync),
            Err(err) => {
                log::warn!("Fence: {err}, the fence is signaled immediately");
                FenceState::Signaled
            }
        };
    }

    pub(crate) fn wait(&self, ctx: &mut dyn GraphicsContext, timeout_ns: u64) -> WaitResult {
        let mut state = lock(&self.state);
        let sync = match *state {
            FenceState::Signaled => return WaitResult::Success,
            FenceState::Pending(sync) => sync,
            FenceState::Unsignaled => match ctx.fence_sync() {
                Ok(sync) => sync,
                Err(err) => {
                    log::error!("Fence: {err}");
                    return WaitResult::Error;
                }
            },
        };
        match ctx.client_wait_sync(sync, gl::SYNC_FLUSH_COMMANDS_BIT, timeout_ns) {
            gl::ALREADY_SIGNALED | gl::CONDITION_SATISFIED => {
                ctx.delete_sync(sync);
                *state = FenceState::Signaled;
                WaitResult::Success
            }
            gl::TIMEOUT_EXPIRED => {
                *state = FenceState::Pending(sync);
                WaitResult::Timeout
            }
            status => {
                log::error!("Fence: wait failed with status 0x{status:04X}");
                *state = FenceState::Pending(sync);
                WaitResult::Error
            }
        }
    }

    pub(crate) fn reset(&self, ctx: &mut dyn GraphicsContext) {
        let mut state = lock(&self.state);
        if let FenceState::Pending(sync) = *state {
            ctx.delete_sync(sync);
        }
        *state = FenceState::Unsignaled;
    }

    pub(crate) fn is_signaled(&self) -> bool {
        *lock(&self.state) == FenceState::Signaled
    }
}

/// Queue-to-queue synchronisation is implicit on a single context.
#[derive(Debug)]
pub(crate) struct SemaphoreObject {
    pub id: SemaphoreId,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gl::{GlCall, TraceContext};

    #[test]
    fn signaled_fence_does_not_touch_the_context() {
        let mut context = TraceContext::new();
        let fence = FenceObject::new(FenceId(0), true);
        assert_eq!(fence.wait(&mut context, 10), WaitResult::Success);
        assert!(context.calls().is_empty());
    }

    #[test]
    fn timeout_keeps_the_sync_pending() {
        let mut context = TraceContext::new();
        context.set_wait_status(gl::TIMEOUT_EXPIRED);
        let fence = FenceObject::new(FenceId(0), false);
        assert_eq!(fence.wait(&mut context, 10), WaitResult::Timeout);
        assert!(!fence.is_signaled());

        context.set_wait_status(gl::CONDITION_SATISFIED);
        assert_eq!(fence.wait(&mut context, 10), WaitResult::Success);
        assert!(fence.is_signaled());
        assert_eq!(context.count(|call| matches!(call, GlCall::FenceSync(_))), 1);
    }

    #[test]
    fn reset_deletes_a_pending_sync() {
        let mut context = TraceContext::new();
        let fence = FenceObject::new(FenceId(0), false);
        fence.signal_after_submit(&mut context);
        fence.reset(&mut context);
        assert!(!fence.is_signaled());
        assert_eq!(context.count(|call| matches!(call, GlCall::DeleteSync(_))), 1);
    }

    #[test]
    fn failed_wait_reports_an_error() {
        let mut context = TraceContext::new();
        context.set_wait_status(gl::WAIT_FAILED);
        let fence = FenceObject::new(FenceId(0), false);
        assert_eq!(fence.wait(&mut context, 10), WaitResult::Error);
    }
}
