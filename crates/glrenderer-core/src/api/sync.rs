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

//! Synchronization primitives and queries.

/// An opaque handle to a fence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FenceId(pub usize);

/// An opaque handle to a semaphore.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SemaphoreId(pub usize);

/// An opaque handle to a query pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct QueryPoolId(pub usize);

/// The outcome of a fence wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WaitResult {
    /// The fence is signaled.
    Success,
    /// The timeout expired first.
    Timeout,
    /// The wait failed.
    Error,
}

/// The kind of queries held by a pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryType {
    /// Number of samples passing the depth test.
    Occlusion,
    /// GPU timestamps in nanoseconds.
    Timestamp,
}

/// Describes a query pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct QueryPoolDescriptor {
    /// Kind of queries.
    pub query_type: QueryType,
    /// Number of queries.
    pub count: u32,
}
