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


//! Query commands.

use crate::gl::enums as gl;
use crate::gl::{GlFeature, GlName, GraphicsContext};

pub(super) fn write_timestamp(ctx: &mut dyn GraphicsContext, query: GlName) {
    if !ctx.supports(GlFeature::TimestampQuery) {
        log::warn!("WriteTimestamp: timestamp queries are not supported, skipped");
        return;
    }
    ctx.query_counter(query, gl::TIMESTAMP);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gl::{GlCall, TraceContext};

    #[test]
    fn timestamps_are_skipped_without_support() {
        let mut context = TraceContext::new().without_feature(GlFeature::TimestampQuery);

        write_timestamp(&mut context, GlName(4));

        assert!(context.calls().is_empty());
    }

    #[test]
    fn timestamps_write_a_query_counter() {
        let mut context = TraceContext::new();

        write_timestamp(&mut context, GlName(4));

        assert_eq!(
            context.calls(),
            vec![GlCall::QueryCounter {
                query: GlName(4),
                target: gl::TIMESTAMP,
            }]
        );
    }
}
