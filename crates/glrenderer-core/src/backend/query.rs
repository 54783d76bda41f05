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

//! Query pools.

use crate::api::{QueryPoolDescriptor, QueryPoolId, QueryResultFlags, QueryType};
use crate::error::ResourceError;
use crate::gl::{GlName, GraphicsContext};

/// One OpenGL query object per query of the pool.
#[derive(Debug)]
pub(crate) struct QueryPoolObject {
    pub id: QueryPoolId,
    pub query_type: QueryType,
    pub names: Vec<GlName>,
}

impl QueryPoolObject {
    pub(crate) fn create(
        ctx: &mut dyn GraphicsContext,
        id: QueryPoolId,
        descriptor: &QueryPoolDescriptor,
    ) -> Result<Self, ResourceError> {
        let mut names = Vec::with_capacity(descriptor.count as usize);
        for _ in 0..descriptor.count {
            match ctx.create_query() {
                Ok(name) => names.push(name),
                Err(err) => {
                    names.drain(..).for_each(|name| ctx.delete_query(name));
                    return Err(err.into());
                }
            }
        }
        Ok(Self {
            id,
            query_type: descriptor.query_type,
            names,
        })
    }

    pub(crate) fn name(&self, query: u32) -> Option<GlName> {
        self.names.get(query as usize).copied()
    }

    /// Reads `count` results starting at `first`. Unavailable results are `None`.
    pub(crate) fn results(
        &self,
        ctx: &mut dyn GraphicsContext,
        first: u32,
        count: u32,
        flags: QueryResultFlags,
    ) -> Result<Vec<Option<u64>>, ResourceError> {
        let end = first.checked_add(count).ok_or(ResourceError::OutOfBounds)?;
        let names = self
            .names
            .get(first as usize..end as usize)
            .ok_or(ResourceError::OutOfBounds)?;
        if flags.contains(QueryResultFlags::WAIT) {
            ctx.finish();
        }
        Ok(names.iter().map(|name| ctx.query_result(*name)).collect())
    }

    pub(crate) fn destroy(&self, ctx: &mut dyn GraphicsContext) {
        self.names.iter().for_each(|name| ctx.delete_query(*name));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gl::{GlCall, TraceContext};

    fn pool(context: &mut TraceContext) -> QueryPoolObject {
        QueryPoolObject::create(
            context,
            QueryPoolId(0),
            &QueryPoolDescriptor {
                query_type: QueryType::Occlusion,
                count: 4,
            },
        )
        .expect("query pool")
    }

    #[test]
    fn waiting_for_results_finishes_the_context() {
        let mut context = TraceContext::new();
        let pool = pool(&mut context);
        context.set_query_result(Some(42));

        let results = pool
            .results(&mut context, 1, 2, QueryResultFlags::WAIT)
            .expect("results");

        assert_eq!(results, vec![Some(42), Some(42)]);
        assert_eq!(context.count(|call| *call == GlCall::Finish), 1);
    }

    #[test]
    fn out_of_range_queries_are_rejected() {
        let mut context = TraceContext::new();
        let pool = pool(&mut context);
        assert!(matches!(
            pool.results(&mut context, 3, 2, QueryResultFlags::empty()),
            Err(ResourceError::OutOfBounds)
        ));
    }
}
