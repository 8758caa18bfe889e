// /////////////////////////////////////////////////////////////////////////////
// Document Generation Platform
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Supervised task spawning for the scheduler's cooperating loops (spec
//! §4.2, §5), grounded on the teacher's `infrastructure/runtime/supervisor.rs`:
//! wraps `tokio::spawn` so a loop's failure is logged and joinable rather
//! than silently dropped.

use doc_gen_domain::error::DocGenError;
use tokio::task::JoinHandle;
use tracing::{debug, error};

pub fn spawn_supervised<F, T>(name: &'static str, fut: F) -> JoinHandle<Result<T, DocGenError>>
where
    F: std::future::Future<Output = Result<T, DocGenError>> + Send + 'static,
    T: Send + 'static,
{
    debug!(task = name, "task starting");

    tokio::spawn(async move {
        let result = fut.await;
        match &result {
            Ok(_) => debug!(task = name, "task completed"),
            Err(e) => error!(task = name, error = %e, "task failed"),
        }
        result
    })
}

pub async fn join_supervised<T>(handle: JoinHandle<Result<T, DocGenError>>) -> Result<T, DocGenError> {
    match handle.await {
        Ok(task_result) => task_result,
        Err(e) if e.is_panic() => Err(DocGenError::internal(format!("task panicked: {e}"))),
        Err(e) => Err(DocGenError::internal(format!("task join failed: {e}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn propagates_success() {
        let handle = spawn_supervised("test-success", async { Ok::<i32, DocGenError>(42) });
        assert_eq!(join_supervised(handle).await.unwrap(), 42);
    }

    #[tokio::test]
    async fn propagates_failure() {
        let handle = spawn_supervised("test-error", async { Err::<(), _>(DocGenError::internal("boom")) });
        assert!(join_supervised(handle).await.is_err());
    }

    #[tokio::test]
    async fn propagates_panic() {
        let handle: JoinHandle<Result<(), DocGenError>> = tokio::spawn(async { panic!("test panic") });
        let result = join_supervised(handle).await;
        assert!(result.unwrap_err().to_string().contains("panicked"));
    }
}
