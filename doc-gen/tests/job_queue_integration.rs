// /////////////////////////////////////////////////////////////////////////////
// Document Generation Platform
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Integration tests for the sqlite-backed job queue against a real
//! on-disk database (spec §8 invariants 3 and 9; scenario 5 "Atomic claim
//! under contention").

use doc_gen::infrastructure::sqlite::{self, SqliteJobRepository};
use doc_gen_domain::entities::JobPayload;
use doc_gen_domain::repositories::JobRepository;
use doc_gen_domain::value_objects::TemplateVersionId;
use std::collections::HashSet;
use std::sync::Arc;

async fn fresh_pool() -> sqlx::SqlitePool {
    let file = tempfile::NamedTempFile::new().expect("create temp db file");
    let path = file.path().to_path_buf();
    // Keep the tempfile handle alive for the pool's lifetime by leaking it;
    // the OS reclaims the file when the test process exits.
    std::mem::forget(file);
    sqlite::connect(&format!("sqlite://{}", path.display()), 10).await.expect("connect + migrate")
}

/// Spec §8 invariant 3 / scenario 5: for *N* jobs and *W* concurrent
/// claimers, each job is claimed by exactly one worker and every job
/// reaches COMPLETED with no job left RUNNING or claimed twice.
#[tokio::test]
async fn atomic_claim_under_contention() {
    let pool = fresh_pool().await;
    let repo = Arc::new(SqliteJobRepository::new(pool));

    const JOB_COUNT: usize = 100;
    const WORKER_COUNT: usize = 10;

    for _ in 0..JOB_COUNT {
        repo.enqueue(&JobPayload::Parse {
            template_version_id: TemplateVersionId::new(),
        })
        .await
        .unwrap();
    }

    let mut handles = Vec::with_capacity(WORKER_COUNT);
    for worker_index in 0..WORKER_COUNT {
        let repo = repo.clone();
        handles.push(tokio::spawn(async move {
            let worker_id = format!("worker-{worker_index}");
            let mut claimed = Vec::new();
            loop {
                match repo.claim(&worker_id, None).await.unwrap() {
                    Some(job) => {
                        repo.complete(job.id, serde_json::json!({})).await.unwrap();
                        claimed.push(job.id);
                    }
                    None => break,
                }
            }
            claimed
        }));
    }

    let mut all_claimed = Vec::new();
    for handle in handles {
        all_claimed.extend(handle.await.unwrap());
    }

    assert_eq!(all_claimed.len(), JOB_COUNT, "every job must be claimed exactly once in total");
    let unique: HashSet<_> = all_claimed.iter().collect();
    assert_eq!(unique.len(), JOB_COUNT, "no job id may be claimed twice");
}

/// Spec §4.2: PARSE completion enqueues CLASSIFY for the same
/// template-version-id, in the same transaction as the completion.
#[tokio::test]
async fn parse_completion_advances_to_classify() {
    let pool = fresh_pool().await;
    let repo = SqliteJobRepository::new(pool);

    let template_version_id = TemplateVersionId::new();
    let job_id = repo.enqueue(&JobPayload::Parse { template_version_id }).await.unwrap();
    let job = repo.claim("worker-1", None).await.unwrap().expect("job available");
    assert_eq!(job.id, job_id);

    let successor_id = repo
        .complete_and_advance(
            job.id,
            serde_json::json!({"parsed_path": "templates/t/1/parsed.json"}),
            Some(JobPayload::Classify { template_version_id }),
        )
        .await
        .unwrap()
        .expect("PARSE always advances to CLASSIFY");

    let successor = repo.find_by_id(successor_id).await.unwrap().expect("successor persisted");
    assert_eq!(successor.job_type, doc_gen_domain::value_objects::JobType::Classify);
    match successor.decode_payload().unwrap() {
        JobPayload::Classify { template_version_id: tvid } => assert_eq!(tvid, template_version_id),
        other => panic!("expected Classify payload, got {other:?}"),
    }
}

/// Spec §4.2 `find-stuck`/`reset-stuck`, §8 invariant 9: a RUNNING job past
/// the stuck threshold is reset to PENDING exactly once and can be
/// re-claimed by a different worker.
#[tokio::test]
async fn stuck_job_is_recovered_and_reclaimable() {
    let pool = fresh_pool().await;
    let repo = SqliteJobRepository::new(pool);

    let job_id = repo
        .enqueue(&JobPayload::Parse {
            template_version_id: TemplateVersionId::new(),
        })
        .await
        .unwrap();
    let job = repo.claim("dead-worker", None).await.unwrap().unwrap();
    assert_eq!(job.id, job_id);

    // No job is stuck yet under a generous threshold.
    assert!(repo.find_stuck(chrono::Duration::hours(1)).await.unwrap().is_empty());

    // Under a zero threshold every RUNNING job looks stuck.
    let stuck = repo.find_stuck(chrono::Duration::seconds(0)).await.unwrap();
    assert_eq!(stuck.len(), 1);
    assert_eq!(stuck[0].id, job_id);

    repo.reset_stuck(job_id, "stuck job recovery").await.unwrap();

    // A second reset attempt against the now-PENDING job must fail, since
    // only a RUNNING job can be reset (spec §8 invariant 9: at most one
    // successful reset per stuck job).
    assert!(repo.reset_stuck(job_id, "stuck job recovery").await.is_err());

    let reclaimed = repo.claim("worker-2", None).await.unwrap().expect("reset job is claimable again");
    assert_eq!(reclaimed.id, job_id);
    assert_eq!(reclaimed.worker_id.as_deref(), Some("worker-2"));
}

/// Spec §4.2 `cancel`: terminal jobs cannot be cancelled.
#[tokio::test]
async fn cancel_is_noop_on_terminal_jobs() {
    let pool = fresh_pool().await;
    let repo = SqliteJobRepository::new(pool);

    let job_id = repo
        .enqueue(&JobPayload::Parse {
            template_version_id: TemplateVersionId::new(),
        })
        .await
        .unwrap();
    let job = repo.claim("worker-1", None).await.unwrap().unwrap();
    repo.complete(job.id, serde_json::json!({})).await.unwrap();

    assert!(!repo.cancel(job_id).await.unwrap());
}
