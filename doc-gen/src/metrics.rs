// /////////////////////////////////////////////////////////////////////////////
// Document Generation Platform
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! `prometheus`-backed `MetricsRecorder`, grounded on the teacher's
//! `infrastructure/metrics::MetricsService`.

use doc_gen_domain::services::MetricsRecorder;
use prometheus::{Encoder, HistogramVec, IntCounterVec, Registry, TextEncoder};

pub struct PrometheusMetricsRecorder {
    registry: Registry,
    jobs_claimed: IntCounterVec,
    jobs_completed: IntCounterVec,
    jobs_failed: IntCounterVec,
    stage_duration: HistogramVec,
}

impl PrometheusMetricsRecorder {
    pub fn new() -> Self {
        let registry = Registry::new();

        let jobs_claimed = IntCounterVec::new(
            prometheus::Opts::new("docgen_jobs_claimed_total", "Jobs claimed by workers"),
            &["job_type"],
        )
        .expect("valid metric");
        let jobs_completed = IntCounterVec::new(
            prometheus::Opts::new("docgen_jobs_completed_total", "Jobs completed successfully"),
            &["job_type"],
        )
        .expect("valid metric");
        let jobs_failed = IntCounterVec::new(
            prometheus::Opts::new("docgen_jobs_failed_total", "Jobs that ended in failure"),
            &["job_type", "error_category"],
        )
        .expect("valid metric");
        let stage_duration = HistogramVec::new(
            prometheus::HistogramOpts::new("docgen_stage_duration_seconds", "Pipeline stage duration"),
            &["stage"],
        )
        .expect("valid metric");

        registry.register(Box::new(jobs_claimed.clone())).expect("register metric");
        registry.register(Box::new(jobs_completed.clone())).expect("register metric");
        registry.register(Box::new(jobs_failed.clone())).expect("register metric");
        registry.register(Box::new(stage_duration.clone())).expect("register metric");

        Self {
            registry,
            jobs_claimed,
            jobs_completed,
            jobs_failed,
            stage_duration,
        }
    }

    pub fn gather_text(&self) -> String {
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        TextEncoder::new()
            .encode(&metric_families, &mut buffer)
            .expect("encode metrics");
        String::from_utf8(buffer).expect("prometheus output is valid utf8")
    }
}

impl Default for PrometheusMetricsRecorder {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricsRecorder for PrometheusMetricsRecorder {
    fn job_claimed(&self, job_type: &str) {
        self.jobs_claimed.with_label_values(&[job_type]).inc();
    }

    fn job_completed(&self, job_type: &str) {
        self.jobs_completed.with_label_values(&[job_type]).inc();
    }

    fn job_failed(&self, job_type: &str, error_category: &str) {
        self.jobs_failed.with_label_values(&[job_type, error_category]).inc();
    }

    fn stage_duration(&self, stage: &str, seconds: f64) {
        self.stage_duration.with_label_values(&[stage]).observe(seconds);
    }
}
