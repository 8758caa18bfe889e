// /////////////////////////////////////////////////////////////////////////////
// Document Generation Platform
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Document Generation Domain
//!
//! Pure domain model for the template-driven document generation platform:
//! entities, value objects, repository and collaborator traits, and the
//! rule-based classification engine. No `tokio` runtime dependency and no
//! `sqlx` — persistence and async I/O are infrastructure concerns that the
//! `doc-gen` crate implements against the traits defined here, mirroring the
//! DDD layering of the teacher's `adaptive_pipeline_domain` crate.

pub mod classification;
pub mod entities;
pub mod error;
pub mod repositories;
pub mod services;
pub mod value_objects;

pub use error::DocGenError;
