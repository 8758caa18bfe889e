// /////////////////////////////////////////////////////////////////////////////
// Document Generation Platform
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Versioning error codes, from spec §7. `DuplicateContent` is not an error
//! in practice — it is returned as a successful duplicate result — but it
//! keeps a slot in the enum so logging/metrics can label the outcome kind
//! uniformly alongside genuine failures.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VersioningErrorCode {
    DocumentNotFound,
    DuplicateVersion,
    DuplicateContent,
    PersistenceFailed,
    StorageFailed,
    ContentHashMismatch,
}

impl std::fmt::Display for VersioningErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self:?}")
    }
}
