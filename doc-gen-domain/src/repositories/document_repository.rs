// /////////////////////////////////////////////////////////////////////////////
// Document Generation Platform
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

use crate::entities::Document;
use crate::error::DocGenError;
use crate::value_objects::DocumentId;
use async_trait::async_trait;

#[async_trait]
pub trait DocumentRepository: Send + Sync {
    async fn save(&self, document: &Document) -> Result<(), DocGenError>;
    async fn update(&self, document: &Document) -> Result<(), DocGenError>;
    async fn find_by_id(&self, id: DocumentId) -> Result<Option<Document>, DocGenError>;
}
