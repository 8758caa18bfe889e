// /////////////////////////////////////////////////////////////////////////////
// Document Generation Platform
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

use crate::entities::{Template, TemplateVersion};
use crate::error::DocGenError;
use crate::value_objects::{TemplateId, TemplateVersionId};
use async_trait::async_trait;

#[async_trait]
pub trait TemplateRepository: Send + Sync {
    async fn save(&self, template: &Template) -> Result<(), DocGenError>;
    async fn find_by_id(&self, id: TemplateId) -> Result<Option<Template>, DocGenError>;
}

/// One session per job claim, as spec §9's "Shared ownership / late wiring"
/// note directs: a repository is a value object over a transactional
/// session, not a request-scoped singleton.
#[async_trait]
pub trait TemplateVersionRepository: Send + Sync {
    async fn save(&self, version: &TemplateVersion) -> Result<(), DocGenError>;
    async fn update(&self, version: &TemplateVersion) -> Result<(), DocGenError>;
    async fn find_by_id(&self, id: TemplateVersionId) -> Result<Option<TemplateVersion>, DocGenError>;
    async fn next_version_number(&self, template_id: TemplateId) -> Result<i64, DocGenError>;
}
