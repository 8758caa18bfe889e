// /////////////////////////////////////////////////////////////////////////////
// Document Generation Platform
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Orchestrates the three classification stages (spec §4.9) over a parsed
//! template's block tree: rule-based first, LLM-assisted when enabled and
//! the rule-based stage was not confident, conservative fallback last.
//! Persists exactly one `Section` row per block.

use doc_gen_domain::classification::{classify_rule_based, fallback, validate_llm_response, ClassificationOutcome};
use doc_gen_domain::entities::Section;
use doc_gen_domain::error::DocGenError;
use doc_gen_domain::repositories::SectionRepository;
use doc_gen_domain::services::{LlmClassification, LlmClassifier};
use doc_gen_domain::value_objects::{Block, ClassificationMethod, SectionId, TemplateVersionId};
use std::sync::Arc;

pub struct ClassificationService {
    section_repository: Arc<dyn SectionRepository>,
    llm_classifier: Arc<dyn LlmClassifier>,
    confidence_threshold: f64,
    use_llm: bool,
}

impl ClassificationService {
    pub fn new(
        section_repository: Arc<dyn SectionRepository>,
        llm_classifier: Arc<dyn LlmClassifier>,
        confidence_threshold: f64,
        use_llm: bool,
    ) -> Self {
        Self {
            section_repository,
            llm_classifier,
            confidence_threshold,
            use_llm,
        }
    }

    /// Classifies every block of a parsed template and persists the
    /// resulting sections as one batch (spec §4.9: "for every block, create
    /// exactly one Section row"). `blocks` must already carry their
    /// `structural_path` ordering; the dense integer `SectionId` (spec §3) is
    /// assigned by the repository on save, since it is a single counter
    /// shared across every template version.
    pub async fn classify_template_version(&self, template_version_id: TemplateVersionId, blocks: &[Block]) -> Result<Vec<Section>, DocGenError> {
        let placeholder = SectionId::new(i64::MAX);
        let mut sections = Vec::with_capacity(blocks.len());
        for block in blocks {
            let outcome = self.classify_block(block).await?;
            let section = match outcome.prompt_config() {
                Some(prompt_config) => Section::new_dynamic(placeholder, template_version_id, block.structural_path(), prompt_config),
                None => Section::new_static(placeholder, template_version_id, block.structural_path()),
            };
            sections.push(section);
        }
        self.section_repository.save_all(&mut sections).await?;
        Ok(sections)
    }

    async fn classify_block(&self, block: &Block) -> Result<ClassificationOutcome, DocGenError> {
        if let Some(outcome) = classify_rule_based(block, self.confidence_threshold) {
            return Ok(outcome);
        }

        if self.use_llm {
            if let Some(outcome) = self.try_llm_classify(block).await? {
                return Ok(outcome);
            }
        }

        Ok(fallback())
    }

    async fn try_llm_classify(&self, block: &Block) -> Result<Option<ClassificationOutcome>, DocGenError> {
        let response: Option<LlmClassification> = self.llm_classifier.classify(block, &block.structural_path()).await?;
        let Some(response) = response else {
            return Ok(None);
        };
        match validate_llm_response(&format!("{:?}", response.section_type).to_uppercase(), response.confidence) {
            Ok(section_type) => Ok(Some(ClassificationOutcome {
                section_type,
                confidence: response.confidence,
                method: ClassificationMethod::LlmAssisted,
                justification: response.reasoning,
            })),
            Err(_) => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use doc_gen_domain::value_objects::{SectionType, TemplateVersionId, TextRun};
    use std::sync::Mutex;

    struct RecordingSectionRepository {
        saved: Mutex<Vec<Section>>,
        next_id: std::sync::atomic::AtomicI64,
    }

    #[async_trait]
    impl SectionRepository for RecordingSectionRepository {
        async fn save_all(&self, sections: &mut [Section]) -> Result<(), DocGenError> {
            for section in sections.iter_mut() {
                section.id = SectionId::new(self.next_id.fetch_add(1, std::sync::atomic::Ordering::SeqCst));
            }
            self.saved.lock().unwrap().extend_from_slice(sections);
            Ok(())
        }

        async fn find_by_template_version(&self, _template_version_id: TemplateVersionId) -> Result<Vec<Section>, DocGenError> {
            Ok(self.saved.lock().unwrap().clone())
        }

        async fn find_dynamic_ordered(&self, _template_version_id: TemplateVersionId) -> Result<Vec<Section>, DocGenError> {
            Ok(self.saved.lock().unwrap().iter().filter(|s| s.is_dynamic()).cloned().collect())
        }
    }

    struct AlwaysDeclinesClassifier;

    #[async_trait]
    impl LlmClassifier for AlwaysDeclinesClassifier {
        async fn classify(&self, _block: &Block, _structural_path: &str) -> Result<Option<LlmClassification>, DocGenError> {
            Ok(None)
        }
    }

    fn paragraph(text: &str, sequence: u32) -> Block {
        Block::Paragraph {
            block_id: format!("p{sequence}"),
            sequence,
            runs: vec![TextRun::plain(text)],
            formatting: Default::default(),
        }
    }

    #[tokio::test]
    async fn classifies_every_block_into_exactly_one_section() {
        let repo = Arc::new(RecordingSectionRepository {
            saved: Mutex::new(vec![]),
            next_id: std::sync::atomic::AtomicI64::new(1),
        });
        let service = ClassificationService::new(repo.clone(), Arc::new(AlwaysDeclinesClassifier), 0.85, false);

        let blocks = vec![
            paragraph("This is confidential and privileged material.", 0),
            paragraph("Dear {client_name}, welcome aboard.", 1),
            paragraph("Section overview follows below for reference purposes only today.", 2),
        ];

        let sections = service.classify_template_version(TemplateVersionId::new(), &blocks).await.unwrap();

        assert_eq!(sections.len(), 3);
        assert_eq!(sections[0].section_type, SectionType::Static);
        assert_eq!(sections[1].section_type, SectionType::Dynamic);
        assert_eq!(sections[2].section_type, SectionType::Static);
        assert!(sections.iter().map(|s| s.id.value()).eq(1..=3), "ids must be assigned densely by the repository");
        assert_eq!(repo.saved.lock().unwrap().len(), 3);
    }
}
