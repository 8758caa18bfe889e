// /////////////////////////////////////////////////////////////////////////////
// Document Generation Platform
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Filesystem-backed `ObjectStore`, grounded on the teacher's
//! `FileIOService` port pattern: an async infrastructure adapter under a
//! configured root directory. Keys map directly to relative paths (spec §6
//! key layout), so `templates/{id}/{version}/source.docx` becomes
//! `{root}/templates/{id}/{version}/source.docx`.

use async_trait::async_trait;
use doc_gen_domain::error::DocGenError;
use doc_gen_domain::services::ObjectStore;
use std::path::PathBuf;
use tokio::fs;

pub struct FsObjectStore {
    root: PathBuf,
}

impl FsObjectStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn resolve(&self, key: &str) -> PathBuf {
        self.root.join(key)
    }
}

#[async_trait]
impl ObjectStore for FsObjectStore {
    async fn put(&self, key: &str, bytes: Vec<u8>, _content_type: Option<&str>) -> Result<(), DocGenError> {
        let path = self.resolve(key);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::write(&path, bytes).await?;
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, DocGenError> {
        let path = self.resolve(key);
        match fs::read(&path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn exists(&self, key: &str) -> Result<bool, DocGenError> {
        Ok(fs::try_exists(self.resolve(key)).await?)
    }

    async fn delete(&self, key: &str) -> Result<bool, DocGenError> {
        let path = self.resolve(key);
        match fs::remove_file(&path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}

pub fn template_source_key(template_id: &str, version: i64) -> String {
    format!("templates/{template_id}/{version}/source.docx")
}

pub fn template_parsed_key(template_id: &str, version: i64) -> String {
    format!("templates/{template_id}/{version}/parsed.json")
}

pub fn document_output_key(document_id: &str, version: i64) -> String {
    format!("documents/{document_id}/{version}/output.docx")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn put_get_exists_delete_round_trip() {
        let dir = tempdir().unwrap();
        let store = FsObjectStore::new(dir.path());

        assert!(!store.exists("a/b.txt").await.unwrap());
        store.put("a/b.txt", b"hello".to_vec(), None).await.unwrap();
        assert!(store.exists("a/b.txt").await.unwrap());
        assert_eq!(store.get("a/b.txt").await.unwrap(), Some(b"hello".to_vec()));
        assert!(store.delete("a/b.txt").await.unwrap());
        assert!(!store.exists("a/b.txt").await.unwrap());
        assert!(!store.delete("a/b.txt").await.unwrap());
    }

    #[tokio::test]
    async fn get_missing_key_returns_none() {
        let dir = tempdir().unwrap();
        let store = FsObjectStore::new(dir.path());
        assert_eq!(store.get("missing").await.unwrap(), None);
    }
}
