/*
 * Responsibility
 * - posts CRUD (in-memory)
 * - 認可は知らない。呼び出し側 (services::posts) が authz::require 済みである前提
 */
use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct PostRow {
    pub post_id: Uuid,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// Clone 前提 (内部は Arc)
#[derive(Debug, Clone, Default)]
pub struct PostRepo {
    rows: Arc<RwLock<HashMap<Uuid, PostRow>>>,
}

impl PostRepo {
    pub fn new() -> Self {
        Self::default()
    }

    // newest first
    pub async fn list(&self, limit: usize, offset: usize) -> Vec<PostRow> {
        let rows = self.rows.read().await;
        let mut out: Vec<PostRow> = rows.values().cloned().collect();
        out.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        out.into_iter().skip(offset).take(limit).collect()
    }

    pub async fn create(&self, title: &str, content: &str) -> PostRow {
        let row = PostRow {
            post_id: Uuid::new_v4(),
            title: title.to_string(),
            content: content.to_string(),
            created_at: Utc::now(),
        };
        self.rows.write().await.insert(row.post_id, row.clone());
        row
    }

    pub async fn get(&self, post_id: Uuid) -> Option<PostRow> {
        self.rows.read().await.get(&post_id).cloned()
    }

    pub async fn delete(&self, post_id: Uuid) -> bool {
        self.rows.write().await.remove(&post_id).is_some()
    }
}
