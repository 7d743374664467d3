/*
 * Responsibility
 * - Posts の request/response DTO
 */
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::repos::post_repo::PostRow;

#[derive(Debug, Deserialize)]
pub struct CreatePostRequest {
    pub title: String,
    pub content: String,
}

impl CreatePostRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.title.trim().is_empty() {
            return Err("title is required");
        }
        if self.content.trim().is_empty() {
            return Err("content is required");
        }

        Ok(())
    }
}

#[derive(Debug, Serialize)]
pub struct PostResponse {
    pub id: String,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl From<PostRow> for PostResponse {
    fn from(row: PostRow) -> Self {
        Self {
            id: row.post_id.to_string(),
            title: row.title,
            content: row.content,
            created_at: row.created_at,
        }
    }
}
