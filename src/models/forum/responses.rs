use super::entities::{ForumComment, ForumPost};
use crate::models::common::PaginatedResponse;
use serde::Serialize;

pub type PostListResponse = PaginatedResponse<ForumPost>;

#[derive(Debug, Serialize)]
pub struct PostDetailResponse {
    #[serde(flatten)]
    pub post: ForumPost,
    pub comments: Vec<ForumComment>,
}
