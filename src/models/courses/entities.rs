use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Course {
    pub id: i64,
    pub instructor_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

// 课程内容（视频、文档、文本等）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseContent {
    pub id: i64,
    pub course_id: i64,
    pub title: String,
    pub content_type: String,
    pub url: Option<String>,
    pub text_content: Option<String>,
    pub order: i32,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}
