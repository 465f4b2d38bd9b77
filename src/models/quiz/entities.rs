use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizCategory {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

// 题目及选项，包含正确答案，仅用于服务端判分
#[derive(Debug, Clone)]
pub struct QuizQuestion {
    pub id: i64,
    pub category_id: i64,
    pub text: String,
    pub options: Vec<QuizOption>,
}

#[derive(Debug, Clone)]
pub struct QuizOption {
    pub id: i64,
    pub text: String,
    pub is_correct: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizAttempt {
    pub id: i64,
    pub user_id: i64,
    pub category_id: i64,
    pub score: i32,
    pub total: i32,
    pub created_at: chrono::DateTime<chrono::Utc>,
}
