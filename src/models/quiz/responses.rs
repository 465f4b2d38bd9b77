use super::entities::QuizCategory;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct CategorySummary {
    #[serde(flatten)]
    pub category: QuizCategory,
    pub question_count: i64,
}

// 对外展示的选项，不包含正确答案
#[derive(Debug, Serialize)]
pub struct PublicOption {
    pub id: i64,
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct PublicQuestion {
    pub id: i64,
    pub text: String,
    pub options: Vec<PublicOption>,
}

#[derive(Debug, Serialize)]
pub struct CategoryQuestionsResponse {
    pub category_id: i64,
    pub category_name: String,
    pub questions: Vec<PublicQuestion>,
}

#[derive(Debug, Serialize)]
pub struct QuestionResult {
    pub question_id: i64,
    pub selected_option_id: Option<i64>,
    pub correct_option_id: Option<i64>,
    pub is_correct: bool,
}

#[derive(Debug, Serialize)]
pub struct QuizResultResponse {
    pub attempt_id: i64,
    pub category_id: i64,
    pub score: i32,
    pub total: i32,
    pub results: Vec<QuestionResult>,
}

#[derive(Debug, Serialize)]
pub struct DeleteCategoriesResponse {
    pub deleted: u64,
}
