use serde::Deserialize;
use std::collections::HashMap;

#[derive(Debug, Deserialize)]
pub struct CreateOptionRequest {
    pub text: String,
    #[serde(default)]
    pub is_correct: bool,
}

#[derive(Debug, Deserialize)]
pub struct CreateQuestionRequest {
    pub text: String,
    pub options: Vec<CreateOptionRequest>,
}

// 创建测验分类（连同题目）
#[derive(Debug, Deserialize)]
pub struct CreateCategoryRequest {
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub questions: Vec<CreateQuestionRequest>,
}

// 提交答案，answers 为 题目ID -> 选项ID
#[derive(Debug, Deserialize)]
pub struct SubmitQuizRequest {
    #[serde(deserialize_with = "crate::utils::extractor::deserialize_loose_i64")]
    pub category_id: i64,
    #[serde(default)]
    pub answers: HashMap<String, i64>,
}

// 批量删除分类
#[derive(Debug, Deserialize)]
pub struct DeleteCategoriesRequest {
    pub category_ids: Vec<i64>,
}
