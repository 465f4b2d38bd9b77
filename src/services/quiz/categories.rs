use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use super::QuizService;
use crate::models::quiz::requests::CreateCategoryRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::storage::Storage;

pub async fn list_categories(
    service: &QuizService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    match service.get_storage(request).list_quiz_categories().await {
        Ok(categories) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            categories,
            "Quiz categories retrieved successfully",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to retrieve quiz categories: {e}"),
            )),
        ),
    }
}

/// 每道题至少两个选项且恰好一个正确答案
pub(crate) fn validate_category(category: &CreateCategoryRequest) -> Result<(), String> {
    if category.name.trim().is_empty() {
        return Err("Category name is required".to_string());
    }

    for (index, question) in category.questions.iter().enumerate() {
        let number = index + 1;
        if question.text.trim().is_empty() {
            return Err(format!("Question {number} has no text"));
        }
        if question.options.len() < 2 {
            return Err(format!("Question {number} needs at least two options"));
        }
        if question.options.iter().any(|o| o.text.trim().is_empty()) {
            return Err(format!("Question {number} has an empty option"));
        }
        let correct = question.options.iter().filter(|o| o.is_correct).count();
        if correct != 1 {
            return Err(format!(
                "Question {number} must have exactly one correct option, found {correct}"
            ));
        }
    }

    Ok(())
}

fn invalid_quiz(message: String) -> HttpResponse {
    HttpResponse::BadRequest().json(ApiResponse::error_empty(ErrorCode::QuizInvalid, message))
}

// 名称未被其他分类占用
async fn ensure_name_available(
    storage: &Arc<dyn Storage>,
    name: &str,
    current_id: Option<i64>,
) -> Result<(), HttpResponse> {
    match storage.get_quiz_category_by_name(name).await {
        Ok(Some(existing)) if Some(existing.id) != current_id => {
            Err(HttpResponse::Conflict().json(ApiResponse::error_empty(
                ErrorCode::QuizCategoryAlreadyExists,
                "Quiz category already exists",
            )))
        }
        Ok(_) => Ok(()),
        Err(e) => Err(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to check quiz category: {e}"),
            )),
        ),
    }
}

pub async fn create_category(
    service: &QuizService,
    request: &HttpRequest,
    mut category_data: CreateCategoryRequest,
) -> ActixResult<HttpResponse> {
    if let Err(msg) = validate_category(&category_data) {
        return Ok(invalid_quiz(msg));
    }
    category_data.name = category_data.name.trim().to_string();

    let storage = service.get_storage(request);
    if let Err(resp) = ensure_name_available(&storage, &category_data.name, None).await {
        return Ok(resp);
    }

    let question_count = category_data.questions.len();
    match storage.create_quiz_category(category_data).await {
        Ok(category) => {
            tracing::info!(
                "Quiz category '{}' created with {} questions",
                category.name,
                question_count
            );
            Ok(HttpResponse::Created().json(ApiResponse::success(
                category,
                "Quiz category created successfully",
            )))
        }
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Quiz category creation failed: {e}"),
            )),
        ),
    }
}

/// 编辑分类：名称、描述与题目整体替换
pub async fn update_category(
    service: &QuizService,
    request: &HttpRequest,
    category_id: i64,
    mut category_data: CreateCategoryRequest,
) -> ActixResult<HttpResponse> {
    if let Err(msg) = validate_category(&category_data) {
        return Ok(invalid_quiz(msg));
    }
    category_data.name = category_data.name.trim().to_string();

    let storage = service.get_storage(request);
    if let Err(resp) =
        ensure_name_available(&storage, &category_data.name, Some(category_id)).await
    {
        return Ok(resp);
    }

    let question_count = category_data.questions.len();
    match storage.update_quiz_category(category_id, category_data).await {
        Ok(Some(category)) => {
            tracing::info!(
                "Quiz category {} updated with {} questions",
                category.id,
                question_count
            );
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                category,
                "Quiz category updated successfully",
            )))
        }
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::QuizCategoryNotFound,
            "Quiz category not found",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Quiz category update failed: {e}"),
            )),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::quiz::requests::{CreateOptionRequest, CreateQuestionRequest};

    fn option(text: &str, is_correct: bool) -> CreateOptionRequest {
        CreateOptionRequest {
            text: text.into(),
            is_correct,
        }
    }

    fn category(options: Vec<CreateOptionRequest>) -> CreateCategoryRequest {
        CreateCategoryRequest {
            name: "Rust".into(),
            description: None,
            questions: vec![CreateQuestionRequest {
                text: "What does the borrow checker check?".into(),
                options,
            }],
        }
    }

    #[test]
    fn test_valid_category() {
        let valid = category(vec![option("a", true), option("b", false)]);
        assert!(validate_category(&valid).is_ok());
    }

    #[test]
    fn test_question_rules() {
        let err = validate_category(&category(vec![option("a", true)])).unwrap_err();
        assert!(err.contains("at least two"));

        let both = category(vec![option("a", true), option("b", true)]);
        let err = validate_category(&both).unwrap_err();
        assert!(err.contains("exactly one"));

        let neither = category(vec![option("a", false), option("b", false)]);
        let err = validate_category(&neither).unwrap_err();
        assert!(err.contains("found 0"));
    }

    #[test]
    fn test_blank_name() {
        let mut req = category(vec![option("a", true), option("b", false)]);
        req.name = "  ".into();
        assert!(validate_category(&req).is_err());
    }
}
