use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::QuizService;
use crate::models::quiz::entities::QuizQuestion;
use crate::models::quiz::responses::{CategoryQuestionsResponse, PublicOption, PublicQuestion};
use crate::models::{ApiResponse, ErrorCode};

// 去掉正确答案标记
fn to_public(question: QuizQuestion) -> PublicQuestion {
    PublicQuestion {
        id: question.id,
        text: question.text,
        options: question
            .options
            .into_iter()
            .map(|o| PublicOption { id: o.id, text: o.text })
            .collect(),
    }
}

pub async fn get_questions(
    service: &QuizService,
    request: &HttpRequest,
    category_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let category = match storage.get_quiz_category_by_id(category_id).await {
        Ok(Some(category)) => category,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::QuizCategoryNotFound,
                "Quiz category not found",
            )));
        }
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("Failed to get quiz category: {e}"),
                )),
            );
        }
    };

    match storage.list_quiz_questions(category.id).await {
        Ok(questions) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            CategoryQuestionsResponse {
                category_id: category.id,
                category_name: category.name,
                questions: questions.into_iter().map(to_public).collect(),
            },
            "Quiz questions retrieved successfully",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to get quiz questions: {e}"),
            )),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::quiz::entities::QuizOption;

    #[test]
    fn test_public_question_hides_answers() {
        let question = QuizQuestion {
            id: 1,
            category_id: 1,
            text: "2 + 2".into(),
            options: vec![
                QuizOption { id: 10, text: "4".into(), is_correct: true },
                QuizOption { id: 11, text: "5".into(), is_correct: false },
            ],
        };
        let json = serde_json::to_value(to_public(question)).unwrap();
        assert_eq!(json["options"][0]["id"], 10);
        assert!(json["options"][0].get("is_correct").is_none());
    }
}
