use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::collections::HashMap;

use super::QuizService;
use crate::middlewares::RequireJWT;
use crate::models::quiz::entities::QuizQuestion;
use crate::models::quiz::requests::SubmitQuizRequest;
use crate::models::quiz::responses::{QuestionResult, QuizResultResponse};
use crate::models::{ApiResponse, ErrorCode};

/// 判分：未作答或选项不属于该题均记为错误
pub(crate) fn grade(
    questions: &[QuizQuestion],
    answers: &HashMap<String, i64>,
) -> (i32, Vec<QuestionResult>) {
    let mut score = 0;
    let results = questions
        .iter()
        .map(|question| {
            let selected = answers.get(&question.id.to_string()).copied();
            let correct = question.options.iter().find(|o| o.is_correct).map(|o| o.id);
            let is_correct = selected.is_some() && selected == correct;
            if is_correct {
                score += 1;
            }
            QuestionResult {
                question_id: question.id,
                selected_option_id: selected,
                correct_option_id: correct,
                is_correct,
            }
        })
        .collect();
    (score, results)
}

pub async fn submit_quiz(
    service: &QuizService,
    request: &HttpRequest,
    submission: SubmitQuizRequest,
) -> ActixResult<HttpResponse> {
    let Some(uid) = RequireJWT::extract_user_id(request) else {
        return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Unauthorized: missing user id",
        )));
    };
    let storage = service.get_storage(request);

    match storage.get_quiz_category_by_id(submission.category_id).await {
        Ok(Some(_)) => {}
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
    }

    let questions = match storage.list_quiz_questions(submission.category_id).await {
        Ok(questions) => questions,
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("Failed to get quiz questions: {e}"),
                )),
            );
        }
    };

    let (score, results) = grade(&questions, &submission.answers);
    let total = questions.len() as i32;

    match storage
        .create_quiz_attempt(uid, submission.category_id, score, total)
        .await
    {
        Ok(attempt) => {
            tracing::info!(
                "User {} scored {}/{} in quiz category {}",
                uid,
                score,
                total,
                submission.category_id
            );
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                QuizResultResponse {
                    attempt_id: attempt.id,
                    category_id: attempt.category_id,
                    score,
                    total,
                    results,
                },
                "Quiz submitted successfully",
            )))
        }
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to record quiz attempt: {e}"),
            )),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::quiz::entities::QuizOption;

    fn question(id: i64, correct: i64, wrong: i64) -> QuizQuestion {
        QuizQuestion {
            id,
            category_id: 1,
            text: format!("q{id}"),
            options: vec![
                QuizOption { id: correct, text: "right".into(), is_correct: true },
                QuizOption { id: wrong, text: "wrong".into(), is_correct: false },
            ],
        }
    }

    #[test]
    fn test_grade() {
        let questions = [question(1, 10, 11), question(2, 20, 21), question(3, 30, 31)];
        let answers = HashMap::from([("1".to_string(), 10), ("2".to_string(), 21)]);

        let (score, results) = grade(&questions, &answers);
        assert_eq!(score, 1);
        assert!(results[0].is_correct);
        assert!(!results[1].is_correct);
        assert_eq!(results[1].correct_option_id, Some(20));
        // 未作答
        assert_eq!(results[2].selected_option_id, None);
        assert!(!results[2].is_correct);
    }

    #[test]
    fn test_option_from_other_question_is_wrong() {
        let questions = [question(1, 10, 11), question(2, 20, 21)];
        let answers = HashMap::from([("1".to_string(), 20)]);
        let (score, _) = grade(&questions, &answers);
        assert_eq!(score, 0);
    }
}
