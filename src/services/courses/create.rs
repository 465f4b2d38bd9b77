use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::CourseService;
use crate::middlewares::RequireJWT;
use crate::models::courses::requests::CreateCourseRequest;
use crate::models::users::entities::UserRole;
use crate::models::{ApiResponse, ErrorCode};
use crate::storage::Storage;

pub async fn create_course(
    service: &CourseService,
    request: &HttpRequest,
    course_data: CreateCourseRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let Some(uid) = RequireJWT::extract_user_id(request) else {
        return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Unauthorized: missing user id",
        )));
    };

    let title = course_data.title.trim().to_string();
    if title.is_empty() {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::ValidationFailed,
            "Course title is required",
        )));
    }

    let instructor_id = match resolve_instructor(
        RequireJWT::extract_user_role(request),
        uid,
        course_data.instructor_id,
        &storage,
    )
    .await
    {
        Ok(id) => id,
        Err(resp) => return Ok(resp),
    };

    match storage
        .create_course(instructor_id, title, course_data.description)
        .await
    {
        Ok(course) => {
            info!("Course {} created by {}", course.id, uid);
            Ok(HttpResponse::Created()
                .json(ApiResponse::success(course, "Course created successfully")))
        }
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::CourseCreationFailed,
                format!("Course creation failed: {e}"),
            )),
        ),
    }
}

/// 讲师只能为自己创建课程；管理员必须指定一名讲师
async fn resolve_instructor(
    role: Option<UserRole>,
    uid: i64,
    requested: Option<i64>,
    storage: &Arc<dyn Storage>,
) -> Result<i64, HttpResponse> {
    match role {
        Some(UserRole::Instructor) => match requested {
            Some(id) if id != uid => Err(HttpResponse::Forbidden().json(ApiResponse::error_empty(
                ErrorCode::CoursePermissionDenied,
                "Instructors can only create courses for themselves",
            ))),
            _ => Ok(uid),
        },
        Some(UserRole::Admin) => {
            let Some(id) = requested else {
                return Err(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                    ErrorCode::ValidationFailed,
                    "instructor_id is required",
                )));
            };
            match storage.get_user_by_id(id).await {
                Ok(Some(user)) if user.role == UserRole::Instructor => Ok(id),
                Ok(Some(_)) => Err(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                    ErrorCode::ValidationFailed,
                    "The specified user is not an instructor",
                ))),
                Ok(None) => Err(HttpResponse::NotFound().json(ApiResponse::error_empty(
                    ErrorCode::UserNotFound,
                    "Instructor not found",
                ))),
                Err(e) => Err(
                    HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                        ErrorCode::InternalServerError,
                        format!("Failed to get instructor information: {e}"),
                    )),
                ),
            }
        }
        _ => Err(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::CoursePermissionDenied,
            "You do not have permission to create courses",
        ))),
    }
}
