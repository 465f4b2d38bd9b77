use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use super::{CourseService, load_owned_course};
use crate::models::courses::entities::CourseContent;
use crate::models::courses::requests::{CreateContentRequest, UpdateContentRequest};
use crate::models::{ApiResponse, ErrorCode};
use crate::storage::Storage;

fn validation_failed(message: &str) -> HttpResponse {
    HttpResponse::BadRequest().json(ApiResponse::error_empty(ErrorCode::ValidationFailed, message))
}

fn normalize_title(title: &str) -> Result<String, HttpResponse> {
    let title = title.trim();
    if title.is_empty() {
        return Err(validation_failed("Content title is required"));
    }
    Ok(title.to_string())
}

fn normalize_content_type(content_type: &str) -> Result<String, HttpResponse> {
    let content_type = content_type.trim().to_lowercase();
    if content_type.is_empty() {
        return Err(validation_failed("content_type must not be empty"));
    }
    Ok(content_type)
}

// 读取内容及其所属课程，并校验权限
async fn load_owned_content(
    storage: &Arc<dyn Storage>,
    request: &HttpRequest,
    content_id: i64,
) -> Result<CourseContent, HttpResponse> {
    let content = match storage.get_course_content_by_id(content_id).await {
        Ok(Some(content)) => content,
        Ok(None) => {
            return Err(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::ContentNotFound,
                "Course content not found",
            )));
        }
        Err(e) => {
            return Err(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("Failed to get course content: {e}"),
                )),
            );
        }
    };

    load_owned_course(storage, request, content.course_id).await?;
    Ok(content)
}

pub async fn create_content(
    service: &CourseService,
    request: &HttpRequest,
    course_id: i64,
    mut content_data: CreateContentRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    if let Err(resp) = load_owned_course(&storage, request, course_id).await {
        return Ok(resp);
    }

    content_data.title = match normalize_title(&content_data.title) {
        Ok(title) => title,
        Err(resp) => return Ok(resp),
    };
    content_data.content_type = match normalize_content_type(&content_data.content_type) {
        Ok(content_type) => content_type,
        Err(resp) => return Ok(resp),
    };

    match storage.create_course_content(course_id, content_data).await {
        Ok(content) => Ok(HttpResponse::Created()
            .json(ApiResponse::success(content, "Course content created successfully"))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Course content creation failed: {e}"),
            )),
        ),
    }
}

pub async fn update_content(
    service: &CourseService,
    request: &HttpRequest,
    content_id: i64,
    mut update_data: UpdateContentRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    if let Err(resp) = load_owned_content(&storage, request, content_id).await {
        return Ok(resp);
    }

    // 与创建时相同的规范化
    if let Some(title) = update_data.title.as_deref() {
        match normalize_title(title) {
            Ok(title) => update_data.title = Some(title),
            Err(resp) => return Ok(resp),
        }
    }
    if let Some(content_type) = update_data.content_type.as_deref() {
        match normalize_content_type(content_type) {
            Ok(content_type) => update_data.content_type = Some(content_type),
            Err(resp) => return Ok(resp),
        }
    }

    match storage.update_course_content(content_id, update_data).await {
        Ok(Some(content)) => Ok(HttpResponse::Ok()
            .json(ApiResponse::success(content, "Course content updated successfully"))),
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::ContentNotFound,
            "Course content not found",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Course content update failed: {e}"),
            )),
        ),
    }
}

pub async fn delete_content(
    service: &CourseService,
    request: &HttpRequest,
    content_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    if let Err(resp) = load_owned_content(&storage, request, content_id).await {
        return Ok(resp);
    }

    match storage.delete_course_content(content_id).await {
        Ok(true) => Ok(HttpResponse::Ok()
            .json(ApiResponse::success_empty("Course content deleted successfully"))),
        Ok(false) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::ContentNotFound,
            "Course content not found",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Course content deletion failed: {e}"),
            )),
        ),
    }
}
