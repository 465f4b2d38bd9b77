pub mod contents;
pub mod create;
pub mod delete;
pub mod detail;
pub mod list;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::middlewares::RequireJWT;
use crate::models::courses::entities::Course;
use crate::models::courses::requests::{
    CourseQueryParams, CreateContentRequest, CreateCourseRequest, UpdateContentRequest,
};
use crate::models::users::entities::UserRole;
use crate::models::{ApiResponse, ErrorCode};
use crate::storage::Storage;

pub struct CourseService {
    storage: Option<Arc<dyn Storage>>,
}

impl CourseService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Arc<dyn Storage> {
        if let Some(storage) = &self.storage {
            storage.clone()
        } else {
            request
                .app_data::<actix_web::web::Data<Arc<dyn Storage>>>()
                .expect("Storage not found in app data")
                .get_ref()
                .clone()
        }
    }

    // 课程列表
    pub async fn list_courses(
        &self,
        request: &HttpRequest,
        query: CourseQueryParams,
    ) -> ActixResult<HttpResponse> {
        list::list_courses(self, request, query).await
    }

    // 创建课程
    pub async fn create_course(
        &self,
        request: &HttpRequest,
        course_data: CreateCourseRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_course(self, request, course_data).await
    }

    // 课程详情（含内容）
    pub async fn get_course(
        &self,
        request: &HttpRequest,
        course_id: i64,
    ) -> ActixResult<HttpResponse> {
        detail::get_course(self, request, course_id).await
    }

    // 删除课程
    pub async fn delete_course(
        &self,
        request: &HttpRequest,
        course_id: i64,
    ) -> ActixResult<HttpResponse> {
        delete::delete_course(self, request, course_id).await
    }

    // 新增课程内容
    pub async fn create_content(
        &self,
        request: &HttpRequest,
        course_id: i64,
        content_data: CreateContentRequest,
    ) -> ActixResult<HttpResponse> {
        contents::create_content(self, request, course_id, content_data).await
    }

    // 更新课程内容
    pub async fn update_content(
        &self,
        request: &HttpRequest,
        content_id: i64,
        update_data: UpdateContentRequest,
    ) -> ActixResult<HttpResponse> {
        contents::update_content(self, request, content_id, update_data).await
    }

    // 删除课程内容
    pub async fn delete_content(
        &self,
        request: &HttpRequest,
        content_id: i64,
    ) -> ActixResult<HttpResponse> {
        contents::delete_content(self, request, content_id).await
    }
}

/// 读取课程并校验当前用户为课程讲师或管理员
pub(crate) async fn load_owned_course(
    storage: &Arc<dyn Storage>,
    request: &HttpRequest,
    course_id: i64,
) -> Result<Course, HttpResponse> {
    let Some(uid) = RequireJWT::extract_user_id(request) else {
        return Err(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Unauthorized: missing user id",
        )));
    };

    let course = match storage.get_course_by_id(course_id).await {
        Ok(Some(course)) => course,
        Ok(None) => {
            return Err(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::CourseNotFound,
                "Course not found",
            )));
        }
        Err(e) => {
            return Err(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("Failed to get course information: {e}"),
                )),
            );
        }
    };

    match RequireJWT::extract_user_role(request) {
        Some(UserRole::Admin) => Ok(course),
        Some(UserRole::Instructor) if course.instructor_id == uid => Ok(course),
        _ => Err(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::CoursePermissionDenied,
            "You do not have permission to modify this course",
        ))),
    }
}
