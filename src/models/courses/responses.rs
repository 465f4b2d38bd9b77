use super::entities::{Course, CourseContent};
use crate::models::common::PaginatedResponse;
use serde::Serialize;

// 讲师简要信息
#[derive(Debug, Clone, Serialize)]
pub struct InstructorSummary {
    pub id: i64,
    pub username: String,
    pub profile_name: Option<String>,
}

// 课程列表项，附带讲师与全部内容，供管理页面直接使用
#[derive(Debug, Serialize)]
pub struct CourseListItem {
    #[serde(flatten)]
    pub course: Course,
    pub instructor_details: Option<InstructorSummary>,
    pub contents: Vec<CourseContent>,
}

pub type CourseListResponse = PaginatedResponse<CourseListItem>;

// 课程详情，内容按 order 升序
#[derive(Debug, Serialize)]
pub struct CourseDetailResponse {
    #[serde(flatten)]
    pub course: Course,
    pub contents: Vec<CourseContent>,
}
