use crate::models::common::PaginationQuery;
use serde::Deserialize;

// 课程查询参数（来自HTTP请求）
#[derive(Debug, Deserialize)]
pub struct CourseQueryParams {
    #[serde(flatten)]
    pub pagination: PaginationQuery,
    pub search: Option<String>,
    #[serde(
        default,
        deserialize_with = "crate::utils::extractor::deserialize_loose_opt_i64"
    )]
    pub instructor_id: Option<i64>,
}

// 创建课程请求
//
// 讲师创建时 instructor_id 可省略，默认为自己；管理员必须指定讲师
#[derive(Debug, Deserialize)]
pub struct CreateCourseRequest {
    pub instructor_id: Option<i64>,
    pub title: String,
    pub description: Option<String>,
}

// 新增课程内容
#[derive(Debug, Deserialize)]
pub struct CreateContentRequest {
    pub title: String,
    pub content_type: String,
    pub url: Option<String>,
    pub text_content: Option<String>,
    #[serde(default)]
    pub order: i32,
}

// 更新课程内容
//
// url / text_content 传 null 表示清空，缺省表示不修改
#[derive(Debug, Default, Deserialize)]
pub struct UpdateContentRequest {
    pub title: Option<String>,
    pub content_type: Option<String>,
    #[serde(default, deserialize_with = "crate::utils::extractor::deserialize_nullable")]
    pub url: Option<Option<String>>,
    #[serde(default, deserialize_with = "crate::utils::extractor::deserialize_nullable")]
    pub text_content: Option<Option<String>>,
    pub order: Option<i32>,
}

// 课程列表查询参数（用于存储层）
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CourseListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub instructor_id: Option<i64>,
    pub search: Option<String>,
}
