use std::sync::Arc;

use crate::models::{
    PaginationQuery,
    courses::{
        entities::{Course, CourseContent},
        requests::{CourseListQuery, CreateContentRequest, UpdateContentRequest},
        responses::CourseListResponse,
    },
    devlog::{entities::Devlog, requests::CreateDevlogRequest, responses::DevlogListResponse},
    forum::{
        entities::{ForumComment, ForumPost},
        requests::{CreatePostRequest, PostListQuery},
        responses::PostListResponse,
    },
    quiz::{
        entities::{QuizAttempt, QuizCategory, QuizQuestion},
        requests::CreateCategoryRequest,
        responses::CategorySummary,
    },
    stats::responses::DashboardStats,
    users::{
        entities::User,
        requests::{CreateUserRequest, UpdateUserRequest, UserListQuery},
        responses::UserListResponse,
    },
};

use crate::errors::Result;

pub mod sea_orm_storage;

pub use sea_orm_storage::SeaOrmStorage;

#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 用户管理方法
    async fn create_user(&self, user: CreateUserRequest) -> Result<User>;
    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>>;
    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>>;
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;
    // 通过用户名或邮箱获取用户信息（登录用）
    async fn get_user_by_username_or_email(&self, identifier: &str) -> Result<Option<User>>;
    async fn list_users_with_pagination(&self, query: UserListQuery) -> Result<UserListResponse>;
    async fn update_user(&self, id: i64, update: UpdateUserRequest) -> Result<Option<User>>;
    async fn delete_user(&self, id: i64) -> Result<bool>;
    async fn update_last_login(&self, id: i64) -> Result<bool>;
    async fn count_users(&self) -> Result<u64>;

    /// 课程管理方法
    async fn create_course(
        &self,
        instructor_id: i64,
        title: String,
        description: Option<String>,
    ) -> Result<Course>;
    async fn get_course_by_id(&self, id: i64) -> Result<Option<Course>>;
    async fn list_courses_with_pagination(
        &self,
        query: CourseListQuery,
    ) -> Result<CourseListResponse>;
    async fn delete_course(&self, id: i64) -> Result<bool>;
    // 按 sort_order 升序列出课程内容
    async fn list_course_contents(&self, course_id: i64) -> Result<Vec<CourseContent>>;
    async fn create_course_content(
        &self,
        course_id: i64,
        content: CreateContentRequest,
    ) -> Result<CourseContent>;
    async fn get_course_content_by_id(&self, id: i64) -> Result<Option<CourseContent>>;
    async fn update_course_content(
        &self,
        id: i64,
        update: UpdateContentRequest,
    ) -> Result<Option<CourseContent>>;
    async fn delete_course_content(&self, id: i64) -> Result<bool>;

    /// 论坛方法
    async fn create_post(&self, author_id: i64, post: CreatePostRequest) -> Result<ForumPost>;
    async fn get_post_by_id(&self, id: i64) -> Result<Option<ForumPost>>;
    async fn list_posts_with_pagination(&self, query: PostListQuery) -> Result<PostListResponse>;
    async fn delete_post(&self, id: i64) -> Result<bool>;
    async fn create_comment(&self, post_id: i64, author_id: i64, body: String)
    -> Result<ForumComment>;
    async fn list_comments(&self, post_id: i64) -> Result<Vec<ForumComment>>;

    /// 测验方法
    // 在一个事务中创建分类、题目和选项
    async fn create_quiz_category(&self, req: CreateCategoryRequest) -> Result<QuizCategory>;
    async fn update_quiz_category(
        &self,
        id: i64,
        req: CreateCategoryRequest,
    ) -> Result<Option<QuizCategory>>;
    async fn get_quiz_category_by_id(&self, id: i64) -> Result<Option<QuizCategory>>;
    async fn get_quiz_category_by_name(&self, name: &str) -> Result<Option<QuizCategory>>;
    async fn list_quiz_categories(&self) -> Result<Vec<CategorySummary>>;
    async fn list_quiz_questions(&self, category_id: i64) -> Result<Vec<QuizQuestion>>;
    async fn create_quiz_attempt(
        &self,
        user_id: i64,
        category_id: i64,
        score: i32,
        total: i32,
    ) -> Result<QuizAttempt>;
    async fn delete_quiz_categories(&self, ids: &[i64]) -> Result<u64>;

    /// 开发日志方法
    async fn create_devlog(&self, author_id: i64, devlog: CreateDevlogRequest) -> Result<Devlog>;
    async fn get_devlog_by_id(&self, id: i64) -> Result<Option<Devlog>>;
    async fn list_devlogs_with_pagination(
        &self,
        query: PaginationQuery,
    ) -> Result<DevlogListResponse>;

    /// 统计
    async fn get_dashboard_stats(&self) -> Result<DashboardStats>;
}

/// 按配置创建存储实例
pub async fn create_storage() -> Result<Arc<dyn Storage>> {
    let storage = SeaOrmStorage::new_async().await?;
    Ok(Arc::new(storage))
}
