//! SeaORM 存储实现
//!
//! 统一的数据库存储层，支持 SQLite、PostgreSQL 和 MySQL。

mod courses;
mod devlogs;
mod forum;
mod quiz;
mod stats;
mod users;

use crate::config::{AppConfig, DatabaseConfig};
use crate::errors::{KuetxError, Result};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::time::Duration;
use tracing::info;

/// SeaORM 存储实现
#[derive(Clone)]
pub struct SeaOrmStorage {
    pub(crate) db: DatabaseConnection,
}

impl SeaOrmStorage {
    /// 按全局配置创建存储实例
    pub async fn new_async() -> Result<Self> {
        Self::connect(&AppConfig::get().database).await
    }

    /// 连接数据库并运行迁移
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        let db_url = Self::build_database_url(&config.url)?;

        let db = if db_url.starts_with("sqlite:") {
            Self::connect_sqlite(&db_url, config).await?
        } else {
            Self::connect_generic(&db_url, config).await?
        };

        Migrator::up(&db, None)
            .await
            .map_err(|e| KuetxError::database_operation(format!("Migration failed: {e}")))?;

        info!("SeaORM storage initialized, database: {}", db_url);

        Ok(Self { db })
    }

    /// 内存数据库，测试用
    pub async fn in_memory() -> Result<Self> {
        Self::connect(&DatabaseConfig {
            url: ":memory:".to_string(),
            pool_size: 1,
            timeout: 5,
        })
        .await
    }

    /// SQLite 专用连接（WAL + pragma 优化）
    async fn connect_sqlite(url: &str, config: &DatabaseConfig) -> Result<DatabaseConnection> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{
            SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
        };
        use std::str::FromStr;

        let in_memory = url.contains(":memory:");

        let mut opt = SqliteConnectOptions::from_str(url)
            .map_err(|e| KuetxError::database_config(format!("Invalid SQLite URL: {e}")))?
            .foreign_keys(true)
            .busy_timeout(Duration::from_secs(5));

        if !in_memory {
            opt = opt
                .create_if_missing(true)
                .journal_mode(SqliteJournalMode::Wal)
                .synchronous(SqliteSynchronous::Normal)
                .pragma("cache_size", "-64000")
                .pragma("temp_store", "memory")
                .pragma("mmap_size", "536870912")
                .pragma("wal_autocheckpoint", "1000");
        }

        // 内存库每个连接相互独立，只能保留唯一且常驻的连接
        let pool_options = if in_memory {
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new()
                .max_connections(config.pool_size)
                .min_connections(1)
                .test_before_acquire(true)
                .idle_timeout(Duration::from_secs(300))
        };

        let pool = pool_options
            .acquire_timeout(Duration::from_secs(config.timeout))
            .connect_with(opt)
            .await
            .map_err(|e| {
                KuetxError::database_connection(format!("SQLite connection failed: {e}"))
            })?;

        Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
    }

    /// 通用连接（PostgreSQL、MySQL 等）
    async fn connect_generic(url: &str, config: &DatabaseConfig) -> Result<DatabaseConnection> {
        let mut opt = ConnectOptions::new(url);
        opt.max_connections(config.pool_size)
            .min_connections(1)
            .connect_timeout(Duration::from_secs(config.timeout))
            .acquire_timeout(Duration::from_secs(config.timeout))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .sqlx_logging(false);

        Database::connect(opt)
            .await
            .map_err(|e| {
                KuetxError::database_connection(format!("Database connection failed: {e}"))
            })
    }

    /// 从 URL 推断数据库类型并构建连接 URL
    fn build_database_url(url: &str) -> Result<String> {
        if url.starts_with("sqlite:") {
            Ok(url.to_string())
        } else if url == ":memory:" {
            Ok("sqlite::memory:".to_string())
        } else if url.ends_with(".db") || url.ends_with(".sqlite") || url.ends_with(".sqlite3") {
            Ok(format!("sqlite://{url}?mode=rwc"))
        } else if url.starts_with("postgres://")
            || url.starts_with("postgresql://")
            || url.starts_with("mysql://")
            || url.starts_with("mariadb://")
        {
            Ok(url.to_string())
        } else {
            Err(KuetxError::database_config(format!(
                "Unable to infer database type from URL: {url}. Supported: sqlite://, postgres://, mysql://, or a .db/.sqlite file path"
            )))
        }
    }
}

// Storage trait 实现
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
use crate::storage::Storage;
use async_trait::async_trait;

#[async_trait]
impl Storage for SeaOrmStorage {
    // 用户模块
    async fn create_user(&self, user: CreateUserRequest) -> Result<User> {
        self.create_user_impl(user).await
    }

    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>> {
        self.get_user_by_id_impl(id).await
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        self.get_user_by_username_impl(username).await
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.get_user_by_email_impl(email).await
    }

    async fn get_user_by_username_or_email(&self, identifier: &str) -> Result<Option<User>> {
        self.get_user_by_username_or_email_impl(identifier).await
    }

    async fn list_users_with_pagination(&self, query: UserListQuery) -> Result<UserListResponse> {
        self.list_users_with_pagination_impl(query).await
    }

    async fn update_user(&self, id: i64, update: UpdateUserRequest) -> Result<Option<User>> {
        self.update_user_impl(id, update).await
    }

    async fn delete_user(&self, id: i64) -> Result<bool> {
        self.delete_user_impl(id).await
    }

    async fn update_last_login(&self, id: i64) -> Result<bool> {
        self.update_last_login_impl(id).await
    }

    async fn count_users(&self) -> Result<u64> {
        self.count_users_impl().await
    }

    // 课程模块
    async fn create_course(
        &self,
        instructor_id: i64,
        title: String,
        description: Option<String>,
    ) -> Result<Course> {
        self.create_course_impl(instructor_id, title, description)
            .await
    }

    async fn get_course_by_id(&self, id: i64) -> Result<Option<Course>> {
        self.get_course_by_id_impl(id).await
    }

    async fn list_courses_with_pagination(
        &self,
        query: CourseListQuery,
    ) -> Result<CourseListResponse> {
        self.list_courses_with_pagination_impl(query).await
    }

    async fn delete_course(&self, id: i64) -> Result<bool> {
        self.delete_course_impl(id).await
    }

    async fn list_course_contents(&self, course_id: i64) -> Result<Vec<CourseContent>> {
        self.list_course_contents_impl(course_id).await
    }

    async fn create_course_content(
        &self,
        course_id: i64,
        content: CreateContentRequest,
    ) -> Result<CourseContent> {
        self.create_course_content_impl(course_id, content).await
    }

    async fn get_course_content_by_id(&self, id: i64) -> Result<Option<CourseContent>> {
        self.get_course_content_by_id_impl(id).await
    }

    async fn update_course_content(
        &self,
        id: i64,
        update: UpdateContentRequest,
    ) -> Result<Option<CourseContent>> {
        self.update_course_content_impl(id, update).await
    }

    async fn delete_course_content(&self, id: i64) -> Result<bool> {
        self.delete_course_content_impl(id).await
    }

    // 论坛模块
    async fn create_post(&self, author_id: i64, post: CreatePostRequest) -> Result<ForumPost> {
        self.create_post_impl(author_id, post).await
    }

    async fn get_post_by_id(&self, id: i64) -> Result<Option<ForumPost>> {
        self.get_post_by_id_impl(id).await
    }

    async fn list_posts_with_pagination(&self, query: PostListQuery) -> Result<PostListResponse> {
        self.list_posts_with_pagination_impl(query).await
    }

    async fn delete_post(&self, id: i64) -> Result<bool> {
        self.delete_post_impl(id).await
    }

    async fn create_comment(
        &self,
        post_id: i64,
        author_id: i64,
        body: String,
    ) -> Result<ForumComment> {
        self.create_comment_impl(post_id, author_id, body).await
    }

    async fn list_comments(&self, post_id: i64) -> Result<Vec<ForumComment>> {
        self.list_comments_impl(post_id).await
    }

    // 测验模块
    async fn create_quiz_category(&self, req: CreateCategoryRequest) -> Result<QuizCategory> {
        self.create_quiz_category_impl(req).await
    }

    async fn update_quiz_category(
        &self,
        id: i64,
        req: CreateCategoryRequest,
    ) -> Result<Option<QuizCategory>> {
        self.update_quiz_category_impl(id, req).await
    }

    async fn get_quiz_category_by_id(&self, id: i64) -> Result<Option<QuizCategory>> {
        self.get_quiz_category_by_id_impl(id).await
    }

    async fn get_quiz_category_by_name(&self, name: &str) -> Result<Option<QuizCategory>> {
        self.get_quiz_category_by_name_impl(name).await
    }

    async fn list_quiz_categories(&self) -> Result<Vec<CategorySummary>> {
        self.list_quiz_categories_impl().await
    }

    async fn list_quiz_questions(&self, category_id: i64) -> Result<Vec<QuizQuestion>> {
        self.list_quiz_questions_impl(category_id).await
    }

    async fn create_quiz_attempt(
        &self,
        user_id: i64,
        category_id: i64,
        score: i32,
        total: i32,
    ) -> Result<QuizAttempt> {
        self.create_quiz_attempt_impl(user_id, category_id, score, total)
            .await
    }

    async fn delete_quiz_categories(&self, ids: &[i64]) -> Result<u64> {
        self.delete_quiz_categories_impl(ids).await
    }

    // 开发日志模块
    async fn create_devlog(&self, author_id: i64, devlog: CreateDevlogRequest) -> Result<Devlog> {
        self.create_devlog_impl(author_id, devlog).await
    }

    async fn get_devlog_by_id(&self, id: i64) -> Result<Option<Devlog>> {
        self.get_devlog_by_id_impl(id).await
    }

    async fn list_devlogs_with_pagination(
        &self,
        query: PaginationQuery,
    ) -> Result<DevlogListResponse> {
        self.list_devlogs_with_pagination_impl(query).await
    }

    // 统计
    async fn get_dashboard_stats(&self) -> Result<DashboardStats> {
        self.get_dashboard_stats_impl().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_database_url() {
        assert_eq!(
            SeaOrmStorage::build_database_url("kuetx.db").unwrap(),
            "sqlite://kuetx.db?mode=rwc"
        );
        assert_eq!(
            SeaOrmStorage::build_database_url(":memory:").unwrap(),
            "sqlite::memory:"
        );
        assert!(SeaOrmStorage::build_database_url("postgres://u:p@localhost/kuetx").is_ok());
        assert!(SeaOrmStorage::build_database_url("redis://localhost").is_err());
    }
}
