use super::SeaOrmStorage;
use crate::entity::prelude::*;
use crate::entity::users::Column as UserColumn;
use crate::errors::{KuetxError, Result};
use crate::models::stats::responses::DashboardStats;
use crate::models::users::entities::{UserRole, UserStatus};
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QuerySelect};

/// 近期注册统计窗口
const NEW_USER_WINDOW_DAYS: i64 = 30;

impl SeaOrmStorage {
    pub async fn get_dashboard_stats_impl(&self) -> Result<DashboardStats> {
        let db = &self.db;
        let map_err =
            |e: sea_orm::DbErr| KuetxError::database_operation(format!("Failed to count: {e}"));

        let mut stats = DashboardStats::default();

        // 按角色分组计数
        let role_counts: Vec<(String, i64)> = Users::find()
            .select_only()
            .column(UserColumn::Role)
            .column_as(UserColumn::Id.count(), "count")
            .group_by(UserColumn::Role)
            .into_tuple()
            .all(db)
            .await
            .map_err(map_err)?;

        for (role, count) in role_counts {
            stats.total_users += count;
            match role.as_str() {
                UserRole::STUDENT => stats.total_students = count,
                UserRole::INSTRUCTOR => stats.total_instructors = count,
                UserRole::ADMIN => stats.total_admins = count,
                _ => {}
            }
        }

        stats.active_users = Users::find()
            .filter(UserColumn::Status.eq(UserStatus::Active.to_string()))
            .count(db)
            .await
            .map_err(map_err)? as i64;

        let since = chrono::Utc::now().timestamp() - NEW_USER_WINDOW_DAYS * 24 * 3600;
        stats.new_users_last_30_days = Users::find()
            .filter(UserColumn::CreatedAt.gte(since))
            .count(db)
            .await
            .map_err(map_err)? as i64;

        stats.total_courses = Courses::find().count(db).await.map_err(map_err)? as i64;
        stats.total_course_contents =
            CourseContents::find().count(db).await.map_err(map_err)? as i64;
        stats.total_forum_posts = ForumPosts::find().count(db).await.map_err(map_err)? as i64;
        stats.total_forum_comments =
            ForumComments::find().count(db).await.map_err(map_err)? as i64;
        stats.total_quiz_categories =
            QuizCategories::find().count(db).await.map_err(map_err)? as i64;
        stats.total_quiz_questions =
            QuizQuestions::find().count(db).await.map_err(map_err)? as i64;
        stats.total_quiz_attempts =
            QuizAttempts::find().count(db).await.map_err(map_err)? as i64;
        stats.total_devlogs = Devlogs::find().count(db).await.map_err(map_err)? as i64;

        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::courses::requests::CreateContentRequest;
    use crate::models::forum::requests::CreatePostRequest;
    use crate::models::users::requests::CreateUserRequest;

    fn user(name: &str, role: UserRole, status: UserStatus) -> CreateUserRequest {
        CreateUserRequest {
            username: name.into(),
            email: format!("{name}@example.com"),
            password: "hash".into(),
            role,
            status,
            profile_name: None,
            avatar_url: None,
        }
    }

    #[actix_web::test]
    async fn test_empty_database() {
        let storage = SeaOrmStorage::in_memory().await.unwrap();
        let stats = storage.get_dashboard_stats_impl().await.unwrap();
        assert_eq!(stats.total_users, 0);
        assert_eq!(stats.total_devlogs, 0);
    }

    #[actix_web::test]
    async fn test_counts() {
        let storage = SeaOrmStorage::in_memory().await.unwrap();
        storage
            .create_user_impl(user("alice", UserRole::Student, UserStatus::Active))
            .await
            .unwrap();
        storage
            .create_user_impl(user("bobby", UserRole::Student, UserStatus::Inactive))
            .await
            .unwrap();
        let instructor = storage
            .create_user_impl(user("carol", UserRole::Instructor, UserStatus::Active))
            .await
            .unwrap();

        let course = storage
            .create_course_impl(instructor.id, "Rust".into(), None)
            .await
            .unwrap();
        storage
            .create_course_content_impl(
                course.id,
                CreateContentRequest {
                    title: "intro".into(),
                    content_type: "video".into(),
                    url: Some("https://example.com/v.mp4".into()),
                    text_content: None,
                    order: 1,
                },
            )
            .await
            .unwrap();
        let post = storage
            .create_post_impl(
                instructor.id,
                CreatePostRequest {
                    title: "Welcome".into(),
                    body: "hello".into(),
                },
            )
            .await
            .unwrap();
        storage
            .create_comment_impl(post.id, instructor.id, "first".into())
            .await
            .unwrap();

        let stats = storage.get_dashboard_stats_impl().await.unwrap();
        assert_eq!(stats.total_users, 3);
        assert_eq!(stats.total_students, 2);
        assert_eq!(stats.total_instructors, 1);
        assert_eq!(stats.total_admins, 0);
        assert_eq!(stats.active_users, 2);
        assert_eq!(stats.new_users_last_30_days, 3);
        assert_eq!(stats.total_courses, 1);
        assert_eq!(stats.total_course_contents, 1);
        assert_eq!(stats.total_forum_posts, 1);
        assert_eq!(stats.total_forum_comments, 1);
    }
}
