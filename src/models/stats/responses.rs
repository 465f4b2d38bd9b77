use serde::{Deserialize, Serialize};

// 管理后台统计
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DashboardStats {
    pub total_users: i64,
    pub total_students: i64,
    pub total_instructors: i64,
    pub total_admins: i64,
    pub active_users: i64,
    pub new_users_last_30_days: i64,
    pub total_courses: i64,
    pub total_course_contents: i64,
    pub total_forum_posts: i64,
    pub total_forum_comments: i64,
    pub total_quiz_categories: i64,
    pub total_quiz_questions: i64,
    pub total_quiz_attempts: i64,
    pub total_devlogs: i64,
}

// 首页公开统计
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LandingPageStats {
    pub total_students: i64,
    pub total_instructors: i64,
    pub total_courses: i64,
    pub total_quizzes: i64,
}

impl From<&DashboardStats> for LandingPageStats {
    fn from(stats: &DashboardStats) -> Self {
        Self {
            total_students: stats.total_students,
            total_instructors: stats.total_instructors,
            total_courses: stats.total_courses,
            total_quizzes: stats.total_quiz_categories,
        }
    }
}
