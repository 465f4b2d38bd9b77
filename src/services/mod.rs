pub mod auth;
pub mod courses;
pub mod devlog;
pub mod forum;
pub mod quiz;
pub mod schema;
pub mod stats;
pub mod users;

pub use auth::AuthService;
pub use courses::CourseService;
pub use devlog::DevlogService;
pub use forum::ForumService;
pub use quiz::QuizService;
pub use schema::SchemaService;
pub use stats::StatsService;
pub use users::UserService;
