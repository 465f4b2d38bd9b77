//! 预导入模块，方便使用

pub use super::course_contents::{
    ActiveModel as CourseContentActiveModel, Entity as CourseContents,
    Model as CourseContentModel,
};
pub use super::courses::{ActiveModel as CourseActiveModel, Entity as Courses, Model as CourseModel};
pub use super::devlogs::{ActiveModel as DevlogActiveModel, Entity as Devlogs, Model as DevlogModel};
pub use super::forum_comments::{
    ActiveModel as ForumCommentActiveModel, Entity as ForumComments, Model as ForumCommentModel,
};
pub use super::forum_posts::{
    ActiveModel as ForumPostActiveModel, Entity as ForumPosts, Model as ForumPostModel,
};
pub use super::quiz_attempts::{
    ActiveModel as QuizAttemptActiveModel, Entity as QuizAttempts, Model as QuizAttemptModel,
};
pub use super::quiz_categories::{
    ActiveModel as QuizCategoryActiveModel, Entity as QuizCategories, Model as QuizCategoryModel,
};
pub use super::quiz_options::{
    ActiveModel as QuizOptionActiveModel, Entity as QuizOptions, Model as QuizOptionModel,
};
pub use super::quiz_questions::{
    ActiveModel as QuizQuestionActiveModel, Entity as QuizQuestions, Model as QuizQuestionModel,
};
pub use super::users::{ActiveModel as UserActiveModel, Entity as Users, Model as UserModel};
