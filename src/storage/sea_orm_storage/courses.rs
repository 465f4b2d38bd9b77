use super::SeaOrmStorage;
use crate::entity::course_contents::{
    ActiveModel as ContentActiveModel, Column as ContentColumn, Entity as CourseContents,
};
use crate::entity::courses::{ActiveModel, Column, Entity as Courses};
use crate::entity::users::{Column as UserColumn, Entity as Users};
use crate::errors::{KuetxError, Result};
use crate::models::{
    PaginationInfo,
    common::pagination::normalize_page,
    courses::{
        entities::{Course, CourseContent},
        requests::{CourseListQuery, CreateContentRequest, UpdateContentRequest},
        responses::{CourseListItem, CourseListResponse, InstructorSummary},
    },
};
use crate::utils::like_contains;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    Set,
};
use std::collections::HashMap;

impl SeaOrmStorage {
    pub async fn create_course_impl(
        &self,
        instructor_id: i64,
        title: String,
        description: Option<String>,
    ) -> Result<Course> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            instructor_id: Set(instructor_id),
            title: Set(title),
            description: Set(description),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| KuetxError::database_operation(format!("Failed to create course: {e}")))?;

        Ok(result.into_course())
    }

    pub async fn get_course_by_id_impl(&self, id: i64) -> Result<Option<Course>> {
        let result = Courses::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| KuetxError::database_operation(format!("Failed to query course: {e}")))?;

        Ok(result.map(|m| m.into_course()))
    }

    pub async fn list_courses_with_pagination_impl(
        &self,
        query: CourseListQuery,
    ) -> Result<CourseListResponse> {
        let (page, size) = normalize_page(query.page, query.size);

        let mut select = Courses::find();

        if let Some(instructor_id) = query.instructor_id {
            select = select.filter(Column::InstructorId.eq(instructor_id));
        }

        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            let term = search.trim();
            select = select.filter(
                Condition::any()
                    .add(like_contains(Column::Title, term))
                    .add(like_contains(Column::Description, term)),
            );
        }

        let paginator = select
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
            .paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| KuetxError::database_operation(format!("Failed to count courses: {e}")))?;
        let courses = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| KuetxError::database_operation(format!("Failed to list courses: {e}")))?;

        // 批量加载讲师与内容
        let course_ids: Vec<i64> = courses.iter().map(|c| c.id).collect();
        let instructor_ids: Vec<i64> = courses.iter().map(|c| c.instructor_id).collect();

        let instructors: HashMap<i64, InstructorSummary> = Users::find()
            .filter(UserColumn::Id.is_in(instructor_ids))
            .all(&self.db)
            .await
            .map_err(|e| {
                KuetxError::database_operation(format!("Failed to load instructors: {e}"))
            })?
            .into_iter()
            .map(|u| {
                let summary = InstructorSummary {
                    id: u.id,
                    username: u.username,
                    profile_name: u.profile_name,
                };
                (summary.id, summary)
            })
            .collect();

        let mut contents: HashMap<i64, Vec<CourseContent>> = HashMap::new();
        for content in CourseContents::find()
            .filter(ContentColumn::CourseId.is_in(course_ids))
            .order_by_asc(ContentColumn::SortOrder)
            .order_by_asc(ContentColumn::Id)
            .all(&self.db)
            .await
            .map_err(|e| {
                KuetxError::database_operation(format!("Failed to load course contents: {e}"))
            })?
        {
            contents
                .entry(content.course_id)
                .or_default()
                .push(content.into_content());
        }

        let items = courses
            .into_iter()
            .map(|m| CourseListItem {
                instructor_details: instructors.get(&m.instructor_id).cloned(),
                contents: contents.remove(&m.id).unwrap_or_default(),
                course: m.into_course(),
            })
            .collect();

        Ok(CourseListResponse {
            items,
            pagination: PaginationInfo::new(page, size, total),
        })
    }

    pub async fn delete_course_impl(&self, id: i64) -> Result<bool> {
        let result = Courses::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| KuetxError::database_operation(format!("Failed to delete course: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    pub async fn list_course_contents_impl(&self, course_id: i64) -> Result<Vec<CourseContent>> {
        let contents = CourseContents::find()
            .filter(ContentColumn::CourseId.eq(course_id))
            .order_by_asc(ContentColumn::SortOrder)
            .order_by_asc(ContentColumn::Id)
            .all(&self.db)
            .await
            .map_err(|e| {
                KuetxError::database_operation(format!("Failed to list course contents: {e}"))
            })?;

        Ok(contents.into_iter().map(|m| m.into_content()).collect())
    }

    pub async fn create_course_content_impl(
        &self,
        course_id: i64,
        req: CreateContentRequest,
    ) -> Result<CourseContent> {
        let now = chrono::Utc::now().timestamp();

        let model = ContentActiveModel {
            course_id: Set(course_id),
            title: Set(req.title),
            content_type: Set(req.content_type),
            url: Set(req.url),
            text_content: Set(req.text_content),
            sort_order: Set(req.order),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model.insert(&self.db).await.map_err(|e| {
            KuetxError::database_operation(format!("Failed to create course content: {e}"))
        })?;

        Ok(result.into_content())
    }

    pub async fn get_course_content_by_id_impl(&self, id: i64) -> Result<Option<CourseContent>> {
        let result = CourseContents::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| {
                KuetxError::database_operation(format!("Failed to query course content: {e}"))
            })?;

        Ok(result.map(|m| m.into_content()))
    }

    pub async fn update_course_content_impl(
        &self,
        id: i64,
        update: UpdateContentRequest,
    ) -> Result<Option<CourseContent>> {
        if self.get_course_content_by_id_impl(id).await?.is_none() {
            return Ok(None);
        }

        let mut model = ContentActiveModel {
            id: Set(id),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        if let Some(title) = update.title {
            model.title = Set(title);
        }
        if let Some(content_type) = update.content_type {
            model.content_type = Set(content_type);
        }
        if let Some(url) = update.url {
            model.url = Set(url);
        }
        if let Some(text_content) = update.text_content {
            model.text_content = Set(text_content);
        }
        if let Some(order) = update.order {
            model.sort_order = Set(order);
        }

        model.update(&self.db).await.map_err(|e| {
            KuetxError::database_operation(format!("Failed to update course content: {e}"))
        })?;

        self.get_course_content_by_id_impl(id).await
    }

    pub async fn delete_course_content_impl(&self, id: i64) -> Result<bool> {
        let result = CourseContents::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| {
                KuetxError::database_operation(format!("Failed to delete course content: {e}"))
            })?;

        Ok(result.rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::users::{
        entities::{UserRole, UserStatus},
        requests::CreateUserRequest,
    };

    async fn storage_with_instructor() -> (SeaOrmStorage, i64) {
        let storage = SeaOrmStorage::in_memory().await.unwrap();
        let user = storage
            .create_user_impl(CreateUserRequest {
                username: "instructor".into(),
                email: "instructor@example.com".into(),
                password: "hash".into(),
                role: UserRole::Instructor,
                status: UserStatus::Active,
                profile_name: None,
                avatar_url: None,
            })
            .await
            .unwrap();
        (storage, user.id)
    }

    fn content(title: &str, order: i32) -> CreateContentRequest {
        CreateContentRequest {
            title: title.into(),
            content_type: "text".into(),
            url: None,
            text_content: Some("body".into()),
            order,
        }
    }

    #[actix_web::test]
    async fn test_contents_are_ordered() {
        let (storage, instructor) = storage_with_instructor().await;
        let course = storage
            .create_course_impl(instructor, "Rust 101".into(), None)
            .await
            .unwrap();

        for (title, order) in [("third", 3), ("first", 1), ("second", 2)] {
            storage
                .create_course_content_impl(course.id, content(title, order))
                .await
                .unwrap();
        }

        let titles: Vec<_> = storage
            .list_course_contents_impl(course.id)
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.title)
            .collect();
        assert_eq!(titles, ["first", "second", "third"]);
    }

    #[actix_web::test]
    async fn test_update_content_and_cascade_delete() {
        let (storage, instructor) = storage_with_instructor().await;
        let course = storage
            .create_course_impl(instructor, "Databases".into(), Some("SQL".into()))
            .await
            .unwrap();
        let item = storage
            .create_course_content_impl(course.id, content("intro", 0))
            .await
            .unwrap();

        let updated = storage
            .update_course_content_impl(
                item.id,
                UpdateContentRequest {
                    title: Some("Introduction".into()),
                    order: Some(5),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.title, "Introduction");
        assert_eq!(updated.order, 5);
        assert_eq!(updated.text_content.as_deref(), Some("body"));

        let cleared = storage
            .update_course_content_impl(
                item.id,
                UpdateContentRequest {
                    text_content: Some(None),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert!(cleared.text_content.is_none());
        assert_eq!(cleared.title, "Introduction");

        assert!(storage.delete_course_impl(course.id).await.unwrap());
        assert!(storage.get_course_content_by_id_impl(item.id).await.unwrap().is_none());
    }

    #[actix_web::test]
    async fn test_list_courses_filters() {
        let (storage, instructor) = storage_with_instructor().await;
        storage
            .create_course_impl(instructor, "Algorithms".into(), None)
            .await
            .unwrap();
        storage
            .create_course_impl(instructor, "Operating Systems".into(), Some("kernels".into()))
            .await
            .unwrap();

        let found = storage
            .list_courses_with_pagination_impl(CourseListQuery {
                search: Some("kernel".into()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(found.pagination.total, 1);
        assert_eq!(found.items[0].course.title, "Operating Systems");
        let details = found.items[0].instructor_details.as_ref().unwrap();
        assert_eq!((details.id, details.username.as_str()), (instructor, "instructor"));

        let by_owner = storage
            .list_courses_with_pagination_impl(CourseListQuery {
                instructor_id: Some(instructor + 100),
                ..Default::default()
            })
            .await
            .unwrap();
        assert!(by_owner.items.is_empty());
    }
}
