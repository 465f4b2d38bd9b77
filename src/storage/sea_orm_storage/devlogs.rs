use super::SeaOrmStorage;
use crate::entity::devlogs::{ActiveModel, Column, Entity as Devlogs};
use crate::errors::{KuetxError, Result};
use crate::models::{
    PaginationInfo, PaginationQuery,
    common::pagination::normalize_page,
    devlog::{entities::Devlog, requests::CreateDevlogRequest, responses::DevlogListResponse},
};
use sea_orm::{ActiveModelTrait, EntityTrait, PaginatorTrait, QueryOrder, Set};

impl SeaOrmStorage {
    pub async fn create_devlog_impl(
        &self,
        author_id: i64,
        req: CreateDevlogRequest,
    ) -> Result<Devlog> {
        let model = ActiveModel {
            author_id: Set(author_id),
            title: Set(req.title),
            body: Set(req.body),
            created_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| KuetxError::database_operation(format!("Failed to create devlog: {e}")))?;

        Ok(result.into_devlog())
    }

    pub async fn get_devlog_by_id_impl(&self, id: i64) -> Result<Option<Devlog>> {
        let result = Devlogs::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| KuetxError::database_operation(format!("Failed to query devlog: {e}")))?;

        Ok(result.map(|m| m.into_devlog()))
    }

    /// 最新的在前
    pub async fn list_devlogs_with_pagination_impl(
        &self,
        query: PaginationQuery,
    ) -> Result<DevlogListResponse> {
        let (page, size) = normalize_page(Some(query.page), Some(query.size));

        let paginator = Devlogs::find()
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
            .paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| KuetxError::database_operation(format!("Failed to count devlogs: {e}")))?;
        let devlogs = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| KuetxError::database_operation(format!("Failed to list devlogs: {e}")))?;

        Ok(DevlogListResponse {
            items: devlogs.into_iter().map(|m| m.into_devlog()).collect(),
            pagination: PaginationInfo::new(page, size, total),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::users::{
        entities::{UserRole, UserStatus},
        requests::CreateUserRequest,
    };

    #[actix_web::test]
    async fn test_devlogs_newest_first() {
        let storage = SeaOrmStorage::in_memory().await.unwrap();
        let admin = storage
            .create_user_impl(CreateUserRequest {
                username: "admin".into(),
                email: "admin@example.com".into(),
                password: "hash".into(),
                role: UserRole::Admin,
                status: UserStatus::Active,
                profile_name: None,
                avatar_url: None,
            })
            .await
            .unwrap();

        for title in ["v0.1", "v0.2", "v0.3"] {
            storage
                .create_devlog_impl(
                    admin.id,
                    CreateDevlogRequest {
                        title: title.into(),
                        body: "notes".into(),
                    },
                )
                .await
                .unwrap();
        }

        let page = storage
            .list_devlogs_with_pagination_impl(PaginationQuery { page: 1, size: 2 })
            .await
            .unwrap();
        assert_eq!(page.pagination.total, 3);
        assert_eq!(page.pagination.total_pages, 2);
        assert_eq!(page.items[0].title, "v0.3");
    }
}
