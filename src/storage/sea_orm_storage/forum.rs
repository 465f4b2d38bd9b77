use super::SeaOrmStorage;
use crate::entity::forum_comments::{
    ActiveModel as CommentActiveModel, Column as CommentColumn, Entity as ForumComments,
};
use crate::entity::forum_posts::{ActiveModel, Column, Entity as ForumPosts};
use crate::errors::{KuetxError, Result};
use crate::models::{
    PaginationInfo,
    common::pagination::normalize_page,
    forum::{
        entities::{ForumComment, ForumPost},
        requests::{CreatePostRequest, PostListQuery},
        responses::PostListResponse,
    },
};
use crate::utils::like_contains;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    Set,
};

impl SeaOrmStorage {
    pub async fn create_post_impl(
        &self,
        author_id: i64,
        req: CreatePostRequest,
    ) -> Result<ForumPost> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            author_id: Set(author_id),
            title: Set(req.title),
            body: Set(req.body),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| KuetxError::database_operation(format!("Failed to create post: {e}")))?;

        Ok(result.into_post())
    }

    pub async fn get_post_by_id_impl(&self, id: i64) -> Result<Option<ForumPost>> {
        let result = ForumPosts::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| KuetxError::database_operation(format!("Failed to query post: {e}")))?;

        Ok(result.map(|m| m.into_post()))
    }

    pub async fn list_posts_with_pagination_impl(
        &self,
        query: PostListQuery,
    ) -> Result<PostListResponse> {
        let (page, size) = normalize_page(query.page, query.size);

        let mut select = ForumPosts::find();

        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            let term = search.trim();
            select = select.filter(
                Condition::any()
                    .add(like_contains(Column::Title, term))
                    .add(like_contains(Column::Body, term)),
            );
        }

        let paginator = select
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
            .paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| KuetxError::database_operation(format!("Failed to count posts: {e}")))?;
        let posts = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| KuetxError::database_operation(format!("Failed to list posts: {e}")))?;

        Ok(PostListResponse {
            items: posts.into_iter().map(|m| m.into_post()).collect(),
            pagination: PaginationInfo::new(page, size, total),
        })
    }

    pub async fn delete_post_impl(&self, id: i64) -> Result<bool> {
        let result = ForumPosts::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| KuetxError::database_operation(format!("Failed to delete post: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    pub async fn create_comment_impl(
        &self,
        post_id: i64,
        author_id: i64,
        body: String,
    ) -> Result<ForumComment> {
        let model = CommentActiveModel {
            post_id: Set(post_id),
            author_id: Set(author_id),
            body: Set(body),
            created_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| KuetxError::database_operation(format!("Failed to create comment: {e}")))?;

        Ok(result.into_comment())
    }

    /// 评论按时间正序
    pub async fn list_comments_impl(&self, post_id: i64) -> Result<Vec<ForumComment>> {
        let comments = ForumComments::find()
            .filter(CommentColumn::PostId.eq(post_id))
            .order_by_asc(CommentColumn::CreatedAt)
            .order_by_asc(CommentColumn::Id)
            .all(&self.db)
            .await
            .map_err(|e| KuetxError::database_operation(format!("Failed to list comments: {e}")))?;

        Ok(comments.into_iter().map(|m| m.into_comment()).collect())
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
    async fn test_posts_and_comments() {
        let storage = SeaOrmStorage::in_memory().await.unwrap();
        let author = storage
            .create_user_impl(CreateUserRequest {
                username: "writer".into(),
                email: "writer@example.com".into(),
                password: "hash".into(),
                role: UserRole::Student,
                status: UserStatus::Active,
                profile_name: None,
                avatar_url: None,
            })
            .await
            .unwrap();

        let post = storage
            .create_post_impl(
                author.id,
                CreatePostRequest {
                    title: "100% done".into(),
                    body: "finished the course".into(),
                },
            )
            .await
            .unwrap();
        storage
            .create_post_impl(
                author.id,
                CreatePostRequest {
                    title: "Question".into(),
                    body: "how do lifetimes work".into(),
                },
            )
            .await
            .unwrap();

        for body in ["first", "second"] {
            storage
                .create_comment_impl(post.id, author.id, body.into())
                .await
                .unwrap();
        }
        let comments = storage.list_comments_impl(post.id).await.unwrap();
        assert_eq!(comments.len(), 2);
        assert_eq!(comments[0].body, "first");

        // % 按字面匹配
        let found = storage
            .list_posts_with_pagination_impl(PostListQuery {
                search: Some("100%".into()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(found.pagination.total, 1);

        assert!(storage.delete_post_impl(post.id).await.unwrap());
        assert!(storage.list_comments_impl(post.id).await.unwrap().is_empty());
    }
}
