pub mod comments;
pub mod posts;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::forum::requests::{CreateCommentRequest, CreatePostRequest, PostQueryParams};
use crate::storage::Storage;

pub struct ForumService {
    storage: Option<Arc<dyn Storage>>,
}

impl ForumService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Arc<dyn Storage> {
        if let Some(storage) = &self.storage {
            storage.clone()
        } else {
            request
                .app_data::<actix_web::web::Data<Arc<dyn Storage>>>()
                .expect("Storage not found in app data")
                .get_ref()
                .clone()
        }
    }

    pub async fn list_posts(
        &self,
        request: &HttpRequest,
        query: PostQueryParams,
    ) -> ActixResult<HttpResponse> {
        posts::list_posts(self, request, query).await
    }

    pub async fn create_post(
        &self,
        request: &HttpRequest,
        post_data: CreatePostRequest,
    ) -> ActixResult<HttpResponse> {
        posts::create_post(self, request, post_data).await
    }

    pub async fn get_post(&self, request: &HttpRequest, post_id: i64) -> ActixResult<HttpResponse> {
        posts::get_post(self, request, post_id).await
    }

    pub async fn delete_post(
        &self,
        request: &HttpRequest,
        post_id: i64,
    ) -> ActixResult<HttpResponse> {
        posts::delete_post(self, request, post_id).await
    }

    pub async fn create_comment(
        &self,
        request: &HttpRequest,
        post_id: i64,
        comment_data: CreateCommentRequest,
    ) -> ActixResult<HttpResponse> {
        comments::create_comment(self, request, post_id, comment_data).await
    }
}
