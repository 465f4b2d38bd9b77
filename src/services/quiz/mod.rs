pub mod categories;
pub mod delete;
pub mod questions;
pub mod submit;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::quiz::requests::{
    CreateCategoryRequest, DeleteCategoriesRequest, SubmitQuizRequest,
};
use crate::storage::Storage;

pub struct QuizService {
    storage: Option<Arc<dyn Storage>>,
}

impl QuizService {
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

    // 分类列表
    pub async fn list_categories(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        categories::list_categories(self, request).await
    }

    // 创建分类及题目
    pub async fn create_category(
        &self,
        request: &HttpRequest,
        category_data: CreateCategoryRequest,
    ) -> ActixResult<HttpResponse> {
        categories::create_category(self, request, category_data).await
    }

    // 编辑分类及题目
    pub async fn update_category(
        &self,
        request: &HttpRequest,
        category_id: i64,
        category_data: CreateCategoryRequest,
    ) -> ActixResult<HttpResponse> {
        categories::update_category(self, request, category_id, category_data).await
    }

    // 分类下的题目（不含答案）
    pub async fn get_questions(
        &self,
        request: &HttpRequest,
        category_id: i64,
    ) -> ActixResult<HttpResponse> {
        questions::get_questions(self, request, category_id).await
    }

    // 提交答案
    pub async fn submit(
        &self,
        request: &HttpRequest,
        submission: SubmitQuizRequest,
    ) -> ActixResult<HttpResponse> {
        submit::submit_quiz(self, request, submission).await
    }

    // 批量删除分类
    pub async fn delete_categories(
        &self,
        request: &HttpRequest,
        delete_data: DeleteCategoriesRequest,
    ) -> ActixResult<HttpResponse> {
        delete::delete_categories(self, request, delete_data).await
    }
}
