pub mod create;
pub mod detail;
pub mod list;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::devlog::requests::{CreateDevlogRequest, DevlogQueryParams};
use crate::storage::Storage;

pub struct DevlogService {
    storage: Option<Arc<dyn Storage>>,
}

impl DevlogService {
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

    pub async fn list_devlogs(
        &self,
        request: &HttpRequest,
        query: DevlogQueryParams,
    ) -> ActixResult<HttpResponse> {
        list::list_devlogs(self, request, query).await
    }

    pub async fn get_devlog(
        &self,
        request: &HttpRequest,
        devlog_id: i64,
    ) -> ActixResult<HttpResponse> {
        detail::get_devlog(self, request, devlog_id).await
    }

    pub async fn create_devlog(
        &self,
        request: &HttpRequest,
        devlog_data: CreateDevlogRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_devlog(self, request, devlog_data).await
    }
}
