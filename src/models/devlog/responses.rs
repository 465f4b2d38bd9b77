use super::entities::Devlog;
use crate::models::common::PaginatedResponse;

pub type DevlogListResponse = PaginatedResponse<Devlog>;
