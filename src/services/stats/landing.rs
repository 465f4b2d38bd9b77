//! 首页统计，结果在缓存中保留 `cache.default_ttl` 秒

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::StatsService;
use crate::cache::{CacheResult, ObjectCacheExt};
use crate::models::stats::responses::LandingPageStats;
use crate::models::{ApiResponse, ErrorCode};

pub const LANDING_STATS_CACHE_KEY: &str = "stats:landing";

pub async fn get_landing_page_stats(
    service: &StatsService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let cache = service.get_cache(request);

    if let CacheResult::Found(stats) = cache
        .get_json::<LandingPageStats>(LANDING_STATS_CACHE_KEY)
        .await
    {
        return Ok(HttpResponse::Ok().json(ApiResponse::success(
            stats,
            "Landing page statistics retrieved successfully",
        )));
    }

    match service.get_storage(request).get_dashboard_stats().await {
        Ok(dashboard) => {
            let stats = LandingPageStats::from(&dashboard);
            // ttl 为 0 表示使用默认过期时间
            cache
                .insert_json(LANDING_STATS_CACHE_KEY.to_string(), &stats, 0)
                .await;
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                stats,
                "Landing page statistics retrieved successfully",
            )))
        }
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to retrieve landing page statistics: {e}"),
            )),
        ),
    }
}
