//! 安全的路径参数提取器
//!
//! 路径 ID 必须为正整数，否则直接返回 400 响应，不进入处理函数。

use crate::models::{ApiResponse, ErrorCode};
use actix_web::{FromRequest, HttpRequest, HttpResponse, dev::Payload, error::InternalError};
use serde::{Deserialize, Deserializer};
use std::future::{Ready, ready};

fn parse_positive_id(req: &HttpRequest, name: &str) -> Result<i64, actix_web::Error> {
    let raw = req.match_info().get(name).unwrap_or_default();
    match raw.parse::<i64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => {
            let response = HttpResponse::BadRequest().json(ApiResponse::error_empty(
                ErrorCode::BadRequest,
                format!("Invalid path parameter '{name}': {raw}"),
            ));
            Err(InternalError::from_response("invalid path parameter", response).into())
        }
    }
}

macro_rules! define_safe_id_extractor {
    ($name:ident, $param:literal) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub struct $name(pub i64);

        impl FromRequest for $name {
            type Error = actix_web::Error;
            type Future = Ready<Result<Self, Self::Error>>;

            fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
                ready(parse_positive_id(req, $param).map($name))
            }
        }
    };
}

define_safe_id_extractor!(SafeIDI64, "id");
define_safe_id_extractor!(SafeContentIdI64, "content_id");

/// 接受数字或数字字符串
pub fn deserialize_loose_i64<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Loose {
        Int(i64),
        Str(String),
    }

    match Loose::deserialize(deserializer)? {
        Loose::Int(v) => Ok(v),
        Loose::Str(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}

/// 可选版本，用于 flatten 的查询参数（值均以字符串形式到达）
pub fn deserialize_loose_opt_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Loose {
        Int(i64),
        Str(String),
    }

    match Option::<Loose>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Loose::Int(v)) => Ok(Some(v)),
        Some(Loose::Str(s)) if s.trim().is_empty() => Ok(None),
        Some(Loose::Str(s)) => s.trim().parse().map(Some).map_err(serde::de::Error::custom),
    }
}

/// 区分字段缺省与显式 null：缺省为 None，null 为 Some(None)
///
/// 需配合 `#[serde(default)]` 使用
pub fn deserialize_nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
