use crate::cache::object_cache::{moka, register_builtin};
use crate::cache::{ObjectCache, register::create_object_cache};
use crate::config::AppConfig;
use crate::errors::Result;
use crate::mail::{Mailer, create_mailer};
use crate::models::users::entities::{UserRole, UserStatus};
use crate::models::users::requests::CreateUserRequest;
use crate::storage::Storage;
use crate::utils::password::hash_password;
use std::sync::Arc;
use tracing::{debug, info, warn};

const ADMIN_USERNAME: &str = "admin";
const ADMIN_EMAIL: &str = "admin@localhost";

pub struct StartupContext {
    pub storage: Arc<dyn Storage>,
    pub cache: Arc<dyn ObjectCache>,
    pub mailer: Arc<dyn Mailer>,
}

/// 按配置创建缓存，失败时回退到内存缓存
async fn create_cache(config: &AppConfig) -> Result<Arc<dyn ObjectCache>> {
    let cache_type = config.cache.cache_type.as_str();
    warn!("Attempting to create {} cache backend", cache_type);

    match create_object_cache(cache_type).await {
        Ok(cache) => {
            warn!("Successfully created {} cache backend", cache_type);
            Ok(cache)
        }
        Err(e) if cache_type != moka::PLUGIN_NAME => {
            warn!(
                "Failed to create {} cache: {}, falling back to memory cache",
                cache_type, e
            );
            create_object_cache(moka::PLUGIN_NAME).await
        }
        Err(e) => Err(e),
    }
}

/// 生成随机密码
fn generate_random_password(length: usize) -> String {
    use rand::Rng;
    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789!@#$%";
    let mut rng = rand::rng();
    (0..length)
        .map(|_| CHARSET[rng.random_range(0..CHARSET.len())] as char)
        .collect()
}

// 优先使用 ADMIN_PASSWORD，否则生成一次并打印
fn admin_password() -> String {
    std::env::var("ADMIN_PASSWORD").unwrap_or_else(|_| {
        let password = generate_random_password(16);
        warn!("==========================================================");
        warn!("  ADMIN_PASSWORD not set, generated admin password: {}", password);
        warn!("  Save it now, it will not be shown again");
        warn!("==========================================================");
        password
    })
}

/// 空库时创建默认管理员，无需邮箱验证
async fn seed_admin(storage: &Arc<dyn Storage>) {
    match storage.count_users().await {
        Ok(0) => info!("No users found in database, creating default admin account..."),
        Ok(count) => {
            debug!("Database already has {} user(s), skipping admin seed", count);
            return;
        }
        Err(e) => {
            warn!("Failed to count users: {}, skipping admin seed", e);
            return;
        }
    }

    let password_hash = match hash_password(&admin_password()) {
        Ok(hash) => hash,
        Err(e) => {
            warn!("Failed to hash admin password: {}, skipping admin seed", e);
            return;
        }
    };

    let admin = CreateUserRequest {
        username: ADMIN_USERNAME.to_string(),
        email: ADMIN_EMAIL.to_string(),
        password: password_hash,
        role: UserRole::Admin,
        status: UserStatus::Active,
        profile_name: Some("Administrator".to_string()),
        avatar_url: None,
    };

    match storage.create_user(admin).await {
        Ok(user) => info!(
            "Default admin account created (ID: {}, username: {})",
            user.id, user.username
        ),
        Err(e) => warn!("Failed to create admin account: {}", e),
    }
}

/// 准备服务器启动的上下文
/// 包括存储、缓存和邮件后端
pub async fn prepare_server_startup() -> StartupContext {
    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("Failed to install rustls crypto provider");

    let config = AppConfig::get();

    register_builtin();
    if cfg!(debug_assertions) {
        crate::cache::register::debug_object_cache_registry();
    }

    let storage = crate::storage::create_storage()
        .await
        .expect("Failed to create storage backend");
    warn!("Storage backend initialized and migrations completed");

    seed_admin(&storage).await;

    let cache = create_cache(config).await.expect("Failed to create cache");
    warn!("Cache backend initialized");

    let mailer = create_mailer(&config.email).expect("Failed to create mail backend");
    warn!("Mail backend '{}' initialized", config.email.backend);

    StartupContext {
        storage,
        cache,
        mailer,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::SeaOrmStorage;

    #[test]
    fn test_generate_random_password() {
        let password = generate_random_password(16);
        assert_eq!(password.chars().count(), 16);
        assert_ne!(password, generate_random_password(16));
    }

    #[actix_web::test]
    async fn test_seed_admin_only_on_empty_database() {
        let storage: Arc<dyn Storage> = Arc::new(SeaOrmStorage::in_memory().await.unwrap());
        seed_admin(&storage).await;
        seed_admin(&storage).await;

        assert_eq!(storage.count_users().await.unwrap(), 1);
        let admin = storage.get_user_by_username(ADMIN_USERNAME).await.unwrap().unwrap();
        assert!(admin.is_admin());
        assert!(admin.is_active());
    }

    #[actix_web::test]
    async fn test_unknown_cache_falls_back_to_moka() {
        register_builtin();
        let mut config = AppConfig::default();
        config.cache.cache_type = "memcached".to_string();
        assert!(create_cache(&config).await.is_ok());
    }
}
