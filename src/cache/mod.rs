//! 对象缓存
//!
//! 缓存后端以插件形式注册，启动时按配置选择，失败时回退到内存缓存。

pub mod object_cache;
pub mod register;
mod traits;

pub use traits::{CacheResult, ObjectCache, ObjectCacheExt};

/// 声明缓存插件，生成 `register()` 用于向注册表登记构造函数
#[macro_export]
macro_rules! declare_object_cache_plugin {
    ($name:expr, $ty:ty) => {
        pub const PLUGIN_NAME: &str = $name;

        pub fn register() {
            $crate::cache::register::register_object_cache_plugin(
                PLUGIN_NAME,
                std::sync::Arc::new(|| -> $crate::cache::register::BoxedObjectCacheFuture {
                    Box::pin(async {
                        let cache = <$ty>::new()?;
                        Ok(Box::new(cache) as Box<dyn $crate::cache::ObjectCache>)
                    })
                }),
            );
        }
    };
}
