pub mod moka;
pub mod redis;

/// 注册内置缓存插件
pub fn register_builtin() {
    moka::register();
    redis::register();
}
