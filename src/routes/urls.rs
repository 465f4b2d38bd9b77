//! 命名路由表
//!
//! 每条路由有唯一名称。服务层通过 `reverse` 生成链接（邮件中的验证、重置地址），
//! OpenAPI 文档也由这张表生成。实际的 actix 路由注册在各子模块中完成，
//! 两者由集成测试保持一致。

/// 路由访问级别
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthLevel {
    Public,
    Authenticated,
    /// 讲师或管理员
    Staff,
    Admin,
}

#[derive(Debug, Clone, Copy)]
pub struct UrlPattern {
    pub name: &'static str,
    pub method: &'static str,
    /// `{param}` 为路径参数
    pub path: &'static str,
    pub summary: &'static str,
    pub tag: &'static str,
    pub auth: AuthLevel,
}

impl UrlPattern {
    const fn new(
        name: &'static str,
        method: &'static str,
        path: &'static str,
        summary: &'static str,
        tag: &'static str,
        auth: AuthLevel,
    ) -> Self {
        Self {
            name,
            method,
            path,
            summary,
            tag,
            auth,
        }
    }

    /// 路径参数名，按出现顺序
    pub fn params(&self) -> Vec<&'static str> {
        segments(self.path)
            .filter_map(|s| s.strip_prefix('{').and_then(|s| s.strip_suffix('}')))
            .collect()
    }

    fn matches(&self, method: &str, path: &str) -> bool {
        if !self.method.eq_ignore_ascii_case(method) {
            return false;
        }
        // 结尾斜杠必须一致
        if self.path.ends_with('/') != path.ends_with('/') {
            return false;
        }

        let mut expected = segments(self.path);
        let mut actual = segments(path);
        loop {
            match (expected.next(), actual.next()) {
                (None, None) => return true,
                (Some(pattern), Some(segment)) => {
                    let is_param = pattern.starts_with('{') && pattern.ends_with('}');
                    if !is_param && pattern != segment {
                        return false;
                    }
                }
                _ => return false,
            }
        }
    }
}

fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

use AuthLevel::{Admin, Authenticated, Public, Staff};

pub static URL_PATTERNS: &[UrlPattern] = &[
    // 账户
    UrlPattern::new(
        "register",
        "POST",
        "/register/",
        "Register a new account",
        "auth",
        Public,
    ),
    UrlPattern::new(
        "login",
        "POST",
        "/login/",
        "Log in with username or email",
        "auth",
        Public,
    ),
    UrlPattern::new(
        "logout",
        "POST",
        "/logout/",
        "Log out and revoke the refresh token",
        "auth",
        Authenticated,
    ),
    UrlPattern::new(
        "verify-email",
        "GET",
        "/verify-email/{uidb64}/{token}/",
        "Confirm an email address",
        "auth",
        Public,
    ),
    UrlPattern::new(
        "request-reset-password",
        "POST",
        "/request-reset-password/",
        "Send a password reset link",
        "auth",
        Public,
    ),
    UrlPattern::new(
        "reset-password-confirm",
        "POST",
        "/reset-password/{uidb64}/{token}/",
        "Set a new password from a reset link",
        "auth",
        Public,
    ),
    UrlPattern::new(
        "get_token",
        "POST",
        "/token/",
        "Obtain an access/refresh token pair",
        "token",
        Public,
    ),
    UrlPattern::new(
        "token_refresh",
        "POST",
        "/token/refresh/",
        "Rotate a refresh token",
        "token",
        Public,
    ),
    // 统计
    UrlPattern::new(
        "dashboard-stats",
        "GET",
        "/dashboard/stats/",
        "Platform metrics for administrators",
        "stats",
        Admin,
    ),
    UrlPattern::new(
        "landingpage-stats",
        "GET",
        "/landingpage/stats/",
        "Public landing page metrics",
        "stats",
        Public,
    ),
    // 文档
    UrlPattern::new(
        "schema",
        "GET",
        "/api/schema/",
        "OpenAPI document",
        "schema",
        Public,
    ),
    UrlPattern::new(
        "swagger-ui",
        "GET",
        "/api/schema/swagger-ui/",
        "Swagger UI",
        "schema",
        Public,
    ),
    // 开发日志
    UrlPattern::new(
        "devlog-list",
        "GET",
        "/devlogs/",
        "List devlog entries",
        "devlog",
        Public,
    ),
    UrlPattern::new(
        "devlog-create",
        "POST",
        "/devlogs/",
        "Publish a devlog entry",
        "devlog",
        Admin,
    ),
    UrlPattern::new(
        "devlog-detail",
        "GET",
        "/devlogs/{id}/",
        "Get a devlog entry",
        "devlog",
        Public,
    ),
    // 课程
    UrlPattern::new(
        "course-list",
        "GET",
        "/courses/",
        "List courses",
        "courses",
        Public,
    ),
    UrlPattern::new(
        "course-create",
        "POST",
        "/courses/",
        "Create a course",
        "courses",
        Staff,
    ),
    UrlPattern::new(
        "course-detail",
        "GET",
        "/courses/{id}/",
        "Get a course with its contents",
        "courses",
        Public,
    ),
    UrlPattern::new(
        "course-delete",
        "DELETE",
        "/courses/{id}/",
        "Delete a course",
        "courses",
        Staff,
    ),
    UrlPattern::new(
        "course-content-create",
        "POST",
        "/courses/{id}/contents/",
        "Add content to a course",
        "courses",
        Staff,
    ),
    UrlPattern::new(
        "course-content-update",
        "PUT",
        "/courses/contents/{content_id}/",
        "Update course content",
        "courses",
        Staff,
    ),
    UrlPattern::new(
        "course-content-delete",
        "DELETE",
        "/courses/contents/{content_id}/",
        "Delete course content",
        "courses",
        Staff,
    ),
    // 用户
    UrlPattern::new(
        "user-me",
        "GET",
        "/users/me/",
        "Current user",
        "users",
        Authenticated,
    ),
    UrlPattern::new(
        "user-me-update",
        "PUT",
        "/users/me/",
        "Update the current user",
        "users",
        Authenticated,
    ),
    UrlPattern::new("user-list", "GET", "/users/", "List users", "users", Admin),
    UrlPattern::new(
        "user-delete",
        "DELETE",
        "/users/{id}/",
        "Delete a user",
        "users",
        Admin,
    ),
    // 论坛
    UrlPattern::new(
        "forum-post-list",
        "GET",
        "/forum/posts/",
        "List forum posts",
        "forum",
        Public,
    ),
    UrlPattern::new(
        "forum-post-create",
        "POST",
        "/forum/posts/",
        "Create a forum post",
        "forum",
        Authenticated,
    ),
    UrlPattern::new(
        "forum-post-detail",
        "GET",
        "/forum/posts/{id}/",
        "Get a post with its comments",
        "forum",
        Public,
    ),
    UrlPattern::new(
        "forum-post-delete",
        "DELETE",
        "/forum/posts/{id}/",
        "Delete a forum post",
        "forum",
        Authenticated,
    ),
    UrlPattern::new(
        "forum-comment-create",
        "POST",
        "/forum/posts/{id}/comments/",
        "Comment on a post",
        "forum",
        Authenticated,
    ),
    // 测验
    UrlPattern::new(
        "quiz-category-list",
        "GET",
        "/quiz/categories/",
        "List quiz categories",
        "quiz",
        Public,
    ),
    UrlPattern::new(
        "quiz-category-create",
        "POST",
        "/quiz/categories/",
        "Create a quiz category with questions",
        "quiz",
        Staff,
    ),
    UrlPattern::new(
        "quiz-category-update",
        "PUT",
        "/quiz/categories/{id}/",
        "Replace a quiz category and its questions",
        "quiz",
        Staff,
    ),
    UrlPattern::new(
        "quiz-questions",
        "GET",
        "/quiz/categories/{id}/questions/",
        "Questions of a category",
        "quiz",
        Authenticated,
    ),
    UrlPattern::new(
        "quiz-submit",
        "POST",
        "/quiz/submit/",
        "Submit quiz answers",
        "quiz",
        Authenticated,
    ),
    UrlPattern::new(
        "quiz-delete",
        "DELETE",
        "/quiz/delete/",
        "Delete quiz categories",
        "quiz",
        Staff,
    ),
];

/// 按名称查找路由
pub fn url_pattern(name: &str) -> Option<&'static UrlPattern> {
    URL_PATTERNS.iter().find(|p| p.name == name)
}

/// 按名称生成路径，参数按顺序填充；名称未知或参数个数不符时返回 None
pub fn reverse(name: &str, args: &[&str]) -> Option<String> {
    let pattern = url_pattern(name)?;
    if pattern.params().len() != args.len() {
        return None;
    }

    let mut args = args.iter();
    let mut path = String::from("/");
    for segment in segments(pattern.path) {
        if segment.starts_with('{') {
            let arg = args.next()?;
            if arg.is_empty() || arg.contains('/') {
                return None;
            }
            path.push_str(arg);
        } else {
            path.push_str(segment);
        }
        path.push('/');
    }
    Some(path)
}

/// 将请求方法和路径匹配到命名路由
pub fn resolve(method: &str, path: &str) -> Option<&'static UrlPattern> {
    let path = path.split('?').next().unwrap_or(path);
    URL_PATTERNS.iter().find(|p| p.matches(method, path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_names_are_unique() {
        let names: HashSet<_> = URL_PATTERNS.iter().map(|p| p.name).collect();
        assert_eq!(names.len(), URL_PATTERNS.len());
    }

    #[test]
    fn test_reverse_resolve_round_trip() {
        for pattern in URL_PATTERNS {
            let args: Vec<String> = (1..=pattern.params().len()).map(|i| format!("a{i}")).collect();
            let args: Vec<&str> = args.iter().map(String::as_str).collect();
            let path = reverse(pattern.name, &args).expect("reverse");
            let resolved = resolve(pattern.method, &path).expect("resolve");
            assert_eq!(resolved.name, pattern.name, "path {path}");
        }
    }

    #[test]
    fn test_reverse_fills_params() {
        assert_eq!(
            reverse("verify-email", &["MQ", "abc-123"]).as_deref(),
            Some("/verify-email/MQ/abc-123/")
        );
        assert_eq!(reverse("login", &[]).as_deref(), Some("/login/"));
        assert!(reverse("verify-email", &["MQ"]).is_none());
        assert!(reverse("login", &["extra"]).is_none());
        assert!(reverse("no-such-route", &[]).is_none());
        assert!(reverse("course-detail", &["a/b"]).is_none());
    }

    #[test]
    fn test_resolve() {
        assert_eq!(resolve("GET", "/courses/12/").map(|p| p.name), Some("course-detail"));
        assert_eq!(resolve("delete", "/courses/12/").map(|p| p.name), Some("course-delete"));
        assert_eq!(
            resolve("PUT", "/courses/contents/3/").map(|p| p.name),
            Some("course-content-update")
        );
        assert_eq!(
            resolve("POST", "/courses/3/contents/").map(|p| p.name),
            Some("course-content-create")
        );
        assert_eq!(resolve("GET", "/users/me/?x=1").map(|p| p.name), Some("user-me"));
        assert!(resolve("GET", "/courses/12").is_none());
        assert!(resolve("PATCH", "/courses/12/").is_none());
        assert!(resolve("GET", "/nowhere/").is_none());
    }

    #[test]
    fn test_params() {
        let pattern = url_pattern("reset-password-confirm").unwrap();
        assert_eq!(pattern.params(), ["uidb64", "token"]);
        assert!(url_pattern("schema").unwrap().params().is_empty());
    }
}
