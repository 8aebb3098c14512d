//! Connection settings for the WordPress REST API.

use crate::error::PublishError;

pub const URL_VAR: &str = "WORDPRESS_URL";
pub const USER_VAR: &str = "WORDPRESS_USER";
pub const APP_PASSWORD_VAR: &str = "WORDPRESS_APP_PASSWORD";

const POSTS_PATH: &str = "/wp-json/wp/v2/posts";

/// Site URL plus the user/application-password pair used for basic auth.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WordPressConfig {
    pub base_url: String,
    pub user: String,
    pub app_password: String,
}

impl WordPressConfig {
    pub fn new(
        base_url: impl Into<String>,
        user: impl Into<String>,
        app_password: impl Into<String>,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            user: user.into(),
            app_password: app_password.into(),
        }
    }

    /// Reads the three settings from the process environment. Unset
    /// variables become empty strings and are reported by [`validate`].
    ///
    /// [`validate`]: WordPressConfig::validate
    pub fn from_env() -> Self {
        let var = |name: &str| std::env::var(name).unwrap_or_default();
        Self::new(var(URL_VAR), var(USER_VAR), var(APP_PASSWORD_VAR))
    }

    /// Fails with [`PublishError::Configuration`] listing every empty setting.
    pub fn validate(&self) -> Result<(), PublishError> {
        let missing: Vec<&'static str> = [
            (URL_VAR, &self.base_url),
            (USER_VAR, &self.user),
            (APP_PASSWORD_VAR, &self.app_password),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(PublishError::Configuration(missing))
        }
    }

    /// Collection endpoint used to create posts.
    pub fn posts_url(&self) -> String {
        format!("{}{POSTS_PATH}", self.base_url)
    }

    /// Resource endpoint used to update an existing post.
    pub fn post_url(&self, id: &str) -> String {
        format!("{}/{id}", self.posts_url())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_trailing_slashes_from_base_url() {
        let config = WordPressConfig::new("https://blog.example.com//", "me", "secret");
        assert_eq!(
            config.posts_url(),
            "https://blog.example.com/wp-json/wp/v2/posts"
        );
        assert_eq!(
            config.post_url("42"),
            "https://blog.example.com/wp-json/wp/v2/posts/42"
        );
    }

    #[test]
    fn validate_reports_every_missing_setting() {
        let err = WordPressConfig::default().validate().unwrap_err();
        match err {
            PublishError::Configuration(missing) => {
                assert_eq!(missing, vec![URL_VAR, USER_VAR, APP_PASSWORD_VAR]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn validate_rejects_blank_password() {
        let config = WordPressConfig::new("https://blog.example.com", "me", "  ");
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains(APP_PASSWORD_VAR));
    }

    #[test]
    fn validate_accepts_complete_config() {
        let config = WordPressConfig::new("https://blog.example.com", "me", "abcd efgh");
        assert!(config.validate().is_ok());
    }
}
