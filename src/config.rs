use crate::key::ApiKey;

/// Application configuration, created once at startup and injected into
/// the HTTP client and metadata gateway.
#[derive(Clone, Debug, Hash, PartialEq, Eq)]
pub struct Config {
    pub app_name: String,
    pub app_version: String,
    pub app_lang: String,

    pub user_agent: String,

    pub api_key: ApiKey,
    pub api_host: String,
}

impl Config {
    /// Default metadata API host.
    ///
    /// Used when the secrets file or command line does not override it.
    pub const DEFAULT_API_HOST: &'static str = "spotify-scraper.p.rapidapi.com";

    #[must_use]
    pub fn with_key(api_key: ApiKey) -> Self {
        let app_name = env!("CARGO_PKG_NAME").to_owned();
        let app_version = env!("CARGO_PKG_VERSION").to_owned();
        let app_lang = "en".to_owned();

        // Additional `User-Agent` string checks on top of `reqwest::HeaderValue`.
        let illegal_chars = |chr| chr == '/' || chr == ';';
        if app_name.is_empty()
            || app_name.contains(illegal_chars)
            || app_version.is_empty()
            || app_version.contains(illegal_chars)
            || app_lang.chars().count() != 2
            || app_lang.contains(illegal_chars)
        {
            panic!(
                "application name, version and/or language invalid (\"{app_name}\"; \"{app_version}\"; \"{app_lang}\")"
            );
        }

        let os_name = match std::env::consts::OS {
            "macos" => "osx",
            other => other,
        };

        let user_agent = format!("{app_name}/{app_version} (Rust; {os_name}; {app_lang})");
        trace!("user agent: {user_agent}");

        Self {
            app_name,
            app_version,
            app_lang,

            user_agent,

            api_key,
            api_host: Self::DEFAULT_API_HOST.to_owned(),
        }
    }
}
