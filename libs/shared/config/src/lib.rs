use std::env;
use tracing::warn;

const PLACEHOLDER_VALUES: [&str; 4] = [
    "your_supabase_url_here",
    "your_supabase_anon_key_here",
    "https://placeholder.supabase.co",
    "placeholder-key",
];

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub supabase_url: String,
    pub supabase_anon_key: String,
    pub supabase_jwt_secret: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let config = Self {
            supabase_url: env::var("SUPABASE_URL")
                .unwrap_or_else(|_| {
                    warn!("SUPABASE_URL not set, using empty value");
                    String::new()
                }),
            supabase_anon_key: env::var("SUPABASE_ANON_PUBLIC_KEY")
                .unwrap_or_else(|_| {
                    warn!("SUPABASE_ANON_PUBLIC_KEY not set, using empty value");
                    String::new()
                }),
            supabase_jwt_secret: env::var("SUPABASE_JWT_SECRET")
                .unwrap_or_else(|_| {
                    warn!("SUPABASE_JWT_SECRET not set, using empty value");
                    String::new()
                }),
        };

        if !config.is_configured() {
            warn!("Supabase is not configured - set SUPABASE_URL, SUPABASE_ANON_PUBLIC_KEY and SUPABASE_JWT_SECRET");
        }

        config
    }

    /// True when every Supabase value is present and none is a template placeholder.
    pub fn is_configured(&self) -> bool {
        let values = [
            &self.supabase_url,
            &self.supabase_anon_key,
            &self.supabase_jwt_secret,
        ];

        values.iter().all(|value| {
            !value.is_empty()
                && !PLACEHOLDER_VALUES.iter().any(|placeholder| value.contains(placeholder))
        })
    }
}

/// Port the API binds to, from `PORT` (default 3000).
pub fn server_port() -> u16 {
    match env::var("PORT") {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            warn!("PORT '{}' is not a valid port, using 3000", raw);
            3000
        }),
        Err(_) => 3000,
    }
}
