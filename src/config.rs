use std::env;

use password_hash::rand_core::{OsRng, RngCore};

const DEFAULT_DATABASE_URL: &str = "sqlite://vitalityboost.db?mode=rwc";
const DEFAULT_MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub public_base_url: String,
    pub session: SessionConfig,
    pub admin: AdminSeedConfig,
    pub payment: PaymentConfig,
    pub max_upload_bytes: usize,
}

#[derive(Clone)]
pub struct SessionConfig {
    pub secret: Vec<u8>,
    pub ephemeral: bool,
}

impl std::fmt::Debug for SessionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionConfig")
            .field("secret", &"<redacted>")
            .field("ephemeral", &self.ephemeral)
            .finish()
    }
}

#[derive(Clone)]
pub struct AdminSeedConfig {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for AdminSeedConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminSeedConfig")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl AdminSeedConfig {
    pub fn is_default(&self) -> bool {
        self.username == "admin" && self.password == "admin"
    }
}

#[derive(Clone)]
pub struct PaymentConfig {
    pub stripe_secret_key: Option<String>,
    pub stripe_webhook_secret: Option<String>,
    pub stripe_api_base: String,
    pub currency: String,
}

impl std::fmt::Debug for PaymentConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaymentConfig")
            .field("stripe_secret_key", &self.stripe_secret_key.as_ref().map(|_| "<redacted>"))
            .field(
                "stripe_webhook_secret",
                &self.stripe_webhook_secret.as_ref().map(|_| "<redacted>"),
            )
            .field("stripe_api_base", &self.stripe_api_base)
            .field("currency", &self.currency)
            .finish()
    }
}

impl Default for PaymentConfig {
    fn default() -> Self {
        Self {
            stripe_secret_key: None,
            stripe_webhook_secret: None,
            stripe_api_base: "https://api.stripe.com".to_string(),
            currency: "nok".to_string(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string());
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(3000);
        let public_base_url = env::var("PUBLIC_BASE_URL")
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or_else(|_| format!("http://{host}:{port}"));

        let session = match non_empty_var("SESSION_SECRET") {
            Some(secret) => SessionConfig {
                secret: secret.into_bytes(),
                ephemeral: false,
            },
            None => SessionConfig {
                secret: random_secret(),
                ephemeral: true,
            },
        };

        let admin = AdminSeedConfig {
            username: non_empty_var("ADMIN_USERNAME").unwrap_or_else(|| "admin".to_string()),
            password: non_empty_var("ADMIN_PASSWORD").unwrap_or_else(|| "admin".to_string()),
        };

        let defaults = PaymentConfig::default();
        let payment = PaymentConfig {
            stripe_secret_key: non_empty_var("STRIPE_SECRET_KEY"),
            stripe_webhook_secret: non_empty_var("STRIPE_WEBHOOK_SECRET"),
            stripe_api_base: non_empty_var("STRIPE_API_BASE")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.stripe_api_base),
            currency: non_empty_var("PAYMENT_CURRENCY")
                .map(|c| c.to_lowercase())
                .unwrap_or(defaults.currency),
        };

        let max_upload_bytes = env::var("MAX_UPLOAD_BYTES")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(DEFAULT_MAX_UPLOAD_BYTES);

        Ok(Self {
            port,
            database_url,
            host,
            public_base_url,
            session,
            admin,
            payment,
            max_upload_bytes,
        })
    }

    pub fn for_database(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            host: "127.0.0.1".to_string(),
            port: 3000,
            public_base_url: "http://127.0.0.1:3000".to_string(),
            session: SessionConfig {
                secret: b"vitalityboost-test-secret".to_vec(),
                ephemeral: false,
            },
            admin: AdminSeedConfig {
                username: "admin".to_string(),
                password: "admin".to_string(),
            },
            payment: PaymentConfig::default(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }

    pub fn secure_cookies(&self) -> bool {
        self.public_base_url.starts_with("https://")
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn random_secret() -> Vec<u8> {
    let mut secret = vec![0u8; 32];
    OsRng.fill_bytes(&mut secret);
    secret
}
