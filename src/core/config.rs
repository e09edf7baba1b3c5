use std::env;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub database: DatabaseConfig,
    pub swagger: SwaggerConfig,
    pub places: PlacesConfig,
    pub traffy: TraffyConfig,
    pub line: Option<LineConfig>,
    pub minio: MinIOConfig,
    pub images: ImageConfig,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// Deployment environment ("development", "production", ...)
    pub environment: String,
    pub cors_allowed_origins: Vec<String>,
    pub max_request_body_size: usize,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout_secs: u64,
    pub idle_timeout_secs: u64,
    pub max_lifetime_secs: u64,
}

#[derive(Debug, Clone)]
pub struct SwaggerConfig {
    pub title: String,
    pub version: String,
    pub description: String,
}

/// Tuning for nearby/search place queries
#[derive(Debug, Clone)]
pub struct PlacesConfig {
    /// Radius used when the caller omits one or sends an invalid value
    pub default_radius_meters: i64,
    /// Maximum number of places enriched with review data at the same time
    pub enrich_concurrency: usize,
}

/// Third-party civic reporting API (Traffy Fondue)
#[derive(Debug, Clone)]
pub struct TraffyConfig {
    /// Public statistics GeoJSON endpoint used by the start/inprogress proxies
    pub stat_api_url: String,
    /// Organization GeoJSON endpoint used by the nearby proxy
    pub fondue_api_url: String,
    pub org_key: String,
    pub timeout: Duration,
}

/// LINE Login channel settings. Absent when any required variable is missing.
#[derive(Debug, Clone)]
pub struct LineConfig {
    pub channel_id: String,
    pub channel_secret: String,
    pub callback_url: String,
    pub token_url: String,
    pub profile_url: String,
    pub timeout: Duration,
}

/// MinIO/S3 storage configuration for review photos
#[derive(Debug, Clone)]
pub struct MinIOConfig {
    /// MinIO/S3 endpoint URL
    pub endpoint: String,
    /// Public endpoint URL used when building photo URLs (defaults to endpoint)
    pub public_endpoint: String,
    pub access_key: String,
    pub secret_key: String,
    pub bucket: String,
    /// AWS region (for S3 compatibility)
    pub region: String,
    /// Prefix readable anonymously (e.g., "public")
    pub public_prefix: String,
}

/// Re-encoding settings applied to every uploaded review photo
#[derive(Debug, Clone)]
pub struct ImageConfig {
    pub max_width: u32,
    pub jpeg_quality: u8,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        // Load .env file if exists, ignore if not found (optional for production)
        if let Err(e) = dotenvy::dotenv() {
            if !e.to_string().contains("not found") {
                eprintln!("Warning: Error loading .env file: {}", e);
            }
        }

        Ok(Config {
            app: AppConfig::from_env()?,
            database: DatabaseConfig::from_env()?,
            swagger: SwaggerConfig::from_env()?,
            places: PlacesConfig::from_env()?,
            traffy: TraffyConfig::from_env()?,
            line: LineConfig::from_env()?,
            minio: MinIOConfig::from_env()?,
            images: ImageConfig::from_env()?,
        })
    }
}

/// Read an environment variable and parse it, falling back to `default` when unset
fn parse_env<T>(key: &str, default: T) -> Result<T, String>
where
    T: std::str::FromStr + ToString,
{
    env::var(key)
        .unwrap_or_else(|_| default.to_string())
        .trim()
        .parse::<T>()
        .map_err(|_| format!("{} must be a valid number", key))
}

impl AppConfig {
    const DEFAULT_MAX_REQUEST_BODY_SIZE: usize = 10 * 1024 * 1024; // 10MB

    pub fn from_env() -> Result<Self, String> {
        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("PORT")
            .unwrap_or_else(|_| "5000".to_string())
            .parse::<u16>()
            .map_err(|e| format!("Invalid PORT: {}", e))?;

        let environment = env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());

        // Parse CORS allowed origins from comma-separated string
        let cors_allowed_origins = env::var("CORS_ALLOWED_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let max_request_body_size =
            parse_env("MAX_REQUEST_BODY_SIZE", Self::DEFAULT_MAX_REQUEST_BODY_SIZE)?;

        Ok(Self {
            host,
            port,
            environment,
            cors_allowed_origins,
            max_request_body_size,
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn is_production(&self) -> bool {
        self.environment.eq_ignore_ascii_case("production")
    }
}

impl DatabaseConfig {
    // Pool size doubles as the ceiling for review-enrichment fan-out
    const DEFAULT_MAX_CONNECTIONS: u32 = 20;
    const DEFAULT_MIN_CONNECTIONS: u32 = 1;
    const DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 5;
    const DEFAULT_IDLE_TIMEOUT_SECS: u64 = 600; // 10 minutes
    const DEFAULT_MAX_LIFETIME_SECS: u64 = 1800; // 30 minutes

    pub fn from_env() -> Result<Self, String> {
        let url = env::var("DATABASE_URL").map_err(|_| "DATABASE_URL must be set".to_string())?;

        Ok(Self {
            url,
            max_connections: parse_env("DB_MAX_CONNECTIONS", Self::DEFAULT_MAX_CONNECTIONS)?,
            min_connections: parse_env("DB_MIN_CONNECTIONS", Self::DEFAULT_MIN_CONNECTIONS)?,
            acquire_timeout_secs: parse_env(
                "DB_ACQUIRE_TIMEOUT_SECS",
                Self::DEFAULT_ACQUIRE_TIMEOUT_SECS,
            )?,
            idle_timeout_secs: parse_env("DB_IDLE_TIMEOUT_SECS", Self::DEFAULT_IDLE_TIMEOUT_SECS)?,
            max_lifetime_secs: parse_env("DB_MAX_LIFETIME_SECS", Self::DEFAULT_MAX_LIFETIME_SECS)?,
        })
    }
}

impl SwaggerConfig {
    pub fn from_env() -> Result<Self, String> {
        let title = env::var("SWAGGER_TITLE").unwrap_or_else(|_| "Traffy Fondue API".to_string());
        let version = env::var("SWAGGER_VERSION").unwrap_or_else(|_| "0.1.0".to_string());
        let description = env::var("SWAGGER_DESCRIPTION")
            .unwrap_or_else(|_| "API documentation for the Traffy Fondue companion app".to_string());

        Ok(Self {
            title,
            version,
            description,
        })
    }
}

impl PlacesConfig {
    pub const DEFAULT_RADIUS_METERS: i64 = 25_000;
    const DEFAULT_ENRICH_CONCURRENCY: usize = 8;

    pub fn from_env() -> Result<Self, String> {
        let default_radius_meters =
            parse_env("PLACES_DEFAULT_RADIUS_METERS", Self::DEFAULT_RADIUS_METERS)?;
        if default_radius_meters <= 0 {
            return Err("PLACES_DEFAULT_RADIUS_METERS must be positive".to_string());
        }

        let enrich_concurrency =
            parse_env("PLACES_ENRICH_CONCURRENCY", Self::DEFAULT_ENRICH_CONCURRENCY)?.max(1);

        Ok(Self {
            default_radius_meters,
            enrich_concurrency,
        })
    }
}

impl Default for PlacesConfig {
    fn default() -> Self {
        Self {
            default_radius_meters: Self::DEFAULT_RADIUS_METERS,
            enrich_concurrency: Self::DEFAULT_ENRICH_CONCURRENCY,
        }
    }
}

impl TraffyConfig {
    const DEFAULT_TIMEOUT_SECS: u64 = 10;

    pub fn from_env() -> Result<Self, String> {
        let stat_api_url = env::var("TRAFFY_STAT_API_URL").unwrap_or_else(|_| {
            "https://publicapi.traffy.in.th/teamchadchart-stat-api/geojson/v1".to_string()
        });
        let fondue_api_url = env::var("TRAFFY_FONDUE_API_URL").unwrap_or_else(|_| {
            "https://publicapi.traffy.in.th/premium-org-fondue/geojson/v1".to_string()
        });
        let org_key = env::var("TRAFFY_ORG_KEY").unwrap_or_else(|_| "bangkok".to_string());
        let timeout_secs = parse_env("TRAFFY_TIMEOUT_SECS", Self::DEFAULT_TIMEOUT_SECS)?;

        Ok(Self {
            stat_api_url,
            fondue_api_url,
            org_key,
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}

impl LineConfig {
    const DEFAULT_TIMEOUT_SECS: u64 = 10;

    /// Returns `Ok(None)` when LINE Login is not configured
    pub fn from_env() -> Result<Option<Self>, String> {
        let channel_id = env::var("LINE_CHANNEL_ID").ok().filter(|s| !s.is_empty());
        let channel_secret = env::var("LINE_CHANNEL_SECRET").ok().filter(|s| !s.is_empty());
        let callback_url = env::var("LINE_CALLBACK_URL").ok().filter(|s| !s.is_empty());

        let (channel_id, channel_secret, callback_url) =
            match (channel_id, channel_secret, callback_url) {
                (Some(id), Some(secret), Some(url)) => (id, secret, url),
                _ => return Ok(None),
            };

        let timeout_secs = parse_env("LINE_TIMEOUT_SECS", Self::DEFAULT_TIMEOUT_SECS)?;

        Ok(Some(Self {
            channel_id,
            channel_secret,
            callback_url,
            token_url: env::var("LINE_TOKEN_URL")
                .unwrap_or_else(|_| "https://api.line.me/oauth2/v2.1/token".to_string()),
            profile_url: env::var("LINE_PROFILE_URL")
                .unwrap_or_else(|_| "https://api.line.me/v2/profile".to_string()),
            timeout: Duration::from_secs(timeout_secs),
        }))
    }
}

impl MinIOConfig {
    pub fn from_env() -> Result<Self, String> {
        let endpoint =
            env::var("MINIO_ENDPOINT").unwrap_or_else(|_| "http://localhost:9000".to_string());
        let public_endpoint =
            env::var("MINIO_PUBLIC_ENDPOINT").unwrap_or_else(|_| endpoint.clone());

        Ok(Self {
            endpoint,
            public_endpoint,
            access_key: env::var("MINIO_ACCESS_KEY").unwrap_or_else(|_| "minioadmin".to_string()),
            secret_key: env::var("MINIO_SECRET_KEY").unwrap_or_else(|_| "minioadmin".to_string()),
            bucket: env::var("MINIO_BUCKET").unwrap_or_else(|_| "traffy-reviews".to_string()),
            region: env::var("MINIO_REGION").unwrap_or_else(|_| "us-east-1".to_string()),
            public_prefix: env::var("MINIO_PUBLIC_PREFIX").unwrap_or_else(|_| "public".to_string()),
        })
    }
}

impl ImageConfig {
    const DEFAULT_MAX_WIDTH: u32 = 800;
    const DEFAULT_JPEG_QUALITY: u8 = 80;

    pub fn from_env() -> Result<Self, String> {
        let max_width = parse_env("IMAGE_MAX_WIDTH", Self::DEFAULT_MAX_WIDTH)?;
        let jpeg_quality = parse_env("IMAGE_JPEG_QUALITY", Self::DEFAULT_JPEG_QUALITY)?;
        if !(1..=100).contains(&jpeg_quality) {
            return Err("IMAGE_JPEG_QUALITY must be between 1 and 100".to_string());
        }

        Ok(Self {
            max_width: max_width.max(1),
            jpeg_quality,
        })
    }
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            max_width: Self::DEFAULT_MAX_WIDTH,
            jpeg_quality: Self::DEFAULT_JPEG_QUALITY,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_env_uses_default_when_unset() {
        let value: u32 = parse_env("TRAFFY_TEST_SURELY_UNSET_VARIABLE", 42).unwrap();
        assert_eq!(value, 42);
    }

    #[test]
    fn test_is_production() {
        let mut app = AppConfig {
            host: "0.0.0.0".to_string(),
            port: 5000,
            environment: "Production".to_string(),
            cors_allowed_origins: vec!["*".to_string()],
            max_request_body_size: 1024,
        };
        assert!(app.is_production());

        app.environment = "development".to_string();
        assert!(!app.is_production());
        assert_eq!(app.server_address(), "0.0.0.0:5000");
    }
}
