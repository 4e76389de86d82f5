use crate::feasibility::{
    ClimateUnknownPolicy, FeasibilityConfig, FloodUnknownPolicy, Profile, RiskCategory, SiteClass,
    TemperatureStrategy,
};
use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub feasibility: FeasibilityConfig,
    pub sources: SourcesConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
        let ansi = parse_var("APP_LOG_ANSI", false)?;

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level, ansi },
            feasibility: load_feasibility()?,
            sources: load_sources()?,
        })
    }
}

fn load_feasibility() -> Result<FeasibilityConfig, ConfigError> {
    let defaults = FeasibilityConfig::default();

    let temperature = match env::var("FEASIBILITY_TEMPERATURE_STRATEGY") {
        Err(_) => defaults.temperature.clone(),
        Ok(raw) => match raw.trim().to_ascii_lowercase().as_str() {
            "heat_box" | "heat_zone_box" => TemperatureStrategy::heat_zone_box(),
            "climate_range" => TemperatureStrategy::climate_range(),
            _ => return Err(ConfigError::invalid("FEASIBILITY_TEMPERATURE_STRATEGY", raw)),
        },
    };

    let temperature = match temperature {
        TemperatureStrategy::ClimateRange {
            band,
            reference_year,
            unknown,
        } => {
            let unknown = match env::var("FEASIBILITY_CLIMATE_UNKNOWN") {
                Err(_) => unknown,
                Ok(raw) => match raw.trim().to_ascii_lowercase().as_str() {
                    "assume_pass" => ClimateUnknownPolicy::AssumePass,
                    "assume_fail" => ClimateUnknownPolicy::AssumeFail,
                    _ => return Err(ConfigError::invalid("FEASIBILITY_CLIMATE_UNKNOWN", raw)),
                },
            };
            TemperatureStrategy::ClimateRange {
                band,
                reference_year,
                unknown,
            }
        }
        strategy => strategy,
    };

    let flood_unknown = match env::var("FEASIBILITY_FLOOD_UNKNOWN") {
        Err(_) => defaults.flood_unknown,
        Ok(raw) => match raw.trim().to_ascii_lowercase().as_str() {
            "assume_clear" => FloodUnknownPolicy::AssumeClear,
            "assume_flooded" => FloodUnknownPolicy::AssumeFlooded,
            _ => return Err(ConfigError::invalid("FEASIBILITY_FLOOD_UNKNOWN", raw)),
        },
    };

    let zoning_keywords = match env::var("FEASIBILITY_ZONING_KEYWORDS") {
        Err(_) => defaults.zoning_keywords.clone(),
        Ok(raw) => raw
            .split(',')
            .map(|keyword| keyword.trim().to_string())
            .filter(|keyword| !keyword.is_empty())
            .collect(),
    };

    Ok(FeasibilityConfig {
        profile: parse_var::<Profile>("FEASIBILITY_PROFILE", defaults.profile)?,
        max_elevation_m: parse_non_negative(
            "FEASIBILITY_MAX_ELEVATION_M",
            defaults.max_elevation_m,
        )?,
        fallback_elevation_m: parse_finite(
            "FEASIBILITY_FALLBACK_ELEVATION_M",
            defaults.fallback_elevation_m,
        )?,
        temperature,
        flood_unknown,
        seismic_ss_threshold: parse_non_negative(
            "FEASIBILITY_SEISMIC_SS_THRESHOLD",
            defaults.seismic_ss_threshold,
        )?,
        seismic_risk_category: parse_var::<RiskCategory>(
            "FEASIBILITY_SEISMIC_RISK_CATEGORY",
            defaults.seismic_risk_category,
        )?,
        seismic_site_class: parse_var::<SiteClass>(
            "FEASIBILITY_SEISMIC_SITE_CLASS",
            defaults.seismic_site_class,
        )?,
        road_radius_km: parse_non_negative(
            "FEASIBILITY_ROAD_RADIUS_KM",
            defaults.road_radius_km,
        )?,
        population_density_threshold: parse_non_negative(
            "FEASIBILITY_POPULATION_THRESHOLD",
            defaults.population_density_threshold,
        )?,
        population_stub: defaults.population_stub,
        zoning_keywords,
    })
}

fn load_sources() -> Result<SourcesConfig, ConfigError> {
    let defaults = SourcesConfig::default();
    let timeout_secs = parse_var("SOURCE_TIMEOUT_SECS", defaults.timeout.as_secs())?;

    Ok(SourcesConfig {
        timeout: Duration::from_secs(timeout_secs),
        user_agent: env::var("SOURCE_USER_AGENT").unwrap_or(defaults.user_agent),
        geocoder_url: env::var("GEOCODER_URL").unwrap_or(defaults.geocoder_url),
        elevation_url: env::var("ELEVATION_URL").unwrap_or(defaults.elevation_url),
        flood_url: env::var("FLOOD_URL").unwrap_or(defaults.flood_url),
        seismic_url: env::var("SEISMIC_URL").unwrap_or(defaults.seismic_url),
        overpass_url: env::var("OVERPASS_URL").unwrap_or(defaults.overpass_url),
        climate_url: env::var("CLIMATE_URL").unwrap_or(defaults.climate_url),
    })
}

fn parse_var<T: FromStr>(key: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(key) {
        Err(_) => Ok(default),
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|_| ConfigError::invalid(key, raw)),
    }
}

/// Thresholds compared with `<`/`>` must be real numbers; NaN fails every comparison.
fn parse_finite(key: &'static str, default: f64) -> Result<f64, ConfigError> {
    let value = parse_var(key, default)?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ConfigError::invalid(key, value.to_string()))
    }
}

fn parse_non_negative(key: &'static str, default: f64) -> Result<f64, ConfigError> {
    let value = parse_finite(key, default)?;
    if value >= 0.0 {
        Ok(value)
    } else {
        Err(ConfigError::invalid(key, value.to_string()))
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing and metrics controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
    pub ansi: bool,
}

/// Endpoints and client settings for the external hazard services.
#[derive(Debug, Clone, PartialEq)]
pub struct SourcesConfig {
    pub timeout: Duration,
    pub user_agent: String,
    pub geocoder_url: String,
    pub elevation_url: String,
    pub flood_url: String,
    pub seismic_url: String,
    pub overpass_url: String,
    pub climate_url: String,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            user_agent: "ev-siting/0.1".to_string(),
            geocoder_url: "https://nominatim.openstreetmap.org".to_string(),
            elevation_url: "https://api.open-elevation.com".to_string(),
            flood_url: "https://hazards.fema.gov/gis/nfhl/rest/services/public/NFHL/MapServer/0"
                .to_string(),
            seismic_url: "https://earthquake.usgs.gov/ws/designmaps/asce7-16.json".to_string(),
            overpass_url: "https://overpass-api.de/api/interpreter".to_string(),
            climate_url: "https://archive-api.open-meteo.com/v1/archive".to_string(),
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidValue { key: &'static str, value: String },
}

impl ConfigError {
    fn invalid(key: &'static str, value: String) -> Self {
        ConfigError::InvalidValue { key, value }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidValue { key, value } => {
                write!(f, "{key} has an unsupported value '{value}'")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort | ConfigError::InvalidValue { .. } => None,
            ConfigError::InvalidHost { source } => Some(source),
        }
    }
}
