//! Application configuration.
//!
//! Values are resolved with priority: config.toml > environment (.env) > default.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::domain::CursorPolicy;
use crate::error::PlannerError;

// ==================== Scheduling Defaults ====================

/// Last page of the printed text used for review ranges
pub const DEFAULT_MAX_PAGE: u32 = 604;

/// New verses assigned per day
pub const DEFAULT_VERSES_PER_DAY: u32 = 3;

/// Days generated by each run of the schedulers
pub const DEFAULT_HORIZON_DAYS: u32 = 7;

/// Review pages per day given to new students
pub const DEFAULT_REVIEW_PAGES_PER_DAY: u32 = 1;

// ==================== Config File ====================

/// Configuration file structure for config.toml
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    database: Option<DatabaseSection>,
    catalog: Option<CatalogSection>,
    schedule: Option<ScheduleSection>,
}

#[derive(Debug, Deserialize)]
struct DatabaseSection {
    path: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CatalogSection {
    path: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ScheduleSection {
    max_page: Option<u32>,
    verses_per_day: Option<u32>,
    horizon_days: Option<u32>,
    review_pages_per_day: Option<u32>,
    cursor_policy: Option<CursorPolicy>,
}

/// Scheduling parameters shared by the schedulers and services
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannerConfig {
    pub max_page: u32,
    pub verses_per_day: u32,
    pub horizon_days: u32,
    pub review_pages_per_day: u32,
    pub cursor_policy: CursorPolicy,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            max_page: DEFAULT_MAX_PAGE,
            verses_per_day: DEFAULT_VERSES_PER_DAY,
            horizon_days: DEFAULT_HORIZON_DAYS,
            review_pages_per_day: DEFAULT_REVIEW_PAGES_PER_DAY,
            cursor_policy: CursorPolicy::default(),
        }
    }
}

impl PlannerConfig {
    /// Load scheduling parameters from config.toml and the environment
    pub fn load() -> Result<Self, PlannerError> {
        let _ = dotenvy::dotenv();
        let file = read_config_file(Path::new("config.toml"));
        Self::resolve(file.schedule.unwrap_or_default(), |key| std::env::var(key).ok())
    }

    fn resolve(
        section: ScheduleSection,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, PlannerError> {
        let defaults = Self::default();
        let env_u32 = |key: &str| env(key).and_then(|v| v.trim().parse::<u32>().ok());

        let cursor_policy = section
            .cursor_policy
            .or_else(|| env("HIFZ_CURSOR_POLICY").and_then(|v| CursorPolicy::from_str(v.trim())))
            .unwrap_or(defaults.cursor_policy);

        Ok(Self {
            max_page: count(
                ("max_page", section.max_page),
                ("HIFZ_MAX_PAGE", || env_u32("HIFZ_MAX_PAGE")),
                defaults.max_page,
            )?,
            verses_per_day: count(
                ("verses_per_day", section.verses_per_day),
                ("HIFZ_VERSES_PER_DAY", || env_u32("HIFZ_VERSES_PER_DAY")),
                defaults.verses_per_day,
            )?,
            horizon_days: count(
                ("horizon_days", section.horizon_days),
                ("HIFZ_HORIZON_DAYS", || env_u32("HIFZ_HORIZON_DAYS")),
                defaults.horizon_days,
            )?,
            review_pages_per_day: count(
                ("review_pages_per_day", section.review_pages_per_day),
                ("HIFZ_REVIEW_PAGES_PER_DAY", || env_u32("HIFZ_REVIEW_PAGES_PER_DAY")),
                defaults.review_pages_per_day,
            )?,
            cursor_policy,
        })
    }
}

/// Resolve a count from the file, then the environment, then the default.
/// Whichever source supplies the value, it must be at least 1.
fn count<F: FnOnce() -> Option<u32>>(
    file: (&str, Option<u32>),
    env: (&str, F),
    default: u32,
) -> Result<u32, PlannerError> {
    let (key, value) = match file.1 {
        Some(value) => (file.0, value),
        None => match (env.1)() {
            Some(value) => (env.0, value),
            None => return Ok(default),
        },
    };
    if value == 0 {
        return Err(PlannerError::Config(format!("{} must be at least 1", key)));
    }
    Ok(value)
}

fn read_config_file(path: &Path) -> ConfigFile {
    let Ok(contents) = std::fs::read_to_string(path) else {
        return ConfigFile::default();
    };
    match toml::from_str::<ConfigFile>(&contents) {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!("Ignoring invalid {}: {}", path.display(), e);
            ConfigFile::default()
        }
    }
}

// ==================== Paths ====================

/// Load database path with priority: config.toml > .env > default
pub fn load_database_path() -> PathBuf {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    // Priority 1: config.toml
    if let Some(path) = read_config_file(Path::new("config.toml"))
        .database
        .and_then(|db| db.path)
    {
        tracing::info!("Using database from config.toml: {}", path);
        return PathBuf::from(path);
    }

    // Priority 2: .env DATABASE_PATH
    if let Ok(path) = std::env::var("DATABASE_PATH") {
        tracing::info!("Using database from DATABASE_PATH env: {}", path);
        return PathBuf::from(path);
    }

    // Default
    let default = PathBuf::from("data/hifz.db");
    tracing::info!("Using default database path: {}", default.display());
    default
}

/// Catalog document seeded into an empty database at startup, if configured
pub fn load_catalog_path() -> Option<PathBuf> {
    let _ = dotenvy::dotenv();

    read_config_file(Path::new("config.toml"))
        .catalog
        .and_then(|c| c.path)
        .or_else(|| std::env::var("CATALOG_PATH").ok())
        .map(PathBuf::from)
}
