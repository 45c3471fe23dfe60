use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use engine::{
    builtin_kind_catalog, load_kind_catalog, resolve_app_paths, AppPaths, Campaign, CampaignDef,
    CampaignError, CatalogError, KindCatalog, LoadError, LoopConfig, MapId, SimConfig, Simulation,
    StartupError,
};
use thiserror::Error;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use super::hooks::LoggingHooks;
use super::pilot::DemoPilot;

const MAX_TICKS_ENV_VAR: &str = "DUNGEON_MAX_TICKS";
const UNPACED_ENV_VAR: &str = "DUNGEON_UNPACED";
const LIVES_ENV_VAR: &str = "DUNGEON_LIVES";
const GAME_OVER_RESTARTS: u32 = 1;

#[derive(Debug, Error)]
pub(crate) enum BootstrapError {
    #[error(transparent)]
    Startup(#[from] StartupError),
    #[error("failed to load kind catalog: {0}")]
    Catalog(#[from] CatalogError),
    #[error("failed to read campaign '{}': {source}", path.display())]
    ReadCampaign {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse campaign '{}': {message}", path.display())]
    ParseCampaign { path: PathBuf, message: String },
    #[error("invalid campaign '{}': {source}", path.display())]
    InvalidCampaign {
        path: PathBuf,
        #[source]
        source: CampaignError,
    },
    #[error("failed to load the first map: {0}")]
    FirstMap(#[from] LoadError),
}

pub(crate) struct AppWiring {
    pub(crate) config: LoopConfig,
    pub(crate) sim: Simulation,
    pub(crate) pilot: DemoPilot,
    pub(crate) hooks: LoggingHooks,
}

pub(crate) fn build_app() -> Result<AppWiring, BootstrapError> {
    init_tracing();
    info!("=== Dungeon Startup ===");

    let paths = resolve_app_paths()?;
    info!(root = %paths.root.display(), "app_paths_resolved");

    let overrides = EnvOverrides::from_lookup(|var| std::env::var(var).ok());
    let mut config = LoopConfig::default();
    let mut sim_config = SimConfig::default();
    overrides.apply(&mut config, &mut sim_config);

    let catalog = load_catalog(&paths)?;
    let campaign = load_campaign(&paths.campaign_file())?;
    info!(
        kinds = catalog.len(),
        levels = campaign.levels().len(),
        maps = campaign.map_count(),
        starting_lives = sim_config.starting_lives,
        "assets_loaded"
    );

    let mut sim = Simulation::new(catalog, campaign, sim_config);
    sim.load_map(MapId::FIRST)?;

    Ok(AppWiring {
        config,
        sim,
        pilot: DemoPilot::new(),
        hooks: LoggingHooks::new(GAME_OVER_RESTARTS),
    })
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_names(true)
        .compact()
        .init();
}

/// Environment overrides layered over the default configs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct EnvOverrides {
    pub(crate) max_ticks: Option<u64>,
    pub(crate) unpaced: bool,
    pub(crate) lives: Option<u32>,
}

impl EnvOverrides {
    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let lives = parse_override::<u32>(LIVES_ENV_VAR, lookup(LIVES_ENV_VAR).as_deref())
            .filter(|lives| {
                if *lives == 0 {
                    warn!(var = LIVES_ENV_VAR, "invalid_env_override_ignored");
                }
                *lives > 0
            });
        Self {
            max_ticks: parse_override(MAX_TICKS_ENV_VAR, lookup(MAX_TICKS_ENV_VAR).as_deref()),
            unpaced: parse_flag(UNPACED_ENV_VAR, lookup(UNPACED_ENV_VAR).as_deref()),
            lives,
        }
    }

    pub(crate) fn apply(&self, config: &mut LoopConfig, sim_config: &mut SimConfig) {
        if self.max_ticks.is_some() {
            config.max_ticks = self.max_ticks;
        }
        if self.unpaced {
            config.paced = false;
        }
        if let Some(lives) = self.lives {
            sim_config.starting_lives = lives;
        }
    }
}

fn parse_override<T: FromStr>(var: &'static str, raw: Option<&str>) -> Option<T> {
    let value = raw.map(str::trim).filter(|value| !value.is_empty())?;
    match value.parse() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            warn!(var, value, "invalid_env_override_ignored");
            None
        }
    }
}

fn parse_flag(var: &'static str, raw: Option<&str>) -> bool {
    match raw.map(|value| value.trim().to_ascii_lowercase()).as_deref() {
        None | Some("") | Some("0") | Some("false") | Some("no") => false,
        Some("1") | Some("true") | Some("yes") => true,
        Some(value) => {
            warn!(var, value, "invalid_env_override_ignored");
            false
        }
    }
}

/// `kinds.xml` in the assets dir replaces the embedded catalog when present.
fn load_catalog(paths: &AppPaths) -> Result<KindCatalog, BootstrapError> {
    let kinds_file = paths.kinds_file();
    if kinds_file.is_file() {
        info!(path = %kinds_file.display(), "kind_catalog_override");
        return Ok(load_kind_catalog(&kinds_file)?);
    }
    Ok(builtin_kind_catalog()?)
}

pub(crate) fn load_campaign(path: &Path) -> Result<Campaign, BootstrapError> {
    let raw = fs::read_to_string(path).map_err(|source| BootstrapError::ReadCampaign {
        path: path.to_path_buf(),
        source,
    })?;
    let def = parse_campaign_json(&raw).map_err(|message| BootstrapError::ParseCampaign {
        path: path.to_path_buf(),
        message,
    })?;
    Campaign::new(def).map_err(|source| BootstrapError::InvalidCampaign {
        path: path.to_path_buf(),
        source,
    })
}

fn parse_campaign_json(raw: &str) -> Result<CampaignDef, String> {
    let mut deserializer = serde_json::Deserializer::from_str(raw);
    match serde_path_to_error::deserialize::<_, CampaignDef>(&mut deserializer) {
        Ok(def) => Ok(def),
        Err(error) => {
            let path = error.path().to_string();
            let source = error.into_inner();
            if path.is_empty() || path == "." {
                Err(source.to_string())
            } else {
                Err(format!("at {path}: {source}"))
            }
        }
    }
}
