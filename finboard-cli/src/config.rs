use anyhow::{Context, Result};
use finboard_finance::{CategoryRules, PipelineConfig, PnlRules, default_balance_accounts};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::state::ensure_finboard_home;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub balances: BalancesSection,
    #[serde(default)]
    pub pnl: PnlRules,
    #[serde(default)]
    pub categorize: CategoryRules,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalancesSection {
    /// Accounts whose ending balance is shown in the KPIs
    #[serde(default = "default_balance_accounts")]
    pub accounts: Vec<String>,
}

impl Default for BalancesSection {
    fn default() -> Self {
        Self {
            accounts: default_balance_accounts(),
        }
    }
}

impl Config {
    pub fn pipeline(&self) -> PipelineConfig {
        PipelineConfig {
            categorize: self.categorize.clone(),
            pnl: self.pnl.clone(),
            balance_accounts: self.balances.accounts.clone(),
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    Ok(ensure_finboard_home()?.join("config.toml"))
}

pub fn load_config() -> Result<Config> {
    load_config_from(&config_path()?)
}

pub fn load_config_from(p: &Path) -> Result<Config> {
    if !p.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(p).with_context(|| format!("read {}", p.display()))?;
    toml::from_str(&s).with_context(|| format!("parse {}", p.display()))
}

pub fn save_config_to(p: &Path, cfg: &Config) -> Result<()> {
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(p, s).with_context(|| format!("write {}", p.display()))?;
    Ok(())
}

pub fn init_config() -> Result<()> {
    let p = config_path()?;
    if p.exists() {
        println!("Config already exists: {}", p.display());
        return Ok(());
    }
    save_config_to(&p, &Config::default())?;
    println!("Wrote {}", p.display());
    Ok(())
}

pub fn show_config() -> Result<()> {
    let p = config_path()?;
    let cfg = load_config_from(&p)?;
    let source = if p.exists() { "file" } else { "defaults" };
    println!("# {} ({source})", p.display());
    print!("{}", toml::to_string_pretty(&cfg).context("serialize config")?);
    Ok(())
}
