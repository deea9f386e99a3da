use anyhow::{Context, Result, bail};
use cardledger_core::{CardField, TransactionField};
use cardledger_ingest::Layout;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub statement: StatementSection,
    #[serde(default)]
    pub export: ExportSection,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatementSection {
    /// Layout tag ("axis", "hdfc") used when `--bank` is omitted.
    /// Unset means detect from the statement text.
    pub default_bank: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportSection {
    #[serde(default = "default_transaction_fields")]
    pub transaction_fields: Vec<String>,
    #[serde(default)]
    pub card_fields: Vec<String>,
    /// Directory for CSVs written under their default name.
    pub output_dir: Option<PathBuf>,
}

fn default_transaction_fields() -> Vec<String> {
    TransactionField::ALL.iter().map(|f| f.to_string()).collect()
}

impl Default for ExportSection {
    fn default() -> Self {
        Self {
            transaction_fields: default_transaction_fields(),
            card_fields: Vec::new(),
            output_dir: None,
        }
    }
}

impl Config {
    pub fn default_layout(&self) -> Result<Option<Layout>> {
        self.statement
            .default_bank
            .as_deref()
            .map(|tag| tag.parse::<Layout>().context("statement.default_bank"))
            .transpose()
    }

    pub fn transaction_fields(&self) -> Result<Vec<TransactionField>> {
        parse_fields(&self.export.transaction_fields).context("export.transaction_fields")
    }

    pub fn card_fields(&self) -> Result<Vec<CardField>> {
        parse_fields(&self.export.card_fields).context("export.card_fields")
    }
}

pub fn parse_fields<T>(names: &[String]) -> Result<Vec<T>>
where
    T: std::str::FromStr<Err = cardledger_core::StatementError>,
{
    names
        .iter()
        .map(|n| n.parse::<T>().map_err(anyhow::Error::from))
        .collect()
}

/// `$CARDLEDGER_HOME`, else `~/.cardledger`.
fn config_dir_from(override_dir: Option<PathBuf>, home: Option<PathBuf>) -> Result<PathBuf> {
    match (override_dir, home) {
        (Some(dir), _) => Ok(dir),
        (None, Some(home)) => Ok(home.join(".cardledger")),
        (None, None) => bail!("neither CARDLEDGER_HOME nor HOME is set"),
    }
}

pub fn config_path() -> Result<PathBuf> {
    let dir = config_dir_from(
        std::env::var_os("CARDLEDGER_HOME").map(PathBuf::from),
        std::env::var_os("HOME").map(PathBuf::from),
    )?;
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir.join("config.toml"))
}

pub fn load_config() -> Result<Config> {
    load_config_from(&config_path()?)
}

pub fn load_config_from(p: &Path) -> Result<Config> {
    if !p.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(p).with_context(|| format!("read {}", p.display()))?;
    toml::from_str(&s).context("parse config.toml")
}

pub fn save_config(cfg: &Config, p: &Path) -> Result<()> {
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
    save_config(&Config::default(), &p)?;
    println!("Wrote {}", p.display());
    Ok(())
}

pub fn show_config() -> Result<()> {
    let cfg = load_config()?;
    print!("{}", toml::to_string_pretty(&cfg).context("serialize config")?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(cfg, Config::default());
        assert_eq!(cfg.transaction_fields().unwrap(), TransactionField::ALL.to_vec());
        assert!(cfg.card_fields().unwrap().is_empty());
        assert_eq!(cfg.default_layout().unwrap(), None);
    }

    #[test]
    fn test_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("config.toml");
        fs::write(
            &p,
            "[statement]\ndefault_bank = \"hdfc\"\n\n[export]\ncard_fields = [\"BANKNAME\"]\n",
        )
        .unwrap();

        let cfg = load_config_from(&p).unwrap();
        assert_eq!(cfg.default_layout().unwrap(), Some(Layout::Hdfc));
        assert_eq!(cfg.card_fields().unwrap(), vec![CardField::BankName]);
        assert_eq!(cfg.transaction_fields().unwrap().len(), 6);
    }

    #[test]
    fn test_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("config.toml");
        let mut cfg = Config::default();
        cfg.export.output_dir = Some(PathBuf::from("/tmp/statements"));
        save_config(&cfg, &p).unwrap();
        assert_eq!(load_config_from(&p).unwrap(), cfg);
    }

    #[test]
    fn test_config_dir() {
        let dir = config_dir_from(Some("/srv/ledger".into()), Some("/home/u".into())).unwrap();
        assert_eq!(dir, PathBuf::from("/srv/ledger"));
        let dir = config_dir_from(None, Some("/home/u".into())).unwrap();
        assert_eq!(dir, PathBuf::from("/home/u/.cardledger"));
        assert!(config_dir_from(None, None).is_err());
    }

    #[test]
    fn test_unknown_field_rejected() {
        let mut cfg = Config::default();
        cfg.export.transaction_fields = vec!["DATE".into(), "MEMO".into()];
        assert!(cfg.transaction_fields().is_err());
    }
}
