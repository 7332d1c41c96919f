//! Evaluation and game settings.
//!
//! Defaults are embedded from `resources/defaults.toml` and parsed once.
//! A user TOML file may replace any subset of them; missing keys fall back
//! to the built-in values.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use serde::Deserialize;
use thiserror::Error;

const DEFAULT_SETTINGS_TOML: &str = include_str!("../resources/defaults.toml");

static DEFAULT_SETTINGS: OnceLock<Settings> = OnceLock::new();

/// Errors raised while loading settings.
#[derive(Debug, Error)]
pub enum Error {
    /// The settings file is not valid TOML or has mistyped keys.
    #[error("failed to parse settings: {0}")]
    Parse(#[from] toml::de::Error),

    /// The settings file could not be read.
    #[error("failed to read settings file '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub grid: GridSettings,
    pub dissolution: DissolutionSettings,
    pub particle: ParticleSettings,
    pub diffusion: DiffusionSettings,
    pub game: GameSettings,
}

/// Sampling resolution for curves.
#[derive(Debug, Clone, Deserialize)]
pub struct GridSettings {
    #[serde(default = "default_points")]
    pub points: usize,
    /// Resolution for curves with sharp features (PK route comparison).
    #[serde(default = "default_dense_points")]
    pub dense_points: usize,
    #[serde(default = "default_ph_min")]
    pub ph_min: f64,
    #[serde(default = "default_ph_max")]
    pub ph_max: f64,
}

fn default_points() -> usize {
    100
}
fn default_dense_points() -> usize {
    200
}
fn default_ph_min() -> f64 {
    0.0
}
fn default_ph_max() -> f64 {
    14.0
}

impl Default for GridSettings {
    fn default() -> Self {
        Self {
            points: default_points(),
            dense_points: default_dense_points(),
            ph_min: default_ph_min(),
            ph_max: default_ph_max(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DissolutionSettings {
    #[serde(default = "default_duration_h")]
    pub duration_h: f64,
    #[serde(default = "default_table_step_h")]
    pub table_step_h: f64,
}

fn default_duration_h() -> f64 {
    24.0
}
fn default_table_step_h() -> f64 {
    2.0
}

impl Default for DissolutionSettings {
    fn default() -> Self {
        Self {
            duration_h: default_duration_h(),
            table_step_h: default_table_step_h(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ParticleSettings {
    #[serde(default = "default_samples")]
    pub samples: usize,
    #[serde(default = "default_histogram_bins")]
    pub histogram_bins: usize,
    #[serde(default = "default_duration_min")]
    pub duration_min: f64,
    #[serde(default = "default_particle_seed")]
    pub seed: u64,
}

fn default_samples() -> usize {
    1000
}
fn default_histogram_bins() -> usize {
    30
}
fn default_duration_min() -> f64 {
    60.0
}
fn default_particle_seed() -> u64 {
    7
}

impl Default for ParticleSettings {
    fn default() -> Self {
        Self {
            samples: default_samples(),
            histogram_bins: default_histogram_bins(),
            duration_min: default_duration_min(),
            seed: default_particle_seed(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DiffusionSettings {
    #[serde(default = "default_nodes")]
    pub nodes: usize,
    #[serde(default = "default_dx")]
    pub dx: f64,
    #[serde(default = "default_dt")]
    pub dt: f64,
}

fn default_nodes() -> usize {
    100
}
fn default_dx() -> f64 {
    1.0
}
fn default_dt() -> f64 {
    0.1
}

impl Default for DiffusionSettings {
    fn default() -> Self {
        Self {
            nodes: default_nodes(),
            dx: default_dx(),
            dt: default_dt(),
        }
    }
}

/// A functional group offered by the design game.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Substituent {
    /// Display name, e.g. `Methyl (-CH3)`.
    pub name: String,
    /// Short command-line key, e.g. `methyl`.
    pub key: String,
    /// Fragment SMILES with a `*` attachment point.
    pub smiles: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GameSettings {
    #[serde(default = "default_time_limit_s")]
    pub time_limit_s: u64,
    #[serde(default = "default_start_smiles")]
    pub start_smiles: String,
    #[serde(default = "default_render_cache_capacity")]
    pub render_cache_capacity: usize,
    #[serde(default = "default_embed_seed")]
    pub embed_seed: u64,
    #[serde(default = "default_embed_iterations")]
    pub embed_iterations: usize,
    #[serde(default = "default_substituents")]
    pub substituents: Vec<Substituent>,
}

fn default_time_limit_s() -> u64 {
    60
}
fn default_start_smiles() -> String {
    "CC".to_string()
}
fn default_render_cache_capacity() -> usize {
    64
}
fn default_embed_seed() -> u64 {
    42
}
fn default_embed_iterations() -> usize {
    300
}
fn default_substituents() -> Vec<Substituent> {
    [
        ("Methyl (-CH3)", "methyl", "[*:1]C"),
        ("Hydroxyl (-OH)", "hydroxyl", "[*:1]O"),
        ("Amine (-NH2)", "amine", "[*:1]N"),
        ("Carboxyl (-COOH)", "carboxyl", "[*:1]C(=O)O"),
        ("Benzene Ring", "phenyl", "[*:1]c1ccccc1"),
    ]
    .into_iter()
    .map(|(name, key, smiles)| Substituent {
        name: name.to_string(),
        key: key.to_string(),
        smiles: smiles.to_string(),
    })
    .collect()
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            time_limit_s: default_time_limit_s(),
            start_smiles: default_start_smiles(),
            render_cache_capacity: default_render_cache_capacity(),
            embed_seed: default_embed_seed(),
            embed_iterations: default_embed_iterations(),
            substituents: default_substituents(),
        }
    }
}

impl GameSettings {
    /// Finds a substituent by key or display name, ignoring case.
    pub fn substituent(&self, name: &str) -> Option<&Substituent> {
        self.substituents
            .iter()
            .find(|s| s.key.eq_ignore_ascii_case(name) || s.name.eq_ignore_ascii_case(name))
    }
}

/// Parses settings from TOML, or returns the built-in defaults for `None`.
pub fn load_settings(custom_toml: Option<&str>) -> Result<Settings, Error> {
    match custom_toml {
        Some(toml) => Ok(toml::from_str(toml)?),
        None => Ok(default_settings().clone()),
    }
}

/// Reads and parses a settings file.
pub fn load_settings_file(path: &Path) -> Result<Settings, Error> {
    let text = std::fs::read_to_string(path).map_err(|source| Error::Read {
        path: path.to_path_buf(),
        source,
    })?;
    load_settings(Some(&text))
}

pub fn default_settings() -> &'static Settings {
    DEFAULT_SETTINGS.get_or_init(|| {
        toml::from_str(DEFAULT_SETTINGS_TOML)
            .expect("Failed to parse embedded default settings. This is a library bug.")
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_defaults_match_fallbacks() {
        let embedded = default_settings();
        let fallback = Settings::default();
        assert_eq!(embedded.grid.points, fallback.grid.points);
        assert_eq!(embedded.game.time_limit_s, 60);
        assert_eq!(embedded.game.substituents, fallback.game.substituents);
        assert_eq!(embedded.particle.seed, fallback.particle.seed);
    }

    #[test]
    fn partial_override_keeps_defaults() {
        let s = load_settings(Some("[game]\ntime_limit_s = 90\n")).unwrap();
        assert_eq!(s.game.time_limit_s, 90);
        assert_eq!(s.game.start_smiles, "CC");
        assert_eq!(s.game.substituents.len(), 5);
        assert_eq!(s.grid.points, 100);
    }

    #[test]
    fn mistyped_value_is_rejected() {
        let err = load_settings(Some("[grid]\npoints = \"many\"\n")).unwrap_err();
        assert!(matches!(err, Error::Parse(_)));
    }

    #[test]
    fn substituent_lookup() {
        let game = GameSettings::default();
        assert_eq!(game.substituent("PHENYL").unwrap().smiles, "[*:1]c1ccccc1");
        assert_eq!(game.substituent("Amine (-NH2)").unwrap().key, "amine");
        assert!(game.substituent("nitro").is_none());
    }

    #[test]
    fn missing_file_reports_path() {
        let err = load_settings_file(Path::new("/nonexistent/pharmsim.toml")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/pharmsim.toml"));
    }
}
