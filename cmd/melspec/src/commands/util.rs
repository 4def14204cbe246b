//! Utility functions for CLI commands.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use clap::Args;
use giztoy_melspec::{pcm, MelConfig};
use serde::Serialize;

use crate::Cli;

/// Per-field configuration overrides.
#[derive(Args, Debug, Default, Clone)]
pub struct ConfigArgs {
    /// Sample rate in Hz
    #[arg(long, global = true)]
    pub sample_rate: Option<f32>,

    /// FFT length in samples (power of two)
    #[arg(long, global = true)]
    pub fft_size: Option<usize>,

    /// Hop between frames in samples
    #[arg(long, global = true)]
    pub hop_length: Option<usize>,

    /// Number of mel bands
    #[arg(long, global = true)]
    pub n_mels: Option<usize>,

    /// Lowest band edge in Hz
    #[arg(long, global = true)]
    pub f_min: Option<f32>,

    /// Highest band edge in Hz
    #[arg(long, global = true)]
    pub f_max: Option<f32>,

    /// Analyse a trailing partial frame with zero padding
    #[arg(long, global = true)]
    pub pad_tail: bool,
}

impl ConfigArgs {
    /// Applies the overrides that were given on the command line.
    pub fn apply(&self, cfg: &mut MelConfig) {
        if let Some(v) = self.sample_rate {
            cfg.sample_rate = v;
        }
        if let Some(v) = self.fft_size {
            cfg.fft_size = v;
        }
        if let Some(v) = self.hop_length {
            cfg.hop_length = v;
        }
        if let Some(v) = self.n_mels {
            cfg.n_mels = v;
        }
        if let Some(v) = self.f_min {
            cfg.f_min = v;
        }
        if let Some(v) = self.f_max {
            cfg.f_max = v;
        }
        if self.pad_tail {
            cfg.pad_tail = true;
        }
    }
}

/// Loads a feature config from a YAML or JSON file.
pub fn load_config_file(path: &str) -> anyhow::Result<MelConfig> {
    let content = std::fs::read_to_string(path)?;
    let ext = Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("yaml");

    let cfg = match ext.to_lowercase().as_str() {
        "json" => serde_json::from_str(&content)?,
        _ => serde_yaml::from_str(&content)?,
    };
    Ok(cfg)
}

/// Resolves the effective configuration: file (or defaults), then flag overrides.
pub fn resolve_config(cli: &Cli) -> anyhow::Result<MelConfig> {
    let mut cfg = match cli.config.as_deref() {
        Some(path) => load_config_file(path)?,
        None => MelConfig::default(),
    };
    cli.overrides.apply(&mut cfg);
    cfg.validate()?;
    tracing::debug!(?cfg, "resolved feature config");
    Ok(cfg)
}

/// Reads a raw PCM16 little-endian file.
pub fn read_pcm(path: &str) -> anyhow::Result<Vec<i16>> {
    let bytes = std::fs::read(path)?;
    if bytes.len() % 2 != 0 {
        tracing::warn!(path, len = bytes.len(), "odd byte count, ignoring trailing byte");
    }
    Ok(pcm::decode_le_bytes(&bytes))
}

/// Writes `value` as YAML or JSON to the output file or stdout.
pub fn write_output<T: Serialize>(cli: &Cli, value: &T) -> anyhow::Result<()> {
    let output = if cli.json {
        serde_json::to_string_pretty(value)?
    } else {
        serde_yaml::to_string(value)?
    };

    match &cli.output {
        Some(path) => {
            let mut file = File::create(path)?;
            file.write_all(output.as_bytes())?;
        }
        None => {
            println!("{}", output);
        }
    }
    Ok(())
}
