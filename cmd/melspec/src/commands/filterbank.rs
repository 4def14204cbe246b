//! Filterbank dump command.

use clap::Args;
use giztoy_melspec::filterbank::band_edges;
use giztoy_melspec::{MelConfig, SpectrogramEngine};
use serde::Serialize;

use super::util::{resolve_config, write_output};
use crate::Cli;

/// Dump band edges and weights of the mel filterbank.
#[derive(Args)]
pub struct FilterbankCommand {
    /// Include every weight of each band's support
    #[arg(long)]
    pub weights: bool,
}

#[derive(Serialize)]
struct FilterbankReport {
    config: MelConfig,
    bins: usize,
    bands: Vec<Band>,
}

#[derive(Serialize)]
struct Band {
    index: usize,
    left: usize,
    center: usize,
    right: usize,
    /// Non-zero `[start, end)` bin range; absent for an empty band.
    #[serde(skip_serializing_if = "Option::is_none")]
    support: Option<(usize, usize)>,
    sum: f32,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    weights: Vec<f32>,
}

impl FilterbankCommand {
    pub fn run(&self, cli: &Cli) -> anyhow::Result<()> {
        let cfg = resolve_config(cli)?;
        let engine = SpectrogramEngine::with_config(cfg.clone())?;
        let fb = engine.filterbank();

        let edges = band_edges(cfg.n_mels, cfg.fft_size, cfg.sample_rate, cfg.f_min, cfg.f_max);
        let bands: Vec<Band> = edges
            .enumerate()
            .map(|(m, e)| {
                let row = fb.row(m);
                let support = fb.support(m);
                let weights = match (self.weights, support) {
                    (true, Some((start, end))) => row[start..end].to_vec(),
                    _ => Vec::new(),
                };
                Band {
                    index: m,
                    left: e.left,
                    center: e.center,
                    right: e.right,
                    support,
                    sum: row.iter().sum(),
                    weights,
                }
            })
            .collect();

        let empty = bands.iter().filter(|b| b.support.is_none()).count();
        if empty > 0 {
            tracing::warn!(empty, "filterbank has empty bands, consider fewer mels or a larger fft");
        }

        let report = FilterbankReport { bins: fb.bins(), bands, config: cfg };
        write_output(cli, &report)
    }
}
