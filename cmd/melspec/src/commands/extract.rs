//! Spectrogram extraction command.

use clap::Args;
use giztoy_melspec::{tensor, MelConfig, SpectrogramEngine};
use serde::Serialize;

use super::util::{read_pcm, resolve_config, write_output};
use crate::Cli;

/// Compute the log-mel spectrogram of a raw PCM16 file.
#[derive(Args)]
pub struct ExtractCommand {
    /// Input PCM file (mono, signed 16-bit little-endian)
    #[arg(short = 'i', long)]
    pub input: String,

    /// Maximum number of frames to compute
    #[arg(long, default_value_t = 64)]
    pub max_frames: usize,

    /// Keep log-mel values in dB instead of normalizing to [0, 1]
    #[arg(long)]
    pub no_normalize: bool,

    /// Also write a fixed-size f32 LE input tensor of this many values
    #[arg(long, requires = "tensor_out")]
    pub tensor_size: Option<usize>,

    /// Path for the packed input tensor
    #[arg(long, requires = "tensor_size")]
    pub tensor_out: Option<String>,
}

/// Extraction result.
#[derive(Serialize)]
struct ExtractReport {
    config: MelConfig,
    samples: usize,
    n_mels: usize,
    n_frames: usize,
    normalized: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    min: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max: Option<f32>,
    /// `[n_mels][n_frames]`
    spectrogram: Vec<Vec<f32>>,
}

impl ExtractCommand {
    pub fn run(&self, cli: &Cli) -> anyhow::Result<()> {
        let cfg = resolve_config(cli)?;
        let pcm = read_pcm(&self.input)?;
        tracing::debug!(input = %self.input, samples = pcm.len(), "loaded pcm");

        let mut engine = SpectrogramEngine::with_config(cfg.clone())?;
        let mut spec = engine.compute(&pcm, self.max_frames)?;
        if spec.n_frames() == 0 {
            tracing::warn!(
                samples = pcm.len(),
                fft_size = cfg.fft_size,
                "input shorter than one frame, spectrogram is empty"
            );
        }

        let range = spec.min_max();
        let normalized = !self.no_normalize;
        if normalized {
            spec.normalize();
        }

        if let (Some(size), Some(path)) = (self.tensor_size, self.tensor_out.as_deref()) {
            let mut input = vec![0.0f32; size];
            let copied = tensor::fill_input_tensor(spec.as_slice(), &mut input);
            if copied < spec.as_slice().len() {
                tracing::warn!(copied, total = spec.as_slice().len(), "tensor smaller than spectrogram, truncated");
            }
            let bytes: Vec<u8> = input.iter().flat_map(|v| v.to_le_bytes()).collect();
            std::fs::write(path, bytes)?;
            tracing::debug!(path, size, copied, "wrote input tensor");
        }

        let report = ExtractReport {
            samples: pcm.len(),
            n_mels: spec.n_mels(),
            n_frames: spec.n_frames(),
            normalized,
            min: range.map(|r| r.0),
            max: range.map(|r| r.1),
            spectrogram: spec.rows().map(<[f32]>::to_vec).collect(),
            config: cfg,
        };
        write_output(cli, &report)
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use serde_json::Value;

    use crate::{Cli, Commands};

    fn run_extract(args: &[&str]) -> anyhow::Result<()> {
        let cli = Cli::try_parse_from(std::iter::once("melspec").chain(args.iter().copied()))?;
        match &cli.command {
            Commands::Extract(cmd) => cmd.run(&cli),
            _ => unreachable!("not an extract command"),
        }
    }

    fn write_pcm(path: &std::path::Path, samples: &[i16]) {
        let bytes: Vec<u8> = samples.iter().flat_map(|s| s.to_le_bytes()).collect();
        std::fs::write(path, bytes).unwrap();
    }

    fn read_report(path: &std::path::Path) -> Value {
        serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
    }

    #[test]
    fn extract_writes_report_and_tensor() {
        let dir = tempfile::tempdir().unwrap();
        let pcm_path = dir.path().join("block.pcm");
        let out_path = dir.path().join("report.json");
        let tensor_path = dir.path().join("input.f32");

        let samples: Vec<i16> = (0..4096)
            .map(|i| {
                let t = i as f32 / 16000.0;
                (12000.0 * (2.0 * std::f32::consts::PI * (300.0 + 1200.0 * t) * t).sin()) as i16
            })
            .collect();
        write_pcm(&pcm_path, &samples);

        run_extract(&[
            "extract",
            "-i",
            pcm_path.to_str().unwrap(),
            "--json",
            "-o",
            out_path.to_str().unwrap(),
            "--tensor-size",
            "5000",
            "--tensor-out",
            tensor_path.to_str().unwrap(),
        ])
        .unwrap();

        let report = read_report(&out_path);
        assert_eq!(report["samples"], 4096);
        assert_eq!(report["n_mels"], 64);
        assert_eq!(report["n_frames"], 15);
        assert_eq!(report["normalized"], true);
        assert_eq!(report["config"]["fft_size"], 512);

        let rows = report["spectrogram"].as_array().unwrap();
        assert_eq!(rows.len(), 64);
        let flat: Vec<f32> = rows
            .iter()
            .flat_map(|r| r.as_array().unwrap().iter().map(|v| v.as_f64().unwrap() as f32))
            .collect();
        assert_eq!(flat.len(), 64 * 15);
        assert!(flat.iter().all(|v| (0.0..=1.0).contains(v)));

        // f32 little-endian, spectrogram first, zero-filled after.
        let bytes = std::fs::read(&tensor_path).unwrap();
        assert_eq!(bytes.len(), 5000 * 4);
        let tensor: Vec<f32> = bytes
            .chunks_exact(4)
            .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
            .collect();
        assert_eq!(&tensor[..flat.len()], &flat[..]);
        assert!(tensor[flat.len()..].iter().all(|&v| v == 0.0));
    }

    #[test]
    fn extract_short_input_keeps_band_rows() {
        let dir = tempfile::tempdir().unwrap();
        let pcm_path = dir.path().join("short.pcm");
        let out_path = dir.path().join("report.json");
        write_pcm(&pcm_path, &[100i16; 100]);

        run_extract(&[
            "extract",
            "-i",
            pcm_path.to_str().unwrap(),
            "--json",
            "-o",
            out_path.to_str().unwrap(),
            "--n-mels",
            "32",
        ])
        .unwrap();

        let report = read_report(&out_path);
        assert_eq!(report["n_frames"], 0);
        assert_eq!(report["n_mels"], 32);
        let rows = report["spectrogram"].as_array().unwrap();
        assert_eq!(rows.len(), 32);
        assert!(rows.iter().all(|r| r.as_array().unwrap().is_empty()));
        assert!(report.get("min").is_none());
    }

    #[test]
    fn extract_tensor_flags_go_together() {
        assert!(run_extract(&["extract", "-i", "x.pcm", "--tensor-size", "10"]).is_err());
    }
}
