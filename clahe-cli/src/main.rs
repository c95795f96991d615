use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use clahe_core::{enhance, metrics, ClaheError, Metrics, RgbImage};
use serde::Serialize;

/// Apply Contrast Limited Adaptive Histogram Equalization to an image.
#[derive(Parser)]
#[command(name = "clahe-cli", about = "Apply CLAHE to an image in LAB space")]
struct Cli {
  /// Input image path (JPEG or PNG)
  input_path: PathBuf,
  /// Output image path (written as PNG)
  output_path: PathBuf,
  /// Clip limit, in [1.0, 40.0]
  clip_limit: f64,
  /// Tile grid size, in [2, 16]
  tile_grid_size: u32,
}

#[derive(Serialize)]
struct MetricsReport {
  brightness: f64,
  contrast: f64,
}

impl From<Metrics> for MetricsReport {
  fn from(m: Metrics) -> Self {
    Self {
      brightness: m.brightness,
      contrast: m.contrast,
    }
  }
}

#[derive(Serialize)]
struct Parameters {
  clip_limit: f64,
  tile_grid_size: u32,
}

#[derive(Serialize)]
#[serde(untagged)]
enum Report {
  Success {
    success: bool,
    output_path: String,
    original_metrics: MetricsReport,
    processed_metrics: MetricsReport,
    parameters: Parameters,
  },
  Failure {
    success: bool,
    error: String,
  },
}

fn run(cli: &Cli) -> Result<Report, String> {
  let dynamic = image::open(&cli.input_path).map_err(|e| format!("failed to decode input: {e}"))?;
  let rgb = dynamic.to_rgb8();
  let (width, height) = (rgb.width(), rgb.height());
  let input = RgbImage::from_raw(width, height, rgb.into_raw()).map_err(describe)?;

  let original_metrics = metrics(&input);
  let output = enhance(&input, cli.clip_limit, cli.tile_grid_size).map_err(describe)?;
  let processed_metrics = metrics(&output);

  let out_image = image::RgbImage::from_raw(width, height, output.to_raw())
    .ok_or_else(|| "internal error: output buffer size mismatch".to_string())?;
  out_image
    .save(&cli.output_path)
    .map_err(|e| format!("failed to encode output: {e}"))?;

  Ok(Report::Success {
    success: true,
    output_path: cli.output_path.display().to_string(),
    original_metrics: original_metrics.into(),
    processed_metrics: processed_metrics.into(),
    parameters: Parameters {
      clip_limit: cli.clip_limit,
      tile_grid_size: cli.tile_grid_size,
    },
  })
}

fn describe(err: ClaheError) -> String {
  err.to_string()
}

fn main() -> ExitCode {
  let report = match Cli::try_parse() {
    Ok(cli) => run(&cli).unwrap_or_else(|error| Report::Failure { success: false, error }),
    Err(e) => Report::Failure {
      success: false,
      error: e.to_string(),
    },
  };

  let is_success = matches!(report, Report::Success { .. });
  match serde_json::to_string(&report) {
    Ok(json) => println!("{json}"),
    Err(e) => {
      eprintln!("failed to serialize report: {e}");
      return ExitCode::FAILURE;
    }
  }

  if is_success {
    ExitCode::SUCCESS
  } else {
    ExitCode::FAILURE
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("clahe-cli-test-{}-{}", std::process::id(), name))
  }

  #[test]
  fn try_parse_rejects_wrong_argument_count() {
    let err = Cli::try_parse_from(["clahe-cli", "in.png", "out.png", "2.0"]).unwrap_err();
    // clap's own usage error, surfaced by main() as Report::Failure rather than a process exit.
    assert!(!err.to_string().is_empty());
  }

  #[test]
  fn try_parse_rejects_non_numeric_clip_limit() {
    let err = Cli::try_parse_from(["clahe-cli", "in.png", "out.png", "not-a-number", "8"]).unwrap_err();
    assert!(!err.to_string().is_empty());
  }

  #[test]
  fn try_parse_accepts_well_formed_invocation() {
    let cli = Cli::try_parse_from(["clahe-cli", "in.png", "out.png", "2.0", "8"]).unwrap();
    assert_eq!(cli.clip_limit, 2.0);
    assert_eq!(cli.tile_grid_size, 8);
  }

  #[test]
  fn run_reports_invalid_parameter_as_failure() {
    let input_path = temp_path("invalid-param-in.png");
    let output_path = temp_path("invalid-param-out.png");
    image::RgbImage::new(16, 16).save(&input_path).unwrap();

    let cli = Cli {
      input_path: input_path.clone(),
      output_path,
      clip_limit: 0.5, // below the [1.0, 40.0] contract
      tile_grid_size: 8,
    };
    let err = run(&cli).unwrap_err();
    assert!(err.contains("invalid parameter"), "{err}");

    let _ = std::fs::remove_file(&input_path);
  }

  #[test]
  fn run_reports_missing_input_as_failure() {
    let cli = Cli {
      input_path: temp_path("does-not-exist.png"),
      output_path: temp_path("does-not-exist-out.png"),
      clip_limit: 2.0,
      tile_grid_size: 8,
    };
    let err = run(&cli).unwrap_err();
    assert!(err.contains("failed to decode input"), "{err}");
  }

  #[test]
  fn run_succeeds_end_to_end_and_writes_output() {
    let input_path = temp_path("ok-in.png");
    let output_path = temp_path("ok-out.png");
    let mut img = image::RgbImage::new(16, 16);
    for (x, _y, px) in img.enumerate_pixels_mut() {
      *px = image::Rgb([(x * 16) as u8, 64, 200]);
    }
    img.save(&input_path).unwrap();

    let cli = Cli {
      input_path: input_path.clone(),
      output_path: output_path.clone(),
      clip_limit: 2.0,
      tile_grid_size: 4,
    };
    let report = run(&cli).unwrap();
    match report {
      Report::Success { success, output_path: reported_path, .. } => {
        assert!(success);
        assert_eq!(reported_path, output_path.display().to_string());
      }
      Report::Failure { error, .. } => panic!("expected success, got error: {error}"),
    }
    assert!(output_path.exists());

    let _ = std::fs::remove_file(&input_path);
    let _ = std::fs::remove_file(&output_path);
  }
}
