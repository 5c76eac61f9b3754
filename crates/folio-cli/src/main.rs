// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Folio — render one page of a document and write it out for inspection.
//
// Entry point. Initialises logging, loads the optional config, prints the
// document's geometry, renders the requested page and saves it as BMP (or
// PNG when the output ends in `.png`).

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use anyhow::Context;
use clap::Parser;
use folio_core::config::{ChannelOrder, FolioConfig};
use folio_core::geometry::RectD;
use folio_core::human_errors::humanize_error;
use folio_core::types::{RenderPageArgs, Rotation};
use folio_core::units::dots_to_centimeters;
use folio_core::FolioError;
use folio_document::Document;

#[derive(Debug, Parser)]
#[command(name = "folio", version, about = "Render a document page to a bitmap")]
struct Cli {
    /// Document to open.
    path: PathBuf,

    /// Page index, counting from 0.
    #[arg(long, default_value_t = 0)]
    page: u32,

    /// Output pixels per dot. Defaults to the configured zoom.
    #[arg(long)]
    zoom: Option<f32>,

    /// Clockwise rotation in degrees, a multiple of 90.
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    rotation: i32,

    /// Render only this region, given in dots as `x,y,dx,dy`.
    #[arg(long, value_parser = parse_crop)]
    crop: Option<RectD>,

    /// Where to write the render.
    #[arg(long, short, default_value = "page.bmp")]
    output: PathBuf,

    /// JSON settings file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Keep the alpha channel (32-bit BMP).
    #[arg(long)]
    alpha: bool,

    /// Write BMP channels in red-green-blue order.
    #[arg(long)]
    rgb: bool,
}

fn parse_crop(raw: &str) -> Result<RectD, String> {
    let parts = raw
        .split(',')
        .map(|part| part.trim().parse::<f64>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|err| format!("invalid number in crop: {err}"))?;
    match parts.as_slice() {
        &[x, y, dx, dy] => Ok(RectD::new(x, y, dx, dy)),
        _ => Err(format!("crop needs 4 values x,y,dx,dy, got {}", parts.len())),
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report(&err);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let mut config = match &cli.config {
        Some(path) => FolioConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => FolioConfig::default(),
    };
    if cli.alpha {
        config.encoder.keep_alpha = true;
    }
    if cli.rgb {
        config.encoder.channel_order = ChannelOrder::Rgb;
    }

    println!("Open file {}", cli.path.display());
    println!("File is supported: {}", Document::is_supported(&cli.path));

    let document = Document::open(&cli.path)?.with_limits(config.limits);
    println!("Engine: {}", document.engine_name());
    println!("Number of pages: {}", document.page_count());
    println!("File DPI: {}", document.file_dpi());

    let media = document.page_media_box(cli.page)?;
    let media_cm = dots_to_centimeters(&media, document.file_dpi());
    println!("Page {} media box: {media} dots, {media_cm:.2} cm", cli.page);
    println!(
        "Page {} content box: {} dots",
        cli.page,
        document.page_content_box(cli.page)?
    );

    let mut args = RenderPageArgs::new(cli.page, cli.zoom.unwrap_or(config.default_zoom))
        .with_rotation(Rotation::from_degrees(cli.rotation)?);
    if let Some(crop) = cli.crop {
        args = args.with_crop(crop);
    }

    let started = Instant::now();
    let bitmap = document.render(&args)?;
    println!(
        "Page {} rendered, width={}, height={} in {}ms",
        cli.page,
        bitmap.width(),
        bitmap.height(),
        started.elapsed().as_millis()
    );
    println!("Fingerprint: {}", bitmap.fingerprint());

    let format = folio_document::save(&bitmap, &cli.output, &config.encoder)?;
    println!("Page {} saved to {} ({format:?})", cli.page, cli.output.display());
    Ok(())
}

fn report(err: &anyhow::Error) {
    tracing::error!(error = %err, "render failed");
    match err.downcast_ref::<FolioError>() {
        Some(folio) => {
            let human = humanize_error(folio);
            eprintln!("{}", human.message);
            eprintln!("{}", human.suggestion);
        }
        None => eprintln!("{err:#}"),
    }
}
