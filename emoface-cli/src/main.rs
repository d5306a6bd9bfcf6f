#![warn(unused_extern_crates)]
use anyhow::{Context, Error, Result};
use clap::Parser;
use emoface::overlay::draw_landmarks;
use emoface::preprocess::contrast_stretch;
use emoface::{Classifier, Emotion, EmotionDetails, JsonLandmarks, LandmarkProvider};
use image::RgbImage;
use std::path::PathBuf;
use tracing::{Level, debug, info, span, warn};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::format::FmtSpan;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct CmdArgs {
    /// Image to analyze
    #[arg(short, long, value_name = "FILE")]
    input: PathBuf,

    /// JSON landmark dump produced by a face landmark detector
    #[arg(short, long, value_name = "FILE")]
    landmarks: PathBuf,

    /// Write the preprocessed image with landmarks drawn on it
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Skip contrast stretching
    #[arg(long)]
    raw: bool,

    /// Print the full result as JSON
    #[arg(long)]
    json: bool,

    /// Tie-break order, e.g. "neutral,happy,sad,angry,surprised"
    #[arg(long, value_delimiter = ',')]
    priority: Option<Vec<Emotion>>,
}

fn main() -> Result<()> {
    let filter = EnvFilter::from_default_env();
    tracing_subscriber::fmt()
        .with_span_events(FmtSpan::CLOSE)
        .with_target(false)
        .with_env_filter(filter)
        .init();

    let args = CmdArgs::parse();

    let classifier = match &args.priority {
        Some(order) => Classifier::with_priority(order)?,
        None => Classifier::default(),
    };
    debug!("Tie-break priority: {:?}", classifier.priority());

    let provider = JsonLandmarks::open(&args.landmarks)?;
    let details = process_image(&args, &provider, &classifier)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&details)?);
    } else {
        println!("Detected emotion: {} ({:.2}%)", details.emotion, details.confidence);
        for (emotion, score) in details.scores.iter() {
            println!("  {emotion:<10}{score}");
        }
    }

    Ok(())
}

fn process_image(
    args: &CmdArgs,
    provider: &impl LandmarkProvider,
    classifier: &Classifier,
) -> Result<EmotionDetails> {
    let span = span!(Level::DEBUG, "process_image");
    let _guard = span.enter();

    let img: RgbImage = image::open(&args.input)
        .with_context(|| format!("Failed to open {}", args.input.display()))?
        .into_rgb8();
    let mut img = if args.raw { img } else { contrast_stretch(&img) };

    let landmarks = match provider.detect(&img)? {
        Some(l) => l,
        None => {
            warn!("No face in {}", args.input.display());
            return Err(Error::msg("No face detected"));
        }
    };

    let details = EmotionDetails::from_landmarks(classifier, &landmarks);
    info!("{} ({}%)", details.emotion, details.confidence);

    if let Some(output) = &args.output {
        draw_landmarks(&mut img, &landmarks);
        img.save(output)
            .with_context(|| format!("Failed to write {}", output.display()))?;
        info!("Annotated image at {}", output.display());
    }

    Ok(details)
}
