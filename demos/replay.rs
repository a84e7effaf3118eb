use anyhow::Context;
use clap::Parser;
use std::io::BufReader;
use tracing_subscriber::EnvFilter;
use tripzone::{dump, Config, LaneBarrier, Monitoring};

/// Replays a detection dump through the lane barrier monitor.
#[derive(Parser, Debug)]
#[command(version)]
struct Opts {
    /// Detection dump, one `<seconds>:<json array>` frame per line
    dump: String,

    /// JSON config; the built-in tripwire and zone are used when omitted
    #[arg(short, long)]
    config: Option<String>,

    /// Source name the frames are attributed to
    #[arg(short, long, default_value = "cam1")]
    source: String,

    /// Print full per-frame reports as JSON lines
    #[arg(long)]
    json: bool,

    /// Stop at the first malformed line instead of skipping it
    #[arg(long)]
    strict: bool,
}

fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let opts = Opts::parse();

    let config = match &opts.config {
        Some(path) => Config::load(path).with_context(|| format!("loading config {}", path))?,
        None => Config::default(),
    };

    let mut monitor = LaneBarrier::new(&config)?;

    let file = std::fs::File::open(&opts.dump)
        .with_context(|| format!("opening dump {}", opts.dump))?;

    for frame in dump::read_frames(BufReader::new(file)) {
        let frame = match frame {
            Ok(frame) => frame,
            Err(err) if !opts.strict => {
                tracing::warn!("{}", err);
                continue;
            }
            Err(err) => return Err(err.into()),
        };

        let report = monitor.update(&frame, &opts.source);

        if opts.json {
            println!("{}", serde_json::to_string(&report)?);
        } else {
            for t in &report.tracks {
                println!(
                    "{:>8.2} ID: {} crossed={} inside={}",
                    report.timestamp,
                    t.track_id,
                    t.crossed,
                    t.inside()
                );
            }
            println!("{:>8.2} Lane Barrier: {}", report.timestamp, report.status.as_u8());
        }
    }

    Ok(())
}
