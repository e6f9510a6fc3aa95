use crate::reports;
use clap::Args;
use gazetype::align::HeuristicAligner;
use gazetype::config::Config;
use gazetype::loader::load_raw_samples;
use gazetype::ranking::ScoredResult;
use gazetype::signal::KeyEvent;
use gazetype::{GazeEngine, GtResult};
use serde::Serialize;

#[derive(Args, Debug, Clone)]
pub struct RankArgs {
    #[command(flatten)]
    pub config: Config,

    /// Raw samples, one `<x>\t<y>` per line
    pub input: String,

    #[arg(long, default_value_t = 10)]
    pub top: usize,

    #[arg(long, default_value_t = false)]
    pub show_events: bool,

    #[arg(long, default_value_t = false)]
    pub json: bool,
}

#[derive(Serialize)]
struct RankOutput<'a> {
    events: &'a [KeyEvent],
    results: &'a [ScoredResult],
}

pub fn run(args: &RankArgs, engine: &GazeEngine) -> GtResult<()> {
    let samples = load_raw_samples(&args.input)?;
    let events = engine.segment(&samples);
    let results = if events.is_empty() {
        Vec::new()
    } else {
        engine.fast_rank(&events)
    };
    let shown = &results[..results.len().min(args.top)];

    if args.json {
        let out = RankOutput {
            events: &events,
            results: shown,
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    if args.show_events {
        reports::print_events(&events);
    }
    reports::print_ranking(
        &format!("Fast ranking ({} samples, {} events)", samples.len(), events.len()),
        shown,
        HeuristicAligner::ORDER,
    );
    Ok(())
}
