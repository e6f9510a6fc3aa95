use crate::reports;
use clap::Args;
use gazetype::align::OptimalAligner;
use gazetype::config::Config;
use gazetype::loader::load_raw_samples;
use gazetype::ranking::ScoredResult;
use gazetype::{GazeEngine, GtResult};
use serde_json::json;

#[derive(Args, Debug, Clone)]
pub struct AlignArgs {
    #[command(flatten)]
    pub config: Config,

    /// Raw samples, one `<x>\t<y>` per line
    pub input: String,

    /// Score this word only instead of ranking the vocabulary
    #[arg(short, long)]
    pub word: Option<String>,

    /// Comma-separated weights; switches to the learned score
    #[arg(long, value_delimiter = ',', allow_negative_numbers = true)]
    pub weights: Option<Vec<f64>>,

    #[arg(long, default_value_t = 10)]
    pub top: usize,

    #[arg(long, default_value_t = false)]
    pub json: bool,
}

pub fn run(args: &AlignArgs, engine: &mut GazeEngine) -> GtResult<()> {
    let samples = load_raw_samples(&args.input)?;
    let threshold = engine.config().alignment.prune_threshold;

    match (&args.word, &args.weights) {
        (Some(word), None) => {
            let score = engine.dp_score(&samples, word, threshold)?;
            if args.json {
                println!("{}", json!({ "word": word, "score": finite(score) }));
            } else {
                println!("{}\t{}", word.to_ascii_uppercase(), format_score(score));
            }
        }
        (Some(word), Some(weights)) => {
            let data = engine.decorate(&samples);
            let score = engine.optimal().weighted_score(&data, word, weights)?;
            let phi = engine.dp_phi(&samples, word, weights)?;
            if args.json {
                println!(
                    "{}",
                    json!({ "word": word, "score": finite(score), "phi": phi })
                );
            } else {
                println!("{}\t{}", word.to_ascii_uppercase(), format_score(score));
                if let Some(phi) = phi {
                    reports::print_feature_vector("Phi", &phi);
                }
            }
        }
        (None, None) => {
            let results = engine.dp_rank(&samples);
            report(args, &results, OptimalAligner::DISTANCE_ORDER, "DP ranking")?;
        }
        (None, Some(weights)) => {
            let results = engine.weighted_rank(&samples, weights)?;
            report(args, &results, OptimalAligner::WEIGHTED_ORDER, "Weighted DP ranking")?;
        }
    }
    Ok(())
}

fn report(
    args: &AlignArgs,
    results: &[ScoredResult],
    order: gazetype::ranking::RankOrder,
    title: &str,
) -> GtResult<()> {
    let shown = &results[..results.len().min(args.top)];
    if args.json {
        println!("{}", serde_json::to_string_pretty(shown)?);
    } else {
        reports::print_ranking(title, shown, order);
    }
    Ok(())
}

fn finite(score: f64) -> Option<f64> {
    score.is_finite().then_some(score)
}

fn format_score(score: f64) -> String {
    if score.is_finite() {
        format!("{:.3}", score)
    } else {
        "unreachable".to_string()
    }
}
