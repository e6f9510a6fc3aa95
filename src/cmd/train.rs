use crate::reports;
use clap::Args;
use gazetype::align::optimal::FeatureSet;
use gazetype::config::Config;
use gazetype::loader::load_training_example;
use gazetype::trainer::{StructuredPerceptron, TrainerParams};
use gazetype::{GazeEngine, GazeError, GtResult};
use tracing::warn;

#[derive(Args, Debug, Clone)]
pub struct TrainArgs {
    #[command(flatten)]
    pub config: Config,

    /// Example files: the gold word on the first line, then `<x>\t<y>` samples
    #[arg(required = true)]
    pub examples: Vec<String>,

    #[arg(long, default_value_t = 0.001)]
    pub learning_rate: f64,

    #[arg(long, default_value_t = 20)]
    pub max_epochs: usize,

    #[arg(long)]
    pub shuffle_seed: Option<u64>,

    /// Learn x/y deviation weights as well as distance weights
    #[arg(long, default_value_t = false)]
    pub deviation_features: bool,

    #[arg(long, default_value_t = false)]
    pub json: bool,
}

pub fn run(args: &TrainArgs, engine: &mut GazeEngine) -> GtResult<()> {
    let examples: Vec<_> = args
        .examples
        .iter()
        .filter_map(|path| {
            load_training_example(path)
                .map_err(|e| warn!("Skipping example {}: {}", path, e))
                .ok()
        })
        .collect();

    if examples.is_empty() {
        return Err(GazeError::Validation("no readable training examples".into()));
    }

    let features = if args.deviation_features {
        FeatureSet::DistanceDeviation
    } else {
        FeatureSet::Distance
    };

    let params = TrainerParams {
        learning_rate: args.learning_rate,
        max_epochs: args.max_epochs,
        shuffle_seed: args.shuffle_seed,
    };
    let mut trainer =
        StructuredPerceptron::new(StructuredPerceptron::initial_weights(features), params);
    let report = trainer.train(engine, &examples)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        reports::print_training(&report);
    }
    Ok(())
}
