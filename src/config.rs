use crate::align::optimal::AlignVariant;
use crate::error::{GazeError, GtResult};
use clap::parser::ValueSource;
use clap::{ArgAction, ArgMatches, Args};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Args, Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    #[command(flatten)]
    pub segmenter: SegmenterParams,
    #[command(flatten)]
    pub ranking: RankingParams,
    #[command(flatten)]
    pub alignment: AlignmentParams,
}

#[derive(Args, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmenterParams {
    /// Dwell gate: windows closer than this count toward a trigger
    #[arg(long, default_value_t = 14.0)]
    pub dx_threshold: f64,
    /// An open event stays open while the window stays under this distance
    #[arg(long, default_value_t = 16.0)]
    pub inner_dx_threshold: f64,
    /// Consecutive dwell windows needed to open an event
    #[arg(long, default_value_t = 4)]
    pub trigger_threshold: usize,
    /// Sample distance between the two ends of a window
    #[arg(long, default_value_t = 3)]
    pub window_offset: usize,
    #[arg(long, default_value_t = 1.5)]
    pub merge_radius_factor: f64,
    #[arg(long, default_value_t = 4)]
    pub merge_max_ticks: usize,
    /// Sliding mean frame applied before segmenting (0 or 1 disables)
    #[arg(long, default_value_t = 0)]
    pub smoothing_window: usize,
}

impl Default for SegmenterParams {
    fn default() -> Self {
        Self {
            dx_threshold: 14.0,
            inner_dx_threshold: 16.0,
            trigger_threshold: 4,
            window_offset: 3,
            merge_radius_factor: 1.5,
            merge_max_ticks: 4,
            smoothing_window: 0,
        }
    }
}

impl SegmenterParams {
    pub fn validate(&self) -> GtResult<()> {
        if self.trigger_threshold == 0 {
            return Err(GazeError::Config("trigger_threshold must be > 0".into()));
        }
        if self.window_offset == 0 {
            return Err(GazeError::Config("window_offset must be > 0".into()));
        }
        if !(self.dx_threshold > 0.0 && self.inner_dx_threshold > 0.0) {
            return Err(GazeError::Config(format!(
                "dwell thresholds must be positive (dx {}, inner {})",
                self.dx_threshold, self.inner_dx_threshold
            )));
        }
        Ok(())
    }

    /// Fewest in-bounds samples a stream needs before segmenting is attempted.
    pub fn min_samples(&self) -> usize {
        3 * self.trigger_threshold
    }
}

#[derive(Args, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RankingParams {
    /// Heuristic scores at or above this are left out of the ranking
    #[arg(long, default_value_t = 1500.0)]
    pub admission_threshold: f64,
    /// Largest event/letter count difference still scored
    #[arg(long, default_value_t = 4)]
    pub length_gate: usize,
    /// Per repeated letter, as a fraction of the inter-key radius
    #[arg(long, default_value_t = 0.15)]
    pub repeat_penalty: f64,
    /// Score the vocabulary on the calling thread only
    #[arg(long, default_value_t = false)]
    pub sequential: bool,
}

impl Default for RankingParams {
    fn default() -> Self {
        Self {
            admission_threshold: 1500.0,
            length_gate: 4,
            repeat_penalty: 0.15,
            sequential: false,
        }
    }
}

#[derive(Args, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AlignmentParams {
    #[arg(long, default_value_t = AlignVariant::Point)]
    pub variant: AlignVariant,
    /// Abandon an alignment once a whole row is worse than this (<= 0 disables)
    #[arg(long, default_value_t = -1.0, allow_negative_numbers = true)]
    pub prune_threshold: f64,
    /// Align against " WORD " so the trace may start and end on the space bar
    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    pub pad_word_boundaries: bool,
    /// Trailing window for the local x/y deviation features
    #[arg(long, default_value_t = 5)]
    pub deviation_window: usize,
}

impl Default for AlignmentParams {
    fn default() -> Self {
        Self {
            variant: AlignVariant::Point,
            prune_threshold: -1.0,
            pad_word_boundaries: true,
            deviation_window: 5,
        }
    }
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> GtResult<Self> {
        let content = fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        config.segmenter.validate()?;
        Ok(config)
    }

    /// Copies every value given explicitly on the command line over `self`,
    /// so a config file supplies the base and flags override it.
    pub fn merge_from_cli(&mut self, cli: &Config, matches: &ArgMatches) {
        macro_rules! update_if_present {
            ($group:ident . $field:ident) => {
                if matches.value_source(stringify!($field)) == Some(ValueSource::CommandLine) {
                    self.$group.$field = cli.$group.$field.clone();
                }
            };
        }

        update_if_present!(segmenter.dx_threshold);
        update_if_present!(segmenter.inner_dx_threshold);
        update_if_present!(segmenter.trigger_threshold);
        update_if_present!(segmenter.window_offset);
        update_if_present!(segmenter.merge_radius_factor);
        update_if_present!(segmenter.merge_max_ticks);
        update_if_present!(segmenter.smoothing_window);

        update_if_present!(ranking.admission_threshold);
        update_if_present!(ranking.length_gate);
        update_if_present!(ranking.repeat_penalty);
        update_if_present!(ranking.sequential);

        update_if_present!(alignment.variant);
        update_if_present!(alignment.prune_threshold);
        update_if_present!(alignment.pad_word_boundaries);
        update_if_present!(alignment.deviation_window);
    }
}
