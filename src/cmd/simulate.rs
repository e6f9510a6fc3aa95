use clap::Args;
use gazetype::geometry::KeyboardGeometry;
use gazetype::synth::TraceSynthesizer;
use gazetype::GtResult;
use std::io::{self, BufWriter, Write};

#[derive(Args, Debug, Clone)]
pub struct SimulateArgs {
    pub word: String,

    #[arg(long, default_value_t = 20)]
    pub dwell: usize,

    #[arg(long, default_value_t = 6)]
    pub saccade: usize,

    /// Per-axis noise in pixels
    #[arg(long, default_value_t = 0)]
    pub jitter: i32,

    #[arg(long, default_value_t = 7)]
    pub seed: u64,
}

pub fn run(args: &SimulateArgs, geometry: &KeyboardGeometry) -> GtResult<()> {
    let trace = TraceSynthesizer::builder()
        .dwell(args.dwell)
        .saccade(args.saccade)
        .jitter(args.jitter)
        .seed(args.seed)
        .build()
        .trace(geometry, &args.word)?;

    let mut out = BufWriter::new(io::stdout().lock());
    for p in trace {
        writeln!(out, "{}\t{}", p.x, p.y)?;
    }
    out.flush()?;
    Ok(())
}
