mod common;

use common::{assert_close, exact_events, qwerty, vocab, EventBuilder};
use gazetype::align::{HeuristicAligner, Step};
use gazetype::config::RankingParams;
use gazetype::ranking::{RankOrder, UNREACHABLE};
use gazetype::signal::KeyEvent;
use rstest::rstest;

fn serial() -> RankingParams {
    RankingParams {
        sequential: true,
        ..Default::default()
    }
}

fn events(word: &str) -> Vec<KeyEvent> {
    word.chars().map(|c| EventBuilder::on(c).build()).collect()
}

#[rstest]
#[case("DOG", 0.0)]
#[case("DOGG", 4.5)] // one repeat: 30 * 0.15
#[case("FOG", 60.0)]
#[case("FIG", 120.0)]
fn test_scores_against_exact_events(#[case] word: &str, #[case] expected: f64) {
    let geom = qwerty();
    let aligner = HeuristicAligner::new(&geom, serial());
    assert_close(aligner.score(&exact_events("DOG"), word).unwrap(), expected);
}

#[test]
fn test_spurious_event_costs_its_distance_to_the_nearest_letter() {
    let geom = qwerty();
    let aligner = HeuristicAligner::new(&geom, serial());
    let score = aligner.score(&events("DXOG"), "DOG").unwrap();
    assert_close(score, 4500f64.sqrt());
}

#[test]
fn test_skipped_letter_costs_distance_from_previous_event() {
    let geom = qwerty();
    let aligner = HeuristicAligner::new(&geom, serial());
    let score = aligner.score(&events("DG"), "DOG").unwrap();
    assert_close(score, 119200f64.sqrt());
}

#[test]
fn test_trailing_events_and_letters() {
    let geom = qwerty();
    let aligner = HeuristicAligner::new(&geom, serial());

    assert_close(aligner.score(&events("DOGF"), "DOG").unwrap(), 60.0);
    assert_close(
        aligner.score(&events("DO"), "DOGS").unwrap(),
        52000f64.sqrt() + 163600f64.sqrt(),
    );
}

#[test]
fn test_trailing_run_of_repeats_collapses_to_one_letter() {
    let geom = qwerty();
    let aligner = HeuristicAligner::new(&geom, serial());
    // O -> Z once, plus two repeat penalties of 30 * 0.15
    assert_close(
        aligner.score(&events("DO"), "DOZZZ").unwrap(),
        199300f64.sqrt() + 9.0,
    );
}

#[test]
fn test_step_classification() {
    let evs = events("DXOG");
    let word: Vec<char> = "DOG".chars().collect();
    assert_eq!(Step::classify(&evs, &word, 0, 0), Step::Match);
    assert_eq!(Step::classify(&evs, &word, 1, 1), Step::Insertion);

    let evs = events("DG");
    assert_eq!(Step::classify(&evs, &word, 1, 1), Step::Deletion);

    let evs = events("DPG");
    assert_eq!(Step::classify(&evs, &word, 1, 1), Step::Substitution);
    assert_eq!(Step::Insertion.skip(), (1, 0));
    assert_eq!(Step::Deletion.skip(), (0, 1));
}

#[test]
fn test_length_gate_and_empty_inputs() {
    let geom = qwerty();
    let aligner = HeuristicAligner::new(&geom, serial());

    assert_eq!(aligner.score(&events("D"), "DOGHOUSE").unwrap(), UNREACHABLE);
    assert_eq!(aligner.score(&[], "DOG").unwrap(), UNREACHABLE);
    assert_eq!(aligner.score(&events("DOG"), "").unwrap(), UNREACHABLE);
    // four letters apart is still scored
    assert!(aligner.score(&events("D"), "DOGSY").unwrap().is_finite());
}

#[test]
fn test_lowercase_word_is_accepted() {
    let geom = qwerty();
    let aligner = HeuristicAligner::new(&geom, serial());
    assert_eq!(aligner.score(&exact_events("DOG"), "dog").unwrap(), 0.0);
}

#[test]
fn test_rank_orders_and_admits() {
    let geom = qwerty();
    let aligner = HeuristicAligner::new(&geom, serial());
    let words = vocab(&["FIG", "DOGG", "DOG", "FOG", "DOGHOUSES"]);

    let results = aligner.rank(&exact_events("DOG"), &words);
    let ranked: Vec<&str> = results.iter().map(|r| r.word.as_str()).collect();
    assert_eq!(ranked, vec!["DOG", "DOGG", "FOG", "FIG"]);
    assert_eq!(aligner.order(), RankOrder::AscendingDistance);
}

#[test]
fn test_admission_threshold_is_strict() {
    let geom = qwerty();
    let params = RankingParams {
        admission_threshold: 60.0,
        ..serial()
    };
    let aligner = HeuristicAligner::new(&geom, params);
    let results = aligner.rank(&exact_events("DOG"), &vocab(&["DOG", "FOG", "DOGG"]));
    let ranked: Vec<&str> = results.iter().map(|r| r.word.as_str()).collect();
    assert_eq!(ranked, vec!["DOG", "DOGG"]);
}

#[test]
fn test_parallel_rank_matches_serial() {
    let geom = qwerty();
    let words = vocab(&["FIG", "DOG", "FOG", "DIG", "DOGS", "GOD", "DO", "ODD"]);
    let evs = exact_events("DOG");

    let serial_results = HeuristicAligner::new(&geom, serial()).rank(&evs, &words);
    let parallel_results = HeuristicAligner::new(&geom, RankingParams::default()).rank(&evs, &words);
    assert_eq!(serial_results, parallel_results);
}

#[test]
fn test_unmodeled_key_is_an_error() {
    let geom = qwerty();
    let aligner = HeuristicAligner::new(&geom, serial());
    assert!(aligner.score(&exact_events("DOG"), "DO1").is_err());
}
