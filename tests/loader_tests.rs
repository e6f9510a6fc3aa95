use gazetype::geometry::Point;
use gazetype::loader::{
    load_key_coordinates, load_raw_samples, load_training_example, load_vocabulary,
    read_key_coordinates, read_raw_samples,
};
use gazetype::GazeError;
use std::io::Write;
use tempfile::NamedTempFile;

// --- VOCABULARY ---

#[test]
fn test_vocabulary_normalizes_and_dedups() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "dog").unwrap();
    writeln!(file, "DOG").unwrap();
    writeln!(file, "  Fig  ").unwrap();
    writeln!(file).unwrap();
    writeln!(file, "can't").unwrap(); // not alphabetic
    writeln!(file, "b2b").unwrap();
    writeln!(file, "fog").unwrap();

    let vocab = load_vocabulary(file.path()).unwrap();
    assert_eq!(vocab.words(), &["DOG", "FIG", "FOG"]);
    assert!(vocab.contains("fig"));
    assert_eq!(vocab.longest_word(), 3);
}

#[test]
fn test_missing_vocabulary_is_io_error() {
    let res = load_vocabulary("/definitely/not/here.txt");
    assert!(matches!(res, Err(GazeError::Io(_))));
}

// --- KEY COORDINATES ---

#[test]
fn test_coordinates_parse_and_uppercase() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "q\t30\t50").unwrap();
    writeln!(file, "W\t90\t50").unwrap();
    writeln!(file, " \t320\t230").unwrap(); // space bar
    writeln!(file, ";\t590\t110").unwrap();

    let centers = load_key_coordinates(file.path()).unwrap();
    assert_eq!(
        centers,
        vec![
            ('Q', Point::new(30, 50)),
            ('W', Point::new(90, 50)),
            (' ', Point::new(320, 230)),
            (';', Point::new(590, 110)),
        ]
    );
}

#[test]
fn test_malformed_coordinate_rows_are_skipped() {
    let data = "A\t10\t10\nBB\t1\t1\nC\tx\t5\nD\t7\nS\t50\t10\n";
    let centers = read_key_coordinates(data.as_bytes()).unwrap();
    assert_eq!(centers, vec![('A', Point::new(10, 10)), ('S', Point::new(50, 10))]);
}

#[test]
fn test_coordinates_without_usable_rows_fail() {
    let res = read_key_coordinates("garbage\nmore garbage\n".as_bytes());
    assert!(matches!(res, Err(GazeError::Validation(_))));
}

// --- SAMPLES ---

#[test]
fn test_raw_samples_skip_bad_lines() {
    let data = "170\t110\n171\t111\nnope\n\n172\t-3\n1.5\t2\n";
    let samples = read_raw_samples(data.as_bytes()).unwrap();
    assert_eq!(
        samples,
        vec![Point::new(170, 110), Point::new(171, 111), Point::new(172, -3)]
    );
}

#[test]
fn test_raw_samples_from_file() {
    let mut file = NamedTempFile::new().unwrap();
    for i in 0..30 {
        writeln!(file, "{}\t{}", 100 + i, 110).unwrap();
    }
    let samples = load_raw_samples(file.path()).unwrap();
    assert_eq!(samples.len(), 30);
    assert_eq!(samples[29], Point::new(129, 110));
}

#[test]
fn test_empty_sample_file_is_not_an_error() {
    let file = NamedTempFile::new().unwrap();
    assert!(load_raw_samples(file.path()).unwrap().is_empty());
}

// --- TRAINING EXAMPLES ---

#[test]
fn test_training_example_reads_gold_word_then_samples() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file).unwrap();
    writeln!(file, "dog").unwrap();
    writeln!(file, "170\t110").unwrap();
    writeln!(file, "510\t50").unwrap();

    let example = load_training_example(file.path()).unwrap();
    assert_eq!(example.word, "DOG");
    assert_eq!(example.samples, vec![Point::new(170, 110), Point::new(510, 50)]);
}

#[test]
fn test_training_example_without_word_fails() {
    let file = NamedTempFile::new().unwrap();
    assert!(matches!(
        load_training_example(file.path()),
        Err(GazeError::Validation(_))
    ));
}
