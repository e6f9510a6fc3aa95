use crate::error::{GazeError, GtResult};
use crate::geometry::Point;
use crate::vocab::Vocabulary;
use std::fs::{self, File};
use std::io::Read;
use std::path::Path;
use tracing::{debug, info, warn};

fn tsv_reader<R: Read>(reader: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .from_reader(reader)
}

/// One word per line. Lowercase is uppercased; duplicates collapse; lines
/// with anything but letters are skipped with a warning.
pub fn load_vocabulary<P: AsRef<Path>>(path: P) -> GtResult<Vocabulary> {
    let content = fs::read_to_string(path.as_ref())?;
    let mut vocab = Vocabulary::new();
    let mut skipped = 0;
    let mut duplicates = 0;

    for (line_no, line) in content.lines().enumerate() {
        let word = line.trim();
        if word.is_empty() {
            continue;
        }
        match vocab.insert(word) {
            Ok(true) => {}
            Ok(false) => duplicates += 1,
            Err(e) => {
                warn!("Vocabulary line {}: {}", line_no + 1, e);
                skipped += 1;
            }
        }
    }

    info!(
        "Loaded {} words from {:?} ({} duplicates, {} skipped)",
        vocab.len(),
        path.as_ref(),
        duplicates,
        skipped
    );
    Ok(vocab)
}

/// `<char>\t<x>\t<y>` per line. The character is uppercased; which characters
/// the layout accepts is decided when the geometry is built.
pub fn load_key_coordinates<P: AsRef<Path>>(path: P) -> GtResult<Vec<(char, Point)>> {
    let file = File::open(path.as_ref())?;
    let centers = read_key_coordinates(file)?;
    info!("Loaded {} key centers from {:?}", centers.len(), path.as_ref());
    Ok(centers)
}

pub fn read_key_coordinates<R: Read>(reader: R) -> GtResult<Vec<(char, Point)>> {
    let mut rdr = tsv_reader(reader);
    let mut centers = Vec::new();
    let mut skipped = 0;

    for (idx, result) in rdr.records().enumerate() {
        let record = match result {
            Ok(r) => r,
            Err(e) => {
                warn!("Coordinate row {}: {}", idx + 1, e);
                skipped += 1;
                continue;
            }
        };

        if record.len() < 3 {
            warn!("Coordinate row {}: expected 3 fields, got {}", idx + 1, record.len());
            skipped += 1;
            continue;
        }

        let mut chars = record[0].chars();
        let id = match (chars.next(), chars.next()) {
            (Some(c), None) => c.to_ascii_uppercase(),
            _ => {
                warn!("Coordinate row {}: bad key token {:?}", idx + 1, &record[0]);
                skipped += 1;
                continue;
            }
        };

        match (record[1].trim().parse::<i32>(), record[2].trim().parse::<i32>()) {
            (Ok(x), Ok(y)) => centers.push((id, Point::new(x, y))),
            _ => {
                warn!("Coordinate row {}: non-integer position for {:?}", idx + 1, id);
                skipped += 1;
            }
        }
    }

    if skipped > 0 {
        debug!("Skipped {} malformed coordinate rows", skipped);
    }
    if centers.is_empty() {
        return Err(GazeError::Validation(
            "coordinate source contains no usable keys".to_string(),
        ));
    }
    Ok(centers)
}

/// `<x>\t<y>` per line; malformed lines are skipped and counted.
pub fn load_raw_samples<P: AsRef<Path>>(path: P) -> GtResult<Vec<Point>> {
    let file = File::open(path.as_ref())?;
    let samples = read_raw_samples(file)?;
    debug!("Loaded {} samples from {:?}", samples.len(), path.as_ref());
    Ok(samples)
}

pub fn read_raw_samples<R: Read>(reader: R) -> GtResult<Vec<Point>> {
    let mut rdr = tsv_reader(reader);
    let mut samples = Vec::new();
    let mut skipped = 0;

    for record in rdr.records() {
        let record = match record {
            Ok(r) => r,
            Err(_) => {
                skipped += 1;
                continue;
            }
        };
        if let Some(p) = parse_sample(&record) {
            samples.push(p);
        } else if !(record.len() == 1 && record[0].trim().is_empty()) {
            skipped += 1;
        }
    }

    if skipped > 0 {
        warn!("Skipped {} malformed sample lines", skipped);
    }
    Ok(samples)
}

fn parse_sample(record: &csv::StringRecord) -> Option<Point> {
    if record.len() < 2 {
        return None;
    }
    let x = record[0].trim().parse::<i32>().ok()?;
    let y = record[1].trim().parse::<i32>().ok()?;
    Some(Point::new(x, y))
}

/// Labelled stream for training: the gold word on the first line, samples
/// after it.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingExample {
    pub word: String,
    pub samples: Vec<Point>,
}

pub fn load_training_example<P: AsRef<Path>>(path: P) -> GtResult<TrainingExample> {
    let content = fs::read_to_string(path.as_ref())?;
    let mut lines = content.lines();

    let word = lines
        .by_ref()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .ok_or_else(|| {
            GazeError::Validation(format!("{:?} has no gold word", path.as_ref()))
        })?
        .to_ascii_uppercase();

    let body = lines.collect::<Vec<_>>().join("\n");
    let samples = read_raw_samples(body.as_bytes())?;
    Ok(TrainingExample { word, samples })
}
