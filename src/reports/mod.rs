use comfy_table::presets::ASCII_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use gazetype::align::optimal::Direction;
use gazetype::ranking::{RankOrder, ScoredResult};
use gazetype::signal::KeyEvent;
use gazetype::trainer::TrainingReport;

fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

pub fn print_events(events: &[KeyEvent]) {
    let mut table = new_table();
    table.set_header(vec![
        Cell::new("#").add_attribute(Attribute::Bold),
        Cell::new("Key").add_attribute(Attribute::Bold),
        Cell::new("X"),
        Cell::new("Y"),
        Cell::new("Ticks"),
    ]);

    for (i, e) in events.iter().enumerate() {
        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(e.alpha).fg(Color::Cyan),
            Cell::new(e.point.x).set_alignment(CellAlignment::Right),
            Cell::new(e.point.y).set_alignment(CellAlignment::Right),
            Cell::new(e.ticks).set_alignment(CellAlignment::Right),
        ]);
    }
    println!("\nKey events: {}", events.iter().map(|e| e.alpha).collect::<String>());
    println!("{}", table);
}

pub fn print_ranking(title: &str, results: &[ScoredResult], order: RankOrder) {
    let label = match order {
        RankOrder::AscendingDistance => "Distance",
        RankOrder::DescendingScore => "Score",
    };

    let mut table = new_table();
    table.set_header(vec![
        Cell::new("Rank").add_attribute(Attribute::Bold),
        Cell::new("Word").add_attribute(Attribute::Bold),
        Cell::new(label).fg(Color::Cyan),
    ]);

    for (i, r) in results.iter().enumerate() {
        let word = if i == 0 {
            Cell::new(&r.word).fg(Color::Green).add_attribute(Attribute::Bold)
        } else {
            Cell::new(&r.word)
        };
        table.add_row(vec![
            Cell::new(i + 1),
            word,
            Cell::new(format!("{:.2}", r.score)).set_alignment(CellAlignment::Right),
        ]);
    }

    println!("\n{}", title);
    if results.is_empty() {
        println!("(no candidates admitted)");
    } else {
        println!("{}", table);
    }
}

/// Direction-major vector: one row per direction, one column per feature.
pub fn print_feature_vector(title: &str, values: &[f64]) {
    let per = values.len() / 2;
    let names: &[&str] = if per == 3 {
        &["Dist", "X Dev", "Y Dev"]
    } else {
        &["Dist"]
    };

    let mut table = new_table();
    let mut header = vec![Cell::new("Dir").add_attribute(Attribute::Bold)];
    header.extend(names.iter().map(Cell::new));
    table.set_header(header);

    for (dir, chunk) in [Direction::Up, Direction::Left]
        .iter()
        .zip(values.chunks(per.max(1)))
    {
        let mut row = vec![Cell::new(dir.to_string().to_uppercase())];
        row.extend(
            chunk
                .iter()
                .map(|v| Cell::new(format!("{:.3}", v)).set_alignment(CellAlignment::Right)),
        );
        table.add_row(row);
    }
    println!("\n{}", title);
    println!("{}", table);
}

pub fn print_training(report: &TrainingReport) {
    let mut table = new_table();
    table.set_header(vec![
        Cell::new("Epoch").add_attribute(Attribute::Bold),
        Cell::new("Mistakes").fg(Color::Red),
        Cell::new("Updates"),
        Cell::new("Mean Gold Rank").fg(Color::Cyan),
    ]);

    for e in &report.epochs {
        table.add_row(vec![
            Cell::new(e.epoch),
            Cell::new(e.mistakes).set_alignment(CellAlignment::Right),
            Cell::new(e.updates).set_alignment(CellAlignment::Right),
            Cell::new(format!("{:.2}", e.mean_gold_rank)).set_alignment(CellAlignment::Right),
        ]);
    }
    println!("\nTraining ({})", if report.converged { "converged" } else { "stopped" });
    println!("{}", table);
    print_feature_vector("Learned weights", &report.weights);
}
