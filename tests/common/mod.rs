// Each test binary compiles this module separately and uses a different subset.
#![allow(dead_code)]

use rand::Rng;
use std::fs::File;
use std::io::Error;
use std::path::Path;

pub const HEADER: [&str; 7] = [
    "id",
    "description",
    "amount",
    "paid_by",
    "split_among",
    "date",
    "created_at",
];

pub fn member_name(index: usize) -> String {
    format!("member{index:02}")
}

/// Writes `rows` random expenses shared among `members` people.
///
/// Roughly a third of the rows leave `split_among` empty so they fall back to the roster.
pub fn generate_expenses_csv(path: &Path, rows: usize, members: usize) -> Result<(), Error> {
    let file = File::create(path)?;
    let mut wtr = csv::WriterBuilder::new().from_writer(file);
    let mut rng = rand::thread_rng();

    wtr.write_record(HEADER)?;

    for i in 1..=rows {
        let cents: i64 = rng.gen_range(1..=500_000);
        let payer = member_name(rng.gen_range(0..members));
        let split = if rng.gen_range(0..3) == 0 {
            String::new()
        } else {
            (0..members)
                .filter(|_| rng.gen_bool(0.5))
                .map(member_name)
                .collect::<Vec<_>>()
                .join(";")
        };

        wtr.write_record([
            i.to_string(),
            format!("expense {i}"),
            format!("{}.{:02}", cents / 100, cents % 100),
            payer,
            split,
            "2024-05-01".to_string(),
            i.to_string(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
