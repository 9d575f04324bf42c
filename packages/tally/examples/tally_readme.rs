//! Example that demonstrates the basic usage of the `tally` crate:
//! record observations, take a snapshot and query it.

use tally::{Query, Recorder};

fn main() {
    println!("=== Tally README Example ===");

    let mut recorder = Recorder::new();

    for value in [3, 9, 3, 4, 6] {
        recorder
            .record(value)
            .expect("example values are within the default capacity");
    }

    let snapshot = recorder.snapshot();

    println!("{snapshot}");

    for text in ["less 4", "greater 4", "between 3 6", "less -1", "between a 6"] {
        let answer = text
            .parse::<Query>()
            .map_err(tally::Error::from)
            .and_then(|query| snapshot.answer(&query));

        match answer {
            Ok(count) => println!("{text}: {count}"),
            Err(error) => println!("{text}: rejected ({error})"),
        }
    }
}
