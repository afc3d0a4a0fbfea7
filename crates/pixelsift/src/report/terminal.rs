use std::time::Duration;

use crate::engine::{BatchEntry, ComparisonResult};

pub fn format_duration(d: Duration) -> String {
    let ms = d.as_millis();
    if ms < 1000 {
        format!("{ms}ms")
    } else {
        format!("{:.1}s", d.as_secs_f64())
    }
}

/// Print a single comparison result line.
pub fn print_result(name: &str, result: &ComparisonResult) {
    if result.ok {
        if result.diff_pixels == 0 {
            println!("  \x1b[32mPASS\x1b[0m  {name}");
        } else {
            println!(
                "  \x1b[32mPASS\x1b[0m  {name}  ({} pixels differ, none significant)",
                result.diff_pixels
            );
        }
    } else {
        let counts = &result.details.analysis;
        println!(
            "  \x1b[31mFAIL\x1b[0m  {name}  ({} significant pixels in {} cluster(s), {:.2}% of canvas differs)",
            counts.significant_pixels,
            counts.significant_clusters,
            result.score * 100.0,
        );
    }
}

pub fn print_error_line(name: &str, msg: &str) {
    println!("  \x1b[31m ERR\x1b[0m  {name}  ({msg})");
}

pub fn print_batch_line(entry: &BatchEntry) {
    match &entry.outcome {
        Ok(result) => print_result(&entry.name, result),
        Err(e) => print_error_line(&entry.name, &e.to_string()),
    }
}

/// Print the final batch summary.
pub fn print_summary(
    total: usize,
    passed: usize,
    failed: usize,
    errored: usize,
    elapsed: Duration,
) {
    println!();
    print!(
        "Pairs:  {total} total, \x1b[32m{passed} passed\x1b[0m, \x1b[31m{failed} failed\x1b[0m"
    );
    if errored > 0 {
        print!(", \x1b[31m{errored} errored\x1b[0m");
    }
    println!();
    println!("Time:   {}", format_duration(elapsed));

    if failed > 0 {
        println!();
        println!("{failed} pair(s) have significant visual differences.");
    }
    if errored > 0 {
        println!("{errored} pair(s) could not be compared.");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn durations_format_compactly() {
        assert_eq!(format_duration(Duration::from_millis(420)), "420ms");
        assert_eq!(format_duration(Duration::from_millis(2500)), "2.5s");
    }
}
