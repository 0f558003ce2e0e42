//! Console formatting for CLI reports

use crate::pipeline::{MetricsSummary, TrainingResult};

/// Print a section header
pub fn print_section(title: &str) {
    println!("\n{}", "=".repeat(60));
    println!("{title}");
    println!("{}", "=".repeat(60));
}

/// Format a number with thousands separators
pub fn format_number(n: usize) -> String {
    let s = n.to_string();
    let mut result = String::new();
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i.is_multiple_of(3) {
            result.insert(0, ',');
        }
        result.insert(0, c);
    }
    result
}

/// Print a key-value pair
pub fn print_kv(key: &str, value: &str) {
    println!("  {:20} {}", format!("{}:", key), value);
}

pub fn print_training_result(title: &str, result: &TrainingResult) {
    print_section(title);
    print_kv("Episodes", &format_number(result.total_episodes));
    print_kv("Steps", &format_number(result.total_steps));
    if result.truncated_episodes > 0 {
        print_kv("Truncated", &format_number(result.truncated_episodes));
    }
    print_kv("Best score", &result.best_score.to_string());
    print_kv("Mean score", &format!("{:.2}", result.mean_score));
    print_kv("Mean reward", &format!("{:.2}", result.mean_reward));
    print_kv("Final epsilon", &format!("{:.4}", result.final_epsilon));
}

pub fn print_metrics(metrics: &MetricsSummary) {
    print_kv(
        "Moving avg score",
        &format!("{:.2}", metrics.moving_average_score),
    );
    print_kv(
        "Mean length",
        &format!("{:.1}", metrics.mean_episode_length),
    );
    print_kv("Jump rate", &format!("{:.1}%", metrics.jump_rate * 100.0));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(20_000), "20,000");
        assert_eq!(format_number(1_234_567), "1,234,567");
    }
}
