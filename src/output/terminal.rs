use colored::*;
use serde_json::Value;

use crate::models::ExecutionOutcome;

/// Pretty-print one execution outcome for the terminal.
pub fn print_outcome(outcome: &ExecutionOutcome) {
    print_header(outcome);
    print_logs_section(&outcome.logs);
    print_result_section(outcome);
}

fn print_header(outcome: &ExecutionOutcome) {
    let status = if outcome.ok {
        "OK".green().bold()
    } else {
        "FAILED".red().bold()
    };
    println!(
        "{} {} {}",
        status,
        "·".bright_black(),
        format!("{}ms", outcome.elapsed_ms).bright_black()
    );
    println!();
}

fn print_logs_section(logs: &[Vec<Value>]) {
    if logs.is_empty() {
        return;
    }

    println!("{}", "── Output ───────────────────────────────────────────────────".bright_black());

    for entry in logs {
        let rendered: Vec<String> = entry.iter().map(render_value).collect();
        println!("  {} {}", "›".bright_black(), rendered.join(" "));
    }

    println!();
}

fn print_result_section(outcome: &ExecutionOutcome) {
    if let Some(ref error) = outcome.error {
        println!("{}", "── Error ────────────────────────────────────────────────────".bright_black());
        println!("  {} {}", "✖".red(), error.red());
        println!();
        return;
    }

    println!("{}", "── Result ───────────────────────────────────────────────────".bright_black());
    match outcome.result {
        Some(ref value) => println!("  {}", render_value(value).cyan()),
        None => println!("  {}", "(no result set)".bright_black()),
    }
    println!();
}

fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_render_value_strings_unquoted() {
        assert_eq!(render_value(&json!("hello")), "hello");
        assert_eq!(render_value(&json!({"a": 1})), r#"{"a":1}"#);
        assert_eq!(render_value(&json!(42)), "42");
    }
}
