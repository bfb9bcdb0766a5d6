//! Output formatting for the CLI.
//!
//! Human output goes to stdout, diagnostics to stderr. In JSON mode only
//! [`Output::json`] and errors print anything.

use console::{style, StyledObject};
use dash_commerce::{Currency, Money};

/// Output handler for CLI messages.
#[derive(Clone)]
pub struct Output {
    json: bool,
}

impl Output {
    pub fn new(_verbose: bool, json: bool) -> Self {
        Self { json }
    }

    fn say(&self, marker: StyledObject<&str>, msg: &str) {
        if !self.json {
            println!("{} {}", marker, msg);
        }
    }

    pub fn info(&self, msg: &str) {
        self.say(style("ℹ").blue(), msg);
    }

    pub fn success(&self, msg: &str) {
        self.say(style("✓").green(), msg);
    }

    /// Warnings go to stderr.
    pub fn warn(&self, msg: &str) {
        if !self.json {
            eprintln!("{} {}", style("⚠").yellow(), msg);
        }
    }

    /// Errors print in both modes; in JSON mode as `{"error": ...}`.
    pub fn error(&self, msg: &str) {
        if self.json {
            eprintln!("{}", serde_json::json!({ "error": msg }));
        } else {
            eprintln!("{} {}", style("✗").red(), style(msg).red());
        }
    }

    pub fn header(&self, msg: &str) {
        if !self.json {
            println!("\n{}", style(msg).bold().underlined());
        }
    }

    /// Pretty-printed JSON, regardless of mode.
    pub fn json<T: serde::Serialize>(&self, value: &T) {
        if let Ok(json) = serde_json::to_string_pretty(value) {
            println!("{}", json);
        }
    }

    pub fn kv(&self, key: &str, value: &str) {
        if !self.json {
            println!("  {}: {}", style(key).dim(), value);
        }
    }

    pub fn list_item(&self, item: &str) {
        if !self.json {
            println!("  {} {}", style("•").dim(), item);
        }
    }

    /// Columns padded to `widths`.
    pub fn table_row(&self, cols: &[&str], widths: &[usize]) {
        if self.json {
            return;
        }
        let row = cols
            .iter()
            .zip(widths)
            .map(|(col, width)| format!("{:width$}", col, width = *width))
            .collect::<Vec<_>>()
            .join("  ");
        println!("  {}", row);
    }

    pub fn is_json(&self) -> bool {
        self.json
    }
}

/// Availability badge for a voucher.
pub fn voucher_badge(available: bool) -> String {
    if available {
        style("available").green().to_string()
    } else {
        style("unavailable").dim().to_string()
    }
}

/// Right-aligned amount, negative amounts in red.
pub fn format_amount(amount: Money, currency: Currency) -> String {
    let text = format!("{:>12}", amount.display(currency));
    if amount.is_negative() {
        style(text).red().to_string()
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_amount_pads() {
        console::set_colors_enabled(false);
        assert_eq!(format_amount(Money::new(49_000), Currency::VND), "     49.000đ");
    }
}
