//! Startup banner

use owo_colors::OwoColorize;

const RULE_WIDTH: usize = 60;

/// Plain banner lines: rule, title, version, rule
pub fn banner_lines(version: &str) -> [String; 4] {
    let rule = "=".repeat(RULE_WIDTH);
    [
        rule.clone(),
        "  BOOTFIX - Boot Repair & Recovery Utility".to_string(),
        format!("  Version {}", version),
        rule,
    ]
}

pub fn print_banner(version: &str) {
    let [top, title, version_line, bottom] = banner_lines(version);
    println!("{}", top.dimmed());
    println!("{}", title.bold());
    println!("{}", version_line.cyan());
    println!("{}", bottom.dimmed());
    println!();
}
