//! ターミナルへの表示

use back2wo_common::catalog::{COST_SAVINGS_NOTE, FINDINGS, SUPPLIERS};
use back2wo_common::script::{STATUS_ANALYZING, STATUS_DEAL};
use back2wo_common::{RevealedLine, Speaker, TimelineEntry, TimelineEvent};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

pub fn print_banner() {
    println!("✨ Back2Wo - Centsible AI Agent Marketplace\n");
}

/// 解析中スピナー
pub fn analyzing_spinner(file_name: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(format!("{} ({})", STATUS_ANALYZING, file_name));
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

pub fn format_line(line: &RevealedLine) -> String {
    let label = line.speaker.label();
    match line.speaker {
        Speaker::Seller => format!("🤖 [{}] {}", label, line.text),
        Speaker::Buyer => format!("   [{}] {} 🤖", label, line.text),
    }
}

pub fn print_line(line: &RevealedLine) {
    println!("{}\n", format_line(line));
}

pub fn print_deal() {
    println!("{}\n", STATUS_DEAL);
}

pub fn print_analysis_panel() {
    println!("📊 Product Analysis");
    for finding in &FINDINGS {
        println!("  - {}: {}", finding.title, finding.detail);
    }

    println!("\n🌱 Sustainable Suppliers");
    for supplier in &SUPPLIERS {
        println!(
            "  - {} [{}] {} / {} per unit / ★ {} / {}",
            supplier.name,
            supplier.certification,
            supplier.location,
            supplier.price_label(),
            supplier.rating,
            supplier.sustainability_label(),
        );
    }
    println!("\n💲 {}\n", COST_SAVINGS_NOTE);
}

pub fn format_timeline_entry(entry: &TimelineEntry) -> String {
    let at = format!("{:>6}ms", entry.at_ms);
    match &entry.event {
        TimelineEvent::Submitted { generation, mime } => {
            format!("{} #{} submitted ({})", at, generation, mime)
        }
        TimelineEvent::Reset => format!("{} reset", at),
        TimelineEvent::AnalysisFinished { generation } => {
            format!("{} #{} analysis finished", at, generation)
        }
        TimelineEvent::Revealed { generation, index, speaker, text } => {
            format!("{} #{} line {} [{}] {}", at, generation, index + 1, speaker, text)
        }
    }
}
