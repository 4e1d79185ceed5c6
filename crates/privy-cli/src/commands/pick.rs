use std::path::Path;

use colored::Colorize;
use comfy_table::{ContentArrangement, Table};
use privy_core::{Member, MemberInventory};
use serde::Serialize;
use tracing::debug;

use super::OutputFormat;
use crate::config::PickConfig;

/// How often one member was drawn.
#[derive(Debug, Serialize)]
struct Tally {
    member: String,
    kind: &'static str,
    picks: usize,
}

/// The outcome of a sampling run.
#[derive(Debug, Serialize)]
struct PickReport {
    #[serde(rename = "type")]
    type_name: String,
    seed: u64,
    draws: usize,
    expected_field_share: f64,
    observed_field_share: f64,
    members: Vec<Tally>,
}

pub fn run(path: &Path, type_name: &str, config: &PickConfig, format: &str) -> Result<(), String> {
    let format = OutputFormat::parse(format)?;
    let source = super::load(path)?;
    let inv = MemberInventory::create_by_name(&source, type_name).map_err(|e| e.to_string())?;
    if !inv.has_private_members() {
        return Err(format!(
            "{} has no private fields or behaviors",
            inv.described_type()
        ));
    }

    let report = sample(&inv, config)?;
    match format {
        OutputFormat::Json => println!("{}", super::to_json(&report)?),
        OutputFormat::Table => print_report(&report),
    }
    Ok(())
}

fn sample(inv: &MemberInventory, config: &PickConfig) -> Result<PickReport, String> {
    let mut rng = config.randomness();
    let field_count = inv.fields().len();
    let mut picks = vec![0usize; field_count + inv.behaviors().len()];

    for _ in 0..config.draws {
        let slot = match inv.choose_member(&mut rng).map_err(|e| e.to_string())? {
            Member::Field(field) => inv.fields().iter().position(|f| std::ptr::eq(f, field)),
            Member::Behavior(behavior) => inv
                .behaviors()
                .iter()
                .position(|b| std::ptr::eq(b, behavior))
                .map(|idx| field_count + idx),
        };
        if let Some(slot) = slot {
            picks[slot] += 1;
        }
    }

    let field_picks: usize = picks[..field_count].iter().sum();
    debug!(
        ty = %inv.described_type(),
        draws = config.draws,
        field_picks,
        seed = rng.seed(),
        "sampling finished"
    );

    let fields = inv.fields().iter().map(|f| ("field", format!("{}: {}", f.name, f.value_type)));
    let behaviors = inv.behaviors().iter().map(|b| ("behavior", b.signature()));
    let members = fields
        .chain(behaviors)
        .zip(picks)
        .map(|((kind, member), picks)| Tally {
            member,
            kind,
            picks,
        })
        .collect();

    Ok(PickReport {
        type_name: inv.described_type().to_string(),
        seed: config.seed,
        draws: config.draws,
        expected_field_share: inv.field_ratio().unwrap_or(0.0),
        observed_field_share: field_picks as f64 / config.draws as f64,
        members,
    })
}

fn print_report(report: &PickReport) {
    println!(
        "  {} '{}' {}",
        "Sampled".bold(),
        report.type_name,
        format!("({} draws, seed={})", report.draws, report.seed).dimmed()
    );
    println!();

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Member", "Kind", "Picks", "Share"]);
    for tally in &report.members {
        let share = tally.picks as f64 / report.draws as f64;
        table.add_row(vec![
            tally.member.clone(),
            tally.kind.to_string(),
            tally.picks.to_string(),
            format!("{:.1}%", share * 100.0),
        ]);
    }
    println!("{table}");
    println!();
    println!(
        "  field share: observed {:.3}, expected {:.3}",
        report.observed_field_share, report.expected_field_share
    );
}
