use std::path::Path;

use colored::Colorize;
use comfy_table::{ContentArrangement, Table};
use privy_core::MemberInventory;

use super::OutputFormat;

pub fn run(path: &Path, type_name: Option<&str>, format: &str) -> Result<(), String> {
    let format = OutputFormat::parse(format)?;
    let source = super::load(path)?;

    let inventories = match type_name {
        Some(name) => vec![MemberInventory::create_by_name(&source, name).map_err(|e| e.to_string())?],
        None => source
            .catalog()
            .types()
            .iter()
            .map(|t| MemberInventory::create(&source, Some(&t.descriptor)))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| e.to_string())?,
    };

    match format {
        OutputFormat::Json => println!("{}", super::to_json(&inventories)?),
        OutputFormat::Table => print_tables(&inventories),
    }

    Ok(())
}

fn print_tables(inventories: &[MemberInventory]) {
    if inventories.is_empty() {
        println!("  No types found.");
        return;
    }

    for inv in inventories {
        println!(
            "  {} {}",
            inv.described_type().to_string().bold(),
            format!(
                "[{} private field{}, {} private behavior{}]",
                inv.fields().len(),
                if inv.fields().len() == 1 { "" } else { "s" },
                inv.behaviors().len(),
                if inv.behaviors().len() == 1 { "" } else { "s" },
            )
            .dimmed()
        );

        if !inv.has_private_members() {
            println!("  No private members.");
            println!();
            continue;
        }

        let mut table = Table::new();
        table.set_content_arrangement(ContentArrangement::Dynamic);
        table.set_header(vec!["Kind", "Scope", "Member"]);
        for field in inv.fields() {
            table.add_row(vec![
                "field".to_string(),
                field.scope.to_string(),
                format!("{}: {}", field.name, field.value_type),
            ]);
        }
        for behavior in inv.behaviors() {
            table.add_row(vec![
                "behavior".to_string(),
                behavior.scope.to_string(),
                behavior.signature(),
            ]);
        }
        println!("{table}");
        println!();
    }

    let with_private = inventories.iter().filter(|i| i.has_private_members()).count();
    println!(
        "  {} type{}, {} with private members",
        inventories.len(),
        if inventories.len() == 1 { "" } else { "s" },
        with_private
    );
}
