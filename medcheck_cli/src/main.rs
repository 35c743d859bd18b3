use clap::{Parser, Subcommand};
use medcheck_core::*;
use std::io::{self, Write};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "medcheck")]
#[command(about = "Drug composition, overdose, and interaction checker", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Override formulary file (TOML)
    #[arg(long, global = true)]
    formulary: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Check a list of drugs for overdose and interaction risks (default)
    Check {
        /// Drug names, case-sensitive as listed in the formulary
        #[arg(required = true)]
        drugs: Vec<String>,

        /// Emit the report as JSON instead of formatted text
        #[arg(long)]
        json: bool,
    },

    /// List the drugs known to the formulary
    Drugs,
}

fn main() -> Result<()> {
    // Initialize logging
    medcheck_core::logging::init();

    let cli = Cli::parse();

    let config = Config::load()?;
    let formulary_path = cli.formulary.or_else(|| config.formulary.path.clone());

    // Load reference tables: an explicit file wins over the built-ins
    let loaded;
    let formulary = match &formulary_path {
        Some(path) => {
            loaded = Formulary::load_from(path)?;
            &loaded
        }
        None => default_formulary(),
    };

    let errors = formulary.validate();
    if !errors.is_empty() {
        eprintln!("Formulary validation errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        return Err(Error::FormularyValidation("Invalid formulary".into()));
    }

    match cli.command {
        Some(Commands::Check { drugs, json }) => {
            cmd_check(formulary, &drugs, json || config.report.json)
        }
        Some(Commands::Drugs) => {
            cmd_drugs(formulary);
            Ok(())
        }
        None => {
            // Default to interactive entry
            let drugs = prompt_drug_names()?;
            cmd_check(formulary, &drugs, config.report.json)
        }
    }
}

fn cmd_check(formulary: &Formulary, drugs: &[String], json: bool) -> Result<()> {
    let report = check_drugs(formulary, drugs)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        display_report(&report);
    }

    Ok(())
}

fn cmd_drugs(formulary: &Formulary) {
    let mut names: Vec<&String> = formulary.drugs.keys().collect();
    names.sort();

    println!("Known drugs:");
    for name in names {
        let drug = &formulary.drugs[name];
        println!("  {}: {}", drug.name, format_composition(&drug.composition));
    }
}

fn display_report(report: &DrugReport) {
    println!("\n╭─────────────────────────────────────────╮");
    println!("│  DRUG CHECK REPORT");
    println!("╰─────────────────────────────────────────╯");
    println!();

    println!("  Compositions:");
    for entry in &report.compositions {
        println!(
            "    {}: {}",
            entry.drug,
            format_composition(&entry.composition)
        );
    }

    println!();
    println!("  Component totals:");
    for total in &report.totals {
        println!("    {}: {}mg", total.component, total.total_mg);
    }

    println!();
    if report.warnings.is_empty() {
        println!("  ✓ No overdose detected.");
    } else {
        println!("  ⚠ Overdose warnings:");
        for warning in &report.warnings {
            println!(
                "    {}: {}mg - {}",
                warning.component, warning.total_mg, warning.message
            );
        }
    }

    println!();
    if report.interactions.is_empty() {
        println!("  ✓ No interactions found.");
    } else {
        println!("  ⚠ Interactions found:");
        for interaction in &report.interactions {
            println!(
                "    {} + {}: {}",
                interaction.between[0], interaction.between[1], interaction.effect
            );
        }
    }

    println!();
    println!("  Side effects:");
    for entry in &report.side_effects {
        println!("    {}: {}", entry.component, entry.effects.join(", "));
    }

    println!();
}

fn format_composition(composition: &[ComponentDose]) -> String {
    composition
        .iter()
        .map(|dose| format!("{} {}mg", dose.component, dose.mg))
        .collect::<Vec<_>>()
        .join(" + ")
}

fn prompt_drug_names() -> Result<Vec<String>> {
    println!("Enter drug names separated by commas (e.g. Combiflam,Crocin)");
    print!("> ");
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;

    let names = input
        .split(',')
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty())
        .collect();

    Ok(names)
}
