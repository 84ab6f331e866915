use clap::Parser;
use jikko::prelude::*;
use std::fs;
use std::time::Instant;

/// A rule-driven bulk task execution core CLI: validates a saved filter
/// against a property list and evaluates it locally over a row dump.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to the filter JSON file (a stored filter configuration, or a
    /// bare logic expression)
    filter_path: String,
    /// Path to the property definitions JSON file
    properties_path: String,
    /// Optional path to a row dump JSON file to evaluate against
    rows_path: Option<String>,

    /// Optional path to a catalog JSON file providing tags, users and
    /// enumerations for the query configuration
    #[arg(short, long)]
    catalog: Option<String>,

    /// Print every matching row instead of just the count
    #[arg(short, long)]
    list: bool,
}

fn main() {
    let cli = Cli::parse();
    let total_start = Instant::now();

    // --- 1. File Loading ---
    let load_start = Instant::now();
    let filter_json = read_file(&cli.filter_path);
    let properties_json = read_file(&cli.properties_path);
    let catalog: Catalog = match &cli.catalog {
        Some(path) => parse_json(&read_file(path), path),
        None => Catalog::default(),
    };
    let properties: Vec<PropertyDefinition> = parse_json(&properties_json, &cli.properties_path);
    let load_duration = load_start.elapsed();

    // --- 2. Configuration and Validation ---
    let check_start = Instant::now();
    let config = build_config(&properties, &catalog.tags, &catalog.users, &catalog.enums);
    let (stored_logic, stored_tree) = parse_filter(&filter_json, &cli.filter_path);
    let checked = initial_tree(stored_logic.as_ref(), stored_tree.as_ref(), &config);
    let check_duration = check_start.elapsed();

    for dropped in &checked.dropped {
        eprintln!("Warning: dropped condition: {}", dropped.reason);
    }

    println!("Rule: {}", RuleFormatter::format_tree(&checked.tree));
    match to_logic(&checked.tree) {
        Some(logic) => println!("Logic: {logic}"),
        None => println!("Logic: <none> (matches all rows)"),
    }

    // --- 3. Local Evaluation ---
    if let Some(rows_path) = &cli.rows_path {
        let eval_start = Instant::now();
        let rows: Vec<DataRow> = parse_json(&read_file(rows_path), rows_path);
        let matching = matching_rows(&checked.tree, &rows);
        let eval_duration = eval_start.elapsed();

        println!(
            "\n{} of {} row(s) match the rule",
            matching.len(),
            rows.len()
        );
        if cli.list {
            for row in &matching {
                println!("  - row {}", row.id);
            }
        }

        println!("\n--- Performance Summary ---");
        println!("File Loading:  {:?}", load_duration);
        println!("Validation:    {:?}", check_duration);
        println!("Evaluation:    {:?}", eval_duration);
        println!("---------------------------");
        println!("Total:         {:?}", total_start.elapsed());
    }
}

/// Accepts either a full stored filter configuration or a bare logic
/// expression.
fn parse_filter(json: &str, path: &str) -> (Option<LogicExpression>, Option<RuleNode>) {
    if let Ok(configuration) = serde_json::from_str::<FilterConfiguration>(json) {
        if configuration.logic.is_some() || configuration.tree.is_some() {
            return (configuration.logic, configuration.tree);
        }
    }
    let value: serde_json::Value = parse_json(json, path);
    (Some(LogicExpression::new(value)), None)
}

fn read_file(path: &str) -> String {
    fs::read_to_string(path)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to read file '{}': {}", path, e)))
}

fn parse_json<T: serde::de::DeserializeOwned>(json: &str, path: &str) -> T {
    serde_json::from_str(json)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to parse '{}': {}", path, e)))
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("\nError: {}", message);
    std::process::exit(1);
}
