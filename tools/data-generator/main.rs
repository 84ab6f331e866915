use clap::Parser;
use jikko::prelude::*;
use rand::Rng;
use rand::rngs::ThreadRng;
use serde_json::{Map, Value, json};
use std::fs;

/// A CLI tool to generate sample row dumps for the local rule evaluator
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// The path to write the generated JSON file to
    #[arg(short, long, default_value = "generated_rows.json")]
    output: String,

    /// The number of rows to generate
    #[arg(short = 'n', long, default_value_t = 100)]
    count: usize,

    /// Optional path to a property definitions JSON file; a built-in sample
    /// set is used when omitted
    #[arg(short, long)]
    properties: Option<String>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let mut rng = rand::rng();

    let properties: Vec<PropertyDefinition> = match &cli.properties {
        Some(path) => serde_json::from_str(&fs::read_to_string(path)?)?,
        None => sample_properties(),
    };

    println!("Generating {} row(s)...", cli.count);

    let rows: Vec<DataRow> = (0..cli.count)
        .map(|index| generate_row(&mut rng, index as i64 + 1, &properties))
        .collect();

    let json_output = serde_json::to_string_pretty(&rows)?;
    fs::write(&cli.output, json_output)?;

    println!(
        "Successfully generated and saved {} row(s) to '{}'",
        rows.len(),
        cli.output
    );

    Ok(())
}

/// The built-in property set used when no definitions file is provided.
fn sample_properties() -> Vec<PropertyDefinition> {
    vec![
        PropertyDefinition::new("$.status", "Status", PropertyType::String),
        PropertyDefinition::new("$.quantity", "Quantity", PropertyType::Numeric),
        PropertyDefinition::new("$.inspected", "Inspected", PropertyType::Bool),
        PropertyDefinition::new("$.created", "Created", PropertyType::Date),
    ]
}

fn generate_row(rng: &mut ThreadRng, id: i64, properties: &[PropertyDefinition]) -> DataRow {
    let mut values = Map::new();
    for property in properties {
        // Roughly one value in ten is left unset to exercise null handling.
        if rng.random_range(0..10) == 0 {
            continue;
        }
        set_path(&mut values, &property.path, generate_value(rng, property));
    }

    DataRow {
        id,
        tag_id: if rng.random_range(0..4) == 0 {
            None
        } else {
            Some(rng.random_range(1..=5))
        },
        reserved: rng.random_range(0..10) < 3,
        owner: if rng.random_range(0..10) < 3 {
            Some(format!("user{}", rng.random_range(1..=4)))
        } else {
            None
        },
        properties: Value::Object(values),
    }
}

fn generate_value(rng: &mut ThreadRng, property: &PropertyDefinition) -> Value {
    match property.data_type {
        PropertyType::String => {
            let words = ["open", "closed", "pending", "archived", "active"];
            json!(words[rng.random_range(0..words.len())])
        }
        PropertyType::Numeric => json!(rng.random_range(0.0..1000.0)),
        PropertyType::Bool => json!(rng.random_range(0..2) == 1),
        PropertyType::Date => json!(format!(
            "2024-{:02}-{:02}",
            rng.random_range(1..=12),
            rng.random_range(1..=28)
        )),
        PropertyType::Datetime => json!(format!(
            "2024-{:02}-{:02}T{:02}:{:02}:00Z",
            rng.random_range(1..=12),
            rng.random_range(1..=28),
            rng.random_range(0..24),
            rng.random_range(0..60)
        )),
        PropertyType::Time => json!(format!(
            "{:02}:{:02}:00",
            rng.random_range(0..24),
            rng.random_range(0..60)
        )),
        PropertyType::Select => json!(format!("value-{}", rng.random_range(1..=4))),
    }
}

/// Writes a value at a `$.a.b` style path, creating intermediate objects.
fn set_path(values: &mut Map<String, Value>, path: &str, value: Value) {
    let Some(trimmed) = path.strip_prefix("$.") else {
        return;
    };
    let segments: Vec<&str> = trimmed.split('.').collect();
    let mut current = values;
    for segment in &segments[..segments.len() - 1] {
        current = match current
            .entry(segment.to_string())
            .or_insert_with(|| Value::Object(Map::new()))
        {
            Value::Object(map) => map,
            // A non-object intermediate means conflicting paths; skip.
            _ => return,
        };
    }
    if let Some(last) = segments.last() {
        current.insert((*last).to_string(), value);
    }
}
