use std::env;
use std::error::Error;
use std::fs;
use std::path::Path;

use glob::glob;
use jsonschema::JSONSchema;
use leaf_schema::InfrastructureFile;
use serde_json::Value;

const SCHEMA_PATH: &str = "leaf_schema/schema/infrastructure.schema.json";
const FIXTURE_PATTERN: &str = "integration_tests/tests/fixtures/infrastructure*.json";

fn main() -> Result<(), Box<dyn Error>> {
    let mut args = env::args().skip(1);
    match args.next().as_deref() {
        Some("schema") => write_schema(),
        Some("validate-fixtures") => validate_fixtures(),
        Some("help") | None => {
            print_usage();
            Ok(())
        }
        Some(cmd) => {
            eprintln!("Unknown xtask '{cmd}'.");
            print_usage();
            std::process::exit(1);
        }
    }
}

fn print_usage() {
    eprintln!("Usage: cargo xtask schema");
    eprintln!("       cargo xtask validate-fixtures");
    eprintln!("       cargo xtask help");
}

fn schema_value() -> Result<Value, Box<dyn Error>> {
    Ok(serde_json::to_value(InfrastructureFile::json_schema())?)
}

fn write_schema() -> Result<(), Box<dyn Error>> {
    let target = Path::new(SCHEMA_PATH);
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)?;
    }
    let rendered = serde_json::to_string_pretty(&schema_value()?)?;
    fs::write(target, format!("{rendered}\n"))?;
    println!("Wrote infrastructure schema to {}", target.display());
    Ok(())
}

fn validate_fixtures() -> Result<(), Box<dyn Error>> {
    let schema = schema_value()?;
    let compiled =
        JSONSchema::compile(&schema).map_err(|err| format!("schema does not compile: {err}"))?;

    let mut checked = 0usize;
    let mut failures = 0usize;
    for entry in glob(FIXTURE_PATTERN)? {
        let path = entry?;
        let instance: Value = serde_json::from_str(&fs::read_to_string(&path)?)?;
        checked += 1;
        if let Err(errors) = compiled.validate(&instance) {
            failures += 1;
            for error in errors {
                eprintln!("{}: {} at {}", path.display(), error, error.instance_path);
            }
            continue;
        }
        // schema-valid files must also pass topology validation
        if let Err(err) = InfrastructureFile::from_json_str(&instance.to_string())
            .and_then(InfrastructureFile::into_timeline)
        {
            failures += 1;
            eprintln!("{}: {err}", path.display());
        }
    }

    if failures > 0 {
        return Err(format!("{failures} of {checked} fixture(s) failed validation").into());
    }
    println!("Validated {checked} fixture(s) against {SCHEMA_PATH}");
    Ok(())
}
