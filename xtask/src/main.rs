//! Developer tasks (schema generation, golden report checks).
//!
//! Keeping this separate avoids bloating the end-user CLI.

use anyhow::{Context, bail};
use hostguard_test_util::normalize_nondeterministic;
use schemars::schema_for;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

const GOLDEN_FILE: &str = "expected.report.json";

fn project_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("..")
}

fn schemas_dir() -> PathBuf {
    project_root().join("schemas")
}

fn fixtures_dir() -> PathBuf {
    project_root().join("tests").join("fixtures")
}

/// Schema definition with its target filename.
struct SchemaSpec {
    filename: &'static str,
    generate: fn() -> schemars::Schema,
}

fn generate_report_schema() -> schemars::Schema {
    schema_for!(hostguard_types::RunReport)
}

fn generate_config_schema() -> schemars::Schema {
    schema_for!(hostguard_settings::HostguardConfigV1)
}

fn schema_specs() -> Vec<SchemaSpec> {
    vec![
        SchemaSpec {
            filename: "hostguard.report.v1.json",
            generate: generate_report_schema,
        },
        SchemaSpec {
            filename: "hostguard.config.v1.json",
            generate: generate_config_schema,
        },
    ]
}

/// Serialize a schema to pretty-printed JSON with trailing newline.
fn serialize_schema(schema: &schemars::Schema) -> anyhow::Result<String> {
    let mut json = serde_json::to_string_pretty(schema).context("Failed to serialize schema")?;
    json.push('\n');
    Ok(json)
}

fn emit_schemas() -> anyhow::Result<()> {
    let dir = schemas_dir();
    fs::create_dir_all(&dir).context("Failed to create schemas directory")?;

    for spec in schema_specs() {
        let json = serialize_schema(&(spec.generate)())?;
        let path = dir.join(spec.filename);
        fs::write(&path, &json)
            .with_context(|| format!("Failed to write schema to {}", path.display()))?;
        println!("Wrote {}", path.display());
    }
    Ok(())
}

/// Check that the committed schemas match what the types generate.
fn validate_schemas() -> anyhow::Result<()> {
    let dir = schemas_dir();
    let mut stale = Vec::new();

    for spec in schema_specs() {
        let path = dir.join(spec.filename);
        let expected = serialize_schema(&(spec.generate)())?;
        match fs::read_to_string(&path) {
            Ok(actual) if actual == expected => {}
            Ok(_) => stale.push(format!("{} (out of date)", spec.filename)),
            Err(_) => stale.push(format!("{} (missing)", spec.filename)),
        }
    }

    if stale.is_empty() {
        println!("All schemas are up to date.");
        return Ok(());
    }
    for name in &stale {
        eprintln!("  - {name}");
    }
    eprintln!("\nRun `cargo xtask emit-schemas` to regenerate.");
    bail!("Schema validation failed")
}

fn hostguard_bin() -> anyhow::Result<PathBuf> {
    let bin = project_root()
        .join("target")
        .join("debug")
        .join(format!("hostguard{}", std::env::consts::EXE_SUFFIX));
    if !bin.exists() {
        bail!(
            "hostguard binary not found at {}.\nRun `cargo build -p hostguard-cli` first.",
            bin.display()
        );
    }
    Ok(bin)
}

fn policy_file(dir: &Path) -> Option<PathBuf> {
    ["yml", "yaml", "json", "toml"]
        .iter()
        .map(|ext| dir.join(format!("hostguard-policy.{ext}")))
        .find(|p| p.is_file())
}

/// Run the built binary over every fixture with a golden report, validate each report against
/// the generated schema and compare it (normalized) with the golden file. `bless` rewrites the
/// golden files instead of comparing.
fn golden(bless: bool) -> anyhow::Result<()> {
    let bin = hostguard_bin()?;
    let schema = serde_json::to_value(generate_report_schema()).context("report schema")?;
    let validator = jsonschema::validator_for(&schema)
        .map_err(|e| anyhow::anyhow!("Failed to compile report schema: {e}"))?;

    let mut errors = Vec::new();
    let mut checked = 0;

    let mut dirs: Vec<PathBuf> = fs::read_dir(fixtures_dir())
        .context("Failed to read tests/fixtures/")?
        .filter_map(|e| e.ok().map(|e| e.path()))
        .filter(|p| p.join(GOLDEN_FILE).exists() || (bless && policy_file(p).is_some()))
        .collect();
    dirs.sort();

    for dir in dirs {
        let name = dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let Some(policy) = policy_file(&dir) else {
            errors.push(format!("fixture '{name}': no hostguard-policy.* file"));
            continue;
        };

        let scratch = tempfile::tempdir().context("Failed to create temp dir")?;
        for entry in fs::read_dir(&dir)? {
            let entry = entry?;
            if entry.file_name() != GOLDEN_FILE {
                fs::copy(entry.path(), scratch.path().join(entry.file_name()))?;
            }
        }

        let policy_name = policy
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let output = std::process::Command::new(&bin)
            .current_dir(scratch.path())
            .args([
                "check",
                "--policy",
                &policy_name,
                "--no-prompt",
                "--color",
                "never",
                "--report-out",
                "report.json",
            ])
            .output()
            .with_context(|| format!("Failed to run hostguard on fixture '{name}'"))?;
        if !output.status.success() {
            errors.push(format!(
                "fixture '{name}': hostguard exited with {:?}: {}",
                output.status.code(),
                String::from_utf8_lossy(&output.stderr)
            ));
            continue;
        }

        let text = fs::read_to_string(scratch.path().join("report.json"))
            .with_context(|| format!("fixture '{name}': no report written"))?;
        let report: Value = serde_json::from_str(&text)
            .with_context(|| format!("fixture '{name}': report is not JSON"))?;
        for err in validator.iter_errors(&report) {
            errors.push(format!("fixture '{name}': schema validation: {err}"));
        }

        let normalized = normalize_nondeterministic(report);
        let golden_path = dir.join(GOLDEN_FILE);
        if bless {
            let mut json = serde_json::to_string_pretty(&normalized)?;
            json.push('\n');
            fs::write(&golden_path, json)
                .with_context(|| format!("Failed to write {}", golden_path.display()))?;
            println!("  blessed {name}");
        } else {
            let golden: Value = serde_json::from_str(&fs::read_to_string(&golden_path)?)
                .with_context(|| format!("fixture '{name}': golden file is not JSON"))?;
            if golden == normalized {
                println!("  ok {name}");
            } else {
                errors.push(format!("fixture '{name}': report differs from {GOLDEN_FILE}"));
            }
        }
        checked += 1;
    }

    if !errors.is_empty() {
        eprintln!("\nGolden report errors:");
        for err in &errors {
            eprintln!("  - {err}");
        }
        bail!("{} fixture(s) failed", errors.len());
    }
    if checked == 0 {
        bail!("No fixtures with {GOLDEN_FILE} in {}", fixtures_dir().display());
    }
    println!("\n{checked} fixture report(s) checked.");
    Ok(())
}

fn print_help() {
    eprintln!("xtask commands:");
    eprintln!("  help              Show this message");
    eprintln!("  emit-schemas      Generate JSON schemas from Rust types to schemas/");
    eprintln!("  validate-schemas  Check if schemas/ matches generated output (for CI)");
    eprintln!("  print-schema-ids  Print known schema IDs");
    eprintln!("  golden [--bless]  Compare fixture run reports with tests/fixtures/*/{GOLDEN_FILE}");
}

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let cmd = args.get(1).map(|s| s.as_str()).unwrap_or("help");

    match cmd {
        "help" | "--help" | "-h" => {
            print_help();
            Ok(())
        }
        "emit-schemas" => emit_schemas(),
        "validate-schemas" => validate_schemas(),
        "golden" => golden(args.iter().any(|a| a == "--bless")),
        "print-schema-ids" => {
            for spec in schema_specs() {
                println!("{}", spec.filename.trim_end_matches(".json"));
            }
            Ok(())
        }
        other => bail!("unknown xtask command: {other}\n\nRun `cargo xtask help` for usage."),
    }
    .context("xtask failed")
}
