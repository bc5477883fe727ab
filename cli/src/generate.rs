#![deny(missing_docs)]

//! # Generate Command
//!
//! Implements the pipeline: load documents -> pre-passes -> resolve ->
//! write `.ts` model files.
//!
//! 1. **Load**: Inputs may be individual documents or directories, which
//!    are walked for `.yaml` / `.yml` / `.json` files. Every document is
//!    registered under its path, so cross-document references resolve
//!    against the same keys.
//! 2. **Prepare**: Discriminator propagation and the all-of pre-merge run
//!    once over the whole set.
//! 3. **Emit**: Each document becomes one `.ts` file containing every
//!    generated artifact, preceded by import statements for artifacts that
//!    live in other documents' output files.

use std::fs;
use std::path::{Path, PathBuf};

use tsgen_core::{
    combined_imports, generate_all, DocumentSet, GenError, GenResult, GeneratedSchema, Import,
    OutputOptions, ResolverContext,
};
use walkdir::WalkDir;

/// Arguments for the generate command.
#[derive(clap::Args, Debug, Clone)]
pub struct GenerateArgs {
    /// Input documents or directories to scan for documents.
    #[clap(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Output directory for generated model files.
    #[clap(long, short, env = "TSGEN_OUTPUT", default_value = "models")]
    pub output: PathBuf,

    /// Map date/date-time formatted strings to `Date` instead of `string`.
    #[clap(long)]
    pub use_dates: bool,
}

/// Executes the generation pipeline.
pub fn execute(args: &GenerateArgs) -> GenResult<()> {
    let mut specs = DocumentSet::new();
    for input in &args.inputs {
        load_input(input, &mut specs)?;
    }
    if specs.first_key().is_none() {
        return Err(GenError::General(
            "no API description documents found in the given inputs".to_string(),
        ));
    }

    specs.prepare()?;

    fs::create_dir_all(&args.output)?;

    let options = OutputOptions {
        use_dates: args.use_dates,
        ..OutputOptions::default()
    };

    let keys: Vec<String> = specs.iter().map(|(key, _)| key.clone()).collect();
    for key in keys {
        let ctx = ResolverContext::new(&specs, key.clone(), options.clone());
        let artifacts = generate_all(&ctx)?;
        if artifacts.is_empty() {
            continue;
        }
        let path = args.output.join(format!("{}.ts", file_stem(&key)));
        fs::write(&path, render_file(&artifacts))?;
        println!("Generated {} ({} artifacts)", path.display(), artifacts.len());
    }

    Ok(())
}

/// Registers one input path: a single document, or every document found
/// under a directory.
fn load_input(input: &Path, specs: &mut DocumentSet) -> GenResult<()> {
    if input.is_dir() {
        for entry in WalkDir::new(input).sort_by_file_name() {
            let entry = entry.map_err(|e| GenError::General(e.to_string()))?;
            if entry.file_type().is_file() && is_document(entry.path()) {
                register_document(entry.path(), specs)?;
            }
        }
        Ok(())
    } else {
        register_document(input, specs)
    }
}

fn is_document(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml") | Some("json")
    )
}

fn register_document(path: &Path, specs: &mut DocumentSet) -> GenResult<()> {
    let text = fs::read_to_string(path)?;
    let key = path.to_string_lossy();
    if path.extension().and_then(|e| e.to_str()) == Some("json") {
        specs.register_json(&key, &text)
    } else {
        specs.register_yaml(&key, &text)
    }
}

fn file_stem(key: &str) -> String {
    Path::new(key)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "models".to_string())
}

/// Renders one output file: cross-document imports first, then every
/// artifact's declaration text.
fn render_file(artifacts: &[GeneratedSchema]) -> String {
    let mut out = String::new();
    for import in combined_imports(artifacts) {
        out.push_str(&render_import(&import));
        out.push('\n');
    }
    if !out.is_empty() {
        out.push('\n');
    }
    let models: Vec<&str> = artifacts.iter().map(|a| a.model.as_str()).collect();
    out.push_str(&models.join("\n\n"));
    out.push('\n');
    out
}

fn render_import(import: &Import) -> String {
    let module = import
        .spec_key
        .as_deref()
        .map(file_stem)
        .unwrap_or_else(|| "models".to_string());
    if import.values {
        // Enumerations carry a runtime value map alongside the type.
        format!("import {{ {} }} from './{}';", import.name, module)
    } else {
        format!("import type {{ {} }} from './{}';", import.name, module)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PETSTORE: &str = r#"
openapi: 3.0.0
components:
  schemas:
    Pet:
      type: object
      properties:
        id: { type: integer }
        status:
          type: string
          enum: [sold, pending]
      required: [id]
"#;

    #[test]
    fn test_generate_writes_model_file() {
        let dir = tempfile::tempdir().unwrap();
        let spec_path = dir.path().join("petstore.yaml");
        fs::write(&spec_path, PETSTORE).unwrap();
        let output = dir.path().join("models");

        let args = GenerateArgs {
            inputs: vec![spec_path],
            output: output.clone(),
            use_dates: false,
        };
        execute(&args).unwrap();

        let text = fs::read_to_string(output.join("petstore.ts")).unwrap();
        assert!(text.contains("export type Pet = { id: number; status?: PetStatus };"));
        assert!(text.contains("export const PetStatus = {"));
    }

    #[test]
    fn test_directory_input_is_walked() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.yaml"), PETSTORE).unwrap();
        fs::write(dir.path().join("ignore.txt"), "not a spec").unwrap();
        let output = dir.path().join("models");

        let args = GenerateArgs {
            inputs: vec![dir.path().to_path_buf()],
            output: output.clone(),
            use_dates: false,
        };
        execute(&args).unwrap();
        assert!(output.join("a.ts").exists());
    }

    #[test]
    fn test_empty_input_set_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let args = GenerateArgs {
            inputs: vec![dir.path().to_path_buf()],
            output: dir.path().join("models"),
            use_dates: false,
        };
        assert!(execute(&args).is_err());
    }
}
