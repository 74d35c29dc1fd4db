use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use form_spec::{
    FormSpec, QuestionCatalog, Record, ValidationResult, forms, validate, visible_fields,
};
use tracing_subscriber::EnvFilter;

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Form validation helper",
    long_about = "Validates form records against built-in or custom form definitions and looks up follow-up questions"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
#[group(required = true, multiple = false)]
struct FormSource {
    /// Built-in form id (survey, event-registration, job-application).
    #[arg(long, value_name = "ID")]
    form: Option<String>,
    /// Path to a FormSpec JSON file.
    #[arg(long, value_name = "SPEC")]
    spec: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// Validate a record against a form.
    Validate {
        #[command(flatten)]
        source: FormSource,
        /// Path to the record JSON file.
        #[arg(long, value_name = "RECORD")]
        record: PathBuf,
        /// Print the validation result as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Show which fields a form displays for a record.
    Visible {
        #[command(flatten)]
        source: FormSource,
        /// Path to the record JSON file.
        #[arg(long, value_name = "RECORD")]
        record: PathBuf,
    },
    /// Print the follow-up questions for a topic.
    Questions {
        /// Category value, e.g. Technology.
        #[arg(long)]
        topic: String,
        /// JSON catalog replacing the built-in questions.
        #[arg(long, value_name = "CATALOG", env = "FORMKIT_QUESTIONS")]
        catalog: Option<PathBuf>,
    },
    /// List the built-in forms.
    Forms,
    /// Print a built-in form definition as JSON.
    Show {
        /// Built-in form id.
        #[arg(long, value_name = "ID")]
        form: String,
    },
    /// Print the JSON schema of form definitions.
    Schema,
}

fn main() -> CliResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Validate {
            source,
            record,
            json,
        } => run_validate(&source, &record, json),
        Command::Visible { source, record } => run_visible(&source, &record),
        Command::Questions { topic, catalog } => run_questions(&topic, catalog.as_deref()),
        Command::Forms => run_forms(),
        Command::Show { form } => run_show(&form),
        Command::Schema => run_schema(),
    }
}

fn load_form(source: &FormSource) -> CliResult<FormSpec> {
    if let Some(path) = &source.spec {
        let raw = fs::read_to_string(path)?;
        let spec: FormSpec = serde_json::from_str(&raw)?;
        spec.check()?;
        tracing::debug!(form = %spec.id, path = %path.display(), "loaded form spec");
        return Ok(spec);
    }
    let id = source
        .form
        .as_deref()
        .ok_or("either --form or --spec is required")?;
    builtin_form(id)
}

fn builtin_form(id: &str) -> CliResult<FormSpec> {
    forms::builtin(id).ok_or_else(|| {
        format!(
            "unknown form '{}'; available: {}",
            id,
            forms::ids().join(", ")
        )
        .into()
    })
}

fn load_record(path: &Path) -> CliResult<Record> {
    let raw = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

fn run_validate(source: &FormSource, record_path: &Path, json: bool) -> CliResult<()> {
    let spec = load_form(source)?;
    let record = load_record(record_path)?;

    let result = validate(&spec, &record);
    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!(
            "Validation result: {}",
            if result.is_valid() { "valid" } else { "invalid" }
        );
        describe_validation(&result);
    }

    if result.is_valid() {
        Ok(())
    } else {
        Err("validation failed".into())
    }
}

fn describe_validation(result: &ValidationResult) {
    if result.is_empty() {
        return;
    }
    println!("Errors:");
    for (field, error) in result.iter() {
        println!("  {} - {} ({})", field, error.message, error.code.as_str());
    }
}

fn run_visible(source: &FormSource, record_path: &Path) -> CliResult<()> {
    let spec = load_form(source)?;
    let record = load_record(record_path)?;
    for (field, visible) in visible_fields(&spec, &record) {
        if visible {
            println!("{}", field);
        }
    }
    Ok(())
}

fn run_questions(topic: &str, catalog: Option<&Path>) -> CliResult<()> {
    let catalog = match catalog {
        Some(path) => QuestionCatalog::from_path(path)?,
        None => QuestionCatalog::builtin(),
    };
    let questions = catalog.lookup(topic);
    if questions.is_empty() {
        tracing::info!(topic, "no follow-up questions for topic");
    }
    for question in questions {
        println!("{}", question);
    }
    Ok(())
}

fn run_forms() -> CliResult<()> {
    for spec in forms::all() {
        match &spec.category {
            Some(category) => println!("{}\t{} (category: {})", spec.id, spec.title, category),
            None => println!("{}\t{}", spec.id, spec.title),
        }
    }
    Ok(())
}

fn run_show(id: &str) -> CliResult<()> {
    let spec = builtin_form(id)?;
    println!("{}", serde_json::to_string_pretty(&spec)?);
    Ok(())
}

fn run_schema() -> CliResult<()> {
    let schema = schemars::schema_for!(FormSpec);
    println!("{}", serde_json::to_string_pretty(&schema)?);
    Ok(())
}
