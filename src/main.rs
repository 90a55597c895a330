use std::io::Read;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use jsrun::models::{ExecutionRequest, DEFAULT_TIMEOUT_MS};
use jsrun::transport::Envelope;
use jsrun::{output, sandbox};

#[derive(Parser, Debug)]
#[command(name = "jsrun")]
#[command(about = "Run untrusted JavaScript snippets in a sandbox")]
struct Args {
    /// Path to a script file, or "-" for stdin
    #[arg(required_unless_present = "code")]
    file: Option<String>,

    /// Inline snippet instead of a file
    #[arg(long)]
    code: Option<String>,

    /// Input variables as a JSON object, e.g. '{"x": 10, "y": 5}'
    #[arg(long, default_value = "{}")]
    input: String,

    /// Execution budget in milliseconds (100-30000)
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_MS)]
    timeout: u64,

    /// Print the raw response envelope as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("jsrun=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let code = match (&args.code, &args.file) {
        (Some(code), _) => code.clone(),
        (None, Some(path)) if path == "-" => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read code from stdin")?;
            buffer
        }
        (None, Some(path)) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read {path}"))?
        }
        (None, None) => bail!("No code given"),
    };

    let input: serde_json::Value =
        serde_json::from_str(&args.input).context("--input must be a JSON object")?;
    let serde_json::Value::Object(input) = input else {
        bail!("--input must be a JSON object");
    };

    let request = ExecutionRequest::new(code)
        .with_input(input)
        .with_timeout(args.timeout);
    let outcome = sandbox::execute(&request);
    let ok = outcome.ok;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&Envelope::from(outcome))?);
    } else {
        output::terminal::print_outcome(&outcome);
    }

    if !ok {
        std::process::exit(1);
    }
    Ok(())
}
