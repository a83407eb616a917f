use clap::Parser;
use rml2doc_rs::cli::{run_conversion, ConversionOptions};
use rml2doc_rs::emitter::OutputType;
use rml2doc_rs::layout::{ResolveOptions, SpanPolicy};
use rml2doc_rs::{get_command_tags, get_output_types};

use std::fs::File;
use std::io::{self, Write};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Type of output
    #[arg(short = 't', long, value_enum, default_value_t = OutputType::Diagram)]
    to_type: OutputType,

    /// How overlapping blockSpan commands are handled.
    #[arg(long, value_enum, default_value_t = SpanPolicy::Compatible)]
    span_policy: SpanPolicy,

    /// Input file (default: stdin)
    input: Option<String>,

    /// Output file (default: stdout)
    output: Option<String>,

    /// List supported table style commands and output types
    #[arg(short = 'l', long)]
    list_type: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    if cli.list_type {
        println!("table style commands:");
        println!("{}", get_command_tags().join(" "));
        println!();
        println!("type of output:");
        println!("{}", get_output_types().join(" "));
        println!();
        return Ok(());
    }

    let mut output_writer: Box<dyn Write> = match cli.output {
        Some(path) if path != "-" => Box::new(File::create(path)?),
        _ => Box::new(io::stdout()),
    };

    let options = ConversionOptions {
        to_type: cli.to_type,
        resolve: ResolveOptions {
            span_policy: cli.span_policy,
        },
    };

    run_conversion(&cli.input, &mut output_writer, &options)?;
    output_writer.flush()?;

    Ok(())
}
