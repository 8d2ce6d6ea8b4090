use anyhow::Context;
use clap::{value_parser, Arg, ArgAction, Command};
use std::path::PathBuf;
use svgrad_core::{GradientPipeline, PipelineConfig, PipelineError, SAMPLE_SVG};
use svgrad_prompt::FallbackColor;
use svgrad_svg::validate;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Command::new("svgrad")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Translate an English instruction into an SVG gradient edit")
        .subcommand_required(true)
        .subcommand(
            Command::new("apply")
                .about("Interpret an instruction and patch the document")
                .arg(
                    Arg::new("prompt")
                        .required(true)
                        .help("Instruction, e.g. \"make the circle a radial gradient from red to yellow\""),
                )
                .arg(
                    Arg::new("input")
                        .long("input")
                        .short('i')
                        .value_parser(value_parser!(PathBuf))
                        .help("Input SVG file (embedded sample when absent)"),
                )
                .arg(
                    Arg::new("output")
                        .long("output")
                        .short('o')
                        .default_value("output.svg")
                        .value_parser(value_parser!(PathBuf))
                        .help("Where to write the patched document"),
                )
                .arg(
                    Arg::new("llm")
                        .long("llm")
                        .action(ArgAction::SetTrue)
                        .help("Consult the LLM interpreter first (needs OPENAI_API_KEY)"),
                )
                .arg(
                    Arg::new("transparent-fallback")
                        .long("transparent-fallback")
                        .action(ArgAction::SetTrue)
                        .help("Fade single-color gradients to transparent instead of white"),
                ),
        )
        .subcommand(
            Command::new("validate")
                .about("Run the validator alone on a file")
                .arg(
                    Arg::new("file")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("SVG file to check"),
                ),
        );

    match cli.get_matches().subcommand() {
        Some(("apply", args)) => {
            let prompt = args.get_one::<String>("prompt").unwrap();
            let input = args.get_one::<PathBuf>("input");
            let output = args.get_one::<PathBuf>("output").unwrap();

            let svg_text = match input {
                Some(path) => std::fs::read_to_string(path)
                    .with_context(|| format!("reading {}", path.display()))?,
                None => SAMPLE_SVG.to_string(),
            };

            let mut config = PipelineConfig::new();
            if args.get_flag("transparent-fallback") {
                config = config.with_single_color_fallback(FallbackColor::Transparent);
            }
            if args.get_flag("llm") {
                match PipelineConfig::llm_from_env() {
                    Some(llm) => config = config.with_llm(llm),
                    None => {
                        tracing::warn!("OPENAI_API_KEY not set, using the keyword interpreter only");
                    }
                }
            }

            let outcome = match GradientPipeline::new(config).run(prompt, &svg_text).await {
                Ok(outcome) => outcome,
                Err(e) => {
                    // Fatal: nothing is written.
                    eprintln!("error: {e}");
                    std::process::exit(exit_code(&e));
                }
            };

            std::fs::write(output, &outcome.svg)
                .with_context(|| format!("writing {}", output.display()))?;
            print!("{}", outcome.render_log());
            println!("wrote {}", output.display());

            if !outcome.report.ok {
                std::process::exit(1);
            }
        }
        Some(("validate", args)) => {
            let file = args.get_one::<PathBuf>("file").unwrap();
            let text = std::fs::read_to_string(file)
                .with_context(|| format!("reading {}", file.display()))?;
            let report = validate(&text);
            if report.ok {
                println!("{}: ok", file.display());
            } else {
                println!("{}: {} issue(s)", file.display(), report.issues.len());
                for issue in &report.issues {
                    println!("  - {issue}");
                }
                std::process::exit(1);
            }
        }
        _ => unreachable!("subcommand is required"),
    }

    Ok(())
}

/// Distinct exit codes per fatal error family, for scripting.
fn exit_code(error: &PipelineError) -> i32 {
    match error {
        PipelineError::Prompt(_) => 2,
        PipelineError::Svg(_) => 3,
    }
}
