mod args;

use args::Command;
use miette::{IntoDiagnostic, WrapErr};
use svgeq::{EvalOptions, Evaluator, RenderOptions};

fn main() -> miette::Result<()> {
    let args = args::parse(std::env::args().skip(1))?;

    // Logs go to stderr so stdout stays clean for SVG output
    let level = if args.trace {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .with_writer(std::io::stderr)
        .init();

    let eval = EvalOptions::default().with_trace(args.trace);

    match args.command {
        Command::Help => println!("{}", args::USAGE),
        Command::Eval {
            equation,
            variables,
        } => {
            let value = Evaluator::with_options(&variables, eval).evaluate(&equation)?;
            println!("{}", svgeq::format_number(value));
        }
        Command::Render {
            input,
            output,
            strict,
        } => {
            let source = std::fs::read_to_string(&input)
                .into_diagnostic()
                .wrap_err_with(|| format!("failed to read {input}"))?;
            let options = RenderOptions {
                eval,
                strict,
                indent: Some(2),
            };
            let rendered = svgeq::render_json_with(&source, &options)?;

            for message in rendered.messages() {
                eprintln!("warning: {message}");
            }

            match output {
                Some(path) => std::fs::write(&path, &rendered.svg)
                    .into_diagnostic()
                    .wrap_err_with(|| format!("failed to write {path}"))?,
                None => println!("{}", rendered.svg),
            }
        }
    }
    Ok(())
}
