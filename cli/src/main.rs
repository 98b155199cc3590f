use indicatif::{ProgressBar, ProgressStyle};
use miette::Result;
use std::{path::PathBuf, time::Duration};

use argh::FromArgs;

#[derive(FromArgs)]
/// Ramo cli
struct Args {
    #[argh(positional)]
    path: Option<PathBuf>,

    #[argh(option, description = "program as inline json", short = 'c')]
    code: Option<String>,

    #[argh(switch, description = "emit javascript instead of evaluating")]
    js: bool,
}

fn main() -> Result<()> {
    let args: Args = argh::from_env();

    if let Some(path) = args.path {
        let source = std::fs::read_to_string(path).map_err(|e| miette::miette!(e.to_string()))?;
        run(&source, args.js)?;
    }

    if let Some(source) = args.code {
        run(&source, args.js)?;
    }

    Ok(())
}

fn run(source: &str, emit_js: bool) -> Result<()> {
    let file = ramo::load(source)?;

    if emit_js {
        print!("{}", ramo::js::transpile(&file));
        return Ok(());
    }

    let pb = ProgressBar::new_spinner();
    pb.enable_steady_tick(Duration::from_millis(120));
    pb.set_style(
        ProgressStyle::with_template("{spinner:.blue} {msg:.magenta}")
            .unwrap()
            .tick_strings(&["⢎ ", "⠎⠁", "⠊⠑", "⠈⠱", " ⡱", "⢀⡰", "⢄⡠", "⢆⡀", ""]),
    );
    pb.set_message("Running ramo...");
    match ramo::interpret(&file) {
        Ok(value) => pb.finish_with_message(value.to_string()),
        Err(error) => {
            pb.finish_and_clear();
            return Err(error.into());
        }
    }

    Ok(())
}
