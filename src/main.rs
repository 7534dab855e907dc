use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{CommandFactory, Parser};

/// Interprets an IPPcode23 program described as XML.
#[derive(Debug, Parser)]
#[clap(name = "ippcode23", version, disable_help_flag = true)]
struct Cli {
  /// Print usage and exit. Must not be combined with any other argument.
  #[clap(long)]
  help: bool,

  /// Read the XML program from FILE (stdin if omitted).
  #[clap(long, value_name = "FILE")]
  source: Option<PathBuf>,

  /// Read program input for READ from FILE (stdin if omitted).
  #[clap(long, value_name = "FILE")]
  input: Option<PathBuf>,
}

fn main() -> ExitCode {
  let cli = match Cli::try_parse() {
    Ok(cli) => cli,
    Err(e) => {
      e.print().ok();
      return ExitCode::from(10);
    }
  };

  if cli.help {
    if cli.source.is_some() || cli.input.is_some() {
      eprintln!("--help must not be combined with any other argument");
      return ExitCode::from(10);
    }
    Cli::command().print_help().ok();
    println!();
    return ExitCode::from(0);
  }

  if cli.source.is_none() && cli.input.is_none() {
    eprintln!("at least one of --source or --input must be supplied");
    return ExitCode::from(10);
  }

  let source = match read_to_string(cli.source.as_deref()) {
    Ok(source) => source,
    Err(e) => {
      eprintln!("error 11: {e}");
      return ExitCode::from(11);
    }
  };

  // `--input` lines are consumed first; once that file is exhausted,
  // further `READ`s fall through to stdin (spec: "`--input` lines (in
  // order), then stdin").
  let mut input: Box<dyn io::BufRead> = match cli.input.as_deref() {
    Some(path) => match File::open(path) {
      Ok(file) => Box::new(BufReader::new(file.chain(io::stdin()))),
      Err(e) => {
        eprintln!("error 11: could not open `{}`: {e}", path.display());
        return ExitCode::from(11);
      }
    },
    None => Box::new(BufReader::new(io::stdin())),
  };

  let stdout = io::stdout();
  let stderr = io::stderr();
  let mut out = stdout.lock();
  let mut err = stderr.lock();

  let code = ippcode23::run(&source, &mut input, &mut out, &mut err);
  ExitCode::from(code as u8)
}

fn read_to_string(path: Option<&std::path::Path>) -> io::Result<String> {
  match path {
    Some(path) => std::fs::read_to_string(path),
    None => {
      let mut buf = String::new();
      io::stdin().read_to_string(&mut buf)?;
      Ok(buf)
    }
  }
}
