use std::io::{self, BufRead, Write};

use affine_calc::affine::Affine;
use affine_calc::answer_line_with;
use affine_calc::atom::Atom;
use affine_calc::errors::ParseError;
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// affine-calc evaluates arithmetic expressions and solves linear equations,
/// one line at a time. Separate several clauses on a line with commas.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Evaluate with plain numbers only; identifiers are rejected.
    #[arg(short, long)]
    numeric: bool,

    /// Raise log output on stderr (-v for debug, -vv for trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Lines to evaluate. Without any, lines are read from stdin until an
    /// empty line.
    expressions: Vec<String>,
}

fn init_logging(verbose: u8)
{
    let default = match verbose
    {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Prints answers for one line, or the line with a caret under the
/// offending token. Returns whether the line was evaluated.
fn run_line<T: Atom>(line: &str, out: &mut impl Write, err: &mut impl Write) -> anyhow::Result<bool>
{
    match answer_line_with::<T>(line)
    {
        Ok(answers) => {
            for answer in answers
            {
                writeln!(out, "Answer: {answer}")?;
            }
            Ok(true)
        },
        Err(e) => match e.downcast_ref::<ParseError>()
        {
            Some(pe) => {
                writeln!(err)?;
                writeln!(err, "{line}")?;
                writeln!(err, "{}^~~~~ {}", " ".repeat(pe.position), pe.message)?;
                Ok(false)
            },
            None => Err(e),
        },
    }
}

fn run<T: Atom>(args: &Args) -> anyhow::Result<bool>
{
    let stdout = io::stdout();
    let stderr = io::stderr();
    let mut out = stdout.lock();
    let mut err = stderr.lock();

    if !args.expressions.is_empty()
    {
        let mut all_ok = true;
        for line in &args.expressions
        {
            all_ok &= run_line::<T>(line, &mut out, &mut err)?;
        }
        return Ok(all_ok);
    }

    info!("reading lines from stdin");
    run_lines::<T>(io::stdin().lock(), &mut out, &mut err)?;
    Ok(true)
}

/// Answers lines from `input` until an empty line or end of input. Bytes
/// that are not valid UTF-8 are replaced rather than ending the loop.
fn run_lines<T: Atom>(mut input: impl BufRead, out: &mut impl Write, err: &mut impl Write) -> anyhow::Result<()>
{
    let mut buf = Vec::new();
    loop
    {
        buf.clear();
        if input.read_until(b'\n', &mut buf)? == 0
        {
            return Ok(());
        }

        let line = String::from_utf8_lossy(&buf);
        let line = line.trim_end_matches(['\n', '\r']);
        if line.is_empty()
        {
            return Ok(());
        }
        run_line::<T>(line, out, err)?;
        out.flush()?;
    }
}

fn main() -> anyhow::Result<()>
{
    let args = Args::parse();
    init_logging(args.verbose);
    info!(numeric = args.numeric, "starting");

    let all_ok = if args.numeric
    {
        run::<f64>(&args)?
    }
    else
    {
        run::<Affine>(&args)?
    };

    if !all_ok
    {
        warn!("some expressions failed");
        std::process::exit(1);
    }
    Ok(())
}

#[test]
fn test_run_line_prints_answers()
{
    let mut out = Vec::new();
    let mut err = Vec::new();

    assert!(run_line::<Affine>("2*x = 4, 1 + 1", &mut out, &mut err).unwrap());
    assert_eq!(String::from_utf8(out).unwrap(), "Answer: x = 2\nAnswer: 2\n");
    assert!(err.is_empty());
}

#[test]
fn test_run_line_points_at_error()
{
    let mut out = Vec::new();
    let mut err = Vec::new();

    assert!(!run_line::<Affine>("1 + x*y", &mut out, &mut err).unwrap());
    assert!(out.is_empty());
    assert_eq!(
        String::from_utf8(err).unwrap(),
        "\n1 + x*y\n     ^~~~~ polynomial of order > 1 not allowed\n"
    );
}

#[test]
fn test_run_lines_survives_invalid_utf8()
{
    let input: &[u8] = b"1 + \xff\n2*x = 4\n\n3\n";
    let mut out = Vec::new();
    let mut err = Vec::new();

    run_lines::<Affine>(input, &mut out, &mut err).unwrap();

    // the bad byte becomes a replacement char the parser rejects, then the
    // loop carries on and stops at the empty line
    assert_eq!(String::from_utf8(out).unwrap(), "Answer: x = 2\n");
    assert!(String::from_utf8(err).unwrap().contains("^~~~~ missing operand"));
}
