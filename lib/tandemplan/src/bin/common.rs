use std::fmt::Display;
use std::str::FromStr;
use std::path::PathBuf;
use anyhow::Result;
use structopt::StructOpt;

use tandemplan::report::Plan;

#[derive(Clone, Debug, StructOpt)]
pub struct OutputOptions {
  #[structopt(long="format", short="f", parse(try_from_str), default_value="summary", possible_values=&OUTPUT_FORMAT_STRINGS)]
  pub fmt: OutputFormat,
  #[structopt(long="output", short="o")]
  pub file: Option<PathBuf>,
  #[structopt(long)]
  pub log: Option<PathBuf>,
}

pub fn clap_range_validator<T>(minval: Option<T>, maxval: Option<T>) -> impl Fn(String) -> Result<(), String>
    where
        T: FromStr + PartialOrd + Display + Copy,
        T::Err: Display
{
    return move |val| {
        let x: T = val.parse().map_err(|e: T::Err| e.to_string())?;
        if let Some(y) = minval {
            if x < y { return Err(format!("must be greater than {}", y).to_string()); }
        }
        if let Some(y) = maxval {
            if x > y { return Err(format!("must be less than {}", y).to_string()); }
        }
        return Ok(());
    };
}

pub const OUTPUT_FORMAT_STRINGS: [&str; 2] = ["json", "summary"];

#[derive(Debug, Copy, Clone)]
pub enum OutputFormat {
    Json,
    Summary,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        return match s {
            "json" => Ok(Self::Json),
            "summary" => Ok(Self::Summary),
            _ => Err(format!("invalid string: {}", s))
        };
    }
}

impl Default for OutputFormat {
  fn default() -> Self { OutputFormat::Summary }
}

pub fn output_plan(options: &OutputOptions, plan: &Plan) -> Result<()> {
  match options.file.as_ref() {
      Some(path) => {
        let writer = std::io::BufWriter::new(std::fs::File::create(path)?);
        write_plan(plan, writer, options.fmt)?;
      }
      None => {
        write_plan(plan, std::io::stdout(), options.fmt)?;
      }
    }
  Ok(())
}

fn write_plan(plan: &Plan, buf: impl std::io::Write, fmt: OutputFormat) -> Result<()> {
    match fmt {
        OutputFormat::Json => plan.write_json(buf)?,
        OutputFormat::Summary => plan.write_summary(buf)?,
    };
    Ok(())
}
