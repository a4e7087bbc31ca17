use anyhow::{Context, Result};
use clap::Parser;

mod ado;
mod cli;
mod error;
mod model;
mod util;

use crate::cli::{Cli, normalize};

fn main() -> Result<()> {
  let cli = Cli::parse();

  if cli.gen_man {
    let page = util::render_man_page::<Cli>()?;
    print!("{}", page);
    return Ok(());
  }

  // Phase 1: normalize CLI
  let cfg = normalize(cli)?;

  // Phase 2: build the API client (env fixtures take precedence over HTTP)
  let api = ado::api::build_api(cfg.organization.as_deref(), &cfg.service_url)?;

  // Phase 3: collect report rows and emit
  let rows = ado::workitems::collect_report_rows(api.as_ref(), &cfg.request)?;

  let json = if cfg.compact {
    serde_json::to_string(&rows)?
  } else {
    serde_json::to_string_pretty(&rows)?
  };

  if cfg.out == "-" {
    println!("{}", json);
  } else {
    std::fs::write(&cfg.out, json).with_context(|| format!("writing report to {}", cfg.out))?;
  }

  Ok(())
}
