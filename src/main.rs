use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use prop_edge::config::Config;
use prop_edge::diagnostic;
use prop_edge::engine::kelly::{suggest_stake, suggest_stake_for_quote};
use prop_edge::engine::normalize::parse_american_odds;
use prop_edge::engine::odds::{best_quote, is_valid_american};
use prop_edge::engine::ranker::find_play;
use prop_edge::engine::types::{Side, StatCategory};
use prop_edge::engine::Engine;
use prop_edge::feed::snapshot_dir::{latest_date, CsvSnapshotDir};
use prop_edge::pipeline::{self, RunReport};
use std::io::{BufRead, Write};
use std::path::Path;

/// One line typed at the `-i` prompt: `<category> <rank> <line> [price]`.
#[derive(Debug, PartialEq)]
struct LineEntry {
    stat: StatCategory,
    rank: usize,
    line: f64,
    price: Option<f64>,
}

fn parse_line_entry(input: &str) -> Result<LineEntry> {
    let parts: Vec<&str> = input.split_whitespace().collect();
    if !(3..=4).contains(&parts.len()) {
        bail!("expected: <category> <rank> <line> [price]");
    }
    let stat = StatCategory::from_code(parts[0])
        .with_context(|| format!("unknown category {:?}", parts[0]))?;
    let rank: usize = parts[1]
        .parse()
        .with_context(|| format!("rank must be a whole number, got {:?}", parts[1]))?;
    let line: f64 = parts[2]
        .parse()
        .with_context(|| format!("line must be a number, got {:?}", parts[2]))?;
    let price = match parts.get(3) {
        Some(p) => {
            let price = parse_american_odds(p).with_context(|| format!("bad price {:?}", p))?;
            if !is_valid_american(price) {
                bail!("price must be at or beyond ±100, got {:?}", p);
            }
            Some(price)
        }
        None => None,
    };
    Ok(LineEntry {
        stat,
        rank,
        line,
        price,
    })
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .map(String::as_str)
}

fn evaluate(entry: &LineEntry, report: &RunReport, engine: &Engine, bankroll: Option<f64>) -> Result<String> {
    let play = find_play(&report.plays, entry.stat, entry.rank)
        .with_context(|| format!("no {} play at rank {}", entry.stat, entry.rank))?;
    let edge = engine.compute_edge(play, entry.line)?;

    let mut out = format!(
        "{} {} {}: proj {:.1} vs line {:.1} -> {:+.1}% {} [{}]",
        play.display_name,
        play.stat,
        play.rank,
        edge.projected_value,
        edge.entered_line,
        edge.edge_percent,
        edge.side,
        edge.tier
    );

    if edge.side == Side::Push {
        return Ok(out);
    }

    let quote = match entry.price {
        Some(_) => None,
        None => best_quote(&report.odds, &play.player, play.stat, edge.side),
    };
    if let Some(q) = quote {
        out.push_str(&format!("\n  best {}: {} {:.1}", edge.side, q.sportsbook, q.line));
    }
    let Some(bankroll) = bankroll else {
        return Ok(out);
    };

    let stake_config = &engine.config().stake;
    let stake = match (entry.price, quote) {
        (Some(price), _) => Some((price, suggest_stake(&edge, price, bankroll, stake_config))),
        (None, Some(q)) => q
            .price(edge.side)
            .zip(suggest_stake_for_quote(&edge, q, bankroll, stake_config)),
        (None, None) => None,
    };

    if let Some((price, stake)) = stake {
        out.push_str(&format!(
            "\n  at {:+.0}: win {:.1}%, kelly {:.2}% (adj {:.2}%), stake {:.2}, edge vs book {:+.1}%",
            price,
            stake.win_probability * 100.0,
            stake.kelly_full_percent,
            stake.kelly_adjusted_percent,
            stake.stake_amount,
            stake.edge_over_book_percent
        ));
    }
    Ok(out)
}

fn interactive_loop(report: &RunReport, engine: &Engine, bankroll: Option<f64>) -> Result<()> {
    println!("  Enter <category> <rank> <line> [price], or q to quit.");
    let stdin = std::io::stdin();
    loop {
        print!("> ");
        std::io::stdout().flush()?;
        let mut input = String::new();
        if stdin.lock().read_line(&mut input)? == 0 {
            break;
        }
        let input = input.trim();
        if input.is_empty() {
            continue;
        }
        if input.eq_ignore_ascii_case("q") || input.eq_ignore_ascii_case("quit") {
            break;
        }
        match parse_line_entry(input).and_then(|entry| evaluate(&entry, report, engine, bankroll)) {
            Ok(text) => println!("{}", text),
            Err(e) => println!("  error: {:#}", e),
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let log_file = std::fs::File::create("prop-edge.log")?;
    tracing_subscriber::fmt()
        .with_env_filter("prop_edge=info")
        .with_writer(std::sync::Mutex::new(log_file))
        .init();

    let args: Vec<String> = std::env::args().collect();
    let json = args.iter().any(|a| a == "--json");
    let interactive = args.iter().any(|a| a == "-i" || a == "--interactive");
    let config_path = flag_value(&args, "--config").unwrap_or("config.toml");
    let bankroll = flag_value(&args, "--bankroll")
        .map(str::parse::<f64>)
        .transpose()
        .context("--bankroll must be a number")?;
    let date = flag_value(&args, "--date")
        .map(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d"))
        .transpose()
        .context("--date must be YYYY-MM-DD")?;

    let config = Config::load(Path::new(config_path))?;
    let engine = Engine::new(&config)?;

    let date = match date {
        Some(d) => d,
        None => latest_date(&config.data.snapshot_dir)
            .await?
            .with_context(|| {
                format!("no dated snapshots under {}", config.data.snapshot_dir.display())
            })?,
    };

    let mut source = CsvSnapshotDir::new(&config.data.snapshot_dir);
    let report = pipeline::run_from_source(&mut source, date, &config).await?;

    if let Some(headline) = diagnostic::skipped_headline(&report.rejected) {
        tracing::warn!(date = %report.date, skipped = report.skipped(), "{}", headline);
        if !json {
            println!("  {}", headline);
        }
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&report.plays)?);
    } else {
        println!("  Top plays for {}", report.date);
        println!();
        print!("{}", diagnostic::format_play_table(&diagnostic::build_play_rows(&report.plays)));
    }

    if interactive {
        interactive_loop(&report, &engine, bankroll)?;
    }

    Ok(())
}
