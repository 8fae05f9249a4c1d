use anyhow::Result;
use clap::{Parser, Subcommand};
use shared::domain::{DishId, Roster};
use storage::{Storage, DEFAULT_DATABASE_URL};
use tournament::Tournament;
use tracing::info;

mod render;

#[derive(Parser, Debug)]
struct Cli {
    #[arg(long, default_value = DEFAULT_DATABASE_URL)]
    database_url: String,
    #[arg(long, default_value_t = Roster::DEFAULT_SIZE)]
    roster_size: u32,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Record that `winner` beat `loser` in `round`.
    AddMatch {
        round: u32,
        winner: i64,
        loser: i64,
    },
    /// Retract the most recently recorded match.
    RemoveLast,
    Matches,
    Status,
    Bracket,
    Progression,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter("warn")
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let roster = Roster::new(cli.roster_size)?;
    let storage = Storage::new(&cli.database_url).await?;
    let tournament = Tournament::new(storage.clone(), roster);

    let outcome = run(&tournament, cli.command).await;
    storage.close().await;
    outcome
}

async fn run(tournament: &Tournament<Storage>, command: Command) -> Result<()> {
    match command {
        Command::AddMatch {
            round,
            winner,
            loser,
        } => {
            let record = tournament
                .add_match(round, DishId(winner), DishId(loser))
                .await?;
            info!(match_id = record.match_id.0, "recorded via cli");
            println!(
                "recorded match_id={} round={} winner={} loser={}",
                record.match_id, record.round, record.winner, record.loser
            );
        }
        Command::RemoveLast => {
            let record = tournament.remove_last().await?;
            println!(
                "removed match_id={} round={} winner={} loser={}",
                record.match_id, record.round, record.winner, record.loser
            );
        }
        Command::Matches => {
            print!("{}", render::render_matches(&tournament.matches().await?));
        }
        Command::Status => {
            print!("{}", render::render_status(&tournament.status().await?));
        }
        Command::Bracket => {
            print!("{}", render::render_bracket(&tournament.bracket_table().await?));
        }
        Command::Progression => {
            print!(
                "{}",
                render::render_progression(&tournament.progression().await?)
            );
        }
    }

    Ok(())
}
