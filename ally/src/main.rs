// Ally - guided anxiety journal
// Entry point and command dispatch

mod cli;

use ally::app::{resolve_data_dir, AppState};
use ally::commands;
use anyhow::Context;
use clap::Parser;
use cli::{Cli, Commands, FavoritesCommands, GoodThingCommands, ReflectCommands, SettingsCommands};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ally=info,warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(err) = run(Cli::parse()).await {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let data_dir = resolve_data_dir(cli.data_dir.as_deref())?;
    let mut state = AppState::open(data_dir.clone())
        .await
        .with_context(|| format!("failed to open journal at {}", data_dir.display()))?;

    let output = match cli.command {
        Commands::Info => commands::get_app_info(&state)?,
        Commands::New {
            answers,
            plan,
            audio,
            video,
        } => commands::create_entry_with_media(&mut state, answers, plan, &audio, &video).await?,
        Commands::List { query, pages } => commands::list_entries(&state, &query, pages)?,
        Commands::Show { id } => commands::show_entry(&state, &id)?,
        Commands::Edit { id, answer, text } => {
            commands::edit_answer(&mut state, &id, answer, &text)?
        }
        Commands::Plan { id, plan, audio } => {
            commands::set_coping_plan(&mut state, &id, plan.as_deref(), audio.as_deref()).await?
        }
        Commands::Prune { keep, yes } => commands::prune_entries(&mut state, keep, yes)?,
        Commands::Export {
            format,
            query,
            out,
            stdout,
        } => {
            if stdout {
                commands::render_export(&state, format, &query)?
            } else {
                commands::export_entries(&state, format, &query, out.as_deref())
                    .await
                    .context("export failed")?
            }
        }
        Commands::Analyze => commands::analyze_prompt(&state)?,
        Commands::Questions => commands::list_questions(&state)?,
        Commands::GoodThing(GoodThingCommands::Add { text }) => {
            commands::add_good_thing(&mut state, &text)?
        }
        Commands::GoodThing(GoodThingCommands::List) => commands::list_good_things(&state)?,
        Commands::Reflect(ReflectCommands::List) => commands::list_reflect_cards(&mut state)?,
        Commands::Reflect(ReflectCommands::Add { title, body }) => {
            commands::add_reflect_card(&mut state, &title, &body)?
        }
        Commands::Favorites(FavoritesCommands::Import { photos }) => {
            commands::import_favorites(&mut state, &photos).await?
        }
        Commands::Favorites(FavoritesCommands::List) => commands::list_favorites(&state)?,
        Commands::Quote => commands::show_quote(&state)?,
        Commands::Settings(SettingsCommands::Show) => commands::show_settings(&state)?,
        Commands::Settings(SettingsCommands::Questions { prompts }) => {
            commands::set_questions(&mut state, prompts)?
        }
        Commands::Settings(SettingsCommands::Retention { keep }) => {
            commands::set_retention(&mut state, keep)?
        }
        Commands::Settings(SettingsCommands::FavoritesCap { cap }) => {
            commands::set_favorites_cap(&mut state, cap)?
        }
        Commands::Settings(SettingsCommands::Transcriber { command, timeout }) => {
            commands::set_transcriber(&mut state, command, timeout)?
        }
    };

    println!("{}", output);
    Ok(())
}
