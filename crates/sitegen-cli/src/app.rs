use anyhow::{Context, Result};
use sitegen_core::{CompanyProfile, Session, Settings, WebsiteArtifact, WebsiteGenerator};
use std::io::Write;
use std::path::Path;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

use crate::commands::{handle_command, CommandResult};

fn build_generator(settings: &Settings) -> Result<WebsiteGenerator> {
    let api_key = settings.api_key().with_context(|| {
        format!(
            "no API key: set the {} environment variable",
            settings.generation.api_key_env
        )
    })?;
    Ok(settings.build_generator(api_key)?)
}

/// Generate once from a requirements string and write the result to `out`.
pub async fn run_single(
    settings: &Settings,
    profile: CompanyProfile,
    requirements: &str,
    out: &Path,
) -> Result<()> {
    let generator = build_generator(settings)?;
    let mut session = Session::new();
    session.start_conversation(profile);
    session.conversation_mut().add_user(requirements);

    let website = generator.generate(&mut session).await?;
    write_artifact(&website, out)
}

/// Interactive chat: plain lines go to the model, slash commands drive the session.
pub async fn run_chat(settings: &Settings, profile: Option<CompanyProfile>) -> Result<()> {
    let generator = build_generator(settings)?;
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut session = Session::new();

    let profile = match profile {
        Some(p) => p,
        None => match read_profile(&mut lines).await? {
            Some(p) => p,
            None => return Ok(()),
        },
    };
    session.start_conversation(profile);
    tracing::debug!(session = %session.id(), "chat session started");
    println!("Describe the website you want. Type /help for commands.");

    loop {
        print!("> ");
        std::io::stdout().flush()?;
        let Some(line) = lines.next_line().await? else {
            break;
        };
        if line.trim().is_empty() {
            continue;
        }

        match handle_command(&line) {
            CommandResult::Quit => break,
            CommandResult::Message(msg) => println!("{msg}"),
            CommandResult::Generate => match generator.generate(&mut session).await {
                Ok(website) if website.is_ok() => {
                    println!("Website generated ({} bytes). Use /save to write it.", website.html.len())
                }
                Ok(_) => println!("The model did not return a valid HTML document. Try /generate again."),
                Err(e) => eprintln!("Error: {e}"),
            },
            CommandResult::Save(path) => match session.artifact() {
                Some(website) => {
                    if let Err(e) = write_artifact(website, Path::new(&path)) {
                        eprintln!("Error: {e:#}");
                    }
                }
                None => println!("Nothing generated yet. Use /generate first."),
            },
            CommandResult::ShowStatus => print_status(&session, generator.model()),
            CommandResult::Reset => {
                session.reset();
                println!("Conversation cleared.");
                match read_profile(&mut lines).await? {
                    Some(p) => session.start_conversation(p),
                    None => break,
                }
            }
            CommandResult::NotACommand => match generator.respond(&mut session, line.trim()).await {
                Ok(reply) => println!("{reply}\n"),
                Err(e) => eprintln!("Error: {e}"),
            },
        }
    }

    Ok(())
}

async fn read_profile(lines: &mut Lines<BufReader<Stdin>>) -> Result<Option<CompanyProfile>> {
    let Some(name) = prompt_line(lines, "Company name: ").await? else {
        return Ok(None);
    };
    let Some(industry) = prompt_line(lines, "Industry: ").await? else {
        return Ok(None);
    };
    let color = prompt_line(lines, "Brand color (optional): ").await?.unwrap_or_default();

    let mut profile = CompanyProfile::new(name, industry);
    if !color.is_empty() {
        profile = profile.with_color(color);
    }
    Ok(Some(profile))
}

async fn prompt_line(lines: &mut Lines<BufReader<Stdin>>, label: &str) -> Result<Option<String>> {
    print!("{label}");
    std::io::stdout().flush()?;
    Ok(lines.next_line().await?.map(|l| l.trim().to_string()))
}

fn print_status(session: &Session, model: &str) {
    let profile = session.profile();
    println!("Model:    {model}");
    println!("Started:  {}", session.started_at().format("%Y-%m-%d %H:%M:%S UTC"));
    println!("Company:  {} ({})", profile.name, profile.industry);
    if let Some(ref color) = profile.color {
        println!("Color:    {color}");
    }
    println!("Turns:    {}", session.conversation().len());
    match session.artifact() {
        Some(website) => println!("Website:  {:?}", website.status),
        None => println!("Website:  not generated"),
    }
}

fn write_artifact(website: &WebsiteArtifact, out: &Path) -> Result<()> {
    if !website.is_ok() {
        anyhow::bail!("no valid HTML document was generated ({:?})", website.status);
    }
    std::fs::write(out, &website.html).with_context(|| format!("writing {}", out.display()))?;
    println!("Wrote {}", out.display());
    Ok(())
}
