use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::io::{AsyncBufReadExt, BufReader};

use portfolio_carousel::carousel::GalleryCarousel;
use portfolio_carousel::content::{CategoryFilter, FileContentSource, PortfolioItem, PortfolioLoader};
use portfolio_carousel::modal::{ModalInput, ModalResponse, ModalShell, ModalView};
use portfolio_carousel::{config, init_telemetry, CarouselConfig};

#[derive(Parser)]
#[command(name = "portfolio-carousel")]
#[command(about = "Browse a contractor portfolio through its gallery modal")]
#[command(long_about = "Lists portfolio projects from a content directory and opens them in the \
                       gallery modal: an auto-advancing crossfade carousel that pauses while you \
                       navigate by hand. Start with 'portfolio-carousel list'.")]
struct Cli {
    /// Override the content directory from configuration
    #[arg(long, global = true, help = "Directory holding one <slug>.json per project")]
    content_dir: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List published projects
    List {
        /// Only show one category
        #[arg(long, help = "Category value: terrasse, maconnerie, amenagement, renovation")]
        category: Option<String>,
    },
    /// Print the modal of one project as it looks when opened
    Show {
        /// Project slug
        slug: String,
    },
    /// Open a project and drive its carousel from the terminal
    Play {
        /// Project slug
        slug: String,
        /// Stop after this many seconds
        #[arg(long, default_value = "30", help = "How long the modal stays open")]
        seconds: u64,
    },
    /// Print the effective configuration
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut settings = config()?.clone();
    init_telemetry(&settings.observability)?;
    if let Some(dir) = cli.content_dir {
        settings.content.content_dir = dir;
    }

    match cli.command {
        Commands::List { category } => tokio::runtime::Runtime::new()?.block_on(async {
            list_command(&settings, category.as_deref()).await
        }),
        Commands::Show { slug } => {
            tokio::runtime::Runtime::new()?.block_on(async { show_command(&settings, &slug).await })
        }
        Commands::Play { slug, seconds } => tokio::runtime::Runtime::new()?.block_on(async {
            play_command(&settings, &slug, Duration::from_secs(seconds)).await
        }),
        Commands::Config => {
            print!("{}", toml::to_string_pretty(&settings)?);
            Ok(())
        }
    }
}

fn loader_for(settings: &CarouselConfig) -> PortfolioLoader {
    let source = FileContentSource::new(&settings.content.content_dir);
    PortfolioLoader::new(Arc::new(source), settings.content.cache_capacity)
}

async fn find_project(loader: &PortfolioLoader, slug: &str) -> Result<PortfolioItem> {
    match loader.find(slug).await {
        Some(item) => Ok(item),
        None => bail!("No published project named '{slug}'. Run 'portfolio-carousel list' to see them."),
    }
}

async fn find_summary(loader: &PortfolioLoader, slug: &str) -> Result<PortfolioItem> {
    loader
        .list_published(&CategoryFilter::All)
        .await
        .into_iter()
        .find(|item| item.slug == slug)
        .with_context(|| format!("No published project named '{slug}'"))
}

async fn list_command(settings: &CarouselConfig, category: Option<&str>) -> Result<()> {
    let loader = loader_for(settings);
    let filter = category.map(CategoryFilter::parse).unwrap_or_default();
    let items = loader.list_published(&filter).await;

    if items.is_empty() {
        println!("No projects to show.");
        return Ok(());
    }
    for item in items {
        let images = item.gallery_sequence().len();
        println!(
            "{:<28} {:<40} {:<12} {:<14} {} image(s)",
            item.slug,
            item.title,
            item.category_label().unwrap_or("-"),
            item.location.as_deref().unwrap_or("-"),
            images
        );
    }
    Ok(())
}

async fn show_command(settings: &CarouselConfig, slug: &str) -> Result<()> {
    let loader = loader_for(settings);
    let item = find_project(&loader, slug).await?;

    let carousel = GalleryCarousel::opened(settings.carousel, item.gallery_sequence(), Instant::now());
    println!("{}", ModalView::new(&item, &carousel.snapshot()));
    println!();
    for (index, image) in carousel.sequence().iter().enumerate() {
        println!(
            "  {}. {}{}",
            index + 1,
            image.source,
            image
                .caption
                .as_deref()
                .map(|caption| format!(" ({caption})"))
                .unwrap_or_default()
        );
    }
    carousel.close();
    Ok(())
}

async fn play_command(settings: &CarouselConfig, slug: &str, limit: Duration) -> Result<()> {
    let loader = loader_for(settings);
    let summary = find_summary(&loader, slug).await?;

    // The modal opens on the listing data and switches to the full gallery
    // once it is fetched
    let mut shell = ModalShell::new(settings.carousel);
    shell.open(summary.clone()).await;
    let full = loader.load_full(&summary).await;
    shell.apply_full_content(full);
    let mut updates = shell
        .subscribe()
        .context("Modal closed before it could be shown")?;
    if let Some(view) = shell.view() {
        println!("{view}\n");
    }
    println!("Type left/right, prev/next, a dot number, or esc to close.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;
    let deadline = tokio::time::sleep(limit);
    tokio::pin!(deadline);

    loop {
        tokio::select! {
            _ = &mut deadline => {
                println!("Time is up.");
                break;
            }
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                if let Some(view) = shell.view() {
                    println!("{view}\n");
                }
            }
            line = lines.next_line(), if stdin_open => {
                match line? {
                    Some(line) => match ModalInput::parse(&line) {
                        Some(input) => {
                            if shell.handle(input).await == ModalResponse::Closed {
                                break;
                            }
                        }
                        None => println!("Unknown input '{}'", line.trim()),
                    },
                    None => stdin_open = false,
                }
            }
        }
    }

    shell.close().await;
    Ok(())
}
