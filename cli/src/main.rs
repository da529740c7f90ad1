use anyhow::{bail, Context, Result};
use clap::Parser;
use jph_core::{
    CommentsEvent, CommentsScreen, CommentsState, Config, JphClient, ListItem, PostsEvent, PostsScreen, PostsState,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "jph")]
#[command(version, about = "List JSONPlaceholder posts, or the comments of one post")]
#[command(long_about = r#"List JSONPlaceholder posts, or the comments of one post.

EXAMPLES:
    # List every post
    jph

    # List the comments of post 7
    jph --post 7

    # Talk to a local mock server
    jph --base-url http://127.0.0.1:3000
"#)]
struct Cli {
    /// API address (defaults to the public JSONPlaceholder API; blank means unset)
    #[arg(long, env = "JPH_BASE_URL")]
    base_url: Option<String>,

    /// Show the comments of this post instead of the post list
    #[arg(long, value_name = "ID")]
    post: Option<i64>,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, default_value = "warn")]
    log_level: String,
}

/// A non-blank `--base-url` (or its environment variable) wins over the
/// configuration read through `env`.
fn resolve_config(base_url: Option<String>, env: impl Fn(&str) -> Option<String>) -> Config {
    let mut config = Config::from_lookup(env);
    if let Some(base_url) = base_url.map(|v| v.trim().to_string()).filter(|v| !v.is_empty()) {
        config.base_url = base_url;
    }
    config
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn print_rows<T: ListItem>(rows: &[T]) {
    for row in rows {
        println!("{:>4}) {}", row.counter(), row.title());
        println!("      {}", row.description().replace('\n', "\n      "));
    }
}

async fn show_posts(client: JphClient) -> Result<()> {
    let screen = PostsScreen::new(client);
    let mut states = screen.states();
    screen.send(PostsEvent::Appeared);

    match states.wait_for(PostsState::is_settled).await {
        Some(PostsState::Loaded(posts)) => {
            print_rows(&posts);
            Ok(())
        }
        Some(PostsState::Failed(e)) => bail!("{e}"),
        _ => bail!("post screen stopped before settling"),
    }
}

async fn show_comments(client: JphClient, post_id: i64) -> Result<()> {
    let screen = CommentsScreen::new(client, post_id);
    let mut states = screen.states();
    screen.send(CommentsEvent::Appeared);

    match states.wait_for(CommentsState::is_settled).await {
        Some(CommentsState::Loaded(comments)) => {
            print_rows(&comments);
            Ok(())
        }
        Some(CommentsState::Failed(e)) => bail!("{e}"),
        _ => bail!("comment screen stopped before settling"),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    let config = resolve_config(cli.base_url, |key| std::env::var(key).ok());
    tracing::debug!(base_url = %config.base_url, "starting");

    let client = JphClient::from_config(&config).context("invalid configuration")?;
    match cli.post {
        Some(post_id) => show_comments(client, post_id).await,
        None => show_posts(client).await,
    }
}
