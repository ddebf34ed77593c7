use eyre::Context;
use std::io::IsTerminal;
use std::sync::Arc;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;
use youtube_live_streams::YouTubeStreams;
use youtube_live_streams::config::Config;
use youtube_live_streams::store::JsonFileStore;

const USAGE: &str = "usage: youtube-live-cli [channel-name] <user id>...";

#[tokio::main]
async fn main() -> eyre::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .with_ansi(std::io::stdout().is_terminal())
        .with_writer(std::io::stderr)
        .init();

    let mut args: Vec<String> = std::env::args().skip(1).collect();
    let rename_mode = args.first().is_some_and(|arg| arg == "channel-name");
    if rename_mode {
        args.remove(0);
    }
    if args.is_empty() {
        eyre::bail!(USAGE);
    }

    let config = Config::from_env().context("load configuration")?;
    let cache_path = std::env::var("YOUTUBE_CHANNEL_CACHE")
        .unwrap_or_else(|_| "channel_ids.json".to_string());
    let yt = YouTubeStreams::init(config, Arc::new(JsonFileStore::new(cache_path))).await;

    if rename_mode {
        for user_id in &args {
            match yt.get_channel_name(user_id).await {
                Some(name) => match name.channel_id {
                    Some(channel_id) => println!("{user_id} -> {channel_id}"),
                    None => println!("{user_id} (canonical)"),
                },
                None => println!("{user_id} ?"),
            }
        }
    } else {
        let streams = yt.get_stream_list(&args).await.unwrap_or_default();
        let json = serde_json::to_string_pretty(&streams).context("serialize stream list")?;
        println!("{json}");
    }

    yt.resolver()
        .persist()
        .await
        .context("save resolved channel ids")?;

    Ok(())
}
