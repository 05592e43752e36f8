use back2wo::{capture, cli, config, error, interactive, player, presenter, scanner, timeline};
use back2wo_common::catalog::analysis_panel;
use clap::Parser;
use cli::{Cli, Commands};
use config::Config;
use error::Result;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG があれば優先
    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with_writer(std::io::stderr)
        .init();

    let config = Config::load()?;

    match cli.command {
        Commands::Run { images, resubmit_after, analysis_delay, reveal_interval } => {
            presenter::print_banner();

            let mut timing = config.timing;
            if let Some(ms) = analysis_delay {
                timing.analysis_delay_ms = ms;
            }
            if let Some(ms) = reveal_interval {
                timing.reveal_interval_ms = ms;
            }

            let mut player = player::Player::new(timing, config.mode_flow);

            let loaded = if images.is_empty() {
                match interactive::select_image(player.orchestrator_mut())? {
                    Some(image) => vec![image],
                    None => return Ok(()),
                }
            } else {
                let found = scanner::collect_images(&images)?;
                println!("✔ {}枚の画像を検出\n", found.len());
                capture::load_all(&found)?
            };

            let report = player
                .play(&loaded, resubmit_after.map(Duration::from_millis))
                .await?;
            tracing::debug!(?report, "playback finished");

            if report.completed {
                println!("✅ 完了");
            }
        }

        Commands::Timeline { images, resubmit_after, reset_at, json } => {
            let found = scanner::collect_images(&images)?;
            let loaded = capture::load_all(&found)?;

            let options = timeline::TimelineOptions {
                resubmit_after_ms: resubmit_after,
                reset_at_ms: reset_at,
            };
            let entries = timeline::simulate(&loaded, config.timing, config.mode_flow, options);

            if json {
                println!("{}", timeline::render_json(&entries)?);
            } else {
                println!("{}", timeline::render_text(&entries));
            }
        }

        Commands::Catalog { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(&analysis_panel())?);
            } else {
                presenter::print_analysis_panel();
            }
        }

        Commands::Config { analysis_delay, reveal_interval, mode_flow, show } => {
            let mut config = config;
            let changed = analysis_delay.is_some() || reveal_interval.is_some() || mode_flow.is_some();

            if let Some(ms) = analysis_delay {
                config.timing.analysis_delay_ms = ms;
            }
            if let Some(ms) = reveal_interval {
                config.timing.reveal_interval_ms = ms;
            }
            if let Some(flow) = mode_flow {
                config.mode_flow = flow;
            }

            if changed {
                config.save()?;
                println!("✔ 設定を保存しました: {}", Config::config_path()?.display());
            }

            if show || !changed {
                println!("設定:");
                println!("  解析演出: {}ms", config.timing.analysis_delay_ms);
                println!("  会話の表示間隔: {}ms", config.timing.reveal_interval_ms);
                println!("  モード選択: {}", config.mode_flow);
            }
        }
    }

    Ok(())
}
