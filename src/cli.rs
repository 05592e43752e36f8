use back2wo_common::ModeFlow;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "back2wo")]
#[command(about = "Back2Wo - AIエージェントマーケットプレイスのデモ", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 画像を投入して解析演出と会話をリアルタイム再生
    Run {
        /// 画像ファイルまたはフォルダ（省略時は対話的に選択）
        images: Vec<PathBuf>,

        /// 次の画像を投入するまでの時間（ミリ秒、省略時は再生完了後）
        #[arg(long)]
        resubmit_after: Option<u64>,

        /// 解析演出の時間（ミリ秒、設定ファイルより優先）
        #[arg(long)]
        analysis_delay: Option<u64>,

        /// 会話の表示間隔（ミリ秒、設定ファイルより優先）
        #[arg(long)]
        reveal_interval: Option<u64>,
    },

    /// 仮想時計で再生し、全イベントを時刻付きで出力
    Timeline {
        /// 画像ファイルまたはフォルダ
        #[arg(required = true)]
        images: Vec<PathBuf>,

        /// 次の画像を投入するまでの時間（ミリ秒、省略時は再生完了後）
        #[arg(long)]
        resubmit_after: Option<u64>,

        /// 指定時刻（ミリ秒）にリセット
        #[arg(long)]
        reset_at: Option<u64>,

        /// JSONで出力
        #[arg(long)]
        json: bool,
    },

    /// 解析パネル（所見・サプライヤー）を表示
    Catalog {
        /// JSONで出力
        #[arg(long)]
        json: bool,
    },

    /// 設定を表示/編集
    Config {
        /// 解析演出の時間（ミリ秒）を設定
        #[arg(long)]
        analysis_delay: Option<u64>,

        /// 会話の表示間隔（ミリ秒）を設定
        #[arg(long)]
        reveal_interval: Option<u64>,

        /// モード選択の構成 (selector/direct-switch)
        #[arg(long)]
        mode_flow: Option<ModeFlow>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_run_with_images() {
        let cli = Cli::try_parse_from(["back2wo", "run", "a.jpg", "b.png", "--resubmit-after", "500"]).unwrap();
        match cli.command {
            Commands::Run { images, resubmit_after, .. } => {
                assert_eq!(images.len(), 2);
                assert_eq!(resubmit_after, Some(500));
            }
            _ => panic!("run が解析されない"),
        }
    }

    #[test]
    fn test_parse_timeline_requires_image() {
        assert!(Cli::try_parse_from(["back2wo", "timeline"]).is_err());
    }

    #[test]
    fn test_parse_config_mode_flow() {
        let cli = Cli::try_parse_from(["back2wo", "config", "--mode-flow", "direct-switch", "-v"]).unwrap();
        assert!(cli.verbose);
        match cli.command {
            Commands::Config { mode_flow, .. } => assert_eq!(mode_flow, Some(ModeFlow::DirectSwitch)),
            _ => panic!("config が解析されない"),
        }
    }
}
