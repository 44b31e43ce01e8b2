use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "classify-sync")]
#[command(about = "コメント分類の状態同期ツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// 接続先（設定ファイル・環境変数より優先）
    #[arg(long, global = true)]
    pub base_url: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// コメントを1件分類
    Classify {
        /// ページスナップショット（JSON）
        #[arg(required = true)]
        snapshot: PathBuf,

        /// コメント位置（0始まり）
        #[arg(short, long)]
        index: usize,

        /// 分類済みでも再分類する
        #[arg(short, long)]
        force: bool,

        /// 結果をスナップショットに書き戻す
        #[arg(short, long)]
        write: bool,
    },

    /// 全コメントを先頭から順に分類
    ClassifyAll {
        #[arg(required = true)]
        snapshot: PathBuf,

        /// 結果をスナップショットに書き戻す
        #[arg(short, long)]
        write: bool,
    },

    /// 分類結果をリセットしてサーバー側の一括分類を再開
    Reset {
        #[arg(required = true)]
        snapshot: PathBuf,

        /// 確認をスキップ
        #[arg(short, long)]
        yes: bool,
    },

    /// 分類ステータスを監視し、完了まで結果を取り込む
    Watch {
        #[arg(required = true)]
        snapshot: PathBuf,

        /// 結果をスナップショットに書き戻す
        #[arg(short, long)]
        write: bool,
    },

    /// ジョブ進捗を表示（終了まで）
    Progress {
        /// ジョブID
        #[arg(required = true)]
        job_id: String,
    },

    /// スナップショットの集計を表示
    Summary {
        #[arg(required = true)]
        snapshot: PathBuf,
    },

    /// 設定
    Config {
        /// 接続先を設定
        #[arg(long)]
        set_base_url: Option<String>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}
