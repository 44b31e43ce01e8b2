use clap::Parser;
use classify_common::{
    BulkOutcome, ClassificationBackend, ClassificationClient, ClassificationSession, JobProgressPoller,
    PollHandle, PollOutcome, ResetOutcome, StatusPoller,
};
use comment_classify::{cli, config, error, http, snapshot, terminal};
use cli::{Cli, Commands};
use config::Config;
use error::Result;
use http::HttpBackend;
use terminal::{format_badge, format_charts, TerminalPresenter, TerminalProgress, TokioTimer};
use tracing::warn;
use tracing_subscriber::EnvFilter;

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

type CliClient = ClassificationClient<HttpBackend, TerminalPresenter, TokioTimer>;

fn client(config: &Config, assume_yes: bool) -> Result<CliClient> {
    let backend = HttpBackend::from_config(config)?;
    Ok(ClassificationClient::new(
        backend,
        TerminalPresenter::new(assume_yes, true),
        TokioTimer,
        config.sync.clone(),
    ))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = Config::load()?;
    if let Some(url) = cli.base_url.clone() {
        config.set_base_url(url)?;
    }

    match cli.command {
        Commands::Classify { snapshot: path, index, force, write } => {
            println!("🏷 classify-sync - 1件分類\n");

            let session = ClassificationSession::from_page(snapshot::load_snapshot(&path)?);
            let client = client(&config, false)?;

            let classified = if force {
                Some(client.classify_one(&session, index).await?)
            } else {
                client.classify_if_missing(&session, index).await?
            };

            if classified.is_none() {
                if let Some(existing) = session.result(index) {
                    println!("✔ 分類済みのためスキップ（--force で再分類）");
                    println!("{}", format_badge(index, &existing));
                }
            }

            if write {
                snapshot::save_snapshot(&path, &session)?;
                println!("✔ 結果を保存: {}", path.display());
            }
        }

        Commands::ClassifyAll { snapshot: path, write } => {
            println!("🚀 classify-sync - 一括分類\n");

            let session = ClassificationSession::from_page(snapshot::load_snapshot(&path)?);
            let client = client(&config, false)?;

            match client.classify_all(&session).await {
                BulkOutcome::Completed { classified, failed } => {
                    println!("\n✅ 完了: 成功 {}件 / 失敗 {}件", classified, failed);
                }
                BulkOutcome::AlreadyRunning => println!("一括分類は実行中です"),
            }

            if write {
                snapshot::save_snapshot(&path, &session)?;
                println!("✔ 結果を保存: {}", path.display());
            }
        }

        Commands::Reset { snapshot: path, yes } => {
            let session = ClassificationSession::from_page(snapshot::load_snapshot(&path)?);
            let client = client(&config, yes)?;

            match client.reset(&session, &PollHandle::new()).await? {
                ResetOutcome::Cancelled => println!("キャンセルしました"),
                ResetOutcome::Restarted => {
                    snapshot::save_snapshot(&path, &session)?;
                    println!("✔ リセット完了。サーバーで再分類中です（watch で監視できます）");
                }
                ResetOutcome::RestartFailed => {
                    snapshot::save_snapshot(&path, &session)?;
                    println!("リセットのみ完了しました");
                }
            }
        }

        Commands::Watch { snapshot: path, write } => {
            println!("👀 classify-sync - 分類ステータス監視\n");

            let session = ClassificationSession::from_page(snapshot::load_snapshot(&path)?);
            let client = client(&config, false)?;
            client.render_all(&session);

            if StatusPoller::<HttpBackend, TerminalPresenter>::should_start(&session) {
                let poller = StatusPoller::new(client.backend(), client.presenter());
                let handle = PollHandle::new();
                poller
                    .run(&session, client.timer(), config.sync.status_poll_interval(), &handle)
                    .await;

                // 端末ではリロードの代わりに全件を取り込み直す
                if client.presenter().reload_requested().is_some() {
                    let status = client.backend().classification_status(session.job_id()).await?;
                    session.hydrate(&status.classification_results);
                    println!("{}", format_charts(&session.aggregate()));
                }
            }

            println!("✅ 全{}件 分類済み", session.classified_count());

            if write {
                snapshot::save_snapshot(&path, &session)?;
                println!("✔ 結果を保存: {}", path.display());
            }
        }

        Commands::Progress { job_id } => {
            let backend = HttpBackend::from_config(&config)?;
            let view = TerminalProgress::new();
            let poller = JobProgressPoller::new(&backend, &view, &job_id, config.sync.reload_delay());
            let handle = PollHandle::new();

            match poller.tick().await {
                Ok(PollOutcome::Finished) => poller.finish(&handle),
                Ok(PollOutcome::Pending { .. }) => {}
                Err(e) => warn!(error = %e, "progress poll failed"),
            }
            poller
                .run(&TokioTimer, config.sync.progress_poll_interval(), &handle)
                .await;

            if let Some(delay) = view.reload_requested() {
                tokio::time::sleep(delay).await;
            }
            println!("\n✅ ジョブ終了");
        }

        Commands::Summary { snapshot: path } => {
            let session = ClassificationSession::from_page(snapshot::load_snapshot(&path)?);

            for (index, result) in session.store().iter() {
                println!("{}", format_badge(index, result));
            }
            println!();
            println!("{}", format_charts(&session.aggregate()));
            println!("コメント: {}件 / 分類済み: {}件", session.comment_count(), session.classified_count());
        }

        Commands::Config { set_base_url, show } => {
            // 環境変数の上書きを保存しないようファイルから読み直す
            let mut config = Config::load_from(&Config::config_path()?)?;

            if let Some(url) = set_base_url {
                config.set_base_url(url)?;
                config.save()?;
                println!("✔ 接続先を設定しました");
            }

            if show {
                println!("設定:");
                println!("  接続先: {}", config.base_url);
                println!("  タイムアウト: {}秒", config.timeout_seconds);
                println!("  一括分類の間隔: {}ms", config.sync.classify_all_delay_ms);
                println!("  ステータス監視の間隔: {}ms", config.sync.status_poll_interval_ms);
                println!("  進捗監視の間隔: {}ms", config.sync.progress_poll_interval_ms);
                println!("  リロード待ち: {}ms", config.sync.reload_delay_ms);
            }
        }
    }

    Ok(())
}
