use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use page_count_resolver::models::load_book_list;
use page_count_resolver::utils::logging::{log_startup, print_final_stats};
use page_count_resolver::{logger, BatchResolver, Config, ReqwestFetcher, Resolver};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Debug, Parser)]
#[command(name = "page-count-resolver", version, about = "从外部书目数据源解析书的页数")]
struct Cli {
    /// TOML 配置文件（环境变量会覆盖文件中的值）
    #[arg(long, global = true, env = "PAGE_COUNT_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// 解析一本书
    Resolve {
        #[arg(long)]
        title: String,
        #[arg(long)]
        author: Option<String>,
        /// 作品标识，如 /works/OL1168083W
        #[arg(long)]
        work_id: Option<String>,
    },
    /// 解析 TOML 书单中的所有书
    Batch {
        file: PathBuf,
    },
}

fn load_config(path: Option<&PathBuf>) -> Result<Config> {
    let config = match path {
        Some(path) => Config::from_toml_file(path)?,
        None => Config::default(),
    };
    Ok(config.with_env_overrides())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 加载配置
    let config = load_config(cli.config.as_ref())?;

    // 初始化日志
    logger::init(config.verbose_logging);

    let fetcher = Arc::new(ReqwestFetcher::new(&config).context("无法创建 HTTP 客户端")?);
    let resolver = Arc::new(Resolver::new(fetcher, &config));

    match cli.command {
        Command::Resolve {
            title,
            author,
            work_id,
        } => {
            let page_count = resolver
                .resolve_page_count(&title, author.as_deref(), work_id.as_deref())
                .await;
            match page_count {
                Some(pages) => println!("{}", pages),
                None => println!("unknown"),
            }
        }
        Command::Batch { file } => {
            log_startup(&config);
            let list = load_book_list(&file).await?;
            let report = BatchResolver::new(resolver, config.max_concurrent_books)
                .resolve_all(list.books)
                .await?;

            for outcome in &report.outcomes {
                let pages = outcome
                    .page_count
                    .map(|p| p.to_string())
                    .unwrap_or_else(|| "unknown".to_string());
                println!("{}\t{}", outcome.title, pages);
            }
            print_final_stats(&report.stats);
        }
    }

    Ok(())
}
