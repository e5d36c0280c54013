use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use dotenvy::dotenv;
use tracing::{error, info, warn};

use app::flow::{FallbackProvider, FlowError, LiveProvider, SearchFlow};
use app::render::render_stock;
use client::api::ApiClient;
use client::transport::HttpTransport;
use common::tasks::DelayedTask;
use models::blood::LocationQuery;
use models::locations;
use models::user::UserType;
use service::assistant::Assistant;
use service::session::SessionStore;

fn init_logging() {
    // Load .env first so RUST_LOG and LOG_FORMAT take effect.
    dotenv().ok();
    match std::env::var("LOG_FORMAT").as_deref() {
        Ok("json") => common::utils::logging::init_logging_json(),
        _ => common::utils::logging::init_logging_default(),
    }
    info!(service = "portal", event = "logger_init", "tracing subscriber initialized");
}

fn usage() -> ! {
    eprintln!("usage: portal <command>");
    eprintln!("  search <county> <constituency> [blood_type]");
    eprintln!("  ask <question...>");
    eprintln!("  login <phone> <password> [donor|doctor|admin]");
    eprintln!("  logout");
    eprintln!("  whoami");
    eprintln!("  counties [county]");
    std::process::exit(2);
}

fn main() -> ExitCode {
    init_logging();

    let rt = match tokio::runtime::Builder::new_multi_thread().enable_all().build() {
        Ok(rt) => rt,
        Err(e) => {
            error!(service = "portal", event = "runtime_build_failed", error = %e, "failed to build tokio runtime");
            return ExitCode::FAILURE;
        }
    };

    rt.block_on(async {
        match run().await {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                error!(service = "portal", event = "run_failed", error = %e, "portal command failed");
                eprintln!("error: {e}");
                ExitCode::FAILURE
            }
        }
    })
}

async fn run() -> anyhow::Result<()> {
    let cfg = configs::AppConfig::load_and_validate()?;
    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(command) = args.first() else { usage() };

    let session = SessionStore::open(cfg.storage.session_file()).await?;
    let client = if cfg.api.is_offline() {
        None
    } else {
        let transport = Arc::new(HttpTransport::new(Duration::from_secs(cfg.api.timeout_secs))?);
        Some(Arc::new(ApiClient::new(
            cfg.api.base_url.clone(),
            transport,
            Arc::clone(&session),
        )))
    };

    match command.as_str() {
        "search" => {
            let county = args.get(1).cloned().unwrap_or_default();
            let constituency = args.get(2).cloned().unwrap_or_default();
            let blood_type = args
                .get(3)
                .map(|raw| raw.parse().map_err(|e| anyhow::anyhow!("{e}")))
                .transpose()?;
            let query = LocationQuery { county, constituency, blood_type };

            let provider = FallbackProvider::new(client.map(LiveProvider::new));
            let mut flow = SearchFlow::new(provider);
            println!("Searching blood availability...");
            match flow.submit(&query).await {
                Ok(hospitals) => println!("{}", render_stock(&hospitals)),
                Err(e @ FlowError::Validation(_)) => {
                    warn!(service = "portal", event = "search_rejected", error = %e, "search input rejected");
                    println!("warning: {e}");
                }
                Err(e) => return Err(e.into()),
            }
        }
        "ask" => {
            let question = args[1..].join(" ");
            if question.trim().is_empty() {
                usage()
            }
            let assistant = Assistant::new();
            // Typing-indicator delay; cancelled with the handle if we bail early.
            let typing = DelayedTask::spawn(Duration::from_millis(600), || println!("..."));
            typing.join().await;
            println!("{}", assistant.reply(&question));
        }
        "login" => {
            let client = client
                .ok_or_else(|| anyhow::anyhow!("api.base_url is not configured; login needs a live backend"))?;
            let phone = args.get(1).cloned().unwrap_or_default();
            let password = args.get(2).cloned().unwrap_or_default();
            if phone.is_empty() || password.is_empty() {
                usage()
            }
            let user_type: UserType = args
                .get(3)
                .map(|raw| raw.parse().map_err(|e| anyhow::anyhow!("{e}")))
                .transpose()?
                .unwrap_or(UserType::Donor);

            let result = client.login(&phone, &password, user_type).await?;
            if session.load().await.is_logged_in() {
                println!("logged in");
            } else {
                let msg = result
                    .get("error")
                    .or_else(|| result.get("message"))
                    .and_then(serde_json::Value::as_str)
                    .unwrap_or("login was not accepted");
                println!("not logged in: {msg}");
            }
        }
        "logout" => {
            let client = client
                .ok_or_else(|| anyhow::anyhow!("api.base_url is not configured; logout needs a live backend"))?;
            client.logout().await?;
            println!("logged out");
        }
        "whoami" => match client {
            Some(client) => match client.current_user().await? {
                Some(profile) => {
                    println!("{}", profile.name.unwrap_or_else(|| "unnamed user".into()))
                }
                None => println!("not logged in"),
            },
            None => match session.load().await.profile.and_then(|p| p.name) {
                Some(name) => println!("{name} (cached)"),
                None => println!("not logged in"),
            },
        },
        "counties" => match args.get(1) {
            Some(county) => {
                for constituency in locations::constituencies(county) {
                    println!("{constituency}");
                }
            }
            None => {
                for county in locations::COUNTIES {
                    println!("{county}");
                }
            }
        },
        _ => usage(),
    }
    Ok(())
}
