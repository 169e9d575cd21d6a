use std::rc::Rc;

use fraudwatch::web::route::AppRoute;
use fraudwatch::web::surface::{ErrorSlot, FormId, HistoryView, ResultCard, Surface, ToastKind};
use fraudwatch::{App, ClientConfig, ReqwestHttpClient};
use fraudwatch_shared::{Credentials, FEATURE_NAMES};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// 把界面变化直接打印到终端
struct TerminalSurface;

impl Surface for TerminalSurface {
    fn show_page(&self, route: AppRoute) {
        println!("== {} ==", route.name());
    }

    fn set_navigation_visible(&self, visible: bool) {
        if visible {
            println!("[nav] dashboard | history | logout");
        }
    }

    fn set_submit_enabled(&self, _form: FormId, _enabled: bool) {}

    fn show_error(&self, slot: ErrorSlot, message: &str) {
        println!("[{slot:?} error] {message}");
    }

    fn hide_error(&self, _slot: ErrorSlot) {}

    fn toast(&self, message: &str, kind: ToastKind) {
        println!("[{kind:?}] {message}");
    }

    fn render_fields(&self, fields: &[&str]) {
        println!("fields: {}", fields.join(", "));
    }

    fn show_result(&self, card: &ResultCard) {
        println!("[{}] {}", card.title(), card.message);
    }

    fn close_result(&self) {}

    fn render_history(&self, view: &HistoryView) {
        match view {
            HistoryView::Loading => println!("loading history..."),
            HistoryView::Empty => println!("No prediction history yet"),
            HistoryView::Table(rows) => {
                for row in rows {
                    println!(
                        "{:<28} {:<24} {}",
                        row.timestamp,
                        row.result,
                        row.verdict.badge_label()
                    );
                }
            }
        }
    }
}

fn print_help() {
    println!("commands:");
    println!("  goto <fragment>          e.g. goto #history");
    println!("  login <user> <password>");
    println!("  register <user> <password>");
    println!("  dashboard | history | logout | reload");
    println!("  set <field> <value>      fields: {}", FEATURE_NAMES.join(" "));
    println!("  predict | close | quit");
}

/// 一行终端输入对应的用户操作
enum Command {
    Help,
    Goto(String),
    Login(Credentials),
    Register(Credentials),
    Logout,
    Dashboard,
    History,
    Reload,
    Set(String, String),
    Predict,
    Close,
}

impl Command {
    fn parse(words: &[&str]) -> Option<Self> {
        let command = match words {
            ["help"] => Self::Help,
            ["goto", fragment] => Self::Goto(fragment.to_string()),
            ["login", user, password] => Self::Login(Credentials::new(*user, *password)),
            ["register", user, password] => Self::Register(Credentials::new(*user, *password)),
            ["logout"] => Self::Logout,
            ["dashboard"] => Self::Dashboard,
            ["history"] => Self::History,
            ["reload"] => Self::Reload,
            ["set", field, value] => Self::Set(field.to_string(), value.to_string()),
            ["predict"] => Self::Predict,
            ["close"] => Self::Close,
            _ => return None,
        };
        Some(command)
    }

    async fn run(self, app: &App<ReqwestHttpClient>) {
        match self {
            Self::Help => print_help(),
            Self::Goto(fragment) => app.goto(&fragment).await,
            Self::Login(credentials) => app.submit_login(credentials).await,
            Self::Register(credentials) => app.submit_register(credentials).await,
            Self::Logout => app.logout().await,
            Self::Dashboard => app.show_dashboard().await,
            Self::History => app.show_history().await,
            Self::Reload => app.reload().await,
            Self::Set(field, value) => {
                if !app.set_field(&field, &value) {
                    println!("unknown field or dashboard not opened: {field}");
                }
            }
            Self::Predict => app.submit_prediction().await,
            Self::Close => app.close_result(),
        }
    }
}

/// 读取终端命令；每条命令在独立的本地任务中执行，等待网络时不阻塞输入
async fn run_terminal(app: Rc<App<ReqwestHttpClient>>) -> std::io::Result<()> {
    app.dispatch().await;
    print_help();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let words: Vec<&str> = line.split_whitespace().collect();
        match words.as_slice() {
            [] => continue,
            ["quit"] | ["exit"] => break,
            _ => {}
        }
        match Command::parse(&words) {
            Some(command) => {
                let app = app.clone();
                tokio::task::spawn_local(async move { command.run(&app).await });
            }
            None => warn!(input = %line, "Unrecognized command."),
        }
    }

    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("fraudwatch=info".parse()?))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let config = ClientConfig::from_env()?;
    info!(api = %config.api_base_url, "Starting FraudWatch client.");

    let initial = std::env::args().nth(1).unwrap_or_default();
    let app = Rc::new(App::new(
        ReqwestHttpClient::new()?,
        config,
        Rc::new(TerminalSurface),
        &initial,
    ));

    let local = tokio::task::LocalSet::new();
    local.run_until(run_terminal(app)).await?;

    Ok(())
}
