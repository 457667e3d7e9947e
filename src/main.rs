use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use serde_json::json;

use couples_client::config::{ClientConfig, ConfigError};
use couples_client::net::api::{auth, couples, health, media, spaces};
use couples_client::net::http::HttpClient;
use couples_client::net::types::{
    ApiKeyPayload, ChatRequest, ChatSessionCreate, CountdownCreate, CountdownUpdate, CoupleCreate, ImageRequest,
    MessageCreate, NoteCreate, PhotoCreate, RegisterPayload, UserUpdate, WishCreate, WishUpdate,
};
use couples_client::{ApiError, AppContext, FileStorage, Navigation};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("{0}")]
    Api(#[from] ApiError),
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("data directory unavailable: {0}")]
    Io(#[from] std::io::Error),
    #[error("not logged in; run `couples login` first")]
    NotLoggedIn,
    #[error("no couple for this account; create one with `couples couple create`")]
    NoCouple,
}

#[derive(Parser, Debug)]
#[command(name = "couples", about = "Couples app API client")]
struct Cli {
    /// API base: absolute URL, or a path joined onto --origin.
    #[arg(long, env = "VITE_API_BASE_URL")]
    base_url: Option<String>,

    #[arg(long, env = "COUPLES_ORIGIN")]
    origin: Option<String>,

    /// Directory holding the persisted session.
    #[arg(long, env = "COUPLES_DATA_DIR")]
    data_dir: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    Login {
        username: String,
        #[arg(long, env = "COUPLES_PASSWORD", hide_env_values = true)]
        password: String,
    },
    Register {
        email: String,
        #[arg(long, env = "COUPLES_PASSWORD", hide_env_values = true)]
        password: String,
        #[arg(long)]
        invite_code: String,
    },
    Logout,
    /// Resolve and print the logged-in user.
    Whoami,
    /// Run the route guard for a page path.
    Open {
        path: String,
    },
    Health,
    Hello {
        #[arg(default_value = "world")]
        name: String,
    },
    Apikey(ApiKeyCommand),
    Users(UsersCommand),
    Ai(AiCommand),
    Sessions(SessionsCommand),
    Couple(CoupleCommand),
    Notes(NotesCommand),
    Messages(MessagesCommand),
    Countdowns(CountdownsCommand),
    Wishes(WishesCommand),
    Photos(PhotosCommand),
}

// =============================================================================
// ADMIN
// =============================================================================

#[derive(Args, Debug)]
struct ApiKeyCommand {
    #[command(subcommand)]
    command: ApiKeySubcommand,
}

#[derive(Subcommand, Debug)]
enum ApiKeySubcommand {
    Set {
        key: String,
        #[arg(long)]
        provider: Option<String>,
    },
    Get {
        #[arg(long)]
        provider: Option<String>,
    },
}

#[derive(Args, Debug)]
struct UsersCommand {
    #[command(subcommand)]
    command: UsersSubcommand,
}

#[derive(Subcommand, Debug)]
enum UsersSubcommand {
    List,
    Update {
        user_id: i64,
        #[arg(long)]
        role: Option<String>,
        /// Comma-separated space names.
        #[arg(long)]
        allowed_spaces: Option<String>,
    },
}

// =============================================================================
// AI SPACES
// =============================================================================

#[derive(Args, Debug)]
struct AiCommand {
    #[command(subcommand)]
    command: AiSubcommand,
}

#[derive(Subcommand, Debug)]
enum AiSubcommand {
    Chat {
        prompt: String,
        #[arg(long)]
        session_id: Option<i64>,
        #[arg(long)]
        model: Option<String>,
        #[arg(long)]
        mode: Option<String>,
        /// Prior turns as a JSON array of `{role, content}`.
        #[arg(long)]
        history: Option<String>,
    },
    Image {
        prompt: String,
        #[arg(long)]
        size: Option<String>,
        #[arg(long)]
        model: Option<String>,
        #[arg(long)]
        session_id: Option<i64>,
    },
}

#[derive(Args, Debug)]
struct SessionsCommand {
    #[command(subcommand)]
    command: SessionsSubcommand,
}

#[derive(Subcommand, Debug)]
enum SessionsSubcommand {
    List,
    Create {
        #[arg(long)]
        title: Option<String>,
        #[arg(long, default_value = "chat")]
        mode: String,
        #[arg(long)]
        model: Option<String>,
    },
    Messages {
        session_id: i64,
    },
    Pin {
        session_id: i64,
        #[arg(long, default_value_t = false)]
        unpin: bool,
    },
    Delete {
        session_id: i64,
    },
}

// =============================================================================
// COUPLE COLLECTIONS
// =============================================================================

#[derive(Args, Debug)]
struct CoupleCommand {
    #[command(subcommand)]
    command: CoupleSubcommand,
}

#[derive(Subcommand, Debug)]
enum CoupleSubcommand {
    Me,
    Create {
        name: String,
        #[arg(long)]
        start_date: Option<String>,
        #[arg(long)]
        partner_a: Option<String>,
        #[arg(long)]
        partner_b: Option<String>,
    },
}

/// Couple id shared by the collection commands; defaults to the caller's couple.
#[derive(Args, Debug)]
struct CoupleScope {
    #[arg(long, global = true)]
    couple: Option<i64>,
}

#[derive(Args, Debug)]
struct NotesCommand {
    #[command(flatten)]
    scope: CoupleScope,
    #[command(subcommand)]
    command: NotesSubcommand,
}

#[derive(Subcommand, Debug)]
enum NotesSubcommand {
    List,
    Add {
        title: String,
        #[arg(long, default_value = "")]
        content: String,
    },
    Update {
        note_id: i64,
        title: String,
        #[arg(long, default_value = "")]
        content: String,
    },
    Delete {
        note_id: i64,
    },
}

#[derive(Args, Debug)]
struct MessagesCommand {
    #[command(flatten)]
    scope: CoupleScope,
    #[command(subcommand)]
    command: MessagesSubcommand,
}

#[derive(Subcommand, Debug)]
enum MessagesSubcommand {
    List,
    Add {
        content: String,
        #[arg(long)]
        author: String,
    },
    Delete {
        message_id: i64,
    },
}

#[derive(Args, Debug)]
struct CountdownsCommand {
    #[command(flatten)]
    scope: CoupleScope,
    #[command(subcommand)]
    command: CountdownsSubcommand,
}

#[derive(Subcommand, Debug)]
enum CountdownsSubcommand {
    List,
    Add {
        title: String,
        /// `YYYY-MM-DD`.
        target_date: String,
        #[arg(long)]
        yearly: bool,
    },
    Update {
        countdown_id: i64,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        target_date: Option<String>,
        #[arg(long)]
        yearly: Option<bool>,
        #[arg(long)]
        pinned: Option<bool>,
    },
    Delete {
        countdown_id: i64,
    },
}

#[derive(Args, Debug)]
struct WishesCommand {
    #[command(flatten)]
    scope: CoupleScope,
    #[command(subcommand)]
    command: WishesSubcommand,
}

#[derive(Subcommand, Debug)]
enum WishesSubcommand {
    List,
    Add {
        title: String,
        #[arg(long)]
        progress: Option<i64>,
    },
    Update {
        wish_id: i64,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        progress: Option<i64>,
        #[arg(long)]
        completed: Option<bool>,
        #[arg(long)]
        pinned: Option<bool>,
    },
    Delete {
        wish_id: i64,
    },
}

#[derive(Args, Debug)]
struct PhotosCommand {
    #[command(subcommand)]
    command: PhotosSubcommand,
}

#[derive(Subcommand, Debug)]
enum PhotosSubcommand {
    /// List photos in a space, or a couple's photos with --couple.
    List {
        #[arg(long)]
        space_type: Option<String>,
        #[arg(long, conflicts_with = "space_type")]
        couple: Option<i64>,
    },
    Add {
        url: String,
        #[arg(long)]
        caption: Option<String>,
        #[arg(long)]
        couple: Option<i64>,
    },
    Delete {
        photo_id: i64,
    },
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = ClientConfig::from_lookup(|key| match key {
        "VITE_API_BASE_URL" => cli.base_url.clone(),
        "COUPLES_ORIGIN" => cli.origin.clone(),
        "COUPLES_DATA_DIR" => cli.data_dir.clone(),
        _ => std::env::var(key).ok(),
    })?;
    std::fs::create_dir_all(&config.data_dir)?;
    let storage = Arc::new(FileStorage::new(config.data_dir.clone()));
    let ctx = AppContext::new(config, storage)?;

    match cli.command {
        Command::Login { username, password } => print_json(&ctx.login(&username, &password).await?),
        Command::Register { email, password, invite_code } => {
            let payload = RegisterPayload { email, password, invite_code, is_admin: None };
            print_json(&ctx.register(&payload).await?)
        }
        Command::Logout => {
            ctx.logout();
            print_json(&json!({ "logged_out": true }))
        }
        Command::Whoami => run_whoami(&ctx).await,
        Command::Open { path } => run_open(&ctx, &path).await,
        Command::Health => print_json(&health::fetch_health(ctx.http()).await?),
        Command::Hello { name } => print_json(&health::say_hello(ctx.http(), &name).await?),
        Command::Apikey(cmd) => run_apikey(ctx.http(), cmd).await,
        Command::Users(cmd) => run_users(ctx.http(), cmd).await,
        Command::Ai(cmd) => run_ai(ctx.http(), cmd).await,
        Command::Sessions(cmd) => run_sessions(ctx.http(), cmd).await,
        Command::Couple(cmd) => run_couple(ctx.http(), cmd).await,
        Command::Notes(cmd) => run_notes(ctx.http(), cmd).await,
        Command::Messages(cmd) => run_messages(ctx.http(), cmd).await,
        Command::Countdowns(cmd) => run_countdowns(ctx.http(), cmd).await,
        Command::Wishes(cmd) => run_wishes(ctx.http(), cmd).await,
        Command::Photos(cmd) => run_photos(ctx.http(), cmd).await,
    }
}

async fn run_whoami(ctx: &AppContext) -> Result<(), CliError> {
    if !ctx.session().is_authenticated() {
        return Err(CliError::NotLoggedIn);
    }
    let user = ctx.ensure_user().await.ok_or(CliError::NotLoggedIn)?;
    print_json(&user)
}

async fn run_open(ctx: &AppContext, path: &str) -> Result<(), CliError> {
    let rendered = match ctx.navigate(path).await {
        Navigation::Allow => json!({ "path": path, "decision": "allow" }),
        Navigation::Redirect(route) => {
            json!({ "path": path, "decision": "redirect", "to": route.path(), "route": route.name() })
        }
    };
    print_json(&rendered)
}

async fn run_apikey(http: &HttpClient, cmd: ApiKeyCommand) -> Result<(), CliError> {
    match cmd.command {
        ApiKeySubcommand::Set { key, provider } => {
            print_json(&auth::set_api_key(http, &ApiKeyPayload { provider, key }).await?)
        }
        ApiKeySubcommand::Get { provider } => print_json(&auth::get_api_key(http, provider.as_deref()).await?),
    }
}

async fn run_users(http: &HttpClient, cmd: UsersCommand) -> Result<(), CliError> {
    match cmd.command {
        UsersSubcommand::List => print_json(&auth::list_users(http).await?),
        UsersSubcommand::Update { user_id, role, allowed_spaces } => {
            let patch = UserUpdate { role, allowed_spaces };
            print_json(&auth::update_user(http, user_id, &patch).await?)
        }
    }
}

async fn run_ai(http: &HttpClient, cmd: AiCommand) -> Result<(), CliError> {
    match cmd.command {
        AiSubcommand::Chat { prompt, session_id, model, mode, history } => {
            let history = history.map(|raw| serde_json::from_str(&raw)).transpose()?;
            let request = ChatRequest { prompt, history, model, session_id, mode };
            print_json(&spaces::chat(http, &request).await?)
        }
        AiSubcommand::Image { prompt, size, model, session_id } => {
            let request = ImageRequest { prompt, model, size, session_id };
            print_json(&spaces::generate_image(http, &request).await?)
        }
    }
}

async fn run_sessions(http: &HttpClient, cmd: SessionsCommand) -> Result<(), CliError> {
    match cmd.command {
        SessionsSubcommand::List => print_json(&spaces::list_sessions(http).await?),
        SessionsSubcommand::Create { title, mode, model } => {
            let payload = ChatSessionCreate { title, mode, model };
            print_json(&spaces::create_session(http, &payload).await?)
        }
        SessionsSubcommand::Messages { session_id } => {
            print_json(&spaces::list_session_messages(http, session_id).await?)
        }
        SessionsSubcommand::Pin { session_id, unpin } => {
            print_json(&spaces::set_session_pin(http, session_id, !unpin).await?)
        }
        SessionsSubcommand::Delete { session_id } => {
            spaces::delete_session(http, session_id).await?;
            print_json(&json!({ "deleted": session_id }))
        }
    }
}

async fn run_couple(http: &HttpClient, cmd: CoupleCommand) -> Result<(), CliError> {
    match cmd.command {
        CoupleSubcommand::Me => print_json(&couples::fetch_my_couple(http).await?),
        CoupleSubcommand::Create { name, start_date, partner_a, partner_b } => {
            let payload = CoupleCreate {
                name,
                start_date,
                partner_a_name: partner_a,
                partner_b_name: partner_b,
                ..CoupleCreate::default()
            };
            print_json(&couples::create_couple(http, &payload).await?)
        }
    }
}

async fn run_notes(http: &HttpClient, cmd: NotesCommand) -> Result<(), CliError> {
    let couple_id = resolve_couple(http, cmd.scope.couple).await?;
    match cmd.command {
        NotesSubcommand::List => print_json(&couples::list_notes(http, couple_id).await?),
        NotesSubcommand::Add { title, content } => {
            let payload = NoteCreate { title, content_md: content };
            print_json(&couples::add_note(http, couple_id, &payload).await?)
        }
        NotesSubcommand::Update { note_id, title, content } => {
            let payload = NoteCreate { title, content_md: content };
            print_json(&couples::update_note(http, couple_id, note_id, &payload).await?)
        }
        NotesSubcommand::Delete { note_id } => {
            couples::delete_note(http, couple_id, note_id).await?;
            print_json(&json!({ "deleted": note_id }))
        }
    }
}

async fn run_messages(http: &HttpClient, cmd: MessagesCommand) -> Result<(), CliError> {
    let couple_id = resolve_couple(http, cmd.scope.couple).await?;
    match cmd.command {
        MessagesSubcommand::List => print_json(&couples::list_messages(http, couple_id).await?),
        MessagesSubcommand::Add { content, author } => {
            let payload = MessageCreate { author, content };
            print_json(&couples::add_message(http, couple_id, &payload).await?)
        }
        MessagesSubcommand::Delete { message_id } => {
            couples::delete_message(http, couple_id, message_id).await?;
            print_json(&json!({ "deleted": message_id }))
        }
    }
}

async fn run_countdowns(http: &HttpClient, cmd: CountdownsCommand) -> Result<(), CliError> {
    let couple_id = resolve_couple(http, cmd.scope.couple).await?;
    match cmd.command {
        CountdownsSubcommand::List => print_json(&couples::list_countdowns(http, couple_id).await?),
        CountdownsSubcommand::Add { title, target_date, yearly } => {
            let payload = CountdownCreate { title, target_date, is_yearly: Some(yearly) };
            print_json(&couples::add_countdown(http, couple_id, &payload).await?)
        }
        CountdownsSubcommand::Update { countdown_id, title, target_date, yearly, pinned } => {
            let patch = CountdownUpdate { title, target_date, is_yearly: yearly, is_pinned: pinned };
            print_json(&couples::update_countdown(http, couple_id, countdown_id, &patch).await?)
        }
        CountdownsSubcommand::Delete { countdown_id } => {
            couples::delete_countdown(http, couple_id, countdown_id).await?;
            print_json(&json!({ "deleted": countdown_id }))
        }
    }
}

async fn run_wishes(http: &HttpClient, cmd: WishesCommand) -> Result<(), CliError> {
    let couple_id = resolve_couple(http, cmd.scope.couple).await?;
    match cmd.command {
        WishesSubcommand::List => print_json(&couples::list_wishes(http, couple_id).await?),
        WishesSubcommand::Add { title, progress } => {
            let payload = WishCreate { title, progress };
            print_json(&couples::add_wish(http, couple_id, &payload).await?)
        }
        WishesSubcommand::Update { wish_id, title, progress, completed, pinned } => {
            let patch = WishUpdate { title, progress, completed, is_pinned: pinned };
            print_json(&couples::update_wish(http, couple_id, wish_id, &patch).await?)
        }
        WishesSubcommand::Delete { wish_id } => {
            couples::delete_wish(http, couple_id, wish_id).await?;
            print_json(&json!({ "deleted": wish_id }))
        }
    }
}

async fn run_photos(http: &HttpClient, cmd: PhotosCommand) -> Result<(), CliError> {
    match cmd.command {
        PhotosSubcommand::List { couple: Some(couple_id), .. } => print_json(&media::list_photos(http, couple_id).await?),
        PhotosSubcommand::List { space_type, couple: None } => {
            print_json(&media::list_space_photos(http, space_type.as_deref()).await?)
        }
        PhotosSubcommand::Add { url, caption, couple } => {
            let payload = PhotoCreate { url, caption };
            let photo = match couple {
                Some(couple_id) => media::add_photo(http, couple_id, &payload).await?,
                None => media::create_photo(http, &payload).await?,
            };
            print_json(&photo)
        }
        PhotosSubcommand::Delete { photo_id } => {
            media::delete_photo(http, photo_id).await?;
            print_json(&json!({ "deleted": photo_id }))
        }
    }
}

async fn resolve_couple(http: &HttpClient, explicit: Option<i64>) -> Result<i64, CliError> {
    if let Some(couple_id) = explicit {
        return Ok(couple_id);
    }
    let couple = couples::fetch_my_couple(http).await?.ok_or(CliError::NoCouple)?;
    Ok(couple.id)
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}
