use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use serde_json::Value;
use tracing_subscriber::EnvFilter;

use orbe_client::config::{ClientConfig, ConfigError};
use orbe_client::net::api::ApiClient;
use orbe_client::net::base_url;
use orbe_client::net::envelope::ApiResponse;
use orbe_client::net::navigator::TerminalNavigator;
use orbe_client::net::transport::TransportError;
use orbe_client::net::types::{
    CaseCreate, DonationRequestCreate, DonationRequestUpdate, Language, LoginCredentials, PasswordSetup,
    PreferencesUpdate, Registration, Theme, Upload, UrgencyLevel, VoluntaryDonationCreate,
};
use orbe_client::router::{Router, RouterError};
use orbe_client::state::auth::AuthStore;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("API base URL '{0}' is not absolute; set --api-url or ORBE_API_URL / ORBE_PAGE_ORIGIN")]
    RelativeBaseUrl(String),
    #[error("http client setup failed: {0}")]
    Transport(#[from] TransportError),
    #[error("request failed with status {status}: {message}")]
    Api { status: u16, message: String },
    #[error("{0}")]
    Rejected(String),
    #[error("not logged in; run `orbe login` first")]
    NotLoggedIn,
    #[error("failed to read {path}: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("navigation failed: {0}")]
    Router(#[from] RouterError),
}

#[derive(Parser, Debug)]
#[command(name = "orbe", about = "ORBE platform member client")]
struct Cli {
    /// API base URL, e.g. http://localhost:8000/api.
    #[arg(long, env = "ORBE_API_URL")]
    api_url: Option<String>,

    /// File holding the session token between runs.
    #[arg(long, env = "ORBE_TOKEN_FILE")]
    token_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "ORBE_PASSWORD", hide_env_values = true)]
        password: String,
    },
    Logout,
    /// Show the logged-in member.
    Whoami,
    Register {
        #[arg(long)]
        email: String,
        #[arg(long, env = "ORBE_PASSWORD", hide_env_values = true)]
        password: String,
        #[arg(long)]
        first_name: Option<String>,
        #[arg(long)]
        last_name: Option<String>,
    },
    Invitation(InvitationCommand),
    Preferences(PreferencesArgs),
    /// Show onboarding completion.
    Onboarding,
    Fees {
        /// List every member's fees (board and fiscal council).
        #[arg(long)]
        all: bool,
    },
    Donations(DonationCommand),
    Requests(RequestCommand),
    Cases(CaseCommand),
    Attachments(AttachmentCommand),
    /// Resolve a client route through the navigation guard.
    Route { path: String },
}

#[derive(Args, Debug)]
struct InvitationCommand {
    #[command(subcommand)]
    command: InvitationSubcommand,
}

#[derive(Subcommand, Debug)]
enum InvitationSubcommand {
    Validate {
        token: String,
    },
    /// Set a password for an invitation and log in.
    Accept {
        token: String,
        #[arg(long, env = "ORBE_PASSWORD", hide_env_values = true)]
        password: String,
    },
}

#[derive(Args, Debug)]
struct PreferencesArgs {
    #[arg(long, value_enum)]
    theme: Option<ThemeArg>,
    #[arg(long, value_enum)]
    language: Option<LanguageArg>,
    #[arg(long)]
    due_day: Option<u8>,
    #[arg(long)]
    phone: Option<String>,
    #[arg(long)]
    city: Option<String>,
    #[arg(long)]
    state: Option<String>,
    #[arg(long)]
    country: Option<String>,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum ThemeArg {
    White,
    Black,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum LanguageArg {
    PtBr,
    En,
    Es,
}

#[derive(ValueEnum, Debug, Clone, Copy, Default)]
enum Scope {
    #[default]
    Mine,
    All,
    Pending,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum UrgencyArg {
    Low,
    Medium,
    High,
    Critical,
}

#[derive(Args, Debug)]
struct DonationCommand {
    #[command(subcommand)]
    command: DonationSubcommand,
}

#[derive(Subcommand, Debug)]
enum DonationSubcommand {
    List {
        #[arg(long, value_enum, default_value_t)]
        scope: Scope,
    },
    Create {
        #[arg(long)]
        amount: f64,
        #[arg(long)]
        message: Option<String>,
        #[arg(long)]
        anonymous: bool,
        /// Payment proof image or PDF.
        #[arg(long)]
        proof: Option<PathBuf>,
    },
    Verify {
        id: i64,
    },
}

#[derive(Args, Debug)]
struct RequestCommand {
    #[command(subcommand)]
    command: RequestSubcommand,
}

#[derive(Subcommand, Debug)]
enum RequestSubcommand {
    List {
        #[arg(long, value_enum, default_value_t)]
        scope: Scope,
    },
    Create {
        #[arg(long)]
        recipient: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long)]
        amount: f64,
        #[arg(long)]
        reason: String,
        #[arg(long, value_enum)]
        urgency: UrgencyArg,
    },
    Update {
        id: i64,
        #[arg(long)]
        recipient: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        amount: Option<f64>,
        #[arg(long)]
        reason: Option<String>,
        #[arg(long, value_enum)]
        urgency: Option<UrgencyArg>,
    },
    Approve {
        id: i64,
    },
    Reject {
        id: i64,
        #[arg(long)]
        reason: String,
    },
    Delete {
        id: i64,
    },
    Stats,
}

#[derive(Args, Debug)]
struct CaseCommand {
    #[command(subcommand)]
    command: CaseSubcommand,
}

#[derive(Subcommand, Debug)]
enum CaseSubcommand {
    List {
        #[arg(long, value_enum)]
        scope: Option<Scope>,
    },
    Show {
        id: i64,
    },
    Create {
        #[arg(long)]
        title: String,
        #[arg(long)]
        public_description: String,
        #[arg(long, default_value = "")]
        internal_description: String,
        #[arg(long)]
        total_value: f64,
    },
    Submit {
        id: i64,
    },
    Approve {
        id: i64,
    },
    Reject {
        id: i64,
        #[arg(long)]
        reason: String,
    },
    /// Send bank details as a JSON object.
    BankInfo {
        id: i64,
        #[arg(long)]
        data: String,
    },
    ConfirmTransfer {
        id: i64,
    },
    MemberProof {
        id: i64,
    },
    Complete {
        id: i64,
    },
}

#[derive(Args, Debug)]
struct AttachmentCommand {
    #[command(subcommand)]
    command: AttachmentSubcommand,
}

#[derive(Subcommand, Debug)]
enum AttachmentSubcommand {
    Upload { case_id: i64, file: PathBuf },
    Delete { id: i64 },
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = ClientConfig::from_env()?;
    if let Some(api_url) = cli.api_url {
        config.api_url = Some(api_url);
    }
    if let Some(token_file) = cli.token_file {
        config.token_file = token_file;
    }

    let base = config.base_url();
    if !base_url::is_absolute(&base) {
        return Err(CliError::RelativeBaseUrl(base));
    }

    let api = ApiClient::from_config(&config, Arc::new(TerminalNavigator::default()))?;
    tracing::debug!(base_url = api.base_url(), token_file = %config.token_file.display(), "client ready");
    let mut auth = AuthStore::new(api);

    match cli.command {
        Command::Login { email, password } => run_login(&mut auth, email, password).await,
        Command::Logout => {
            auth.logout().await;
            println!("logged out");
            Ok(())
        }
        Command::Whoami => {
            require_session(&mut auth).await?;
            print_json(&auth.user)
        }
        Command::Register { email, password, first_name, last_name } => {
            let registration = Registration { email, password1: password.clone(), password2: password, first_name, last_name };
            if auth.register(&registration).await {
                print_json(&auth.user)
            } else {
                Err(rejected(&auth))
            }
        }
        Command::Invitation(invitation) => run_invitation(&mut auth, invitation).await,
        Command::Preferences(prefs) => run_preferences(&mut auth, prefs).await,
        Command::Onboarding => emit(auth.api().onboarding_status().await),
        Command::Fees { all } => {
            let api = auth.api();
            emit(if all { api.all_fees().await } else { api.my_fees().await })
        }
        Command::Donations(donations) => run_donations(auth.api(), donations).await,
        Command::Requests(requests) => run_requests(auth.api(), requests).await,
        Command::Cases(cases) => run_cases(auth.api(), cases).await,
        Command::Attachments(attachments) => run_attachments(auth.api(), attachments).await,
        Command::Route { path } => run_route(&mut auth, &path).await,
    }
}

async fn run_login(auth: &mut AuthStore, email: String, password: String) -> Result<(), CliError> {
    if auth.login(&LoginCredentials { email, password }).await {
        print_json(&auth.user)
    } else {
        Err(rejected(auth))
    }
}

async fn require_session(auth: &mut AuthStore) -> Result<(), CliError> {
    auth.initialize().await;
    if auth.is_authenticated() { Ok(()) } else { Err(CliError::NotLoggedIn) }
}

async fn run_invitation(auth: &mut AuthStore, invitation: InvitationCommand) -> Result<(), CliError> {
    match invitation.command {
        InvitationSubcommand::Validate { token } => emit(auth.api().validate_invitation(&token).await),
        InvitationSubcommand::Accept { token, password } => {
            let setup = PasswordSetup { token, password: password.clone(), password_confirm: password };
            auth.setup_password(&setup).await.map_err(CliError::Rejected)?;
            print_json(&auth.user)
        }
    }
}

async fn run_preferences(auth: &mut AuthStore, prefs: PreferencesArgs) -> Result<(), CliError> {
    require_session(auth).await?;
    let update = PreferencesUpdate {
        theme_preference: prefs.theme.map(|t| match t {
            ThemeArg::White => Theme::White,
            ThemeArg::Black => Theme::Black,
        }),
        language_preference: prefs.language.map(|l| match l {
            LanguageArg::PtBr => Language::PtBr,
            LanguageArg::En => Language::En,
            LanguageArg::Es => Language::Es,
        }),
        membership_due_day: prefs.due_day,
        phone: prefs.phone,
        city: prefs.city,
        state: prefs.state,
        country: prefs.country,
    };
    if auth.update_preferences(&update).await {
        print_json(&auth.user.as_ref().map(|user| &user.profile))
    } else {
        Err(CliError::Rejected("failed to update preferences".to_owned()))
    }
}

async fn run_donations(api: &ApiClient, donations: DonationCommand) -> Result<(), CliError> {
    match donations.command {
        DonationSubcommand::List { scope } => emit(match scope {
            Scope::Mine => api.my_voluntary_donations().await,
            Scope::All => api.all_voluntary_donations().await,
            Scope::Pending => api.pending_voluntary_donations().await,
        }),
        DonationSubcommand::Create { amount, message, anonymous, proof } => {
            let payment_proof = proof.as_deref().map(read_upload).transpose()?;
            let donation = VoluntaryDonationCreate { amount, message, is_anonymous: Some(anonymous), payment_proof };
            emit(api.create_voluntary_donation(donation).await)
        }
        DonationSubcommand::Verify { id } => emit(api.verify_voluntary_donation(id).await),
    }
}

async fn run_requests(api: &ApiClient, requests: RequestCommand) -> Result<(), CliError> {
    match requests.command {
        RequestSubcommand::List { scope } => emit(match scope {
            Scope::Mine => api.my_donation_requests().await,
            Scope::All => api.all_donation_requests().await,
            Scope::Pending => api.pending_donation_requests().await,
        }),
        RequestSubcommand::Create { recipient, description, amount, reason, urgency } => {
            let request = DonationRequestCreate {
                recipient_name: recipient,
                recipient_description: description,
                amount,
                reason,
                urgency_level: urgency_level(urgency),
            };
            emit(api.create_donation_request(&request).await)
        }
        RequestSubcommand::Update { id, recipient, description, amount, reason, urgency } => {
            let update = DonationRequestUpdate {
                recipient_name: recipient,
                recipient_description: description,
                amount,
                reason,
                urgency_level: urgency.map(urgency_level),
            };
            emit(api.update_donation_request(id, &update).await)
        }
        RequestSubcommand::Approve { id } => emit(api.approve_donation_request(id).await),
        RequestSubcommand::Reject { id, reason } => emit(api.reject_donation_request(id, &reason).await),
        RequestSubcommand::Delete { id } => emit(api.delete_donation_request(id).await),
        RequestSubcommand::Stats => emit(api.donation_request_stats().await),
    }
}

async fn run_cases(api: &ApiClient, cases: CaseCommand) -> Result<(), CliError> {
    match cases.command {
        CaseSubcommand::List { scope } => emit(match scope {
            None | Some(Scope::All) => api.assistance_cases().await,
            Some(Scope::Mine) => api.my_cases().await,
            Some(Scope::Pending) => api.pending_cases().await,
        }),
        CaseSubcommand::Show { id } => emit(api.assistance_case(id).await),
        CaseSubcommand::Create { title, public_description, internal_description, total_value } => {
            let case = CaseCreate { title, public_description, internal_description, total_value };
            emit(api.create_case(&case).await)
        }
        CaseSubcommand::Submit { id } => emit(api.submit_case(id).await),
        CaseSubcommand::Approve { id } => emit(api.approve_case(id).await),
        CaseSubcommand::Reject { id, reason } => emit(api.reject_case(id, &reason).await),
        CaseSubcommand::BankInfo { id, data } => {
            let bank_data = serde_json::from_str::<Value>(&data)?;
            emit(api.submit_bank_info(id, &bank_data).await)
        }
        CaseSubcommand::ConfirmTransfer { id } => emit(api.confirm_transfer(id).await),
        CaseSubcommand::MemberProof { id } => emit(api.submit_member_proof(id).await),
        CaseSubcommand::Complete { id } => emit(api.complete_case(id).await),
    }
}

async fn run_attachments(api: &ApiClient, attachments: AttachmentCommand) -> Result<(), CliError> {
    match attachments.command {
        AttachmentSubcommand::Upload { case_id, file } => emit(api.upload_attachment(case_id, read_upload(&file)?).await),
        AttachmentSubcommand::Delete { id } => emit(api.delete_attachment(id).await),
    }
}

async fn run_route(auth: &mut AuthStore, path: &str) -> Result<(), CliError> {
    let mut router = Router::new();
    let nav = router.navigate(path, auth).await?.clone();
    print_json(&serde_json::json!({
        "name": nav.name,
        "full_path": nav.full_path,
        "params": nav.params,
        "redirected_from": nav.redirected_from,
        "title": router.title(),
    }))
}

fn urgency_level(arg: UrgencyArg) -> UrgencyLevel {
    match arg {
        UrgencyArg::Low => UrgencyLevel::Low,
        UrgencyArg::Medium => UrgencyLevel::Medium,
        UrgencyArg::High => UrgencyLevel::High,
        UrgencyArg::Critical => UrgencyLevel::Critical,
    }
}

fn read_upload(path: &Path) -> Result<Upload, CliError> {
    let bytes = std::fs::read(path).map_err(|source| CliError::ReadFile { path: path.to_path_buf(), source })?;
    let file_name = path
        .file_name()
        .map_or_else(|| "upload".to_owned(), |name| name.to_string_lossy().into_owned());
    Ok(Upload { mime: guess_mime(path), file_name, bytes })
}

fn guess_mime(path: &Path) -> Option<String> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    let mime = match ext.as_str() {
        "pdf" => "application/pdf",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "webp" => "image/webp",
        "gif" => "image/gif",
        _ => return None,
    };
    Some(mime.to_owned())
}

fn rejected(auth: &AuthStore) -> CliError {
    CliError::Rejected(auth.error.clone().unwrap_or_else(|| "request rejected".to_owned()))
}

/// Print the payload, or turn the failure into an error.
fn emit<T: Serialize>(response: ApiResponse<T>) -> Result<(), CliError> {
    let status = response.status;
    match response.into_result() {
        Ok(data) => print_json(&data),
        Err(failed) => match failed.error() {
            Some(message) => Err(CliError::Api { status, message: message.to_owned() }),
            None => {
                println!("ok ({status})");
                Ok(())
            }
        },
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}
