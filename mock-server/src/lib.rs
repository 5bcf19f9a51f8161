use std::{collections::BTreeMap, sync::Arc};

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::{debug, info};

pub const ENDPOINT: &str = "/api/v1/rest.php";
pub const DEFAULT_USERNAME: &str = "user@example.com";
pub const DEFAULT_PASSWORD: &str = "s3cret";

/// Main account number sub-accounts are created under.
pub const MAIN_ACCOUNT: &str = "100000";

const COUNTRIES: &[(&str, &str)] = &[("CA", "Canada"), ("MX", "Mexico"), ("US", "United States")];

/// The only credential pair the mock accepts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Default for Credentials {
    fn default() -> Self {
        Self {
            username: DEFAULT_USERNAME.to_string(),
            password: DEFAULT_PASSWORD.to_string(),
        }
    }
}

impl Credentials {
    /// `VOIPMS_API_USERNAME` / `VOIPMS_API_PASSWORD`, each falling back to
    /// its default.
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            username: std::env::var("VOIPMS_API_USERNAME").unwrap_or(default.username),
            password: std::env::var("VOIPMS_API_PASSWORD").unwrap_or(default.password),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SubAccount {
    pub id: u64,
    pub account: String,
    pub username: String,
    pub protocol: String,
    pub description: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Sequence {
    pub sequence: u64,
    pub name: String,
    pub client: u64,
    pub steps: Vec<Map<String, Value>>,
}

#[derive(Debug, Default)]
pub struct Store {
    next_id: u64,
    sub_accounts: BTreeMap<u64, SubAccount>,
    sequences: BTreeMap<u64, Sequence>,
}

impl Store {
    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}

pub type Db = Arc<RwLock<Store>>;

#[derive(Clone)]
struct AppState {
    credentials: Arc<Credentials>,
    db: Db,
}

pub fn app() -> Router {
    app_with(Credentials::default())
}

pub fn app_with(credentials: Credentials) -> Router {
    let state = AppState {
        credentials: Arc::new(credentials),
        db: Arc::new(RwLock::new(Store::default())),
    };
    Router::new()
        .route(ENDPOINT, get(dispatch))
        .with_state(state)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    serve(listener, Credentials::default()).await
}

pub async fn serve(listener: TcpListener, credentials: Credentials) -> Result<(), std::io::Error> {
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, endpoint = ENDPOINT, "mock voip.ms listening");
    }
    axum::serve(listener, app_with(credentials)).await
}

/// Decoded query pairs, in the order they were sent.
struct Args(Vec<(String, String)>);

impl Args {
    fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    fn non_empty(&self, key: &str) -> Option<&str> {
        self.get(key).filter(|v| !v.is_empty())
    }

    /// Collect `prefix[i][field]=value` pairs into rows indexed by `i`.
    fn records(&self, prefix: &str) -> Option<Vec<Map<String, Value>>> {
        let mut rows: BTreeMap<usize, Map<String, Value>> = BTreeMap::new();
        for (key, value) in &self.0 {
            let Some(rest) = key.strip_prefix(prefix).and_then(|r| r.strip_prefix('[')) else {
                continue;
            };
            let (index, field) = rest.split_once("][")?;
            let field = field.strip_suffix(']')?;
            let index: usize = index.parse().ok()?;
            rows.entry(index)
                .or_default()
                .insert(field.to_string(), Value::String(value.clone()));
        }
        if rows.keys().copied().ne(0..rows.len()) {
            return None;
        }
        Some(rows.into_values().collect())
    }
}

fn failure(status: &str) -> Value {
    json!({ "status": status })
}

async fn dispatch(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Json<Value> {
    let args = Args(pairs);
    let authorized = args.get("api_username") == Some(state.credentials.username.as_str())
        && args.get("api_password") == Some(state.credentials.password.as_str());
    if !authorized {
        return Json(failure("invalid_credentials"));
    }

    let Some(method) = args.non_empty("method") else {
        return Json(failure("missing_method"));
    };
    debug!(method, "dispatch");

    let body = match method {
        "getBalance" => get_balance(&args),
        "getIP" => json!({ "status": "success", "ip": "127.0.0.1" }),
        "getCountries" => get_countries(&args),
        "createSubAccount" => create_sub_account(&mut *state.db.write().await, &args),
        "getSubAccounts" => get_sub_accounts(&*state.db.read().await, &args),
        "deleteSubAccount" => delete_sub_account(&mut *state.db.write().await, &args),
        "setSequences" => set_sequences(&mut *state.db.write().await, &args),
        "getSequences" => get_sequences(&*state.db.read().await, &args),
        "getCallRecording" => get_call_recording(&args),
        "getConferenceRecordings" => get_conference_recordings(&args),
        _ => failure("invalid_method"),
    };
    Json(body)
}

fn get_balance(args: &Args) -> Value {
    let mut balance = json!({ "current_balance": "15.3200" });
    if args.get("advanced") == Some("True") {
        balance["spent_total"] = json!("84.68");
        balance["calls_total"] = json!("327");
        balance["time_total"] = json!("41:32:02");
        balance["spent_today"] = json!("0.00");
        balance["calls_today"] = json!("0");
        balance["time_today"] = json!("0:00");
    }
    json!({ "status": "success", "balance": balance })
}

fn get_countries(args: &Args) -> Value {
    let filter = args.non_empty("country");
    let countries: Vec<Value> = COUNTRIES
        .iter()
        .filter(|(code, _)| filter.map_or(true, |f| f == *code))
        .map(|(code, name)| json!({ "value": code, "description": name }))
        .collect();
    if countries.is_empty() {
        return failure("invalid_country");
    }
    json!({ "status": "success", "countries": countries })
}

fn create_sub_account(store: &mut Store, args: &Args) -> Value {
    let Some(username) = args.non_empty("username") else {
        return failure("missing_username");
    };
    let Some(protocol) = args.non_empty("protocol") else {
        return failure("missing_protocol");
    };
    if args.non_empty("password").is_none() {
        return failure("missing_password");
    }
    let account = format!("{MAIN_ACCOUNT}_{username}");
    if store.sub_accounts.values().any(|s| s.account == account) {
        return failure("used_username");
    }

    let id = store.next_id();
    store.sub_accounts.insert(
        id,
        SubAccount {
            id,
            account: account.clone(),
            username: username.to_string(),
            protocol: protocol.to_string(),
            description: args.get("description").unwrap_or_default().to_string(),
        },
    );
    json!({ "status": "success", "id": id, "account": account })
}

fn get_sub_accounts(store: &Store, args: &Args) -> Value {
    let filter = args.non_empty("account");
    let accounts: Vec<&SubAccount> = store
        .sub_accounts
        .values()
        .filter(|s| filter.map_or(true, |f| f == s.account))
        .collect();
    if accounts.is_empty() {
        return failure("no_accounts");
    }
    json!({ "status": "success", "accounts": accounts })
}

fn delete_sub_account(store: &mut Store, args: &Args) -> Value {
    let Some(id) = args.non_empty("id") else {
        return failure("missing_id");
    };
    match id.parse::<u64>().ok().and_then(|id| store.sub_accounts.remove(&id)) {
        Some(_) => json!({ "status": "success" }),
        None => failure("invalid_id"),
    }
}

fn set_sequences(store: &mut Store, args: &Args) -> Value {
    let Some(name) = args.non_empty("name") else {
        return failure("missing_name");
    };
    let Some(steps) = args.records("steps").filter(|s| !s.is_empty()) else {
        return failure("missing_steps");
    };
    let client = args
        .non_empty("client")
        .and_then(|c| c.parse().ok())
        .unwrap_or(0);

    let id = match args.non_empty("sequence") {
        None => store.next_id(),
        Some(raw) => match raw.parse::<u64>() {
            Ok(id) if store.sequences.contains_key(&id) => id,
            _ => return failure("invalid_sequence"),
        },
    };
    store.sequences.insert(
        id,
        Sequence {
            sequence: id,
            name: name.to_string(),
            client,
            steps,
        },
    );
    json!({ "status": "success", "sequence": id })
}

fn get_sequences(store: &Store, args: &Args) -> Value {
    let sequence = args.non_empty("sequence").and_then(|s| s.parse::<u64>().ok());
    let client = args.non_empty("client").and_then(|c| c.parse::<u64>().ok());
    let sequences: Vec<&Sequence> = store
        .sequences
        .values()
        .filter(|s| sequence.map_or(true, |id| id == s.sequence))
        .filter(|s| client.map_or(true, |c| c == s.client))
        .collect();
    if sequences.is_empty() {
        return failure("no_sequences");
    }
    json!({ "status": "success", "sequences": sequences })
}

fn get_call_recording(args: &Args) -> Value {
    let Some(account) = args.non_empty("account") else {
        return failure("missing_account");
    };
    let Some(recording) = args.non_empty("callrecording") else {
        return failure("missing_callrecording");
    };
    json!({
        "status": "success",
        "account": account,
        "callrecording": recording,
        "data": "SUQzBAAAAAAAI1RTU0UAAAAPAAADTGF2ZjU4Ljc2LjEwMAAAAAAAAAAAAAAA",
    })
}

/// Answers success without the `recordings` list, as the live service does
/// for conferences that were never recorded.
fn get_conference_recordings(args: &Args) -> Value {
    if args.non_empty("conference").is_none() {
        return failure("missing_conference");
    }
    json!({ "status": "success" })
}
