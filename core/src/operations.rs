//! Typed argument records, one per remote method.
//!
//! Each struct's field names are the method's parameter names in the
//! catalog. Required parameters are plain fields; optional ones are
//! `Option<T>`, where `None` serializes to the null marker and is left out
//! of the request. `Request` ties a struct to its method and result type.

use std::fmt;

use indexmap::IndexMap;
use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::params::Record;

/// Binds an argument record to its remote method and typed result.
pub trait Request: Serialize {
    const METHOD: &'static str;
    type Output: DeserializeOwned;
}

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Number(serde_json::Number),
    Text(String),
}

fn text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match Scalar::deserialize(deserializer)? {
        Scalar::Number(n) => n.to_string(),
        Scalar::Text(s) => s,
    })
}

/// A numeric identifier the service may send as a number or a string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Id(pub u64);

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl<'de> Deserialize<'de> for Id {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = text(deserializer)?;
        raw.trim()
            .parse()
            .map(Id)
            .map_err(|_| D::Error::custom(format!("'{raw}' is not a numeric id")))
    }
}

/// Result of `getBalance`. Call statistics only appear with `advanced`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Balance {
    #[serde(deserialize_with = "text")]
    pub current_balance: String,
    #[serde(flatten)]
    pub statistics: IndexMap<String, Value>,
}

/// Result of `createSubAccount`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreatedSubAccount {
    pub id: Id,
    pub account: String,
}

/// Result of `assignDIDvPRI`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DidAssignment {
    #[serde(deserialize_with = "text")]
    pub vpri: String,
    #[serde(rename = "DIDAdded", deserialize_with = "text")]
    pub did_added: String,
    #[serde(deserialize_with = "text")]
    pub monthly: String,
}

// ---------------------------------------------------------------------------
// Shared argument pieces
// ---------------------------------------------------------------------------

/// One step of a `setSequences` call, sent as `steps[i][field]=value`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SequenceStep(Record);

impl SequenceStep {
    pub fn new(kind: &str) -> Self {
        let mut fields = Record::new();
        fields.insert("type".to_string(), kind.to_string());
        Self(fields)
    }

    pub fn with(mut self, field: &str, value: impl Into<String>) -> Self {
        self.0.insert(field.to_string(), value.into());
        self
    }

    pub fn fields(&self) -> &Record {
        &self.0
    }
}

/// Settings shared by `createSubAccount` and `setSubAccount`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SubAccountSettings {
    pub description: String,
    pub auth_type: String,
    pub password: String,
    pub ip: String,
    pub device_type: String,
    pub callerid_number: String,
    pub canada_routing: String,
    pub lock_international: String,
    pub allow225: bool,
    pub international_route: String,
    pub music_on_hold: String,
    pub language: String,
    pub record_calls: bool,
    pub allowed_codecs: String,
    pub dtmf_mode: String,
    pub nat: String,
    pub sip_traffic: Option<bool>,
    pub max_expiry: Option<i64>,
    pub rtp_timeout: Option<i64>,
    pub rtp_hold_timeout: Option<i64>,
    pub ip_restriction: Option<String>,
    pub enable_ip_restriction: Option<bool>,
    pub pop_restriction: Option<String>,
    pub enable_pop_restriction: Option<bool>,
    pub send_bye: Option<bool>,
    pub transcribe: Option<bool>,
    pub transcription_locale: Option<String>,
    pub transcription_email: Option<String>,
    pub internal_extension: Option<i64>,
    pub internal_voicemail: Option<i64>,
    pub internal_dialtime: Option<i64>,
    pub reseller_client: Option<i64>,
    pub reseller_package: Option<i64>,
    pub reseller_nextbilling: Option<String>,
    pub reseller_chargesetup: Option<bool>,
    pub parking_lot: Option<i64>,
    pub transcription_start_delay: Option<i64>,
    pub enable_internal_cnam: Option<bool>,
    pub internal_cnam: Option<String>,
}

/// Filter shared by `getCDR` and `getResellerCDR`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CdrFilter {
    pub date_from: String,
    pub date_to: String,
    pub answered: Option<bool>,
    pub noanswer: Option<bool>,
    pub busy: Option<bool>,
    pub failed: Option<bool>,
    pub timezone: String,
    pub calltype: String,
    pub callbilling: String,
    pub account: String,
}

/// Arguments shared by `addCharge` and `addPayment`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ChargeArgs {
    pub client: String,
    pub charge: String,
    pub description: String,
    pub testing: Option<bool>,
}

// ---------------------------------------------------------------------------
// General
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize)]
pub struct GetBalance {
    /// Include call statistics. Sent as `advanced=True`, omitted when false.
    pub advanced: bool,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct GetIp {}

#[derive(Debug, Clone, Default, Serialize)]
pub struct GetCountries {
    pub country: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct GetLanguages {
    pub language: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct GetLocales {
    pub locale: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct GetServersInfo {
    pub server_pop: i64,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct GetTransactionHistory {
    pub date_from: String,
    pub date_to: String,
}

// ---------------------------------------------------------------------------
// Conferences and sequences
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize)]
pub struct AddMemberToConference {
    pub member: i64,
    pub conference: i64,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct GetConference {
    pub conference: i64,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct GetMembers {
    pub conference: i64,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct GetConferenceRecordings {
    pub conference: i64,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct GetConferenceRecordingFile {
    pub conference: i64,
    pub recording: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct GetSequences {
    pub sequence: Option<i64>,
    /// `0` lists sequences for every client.
    pub client: i64,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct SetSequences {
    pub sequence: String,
    pub name: String,
    pub steps: Vec<SequenceStep>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct SetConference {
    pub conference: i64,
    pub name: String,
    pub description: String,
    pub members: Option<String>,
    pub max_members: i64,
    pub sound_join: Option<String>,
    pub sound_leave: Option<String>,
    pub sound_has_joined: Option<String>,
    pub sound_has_left: Option<String>,
    pub sound_kicked: Option<String>,
    pub sound_muted: Option<String>,
    pub sound_unmuted: Option<String>,
    pub sound_only_person: Option<String>,
    pub sound_only_one: Option<String>,
    pub sound_there_are: Option<String>,
    pub sound_other_in_party: Option<String>,
    pub sound_place_into_conference: Option<String>,
    pub sound_get_pin: Option<String>,
    pub sound_invalid_pin: Option<String>,
    pub sound_locked: Option<String>,
    pub sound_locked_now: Option<String>,
    pub sound_unlocked_now: Option<String>,
    pub sound_error_menu: Option<String>,
    pub sound_participants_muted: Option<String>,
    pub sound_participants_unmuted: Option<String>,
    pub language: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct SetConferenceMember {
    pub conference: i64,
    pub member: i64,
    pub name: String,
    pub description: Option<String>,
    pub pin: Option<i64>,
    pub announce_join_leave: Option<bool>,
    pub admin: Option<bool>,
    pub start_muted: Option<bool>,
    pub announce_user_count: Option<bool>,
    pub announce_only_user: Option<bool>,
    pub moh_when_empty: Option<String>,
    pub quiet: Option<bool>,
    pub announcement: Option<String>,
    pub drop_silence: Option<bool>,
    pub talking_threshold: Option<i64>,
    pub silence_threshold: Option<i64>,
    pub talk_detection: Option<bool>,
    pub jitter_buffer: Option<bool>,
}

// ---------------------------------------------------------------------------
// Accounts
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize)]
pub struct CreateSubAccount {
    pub username: String,
    pub protocol: String,
    #[serde(flatten)]
    pub settings: SubAccountSettings,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct SetSubAccount {
    pub id: String,
    #[serde(flatten)]
    pub settings: SubAccountSettings,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct DeleteSubAccount {
    pub id: i64,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct GetSubAccounts {
    pub account: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct GetAllowedCodecs {
    pub codec: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct GetAuthTypes {
    pub r#type: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct GetDeviceTypes {
    pub device_type: i64,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct GetDtmfModes {
    pub dtmf_mode: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct GetInvoice {
    pub from: String,
    pub to: String,
    pub range: Option<i64>,
    pub r#type: Option<i64>,
}

/// Values accepted by `range` and `type`.
impl GetInvoice {
    pub const RANGE_LAST_MONTH: i64 = 1;
    pub const RANGE_LAST_TWO_MONTHS: i64 = 2;
    pub const RANGE_LAST_THREE_MONTHS: i64 = 3;
    pub const RANGE_CURRENT_MONTH: i64 = 4;
    pub const RANGE_LAST_WEEK: i64 = 5;
    pub const RANGE_CURRENT_WEEK: i64 = 6;

    pub const TYPE_US: i64 = 0;
    pub const TYPE_CA: i64 = 1;
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct GetLockInternational {
    pub lock_international: i64,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct GetMusicOnHold {
    pub music_on_hold: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct SetMusicOnHold {
    pub name: String,
    pub description: String,
    pub volume: Option<bool>,
    pub sort: Option<String>,
    pub recordings: String,
}

impl SetMusicOnHold {
    pub const SORT_ALPHA: &'static str = "alpha";
    pub const SORT_RANDOM: &'static str = "random";
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct DeleteMusicOnHold {
    pub music_on_hold: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct GetNat {
    pub nat: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct GetProtocols {
    pub protocol: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct GetRegistrationStatus {
    pub account: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct GetReportEstimatedHoldTime {
    pub r#type: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct GetRoutes {
    pub route: String,
}

// ---------------------------------------------------------------------------
// Call parking and recordings
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize)]
pub struct GetCallParking {
    pub callparking: i64,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct SetCallParking {
    /// `0` creates a new call parking entry.
    pub callparking: i64,
    pub name: String,
    pub timeout: i64,
    pub failover: String,
    pub language: String,
    pub destination: String,
    pub delay: i64,
    pub blf_lamps: i64,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct DelCallParking {
    pub callparking: i64,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct GetCallRecordings {
    pub account: String,
    pub start: i64,
    pub length: i64,
    pub date_from: String,
    pub date_to: String,
    pub call_type: Option<String>,
}

impl GetCallRecordings {
    pub const CALL_TYPE_ALL: &'static str = "all";
    pub const CALL_TYPE_INCOMING: &'static str = "incoming";
    pub const CALL_TYPE_OUTGOING: &'static str = "outgoing";
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct GetCallRecording {
    pub account: String,
    pub callrecording: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct SendCallRecordingEmail {
    pub account: String,
    pub email: String,
    pub callrecording: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct DelCallRecording {
    pub account: String,
    pub callrecording: String,
}

// ---------------------------------------------------------------------------
// Call detail records and rates
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize)]
pub struct GetCallAccounts {
    pub client: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct GetCallBilling {}

#[derive(Debug, Clone, Default, Serialize)]
pub struct GetCallTypes {
    pub client: String,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct GetCdr(pub CdrFilter);

#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct GetResellerCdr(pub CdrFilter);

#[derive(Debug, Clone, Default, Serialize)]
pub struct GetRates {
    pub package: String,
    pub query: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct GetTerminationRates {
    pub route: String,
    pub query: String,
}

// ---------------------------------------------------------------------------
// Reseller clients
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct AddCharge(pub ChargeArgs);

#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct AddPayment(pub ChargeArgs);

#[derive(Debug, Clone, Default, Serialize)]
pub struct AssignDidVpri {
    pub did: String,
    pub vpri: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct GetBalanceManagement {
    pub balance_management: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct GetCharges {
    pub client: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct GetClientPackages {
    pub client: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct GetClients {
    pub client: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct GetClientThreshold {
    pub client: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct GetDeposits {
    pub client: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct GetPackages {
    pub package: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct GetResellerBalance {
    pub client: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct SetClient {
    pub client: String,
    pub email: String,
    pub password: String,
    pub company: Option<String>,
    pub firstname: String,
    pub lastname: String,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub zip: Option<String>,
    pub phone_number: String,
    pub balance_management: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct SetClientThreshold {
    pub client: String,
    pub threshold: String,
    pub email: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct SignupClient {
    pub firstname: String,
    pub lastname: String,
    pub company: Option<String>,
    pub address: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub zip: String,
    pub phone_number: String,
    pub email: String,
    pub confirm_email: String,
    pub password: String,
    pub confirm_password: String,
    pub activate: Option<bool>,
    pub balance_management: Option<String>,
}

// ---------------------------------------------------------------------------
// Method bindings
// ---------------------------------------------------------------------------

macro_rules! requests {
    ($($ty:ident => $method:literal -> $out:ty;)*) => {
        $(
            impl Request for $ty {
                const METHOD: &'static str = $method;
                type Output = $out;
            }
        )*

        #[cfg(test)]
        fn all_defaults() -> Vec<(&'static str, crate::params::Params)> {
            vec![
                $((
                    $method,
                    crate::params::Params::from_record(&$ty::default())
                        .expect(concat!($method, " serializes")),
                ),)*
            ]
        }
    };
}

requests! {
    GetBalance => "getBalance" -> Balance;
    GetIp => "getIP" -> String;
    GetCountries => "getCountries" -> String;
    GetLanguages => "getLanguages" -> String;
    GetLocales => "getLocales" -> String;
    GetServersInfo => "getServersInfo" -> Value;
    GetTransactionHistory => "getTransactionHistory" -> Value;
    AddMemberToConference => "addMemberToConference" -> Value;
    GetConference => "getConference" -> Value;
    GetMembers => "getMembers" -> Value;
    GetConferenceRecordings => "getConferenceRecordings" -> Value;
    GetConferenceRecordingFile => "getConferenceRecordingFile" -> Value;
    GetSequences => "getSequences" -> Value;
    SetSequences => "setSequences" -> Id;
    SetConference => "setConference" -> Id;
    SetConferenceMember => "setConferenceMember" -> Id;
    CreateSubAccount => "createSubAccount" -> CreatedSubAccount;
    SetSubAccount => "setSubAccount" -> ();
    DeleteSubAccount => "deleteSubAccount" -> ();
    GetSubAccounts => "getSubAccounts" -> Value;
    GetAllowedCodecs => "getAllowedCodecs" -> Value;
    GetAuthTypes => "getAuthTypes" -> Value;
    GetDeviceTypes => "getDeviceTypes" -> Value;
    GetDtmfModes => "getDMTFModes" -> Value;
    GetInvoice => "getInvoice" -> String;
    GetLockInternational => "getLockInternational" -> Value;
    GetMusicOnHold => "getMusicOnHold" -> Value;
    SetMusicOnHold => "setMusicOnHold" -> ();
    DeleteMusicOnHold => "deleteMusicOnHold" -> ();
    GetNat => "getNAT" -> Value;
    GetProtocols => "getProtocols" -> Value;
    GetRegistrationStatus => "getRegistrationStatus" -> Value;
    GetReportEstimatedHoldTime => "getReportEstimatedHoldTime" -> Value;
    GetRoutes => "getRoutes" -> Value;
    GetCallParking => "getCallParking" -> Value;
    SetCallParking => "setCallParking" -> Id;
    DelCallParking => "delCallParking" -> ();
    GetCallRecordings => "getCallRecordings" -> Value;
    GetCallRecording => "getCallRecording" -> Value;
    SendCallRecordingEmail => "sendCallRecordingEmail" -> String;
    DelCallRecording => "delCallRecording" -> ();
    GetCallAccounts => "getCallAccounts" -> Value;
    GetCallBilling => "getCallBilling" -> Value;
    GetCallTypes => "getCallTypes" -> Value;
    GetCdr => "getCDR" -> Value;
    GetResellerCdr => "getResellerCDR" -> Value;
    GetRates => "getRates" -> Value;
    GetTerminationRates => "getTerminationRates" -> Value;
    AddCharge => "addCharge" -> ();
    AddPayment => "addPayment" -> ();
    AssignDidVpri => "assignDIDvPRI" -> DidAssignment;
    GetBalanceManagement => "getBalanceManagement" -> Value;
    GetCharges => "getCharges" -> Value;
    GetClientPackages => "getClientPackages" -> Value;
    GetClients => "getClients" -> Value;
    GetClientThreshold => "getClientThreshold" -> Value;
    GetDeposits => "getDeposits" -> Value;
    GetPackages => "getPackages" -> Value;
    GetResellerBalance => "getResellerBalance" -> Value;
    SetClient => "setClient" -> ();
    SetClientThreshold => "setClientThreshold" -> ();
    SignupClient => "signupClient" -> Id;
}
