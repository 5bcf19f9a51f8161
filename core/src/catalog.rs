//! Declarative table of every remote method.
//!
//! Each entry names the method, its parameters (with presence and encoding
//! policy) and the single path used to pull the result out of a successful
//! response. The request builder and response interpreter only ever read
//! this table; adding a method means adding an entry here.

/// How a boolean argument is written on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoolEncoding {
    /// `true` → `"1"`, `false` → `""`. The key is always sent.
    OneOrEmpty,
    /// `true` → `"True"`, `false` → key omitted.
    TrueOrAbsent,
}

/// Declared value type of a parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    Str,
    Int,
    Bool(BoolEncoding),
    Records,
}

/// When a parameter appears in the outgoing query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    /// Must be supplied and non-null.
    Required,
    /// Sent whenever supplied and non-null.
    Optional,
    /// Like `Optional`, but `0` means "no filter" and is not sent.
    OmitIfZero,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamSpec {
    pub name: &'static str,
    pub kind: ParamKind,
    pub presence: Presence,
}

/// Where an operation's result lives in a successful response body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extraction {
    /// A top-level field, returned as-is.
    Field(&'static str),
    /// Element 0 of a top-level array.
    FirstElement(&'static str),
    /// A field of element 0 of a top-level array.
    FirstElementField(&'static str, &'static str),
    /// The whole body minus `status`.
    WithoutStatus,
    /// A record built from the listed top-level fields, in this order.
    Fields(&'static [&'static str]),
    /// The operation has no result beyond success.
    Nothing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Operation {
    pub method: &'static str,
    pub params: &'static [ParamSpec],
    pub extraction: Extraction,
}

impl Operation {
    pub fn param(&self, name: &str) -> Option<&ParamSpec> {
        self.params.iter().find(|spec| spec.name == name)
    }
}

/// Look up a method by its remote name.
pub fn operation(method: &str) -> Option<&'static Operation> {
    CATALOG.iter().find(|op| op.method == method)
}

const STR: ParamKind = ParamKind::Str;
const INT: ParamKind = ParamKind::Int;
const BOOL: ParamKind = ParamKind::Bool(BoolEncoding::OneOrEmpty);
const FLAG: ParamKind = ParamKind::Bool(BoolEncoding::TrueOrAbsent);
const RECORDS: ParamKind = ParamKind::Records;

const fn req(name: &'static str, kind: ParamKind) -> ParamSpec {
    ParamSpec {
        name,
        kind,
        presence: Presence::Required,
    }
}

const fn opt(name: &'static str, kind: ParamKind) -> ParamSpec {
    ParamSpec {
        name,
        kind,
        presence: Presence::Optional,
    }
}

const fn nonzero(name: &'static str) -> ParamSpec {
    ParamSpec {
        name,
        kind: ParamKind::Int,
        presence: Presence::OmitIfZero,
    }
}

const fn op(method: &'static str, params: &'static [ParamSpec], extraction: Extraction) -> Operation {
    Operation {
        method,
        params,
        extraction,
    }
}

use Extraction::{Field, FirstElement, FirstElementField, Nothing, WithoutStatus};

// Shared tail of createSubAccount / setSubAccount.
macro_rules! sub_account_params {
    ($($head:expr),* $(,)?) => {
        &[
            $($head,)*
            req("description", STR),
            req("auth_type", STR),
            req("password", STR),
            req("ip", STR),
            req("device_type", STR),
            req("callerid_number", STR),
            req("canada_routing", STR),
            req("lock_international", STR),
            req("allow225", BOOL),
            req("international_route", STR),
            req("music_on_hold", STR),
            req("language", STR),
            req("record_calls", BOOL),
            req("allowed_codecs", STR),
            req("dtmf_mode", STR),
            req("nat", STR),
            opt("sip_traffic", BOOL),
            opt("max_expiry", INT),
            opt("rtp_timeout", INT),
            opt("rtp_hold_timeout", INT),
            opt("ip_restriction", STR),
            opt("enable_ip_restriction", BOOL),
            opt("pop_restriction", STR),
            opt("enable_pop_restriction", BOOL),
            opt("send_bye", BOOL),
            opt("transcribe", BOOL),
            opt("transcription_locale", STR),
            opt("transcription_email", STR),
            opt("internal_extension", INT),
            opt("internal_voicemail", INT),
            opt("internal_dialtime", INT),
            opt("reseller_client", INT),
            opt("reseller_package", INT),
            opt("reseller_nextbilling", STR),
            opt("reseller_chargesetup", BOOL),
            opt("parking_lot", INT),
            opt("transcription_start_delay", INT),
            opt("enable_internal_cnam", BOOL),
            opt("internal_cnam", STR),
        ]
    };
}

const CDR_PARAMS: &[ParamSpec] = &[
    req("date_from", STR),
    req("date_to", STR),
    opt("answered", BOOL),
    opt("noanswer", BOOL),
    opt("busy", BOOL),
    opt("failed", BOOL),
    req("timezone", STR),
    req("calltype", STR),
    req("callbilling", STR),
    req("account", STR),
];

const CHARGE_PARAMS: &[ParamSpec] = &[
    req("client", STR),
    req("charge", STR),
    req("description", STR),
    opt("testing", BOOL),
];

const CLIENT: &[ParamSpec] = &[req("client", STR)];

pub static CATALOG: &[Operation] = &[
    // General
    op("getBalance", &[opt("advanced", FLAG)], Field("balance")),
    op("getIP", &[], Field("ip")),
    op("getCountries", &[req("country", STR)], FirstElementField("countries", "description")),
    op("getLanguages", &[req("language", STR)], FirstElementField("languages", "description")),
    op("getLocales", &[req("locale", STR)], FirstElementField("locales", "description")),
    op("getServersInfo", &[req("server_pop", INT)], FirstElement("servers")),
    op(
        "getTransactionHistory",
        &[req("date_from", STR), req("date_to", STR)],
        Field("transactions"),
    ),
    // Conferences
    op(
        "addMemberToConference",
        &[req("member", INT), req("conference", INT)],
        Field("member"),
    ),
    op("getConference", &[req("conference", INT)], Field("conference")),
    op("getMembers", &[req("conference", INT)], Field("members")),
    op(
        "getConferenceRecordings",
        &[req("conference", INT), opt("date_from", STR), opt("date_to", STR)],
        Field("recordings"),
    ),
    op(
        "getConferenceRecordingFile",
        &[req("conference", INT), req("recording", STR)],
        Field("recording"),
    ),
    op("getSequences", &[opt("sequence", INT), nonzero("client")], Field("sequences")),
    op(
        "setSequences",
        &[req("sequence", STR), req("name", STR), req("steps", RECORDS)],
        Field("sequence"),
    ),
    op(
        "setConference",
        &[
            req("conference", INT),
            req("name", STR),
            req("description", STR),
            opt("members", STR),
            req("max_members", INT),
            opt("sound_join", STR),
            opt("sound_leave", STR),
            opt("sound_has_joined", STR),
            opt("sound_has_left", STR),
            opt("sound_kicked", STR),
            opt("sound_muted", STR),
            opt("sound_unmuted", STR),
            opt("sound_only_person", STR),
            opt("sound_only_one", STR),
            opt("sound_there_are", STR),
            opt("sound_other_in_party", STR),
            opt("sound_place_into_conference", STR),
            opt("sound_get_pin", STR),
            opt("sound_invalid_pin", STR),
            opt("sound_locked", STR),
            opt("sound_locked_now", STR),
            opt("sound_unlocked_now", STR),
            opt("sound_error_menu", STR),
            opt("sound_participants_muted", STR),
            opt("sound_participants_unmuted", STR),
            opt("language", STR),
        ],
        Field("conference"),
    ),
    op(
        "setConferenceMember",
        &[
            req("conference", INT),
            req("member", INT),
            req("name", STR),
            opt("description", STR),
            opt("pin", INT),
            opt("announce_join_leave", BOOL),
            opt("admin", BOOL),
            opt("start_muted", BOOL),
            opt("announce_user_count", BOOL),
            opt("announce_only_user", BOOL),
            opt("moh_when_empty", STR),
            opt("quiet", BOOL),
            opt("announcement", STR),
            opt("drop_silence", BOOL),
            opt("talking_threshold", INT),
            opt("silence_threshold", INT),
            opt("talk_detection", BOOL),
            opt("jitter_buffer", BOOL),
        ],
        Field("member"),
    ),
    // Accounts
    op(
        "createSubAccount",
        sub_account_params![req("username", STR), req("protocol", STR)],
        Extraction::Fields(&["id", "account"]),
    ),
    op("setSubAccount", sub_account_params![req("id", STR)], Nothing),
    op("deleteSubAccount", &[req("id", INT)], Nothing),
    op("getSubAccounts", &[opt("account", STR)], Field("accounts")),
    op("getAllowedCodecs", &[req("codec", STR)], Field("allowed_codecs")),
    op("getAuthTypes", &[req("type", STR)], Field("auth_types")),
    op("getDeviceTypes", &[req("device_type", INT)], Field("device_types")),
    op("getDMTFModes", &[req("dtmf_mode", STR)], Field("dtmf_modes")),
    op(
        "getInvoice",
        &[req("from", STR), req("to", STR), opt("range", INT), opt("type", INT)],
        Field("pdf"),
    ),
    op(
        "getLockInternational",
        &[req("lock_international", INT)],
        Field("lock_international"),
    ),
    op("getMusicOnHold", &[req("music_on_hold", STR)], Field("music_on_hold")),
    op(
        "setMusicOnHold",
        &[
            req("name", STR),
            req("description", STR),
            opt("volume", BOOL),
            opt("sort", STR),
            req("recordings", STR),
        ],
        Nothing,
    ),
    op("deleteMusicOnHold", &[req("music_on_hold", STR)], Nothing),
    op("getNAT", &[req("nat", STR)], Field("nat")),
    op("getProtocols", &[req("protocol", STR)], Field("protocols")),
    op("getRegistrationStatus", &[req("account", STR)], Field("registrations")),
    op("getReportEstimatedHoldTime", &[req("type", STR)], Field("types")),
    op("getRoutes", &[req("route", STR)], Field("routes")),
    // Call parking
    op("getCallParking", &[req("callparking", INT)], Field("call_hunting")),
    op(
        "setCallParking",
        &[
            nonzero("callparking"),
            req("name", STR),
            req("timeout", INT),
            req("failover", STR),
            req("language", STR),
            req("destination", STR),
            req("delay", INT),
            req("blf_lamps", INT),
        ],
        Field("callparking"),
    ),
    op("delCallParking", &[req("callparking", INT)], Nothing),
    // Call recordings
    op(
        "getCallRecordings",
        &[
            req("account", STR),
            req("start", INT),
            req("length", INT),
            req("date_from", STR),
            req("date_to", STR),
            opt("call_type", STR),
        ],
        Field("recordings"),
    ),
    op(
        "getCallRecording",
        &[req("account", STR), req("callrecording", STR)],
        WithoutStatus,
    ),
    op(
        "sendCallRecordingEmail",
        &[req("account", STR), req("email", STR), req("callrecording", STR)],
        Field("msg"),
    ),
    op(
        "delCallRecording",
        &[req("account", STR), req("callrecording", STR)],
        Nothing,
    ),
    // Call detail records
    op("getCallAccounts", CLIENT, Field("accounts")),
    op("getCallBilling", &[], Field("call_billing")),
    op("getCallTypes", CLIENT, Field("call_types")),
    op("getCDR", CDR_PARAMS, Field("cdr")),
    op("getResellerCDR", CDR_PARAMS, Field("cdr")),
    op("getRates", &[req("package", STR), req("query", STR)], Field("rates")),
    op(
        "getTerminationRates",
        &[req("route", STR), req("query", STR)],
        Field("rates"),
    ),
    // Clients (reseller)
    op("addCharge", CHARGE_PARAMS, Nothing),
    op("addPayment", CHARGE_PARAMS, Nothing),
    op(
        "assignDIDvPRI",
        &[req("did", STR), req("vpri", STR)],
        Extraction::Fields(&["vpri", "DIDAdded", "monthly"]),
    ),
    op(
        "getBalanceManagement",
        &[opt("balance_management", STR)],
        Field("balance_management"),
    ),
    op("getCharges", CLIENT, Field("charges")),
    op("getClientPackages", CLIENT, Field("packages")),
    op("getClients", &[opt("client", STR)], Field("clients")),
    op("getClientThreshold", CLIENT, Field("threshold_information")),
    op("getDeposits", CLIENT, Field("deposits")),
    op("getPackages", &[opt("package", STR)], Field("packages")),
    op("getResellerBalance", CLIENT, Field("balance")),
    op(
        "setClient",
        &[
            req("client", STR),
            req("email", STR),
            req("password", STR),
            opt("company", STR),
            req("firstname", STR),
            req("lastname", STR),
            opt("address", STR),
            opt("city", STR),
            opt("state", STR),
            opt("country", STR),
            opt("zip", STR),
            req("phone_number", STR),
            req("balance_management", STR),
        ],
        Nothing,
    ),
    op(
        "setClientThreshold",
        &[req("client", STR), req("threshold", STR), opt("email", STR)],
        Nothing,
    ),
    op(
        "signupClient",
        &[
            req("firstname", STR),
            req("lastname", STR),
            opt("company", STR),
            req("address", STR),
            req("city", STR),
            req("state", STR),
            req("country", STR),
            req("zip", STR),
            req("phone_number", STR),
            req("email", STR),
            req("confirm_email", STR),
            req("password", STR),
            req("confirm_password", STR),
            opt("activate", BOOL),
            opt("balance_management", STR),
        ],
        Field("client"),
    ),
];

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn method_names_are_unique() {
        let mut seen = HashSet::new();
        for op in CATALOG {
            assert!(seen.insert(op.method), "duplicate method {}", op.method);
        }
    }

    #[test]
    fn parameter_names_are_unique_per_operation() {
        for op in CATALOG {
            let mut seen = HashSet::new();
            for spec in op.params {
                assert!(
                    seen.insert(spec.name),
                    "{}: duplicate parameter {}",
                    op.method,
                    spec.name
                );
            }
        }
    }

    #[test]
    fn reserved_keys_are_never_declared() {
        for op in CATALOG {
            for reserved in ["api_username", "api_password", "method"] {
                assert!(op.param(reserved).is_none(), "{} declares {reserved}", op.method);
            }
        }
    }

    #[test]
    fn lookup_by_method() {
        let op = operation("getBalance").unwrap();
        assert_eq!(op.extraction, Field("balance"));
        assert_eq!(op.params[0].kind, ParamKind::Bool(BoolEncoding::TrueOrAbsent));
        assert!(operation("getNothing").is_none());
    }

    #[test]
    fn sub_account_operations_share_their_tail() {
        let create = operation("createSubAccount").unwrap();
        let set = operation("setSubAccount").unwrap();
        assert_eq!(create.params.len(), set.params.len() + 1);
        assert_eq!(create.params[2..], set.params[1..]);
        assert_eq!(create.params.len(), 41);
    }

    #[test]
    fn zero_sentinel_only_on_integers() {
        for op in CATALOG {
            for spec in op.params {
                if spec.presence == Presence::OmitIfZero {
                    assert_eq!(spec.kind, ParamKind::Int, "{}.{}", op.method, spec.name);
                }
            }
        }
    }
}
