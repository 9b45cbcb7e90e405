//! Reference extraction from the confirmation redirect URL.
//!
//! The gateway has historically named the reference parameter two different
//! ways on its redirect (`trxref`, then `reference`). That compatibility
//! shim lives here, at the URL-parsing boundary, as an ordered candidate
//! list - the verification state machine itself only ever sees a
//! [`Reference`] or its absence.

use stagepass_core::Reference;
use url::Url;

/// Candidate query parameter names, tried in order. First non-empty wins.
pub const REFERENCE_PARAMS: [&str; 2] = ["trxref", "reference"];

/// Query parameter carrying the non-authoritative status hint.
const STATUS_PARAM: &str = "status";

/// Extract the payment reference from a redirect URL.
///
/// Returns `None` when no candidate parameter carries a non-empty value;
/// verification must then fail without any network call.
#[must_use]
pub fn extract_reference(url: &Url) -> Option<Reference> {
    REFERENCE_PARAMS.iter().find_map(|name| {
        url.query_pairs()
            .filter(|(key, _)| key == name)
            .map(|(_, value)| value.into_owned())
            .find(|value| !value.is_empty())
            .map(Reference::new)
    })
}

/// Extract the optional status hint from a redirect URL.
///
/// The hint lets the confirmation view phrase its spinner optimistically;
/// it is never proof of payment and never short-circuits verification.
#[must_use]
pub fn extract_status_hint(url: &Url) -> Option<String> {
    url.query_pairs()
        .find(|(key, _)| key == STATUS_PARAM)
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.is_empty())
}
