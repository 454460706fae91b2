//! Helpers shared by the processors.

use http::HeaderMap;
use rack_core::QueryParams;
use serde::{Deserialize, Deserializer};

/// Deserializes `null` as `T::default()`.
///
/// Gateways send `null` for absent maps and strings.
pub(crate) fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Collects query pairs, appending values in arrival order.
pub(crate) fn collect_query<'a>(
    pairs: impl IntoIterator<Item = (&'a str, &'a str)>,
) -> QueryParams {
    let mut query = QueryParams::new();
    for (key, value) in pairs {
        query
            .entry(key.to_string())
            .or_default()
            .push(value.to_string());
    }
    query
}

/// Appends every value of `from` onto `into`, after the values already there.
pub(crate) fn append_headers(into: &mut HeaderMap, from: &HeaderMap) {
    for (name, value) in from {
        into.append(name.clone(), value.clone());
    }
}

/// Returns the headers the wire response can carry.
///
/// Response headers are serialized as JSON strings, so values that are not
/// visible ASCII are dropped.
pub(crate) fn wire_headers(format: &'static str, headers: &HeaderMap) -> HeaderMap {
    let mut out = HeaderMap::with_capacity(headers.len());
    for (name, value) in headers {
        if value.to_str().is_ok() {
            out.append(name.clone(), value.clone());
        } else {
            tracing::warn!(format, header = %name, "dropping non-text response header value");
        }
    }
    out
}
