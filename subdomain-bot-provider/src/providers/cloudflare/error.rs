//! Cloudflare error code mapping
//!
//! Reference: <https://developers.cloudflare.com/api/> (error codes per endpoint)

use crate::error::ProviderError;

use super::PROVIDER;

/// What a failed request was about; fills in the error's details.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Subject<'a> {
    Zone,
    RecordName(&'a str),
    RecordId(&'a str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Category {
    Credentials,
    Forbidden,
    Parameter(&'static str),
    Exists,
    Missing,
    Quota,
    Zone,
}

fn categorize(code: i32) -> Option<Category> {
    let category = match code {
        // header / key problems
        6003 | 6103 | 6111 | 9103 | 9106 | 10000 => Category::Credentials,
        // token valid but not allowed on this zone
        9109 => Category::Forbidden,
        1004 => Category::Parameter("general"),
        9000 => Category::Parameter("name"),
        9005 | 9006 | 9009 => Category::Parameter("content"),
        9021 => Category::Parameter("ttl"),
        9041 => Category::Parameter("proxied"),
        81053..=81058 => Category::Exists,
        81044 => Category::Missing,
        81045 => Category::Quota,
        7000 | 7003 => Category::Zone,
        _ => return None,
    };
    Some(category)
}

/// Fallback when the envelope carries no usable code.
fn categorize_status(status: u16) -> Option<Category> {
    match status {
        401 => Some(Category::Credentials),
        403 => Some(Category::Forbidden),
        404 => Some(Category::Zone),
        _ => None,
    }
}

/// Turn a `success: false` envelope into a [`ProviderError`].
pub(crate) fn map_api_error(
    code: Option<i32>,
    message: String,
    status: u16,
    subject: Subject<'_>,
    zone_id: &str,
) -> ProviderError {
    let provider = PROVIDER.to_string();
    let category = code.and_then(categorize).or_else(|| categorize_status(status));

    match category {
        Some(Category::Credentials) => ProviderError::InvalidCredentials {
            provider,
            raw_message: Some(message),
        },
        Some(Category::Forbidden) => ProviderError::PermissionDenied {
            provider,
            raw_message: Some(message),
        },
        Some(Category::Parameter(param)) => ProviderError::InvalidParameter {
            provider,
            param: param.to_string(),
            detail: message,
        },
        Some(Category::Exists) => ProviderError::RecordExists {
            provider,
            record_name: match subject {
                Subject::RecordName(name) => name.to_string(),
                _ => "<unknown>".to_string(),
            },
            raw_message: Some(message),
        },
        Some(Category::Missing) => ProviderError::RecordNotFound {
            provider,
            record_id: match subject {
                Subject::RecordId(id) => id.to_string(),
                _ => "<unknown>".to_string(),
            },
            raw_message: Some(message),
        },
        Some(Category::Quota) => ProviderError::QuotaExceeded {
            provider,
            raw_message: Some(message),
        },
        Some(Category::Zone) => ProviderError::DomainNotFound {
            provider,
            domain: zone_id.to_string(),
            raw_message: Some(message),
        },
        None => ProviderError::Unknown {
            provider,
            raw_code: code.map(|c| c.to_string()),
            raw_message: message,
        },
    }
}
