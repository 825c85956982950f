//! Syntactic e-mail address check.
//!
//! This only answers "does it look like an address"; deliverability is the
//! auth provider's problem.

const MAX_LEN: usize = 254;
const MAX_LOCAL_LEN: usize = 64;

/// Returns `true` if `s` is a plausible `local@domain.tld` address.
///
/// Rules: exactly one `@`, non-empty local part without whitespace or
/// leading/trailing/double dots, a domain of at least two dot-separated
/// labels made of alphanumerics and inner hyphens, and a TLD of two or
/// more letters.
pub fn is_valid_email(s: &str) -> bool {
    if s.is_empty() || s.len() > MAX_LEN {
        return false;
    }

    let Some((local, domain)) = s.split_once('@') else {
        return false;
    };

    if domain.contains('@') {
        return false;
    }

    valid_local(local) && valid_domain(domain)
}

fn valid_local(local: &str) -> bool {
    if local.is_empty() || local.len() > MAX_LOCAL_LEN {
        return false;
    }
    if local.starts_with('.') || local.ends_with('.') || local.contains("..") {
        return false;
    }
    local
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || "!#$%&'*+/=?^_`{|}~.-".contains(c))
}

fn valid_domain(domain: &str) -> bool {
    let labels: Vec<&str> = domain.split('.').collect();
    if labels.len() < 2 {
        return false;
    }

    let labels_ok = labels.iter().all(|label| {
        !label.is_empty()
            && !label.starts_with('-')
            && !label.ends_with('-')
            && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
    });

    let tld = labels[labels.len() - 1];
    labels_ok && tld.len() >= 2 && tld.chars().all(|c| c.is_ascii_alphabetic())
}
