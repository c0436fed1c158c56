//! Email address extraction from free-text email fields.

use std::sync::LazyLock;

use regex::Regex;

/// Domain suffixes that close an address.
pub const EMAIL_SUFFIXES: [&str; 8] = [".com", ".pt", ".eu", ".biz", ".es", ".org", ".net", ".de"];

static WORD_CHAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\w").expect("Invalid word character regex"));

/// Extract the email addresses written in an email field.
///
/// The field is split on `@`. A part after an `@` holds a domain when one of
/// [`EMAIL_SUFFIXES`] occurs past its first character; the suffix found
/// furthest along ends the domain and whatever follows becomes the local part
/// of the next address.
///
/// # Examples
///
/// ```
/// use tabclean_correct::split_emails;
///
/// assert_eq!(
///     split_emails("Joao@Mail.com; ana@x.pt"),
///     vec!["joao@mail.com", "ana@x.pt"]
/// );
/// assert!(split_emails("no address").is_empty());
/// ```
pub fn split_emails(value: &str) -> Vec<String> {
    let mut parts: Vec<String> = value.split('@').map(str::to_string).collect();
    let mut emails = Vec::new();
    let mut idx = 1;
    while idx < parts.len() {
        let bite: String = parts[idx]
            .to_lowercase()
            .chars()
            .filter(|ch| *ch != ' ' && *ch != '\t')
            .collect();

        let Some(end) = domain_end(&bite) else {
            idx += 2;
            continue;
        };

        let local = local_part(&parts[idx - 1]);
        if !local.is_empty() {
            emails.push(format!("{local}@{}", &bite[..end]));
        }

        if end < bite.len() {
            parts[idx] = bite[end..].to_string();
            idx += 1;
        } else {
            idx += 2;
        }
    }
    emails
}

/// Byte offset just past the furthest suffix in a domain candidate.
fn domain_end(bite: &str) -> Option<usize> {
    let mut best: Option<(usize, &str)> = None;
    for suffix in EMAIL_SUFFIXES {
        if let Some(pos) = bite.find(suffix)
            && pos > 0
            && best.is_none_or(|(best_pos, _)| pos > best_pos)
        {
            best = Some((pos, suffix));
        }
    }
    best.map(|(pos, suffix)| pos + suffix.len())
}

/// Lower-cased local part starting at its first word character, ASCII only.
fn local_part(raw: &str) -> String {
    let lowered: String = raw.to_lowercase().chars().filter(|ch| *ch != ' ').collect();
    match WORD_CHAR.find(&lowered) {
        Some(found) => lowered[found.start()..]
            .chars()
            .filter(char::is_ascii)
            .collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_address() {
        assert_eq!(split_emails("Info@Company.PT"), vec!["info@company.pt"]);
    }

    #[test]
    fn test_spaces_inside_address_removed() {
        assert_eq!(split_emails("jo ao @ mail .com"), vec!["joao@mail.com"]);
    }

    #[test]
    fn test_furthest_suffix_ends_domain() {
        assert_eq!(split_emails("a@mail.com.pt"), vec!["a@mail.com.pt"]);
    }

    #[test]
    fn test_local_part_starts_at_word_character() {
        assert_eq!(split_emails("-- maria@x.es"), vec!["maria@x.es"]);
        assert_eq!(split_emails("çaa@x.es"), vec!["aa@x.es"]);
    }

    #[test]
    fn test_part_without_suffix_skips_pair() {
        assert_eq!(split_emails("a@localhost / b@site.org"), Vec::<String>::new());
        assert_eq!(split_emails("a@site.org b@c.de"), vec!["a@site.org", "b@c.de"]);
    }

    #[test]
    fn test_suffix_at_start_not_a_domain() {
        assert!(split_emails("a@.com").is_empty());
    }
}
