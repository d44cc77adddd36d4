use proptest::prelude::*;
use todo_page::is_valid_email;

const DEFAULT_EMAIL_PROPTEST_CASES: u32 = 256;

fn email_proptest_cases() -> u32 {
    std::env::var("TODO_PAGE_PROPTEST_CASES")
        .ok()
        .and_then(|raw| raw.parse::<u32>().ok())
        .filter(|value| *value > 0)
        .unwrap_or(DEFAULT_EMAIL_PROPTEST_CASES)
}

// Mirror of ^[^\s@]+@[^\s@]+\.[^\s@]+$ : a non-empty local part before the
// first @, and a domain with an interior dot; no whitespace or further @.
fn reference_is_valid(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || local.chars().any(char::is_whitespace) {
        return false;
    }
    if domain.contains('@') || domain.chars().any(char::is_whitespace) {
        return false;
    }
    let chars = domain.chars().collect::<Vec<_>>();
    chars
        .iter()
        .enumerate()
        .any(|(i, ch)| *ch == '.' && i > 0 && i + 1 < chars.len())
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: email_proptest_cases(),
        ..ProptestConfig::default()
    })]

    #[test]
    fn well_formed_addresses_are_accepted(
        local in "[a-z0-9_-]{1,12}",
        host in "[a-z0-9-]{1,12}",
        tld in "[a-z]{2,6}",
    ) {
        let email = format!("{local}@{host}.{tld}");
        prop_assert!(is_valid_email(&email), "{email}");
    }

    #[test]
    fn whitespace_anywhere_is_rejected(
        prefix in "[a-z]{0,6}",
        suffix in "[a-z]{0,6}",
        ws in prop::sample::select(vec![' ', '\t', '\n']),
    ) {
        let email = format!("{prefix}{ws}{suffix}@example.com");
        prop_assert!(!is_valid_email(&email));
    }

    #[test]
    fn predicate_agrees_with_the_reference_model(
        candidate in "[a-zA-Z0-9@. \t_-]{0,24}",
    ) {
        prop_assert_eq!(
            is_valid_email(&candidate),
            reference_is_valid(&candidate),
            "{}",
            candidate
        );
    }
}

#[test]
fn documented_examples() {
    assert!(is_valid_email("a@b.co"));
    assert!(!is_valid_email("a@b"));
    assert!(!is_valid_email("a b@c.com"));
}
