use eventhive_bookings::service::ticket_issuer::{ticket_codes, ticket_number};
use uuid::Uuid;

#[test]
fn numbering_is_derived_from_booking_and_line() {
    assert_eq!(ticket_number(12, 34, 1), "TKT-12-34-1");
    assert_eq!(ticket_number(12, 34, 2), "TKT-12-34-2");
    assert_eq!(ticket_number(12, 35, 1), "TKT-12-35-1");
}

#[test]
fn rederiving_a_bookings_numbers_yields_the_same_set() {
    let first: Vec<String> = (1..=3).map(|seq| ticket_number(7, 9, seq)).collect();
    let second: Vec<String> = (1..=3).map(|seq| ticket_number(7, 9, seq)).collect();
    assert_eq!(first, second);
}

#[test]
fn codes_rederive_identically() {
    let booking = Uuid::new_v4();
    let (token_a, scan_a) = ticket_codes("secret", &booking, "TKT-1-2-1");
    let (token_b, scan_b) = ticket_codes("secret", &booking, "TKT-1-2-1");
    assert_eq!(token_a, token_b);
    assert_eq!(scan_a, scan_b);
}

#[test]
fn codes_differ_across_bookings_and_units() {
    let booking_a = Uuid::new_v4();
    let booking_b = Uuid::new_v4();
    let (token_a, _) = ticket_codes("secret", &booking_a, "TKT-1-2-1");
    let (token_b, _) = ticket_codes("secret", &booking_b, "TKT-1-2-1");
    let (token_c, _) = ticket_codes("secret", &booking_a, "TKT-1-2-2");
    assert_ne!(token_a, token_b);
    assert_ne!(token_a, token_c);
}

#[test]
fn codes_depend_on_the_signing_secret() {
    let booking = Uuid::new_v4();
    let (token_a, _) = ticket_codes("secret-one", &booking, "TKT-1-2-1");
    let (token_b, _) = ticket_codes("secret-two", &booking, "TKT-1-2-1");
    assert_ne!(token_a, token_b);
}

#[test]
fn token_is_opaque_hex_and_scan_code_is_twelve_digits() {
    let booking = Uuid::new_v4();
    let (token, scan) = ticket_codes("secret", &booking, "TKT-1-2-1");
    assert_eq!(token.len(), 64);
    assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
    assert_eq!(scan.len(), 12);
    assert!(scan.chars().all(|c| c.is_ascii_digit()));
}
