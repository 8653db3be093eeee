use rand::Rng;

/// Generate a public inquiry reference, e.g. `#TRV-48213`.
///
/// Five random digits keeps the reference short enough to read over the
/// phone. Collisions are possible in principle; the store prepends rather
/// than keys on this value, so a collision only affects lookups.
pub fn inquiry_reference() -> String {
    let number: u32 = rand::thread_rng().gen_range(10_000..100_000);
    format!("#TRV-{}", number)
}

/// Generate a passenger identifier: nine lowercase base-36 characters,
/// matching the ids embedded in records written by the legacy web form.
pub fn passenger_id() -> String {
    const ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";
    let mut rng = rand::thread_rng();
    (0..9)
        .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inquiry_reference_format() {
        for _ in 0..50 {
            let reference = inquiry_reference();
            let digits = reference.strip_prefix("#TRV-").expect("missing prefix");
            assert_eq!(digits.len(), 5);
            assert!(digits.chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn test_passenger_id_shape() {
        let id = passenger_id();
        assert_eq!(id.len(), 9);
        assert!(id
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()));
    }
}
