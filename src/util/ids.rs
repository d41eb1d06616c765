use chrono::Utc;
use rand::Rng;

/// Generate an entity id in the blob's established shape:
/// `id_<epoch millis>_<9 base36 chars>`.
pub fn generate_id() -> String {
    let millis = Utc::now().timestamp_millis();
    let mut rng = rand::rng();
    let suffix: String = (0..9)
        .map(|_| {
            let n: u32 = rng.random_range(0..36);
            char::from_digit(n, 36).unwrap_or('0')
        })
        .collect();
    format!("id_{}_{}", millis, suffix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shape_is_stable() {
        let id = generate_id();
        let parts: Vec<&str> = id.splitn(3, '_').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "id");
        assert!(parts[1].chars().all(|c| c.is_ascii_digit()));
        assert_eq!(parts[2].len(), 9);
        assert!(parts[2].chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn ids_are_distinct() {
        let a = generate_id();
        let b = generate_id();
        assert_ne!(a, b);
    }
}
