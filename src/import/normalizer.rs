//! Name/phone normalization for dedup keys

use super::types::CustomerKey;

/// Strip everything but digits from a phone number
pub fn normalize_phone(phone: &str) -> String {
    phone.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Trim and collapse internal whitespace runs to single spaces
pub fn normalize_name(name: &str) -> String {
    name.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Build the dedup key for a (name, phone) pair
pub fn build_customer_key(name: &str, phone: &str) -> CustomerKey {
    CustomerKey {
        normalized_phone: normalize_phone(phone),
        normalized_name: normalize_name(name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_phone() {
        assert_eq!(normalize_phone("010-1234-5678"), "01012345678");
        assert_eq!(normalize_phone(" 010 1234 5678 "), "01012345678");
        assert_eq!(normalize_phone(""), "");
    }

    #[test]
    fn test_normalize_name() {
        assert_eq!(normalize_name("  김  철수 "), "김 철수");
        assert_eq!(normalize_name("홍길동"), "홍길동");
    }

    #[test]
    fn test_customer_key_value() {
        let key = build_customer_key("홍길동", "010-1234-5678");
        assert_eq!(key.value(), "01012345678|홍길동");
    }

    #[test]
    fn test_key_equality_ignores_formatting() {
        let a = build_customer_key(" 홍길동 ", "010-1234-5678");
        let b = build_customer_key("홍길동", "01012345678");
        assert_eq!(a, b);
    }
}
