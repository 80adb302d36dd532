pub mod password;

use rand::RngExt;

/// 生成指定位数的数字验证码
pub fn generate_numeric_code(length: usize) -> String {
    let mut rng = rand::rng();
    (0..length)
        .map(|_| char::from_digit(rng.random_range(0..10), 10).unwrap_or('0'))
        .collect()
}

/// 生成安全的随机令牌（URL-safe Base64）
pub fn generate_secure_token(bytes: usize) -> String {
    use base64::Engine;
    let mut buf = vec![0u8; bytes];
    rand::rng().fill(&mut buf[..]);
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(buf)
}

/// 遮蔽邮箱地址，用于账号找回响应
///
/// `someone@example.com` → `so*****@example.com`，本地部分最多保留 2 个字符。
pub fn mask_email(email: &str) -> String {
    match email.split_once('@') {
        Some((local, domain)) => {
            let keep = local.chars().take(2).collect::<String>();
            let masked_len = local.chars().count().saturating_sub(keep.chars().count());
            format!("{}{}@{}", keep, "*".repeat(masked_len.max(3)), domain)
        }
        None => "*".repeat(email.len().max(3)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_numeric_code_length_and_digits() {
        let code = generate_numeric_code(6);
        assert_eq!(code.len(), 6);
        assert!(code.chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn test_generate_secure_token_uniqueness() {
        let a = generate_secure_token(32);
        let b = generate_secure_token(32);
        assert_ne!(a, b);
        assert!(a.len() >= 40);
    }

    #[test]
    fn test_mask_email_keeps_prefix_and_domain() {
        let masked = mask_email("someone@example.com");
        assert!(masked.starts_with("so"));
        assert!(masked.ends_with("@example.com"));
        assert!(masked.contains('*'));
        assert!(!masked.contains("someone"));
    }

    #[test]
    fn test_mask_email_short_local_part() {
        let masked = mask_email("ab@x.io");
        assert!(masked.starts_with("ab"));
        assert!(masked.contains('*'));
    }

    #[test]
    fn test_mask_email_without_at() {
        let masked = mask_email("not-an-email");
        assert!(masked.chars().all(|c| c == '*'));
    }
}
