use crate::config::SpeechConfig;
use chrono::Utc;
use serde::Serialize;
use sha2::{Digest, Sha256};
use uuid::Uuid;

pub const SIGN_TYPE: &str = "v3";

/// Inputs longer than 20 characters are signed as their first 10
/// characters, the character count and the last 10 characters.
///
/// Lengths count Unicode scalar values (`char`s), not UTF-16 code units,
/// so a name outside the BMP such as an emoji counts once.
pub fn sign_input(q: &str) -> String {
    let chars: Vec<char> = q.chars().collect();
    let len = chars.len();
    if len <= 20 {
        return q.to_string();
    }

    let head: String = chars[..10].iter().collect();
    let tail: String = chars[len - 10..].iter().collect();
    format!("{}{}{}", head, len, tail)
}

/// Hex SHA-256 over `app_key + sign_input(q) + salt + curtime + app_secret`.
pub fn sign(app_key: &str, app_secret: &str, q: &str, salt: &str, curtime: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(app_key.as_bytes());
    hasher.update(sign_input(q).as_bytes());
    hasher.update(salt.as_bytes());
    hasher.update(curtime.as_bytes());
    hasher.update(app_secret.as_bytes());
    hex::encode(hasher.finalize())
}

/// Form body of one synthesis call.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignedRequest {
    pub q: String,
    pub voice_name: String,
    pub format: String,
    pub app_key: String,
    pub salt: String,
    pub curtime: String,
    pub sign_type: String,
    pub sign: String,
}

impl SignedRequest {
    /// Signs `text` with a fresh salt and the current time.
    pub fn new(config: &SpeechConfig, text: &str) -> Self {
        Self::with_salt(
            config,
            text,
            &Uuid::new_v4().to_string(),
            &Utc::now().timestamp().to_string(),
        )
    }

    pub fn with_salt(config: &SpeechConfig, text: &str, salt: &str, curtime: &str) -> Self {
        Self {
            q: text.to_string(),
            voice_name: config.voice_name.clone(),
            format: config.format.clone(),
            app_key: config.app_key.clone(),
            salt: salt.to_string(),
            curtime: curtime.to_string(),
            sign_type: SIGN_TYPE.to_string(),
            sign: sign(&config.app_key, &config.app_secret, text, salt, curtime),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_input_is_kept() {
        assert_eq!(sign_input(""), "");
        assert_eq!(sign_input("abc"), "abc");
        let twenty = "a".repeat(20);
        assert_eq!(sign_input(&twenty), twenty);
    }

    #[test]
    fn test_long_input_is_bucketed_by_chars() {
        assert_eq!(
            sign_input("abcdefghijklmnopqrstuvwxyz"),
            "abcdefghij26qrstuvwxyz"
        );
        assert_eq!(
            sign_input("让幸运之神为新人送上祝福。恭喜张三和李四中奖！愿你们幸福美满！"),
            "让幸运之神为新人送上31奖！愿你们幸福美满！"
        );
    }

    #[test]
    fn test_astral_chars_count_once() {
        // 20 emoji are 40 UTF-16 units but still fit.
        let twenty = "😀".repeat(20);
        assert_eq!(sign_input(&twenty), twenty);

        let long = format!("{}{}", "😀".repeat(11), "𠀋".repeat(10));
        assert_eq!(
            sign_input(&long),
            format!("{}21{}", "😀".repeat(10), "𠀋".repeat(10))
        );
    }

    #[test]
    fn test_sign_known_vectors() {
        assert_eq!(
            sign("key", "secret", "abc", "salt", "1700000000"),
            "fbb7b2187395fc335d525f77b2e615214eac8be1928cb10c53c6ae239480736d"
        );
        assert_eq!(
            sign(
                "key",
                "secret",
                "让幸运之神为新人送上祝福。恭喜张三和李四中奖！愿你们幸福美满！",
                "salt",
                "1700000000"
            ),
            "902b4d1d47d90b8254ce3994af930dc5b50af00710e195c6555015ac011952f2"
        );
    }

    #[test]
    fn test_request_fields() {
        let config = SpeechConfig {
            app_key: "key".to_string(),
            app_secret: "secret".to_string(),
            ..SpeechConfig::default()
        };

        let req = SignedRequest::with_salt(&config, "abc", "salt", "1700000000");
        assert_eq!(req.sign_type, "v3");
        assert_eq!(req.voice_name, "youxiaozhi");
        assert_eq!(req.format, "mp3");
        assert_eq!(
            req.sign,
            "fbb7b2187395fc335d525f77b2e615214eac8be1928cb10c53c6ae239480736d"
        );

        let fresh_a = SignedRequest::new(&config, "abc");
        let fresh_b = SignedRequest::new(&config, "abc");
        assert_ne!(fresh_a.salt, fresh_b.salt);
        assert!(Uuid::parse_str(&fresh_a.salt).is_ok());
    }
}
