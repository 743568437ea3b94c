use unicode_segmentation::UnicodeSegmentation;

/// A plaintext password that meets the minimum policy. Never logged.
pub struct Password(String);

impl Password {
    pub fn parse(s: String) -> Result<Password, String> {
        let length = s.graphemes(true).count();
        if length < 6 {
            return Err("Password must be at least 6 characters.".to_string());
        }
        if length > 128 {
            return Err("Password must be at most 128 characters.".to_string());
        }
        Ok(Self(s))
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for Password {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Password(***)")
    }
}
