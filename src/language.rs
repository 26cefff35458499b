use crate::services::{Language, SessionUser};

/// Bundled language pack for the listener's display strings. Keys the
/// pack does not carry resolve to themselves, like the host does when
/// no pack is loaded.
#[derive(Clone, Copy, Debug)]
pub struct BundledLanguage {
    active: ActiveLanguage,
}

impl BundledLanguage {
    pub fn for_user(user: &SessionUser) -> Self {
        Self {
            active: ActiveLanguage::from_code(&user.language),
        }
    }

    pub fn from_code(code: &str) -> Self {
        Self {
            active: ActiveLanguage::from_code(code),
        }
    }
}

impl Language for BundledLanguage {
    fn lang(&self, key: &str) -> String {
        let lang = self.active;
        let resolved = match key {
            "VIEWING_IDEAS" => lang.pick("Viewing the ideas list", "正在浏览点子列表"),
            "POSTING_NEW_IDEA" => lang.pick("Posting a new idea", "正在发表新点子"),
            "IDEA_STATUS_NEW" => lang.pick("New", "新提交"),
            "IDEA_STATUS_IN_PROGRESS" => lang.pick("In progress", "进行中"),
            "IDEA_STATUS_IMPLEMENTED" => lang.pick("Implemented", "已实现"),
            "IDEA_STATUS_DUPLICATE" => lang.pick("Duplicate", "重复提交"),
            "IDEA_STATUS_INVALID" => lang.pick("Invalid", "无效"),
            other => other,
        };
        resolved.to_string()
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum ActiveLanguage {
    English,
    ChineseSimplified,
}

impl ActiveLanguage {
    fn from_code(code: &str) -> Self {
        let normalized = code.trim().to_ascii_lowercase();
        if normalized.starts_with("zh") || normalized.contains("chinese") {
            Self::ChineseSimplified
        } else {
            Self::English
        }
    }

    fn pick<'a>(&self, english: &'a str, chinese: &'a str) -> &'a str {
        match self {
            ActiveLanguage::English => english,
            ActiveLanguage::ChineseSimplified => chinese,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_viewing_strings() {
        let lang = BundledLanguage::from_code("en");
        assert_eq!(lang.lang("VIEWING_IDEAS"), "Viewing the ideas list");
        assert_eq!(lang.lang("POSTING_NEW_IDEA"), "Posting a new idea");
    }

    #[test]
    fn respects_user_language_preference() {
        let user = SessionUser {
            language: String::from("zh_CN"),
            ..SessionUser::default()
        };
        let lang = BundledLanguage::for_user(&user);
        assert_eq!(lang.lang("VIEWING_IDEAS"), "正在浏览点子列表");
    }

    #[test]
    fn unknown_keys_echo_back() {
        let lang = BundledLanguage::from_code("en");
        assert_eq!(lang.lang("SOME_HOST_KEY"), "SOME_HOST_KEY");
    }

    #[test]
    fn language_detection_handles_codes() {
        assert_eq!(
            ActiveLanguage::from_code("zh_CN"),
            ActiveLanguage::ChineseSimplified
        );
        assert_eq!(
            ActiveLanguage::from_code("chinese_simplified"),
            ActiveLanguage::ChineseSimplified
        );
        assert_eq!(ActiveLanguage::from_code("en_US"), ActiveLanguage::English);
    }
}
