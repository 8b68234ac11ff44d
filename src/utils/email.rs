use once_cell::sync::Lazy;
use regex::Regex;

/// 聯絡表單接受的 email 格式
///
/// - local part 首尾必須是英數字，中間可包含 `.`、`_`、`-`
/// - domain label 首尾必須是英數字，中間可包含 `-`
/// - 至少一段 `.` 加上兩個以上英文字母的後綴 (例如 `.com`、`.co.uk`)
///
/// local part 中間的連續點 (`a..b@domain.com`) 目前會被接受。
pub static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^[a-zA-Z0-9](?:[a-zA-Z0-9._-]*[a-zA-Z0-9])?@[a-zA-Z0-9](?:[a-zA-Z0-9-]*[a-zA-Z0-9])?(?:\.[a-zA-Z]{2,})+$",
    )
    .expect("email pattern is a valid regex")
});

/// Returns `true` when `email` is an acceptable contact address.
///
/// Pure and total: any input, including empty or non-ASCII strings, yields an
/// answer in time linear in its length.
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_REGEX.is_match(email)
}
