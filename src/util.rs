const MAX_NAME_LEN: usize = 36;

/// Shorten long file names to `first 18....last 18`.
pub fn shorten_name(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let len = chars.len();
    if len < MAX_NAME_LEN {
        return name.to_string();
    }

    let half = MAX_NAME_LEN / 2;
    let head: String = chars[..half].iter().collect();
    let tail: String = chars[len - half..].iter().collect();
    format!("{}....{}", head, tail)
}
