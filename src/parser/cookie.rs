use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cookie {
    pub name: String,
    pub value: String,
    pub domain: String,
}

impl Cookie {
    /// Entries with an empty name cannot be installed in the browser.
    pub fn is_installable(&self) -> bool {
        !self.name.is_empty()
    }
}

/// Parses a `name=value; name=value` header-style string.
///
/// Every `;`-separated piece yields an entry, including empty ones: `""`
/// parses to a single cookie with an empty name and value. A piece without
/// `=` keeps all but its last character as the name and the whole piece as
/// the value.
pub fn parse_cookie_string(raw: &str, domain: &str) -> Vec<Cookie> {
    raw.split(';')
        .map(|piece| {
            let piece = piece.trim();
            let (name, value) = match piece.find('=') {
                Some(idx) => (&piece[..idx], &piece[idx + 1..]),
                None => {
                    let cut = piece
                        .char_indices()
                        .last()
                        .map(|(idx, _)| idx)
                        .unwrap_or(0);
                    (&piece[..cut], piece)
                }
            };
            Cookie {
                name: name.to_string(),
                value: value.to_string(),
                domain: domain.to_string(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOMAIN: &str = "www.zhihu.com";

    #[test]
    fn test_parses_pairs_and_trims() {
        let cookies = parse_cookie_string("a=1; b=2", DOMAIN);
        assert_eq!(
            cookies,
            vec![
                Cookie {
                    name: "a".to_string(),
                    value: "1".to_string(),
                    domain: DOMAIN.to_string(),
                },
                Cookie {
                    name: "b".to_string(),
                    value: "2".to_string(),
                    domain: DOMAIN.to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_empty_string_yields_one_empty_entry() {
        let cookies = parse_cookie_string("", DOMAIN);
        assert_eq!(cookies.len(), 1);
        assert_eq!(cookies[0].name, "");
        assert_eq!(cookies[0].value, "");
        assert_eq!(cookies[0].domain, DOMAIN);
        assert!(!cookies[0].is_installable());
    }

    #[test]
    fn test_value_keeps_later_equals_signs() {
        let cookies = parse_cookie_string("token=abc==; z_c0=2|1:0", DOMAIN);
        assert_eq!(cookies[0].name, "token");
        assert_eq!(cookies[0].value, "abc==");
        assert_eq!(cookies[1].name, "z_c0");
        assert_eq!(cookies[1].value, "2|1:0");
    }

    #[test]
    fn test_piece_without_equals_sign() {
        let cookies = parse_cookie_string("flag", DOMAIN);
        assert_eq!(cookies[0].name, "fla");
        assert_eq!(cookies[0].value, "flag");
    }

    #[test]
    fn test_trailing_separator_adds_empty_entry() {
        let cookies = parse_cookie_string("a=1;", DOMAIN);
        assert_eq!(cookies.len(), 2);
        assert!(cookies[0].is_installable());
        assert!(!cookies[1].is_installable());
    }
}
