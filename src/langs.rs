/*! UD language table scraping.

The UD validator documentation lists every language with its code. The
treebank release only carries language names in directory names, so the
catalog builder needs this mapping to attach codes to descriptors.

!*/
use std::collections::HashMap;

use lazy_static::lazy_static;
use log::info;
use regex::Regex;

use crate::error::Error;

/// Language-specification page listing every UD language and its code.
const UD_LANGSPEC_URL: &str =
    "https://quest.ms.mff.cuni.cz/udvalidator/cgi-bin/unidep/langspec/specify_feature.pl";

lazy_static! {
    static ref ANCHOR: Regex =
        Regex::new(r#"<a\s[^>]*href="([^"]*)"[^>]*>([^<]+)</a>"#).unwrap();
}

/// Scrapes the UD language table into a name -> code mapping.
///
/// A non-success status is surfaced as [Error::Status] and is not retried.
pub fn fetch_language_codes(
    client: &reqwest::blocking::Client,
) -> Result<HashMap<String, String>, Error> {
    let response = client.get(UD_LANGSPEC_URL).send()?;
    if !response.status().is_success() {
        return Err(Error::Status(response.status()));
    }

    let mapping = parse_language_table(&response.text()?);
    info!(
        "extracted {} languages from the UD documentation",
        mapping.len()
    );
    Ok(mapping)
}

/// Extracts (name, code) pairs from the language table anchors.
///
/// Multi-word names keep their first two words joined by `_`, matching the
/// directory naming of the treebank release.
fn parse_language_table(html: &str) -> HashMap<String, String> {
    let mut mapping = HashMap::new();
    for capture in ANCHOR.captures_iter(html) {
        let text = capture[2].trim();
        if text.chars().count() <= 1 {
            continue;
        }
        let code = match capture[1].split('=').nth(1) {
            Some(code) => code,
            None => continue,
        };

        let name = match text.split_once(' ') {
            Some((first, rest)) => {
                let second = rest.split(' ').next().unwrap_or_default();
                format!("{}_{}", first, second)
            }
            None => text.to_string(),
        };
        mapping.insert(name, code.to_string());
    }
    mapping
}

#[cfg(test)]
mod tests {
    use super::*;

    const TABLE: &str = r#"
<html><body>
<a href="specify_feature.pl?lcode=fr">French</a>
<a href="specify_feature.pl?lcode=grc">Ancient Greek</a>
<a href="specify_feature.pl?lcode=x">?</a>
<a href="top">skipped, no code</a>
</body></html>
"#;

    #[test]
    fn parses_simple_and_multiword_names() {
        let mapping = parse_language_table(TABLE);
        assert_eq!(mapping.get("French").map(String::as_str), Some("fr"));
        assert_eq!(
            mapping.get("Ancient_Greek").map(String::as_str),
            Some("grc")
        );
    }

    #[test]
    fn skips_single_char_anchors_and_codeless_hrefs() {
        let mapping = parse_language_table(TABLE);
        assert_eq!(mapping.len(), 2);
    }
}
