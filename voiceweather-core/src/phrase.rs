use crate::model::WeatherReport;

/// Tag used when the requested language has no template.
pub const DEFAULT_LANGUAGE: &str = "en";

const DEFAULT_TEMPLATE: &str = "The weather for today in {} city is: {} degrees celsius, with minimum temperature of {} and max of {}.";

/// Sentence templates by language tag. Slots are filled positionally:
/// city, temp, temp_min, temp_max. Adding a language is a new row here,
/// nothing else changes.
const TEMPLATES: &[(&str, &str)] = &[
    ("en", DEFAULT_TEMPLATE),
    (
        "pt-br",
        "A temperatura atual na cidade de {} é de {} graus celsius, com temperatura mínima de {} e máxima de {}.",
    ),
];

fn lookup(lang: &str) -> Option<(&'static str, &'static str)> {
    TEMPLATES
        .iter()
        .find(|(tag, _)| tag.eq_ignore_ascii_case(lang))
        .copied()
}

/// Resolve a language tag against the registry, falling back to
/// [`DEFAULT_LANGUAGE`] (with a warning) when there is no template for it.
pub fn resolve_language(lang: &str) -> &'static str {
    match lookup(lang) {
        Some((tag, _)) => tag,
        None => {
            tracing::warn!(
                "Corresponding phrase for '{lang}' language was not found. Setting the default '{DEFAULT_LANGUAGE}'"
            );
            DEFAULT_LANGUAGE
        }
    }
}

/// Build the spoken sentence for a weather report. Never fails: unknown
/// tags use the default template.
pub fn format_phrase(lang: &str, weather: &WeatherReport) -> String {
    let tag = resolve_language(lang);
    let template = lookup(tag).map_or(DEFAULT_TEMPLATE, |(_, t)| t);

    let temp_min = format!("{}", weather.temp_min);
    let temp_max = format!("{}", weather.temp_max);

    fill(
        template,
        &[&weather.city, &weather.temp, &temp_min, &temp_max],
    )
}

/// Replace each `{}` slot with the next value, in order.
fn fill(template: &str, values: &[&str]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut values = values.iter();
    let mut rest = template;

    while let Some(idx) = rest.find("{}") {
        out.push_str(&rest[..idx]);
        if let Some(value) = values.next() {
            out.push_str(value);
        }
        rest = &rest[idx + 2..];
    }

    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report() -> WeatherReport {
        WeatherReport {
            city: "São Paulo".to_string(),
            main: "Clear".to_string(),
            description: "clear sky".to_string(),
            temp: "25".to_string(),
            temp_min: 23.0,
            temp_max: 27.0,
        }
    }

    #[test]
    fn unknown_tags_fall_back_to_english() {
        for lang in ["fr", "xx-yy", "", "klingon"] {
            assert_eq!(resolve_language(lang), "en");
            let phrase = format_phrase(lang, &report());
            assert!(phrase.starts_with("The weather for today in São Paulo city"));
        }
    }

    #[test]
    fn known_tags_match_case_insensitively() {
        assert_eq!(resolve_language("PT-BR"), "pt-br");
        assert_eq!(resolve_language("En"), "en");
    }

    #[test]
    fn portuguese_phrase_for_sao_paulo() {
        let phrase = format_phrase("pt-br", &report());

        assert_eq!(
            phrase,
            "A temperatura atual na cidade de São Paulo é de 25 graus celsius, \
             com temperatura mínima de 23 e máxima de 27."
        );
    }

    #[test]
    fn english_phrase_fills_all_four_slots() {
        let phrase = format_phrase("en", &report());

        assert_eq!(
            phrase,
            "The weather for today in São Paulo city is: 25 degrees celsius, \
             with minimum temperature of 23 and max of 27."
        );
    }

    #[test]
    fn fill_handles_extra_and_missing_slots() {
        assert_eq!(fill("a {} b {}", &["1"]), "a 1 b ");
        assert_eq!(fill("a {}", &["1", "2"]), "a 1");
        assert_eq!(fill("no slots", &["1"]), "no slots");
    }
}
