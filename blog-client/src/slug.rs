//! Нормализация названий категорий для URL и сравнения.

use unicode_normalization::UnicodeNormalization;

/// Приводит строку к виду, в котором URL-сегмент и название категории с
/// сервера можно сравнивать напрямую.
///
/// Диакритика снимается (`Café` → `cafe`), пробельные последовательности
/// превращаются в `-`, всё кроме ASCII-букв/цифр, `_`, `.`, `-` и хангыля
/// выбрасывается.
pub fn normalize(text: &str) -> String {
    let cleaned: String = text
        .nfkd()
        .filter(|ch| !is_diacritic(*ch))
        .nfc()
        .filter(|ch| is_kept(*ch))
        .collect();

    cleaned
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
        .to_lowercase()
}

/// Слаг для ссылок. Совпадает с [`normalize`].
pub fn slugify(text: &str) -> String {
    normalize(text)
}

fn is_diacritic(ch: char) -> bool {
    ('\u{0300}'..='\u{036f}').contains(&ch)
}

fn is_kept(ch: char) -> bool {
    ch.is_ascii_alphanumeric()
        || ch == '_'
        || ch == '.'
        || ch == '-'
        || ch.is_whitespace()
        || ('가'..='힣').contains(&ch)
}
