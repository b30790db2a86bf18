//! Slug derivation for place names.
//!
//! Slugs are lowercase ASCII identifiers composed of letters, digits, and
//! single hyphens. They are derived from the display name and never settable
//! by callers.

/// slugify
///
/// Maps a display string to its URL-safe slug: diacritics are folded to their
/// ASCII base letters, every run of whitespace or punctuation collapses to a
/// single hyphen, and the result carries no leading or trailing hyphens.
///
/// The function is pure and total: the same input always yields the same
/// output, and the empty string maps to the empty string.
pub fn slugify(input: &str) -> String {
    let mut slug = String::with_capacity(input.len());
    let mut pending_hyphen = false;

    let mut push = |ch: char| {
        if ch.is_ascii_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(ch.to_ascii_lowercase());
        } else {
            // Separator run: emit at most one hyphen, and only between
            // alphanumeric output.
            pending_hyphen = true;
        }
    };

    for ch in input.chars() {
        match fold_to_ascii(ch) {
            Some(folded) => folded.chars().for_each(&mut push),
            None => push(ch),
        }
    }

    slug
}

/// Folds an accented character to its ASCII base form.
///
/// Covers the Latin-1 supplement and the Latin Extended-A letters that show up
/// in place names. Returns `None` for characters without a mapping; unmapped
/// non-alphanumeric input is treated as a separator by the caller.
fn fold_to_ascii(ch: char) -> Option<&'static str> {
    let folded = match ch {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' | 'ā' | 'ă' | 'ą' => "a",
        'À' | 'Á' | 'Â' | 'Ã' | 'Ä' | 'Å' | 'Ā' | 'Ă' | 'Ą' => "A",
        'ç' | 'ć' | 'č' => "c",
        'Ç' | 'Ć' | 'Č' => "C",
        'è' | 'é' | 'ê' | 'ë' | 'ē' | 'ė' | 'ę' | 'ě' => "e",
        'È' | 'É' | 'Ê' | 'Ë' | 'Ē' | 'Ė' | 'Ę' | 'Ě' => "E",
        'ì' | 'í' | 'î' | 'ï' | 'ī' | 'į' => "i",
        'Ì' | 'Í' | 'Î' | 'Ï' | 'Ī' | 'Į' => "I",
        'ñ' | 'ń' | 'ň' => "n",
        'Ñ' | 'Ń' | 'Ň' => "N",
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' | 'ō' => "o",
        'Ò' | 'Ó' | 'Ô' | 'Õ' | 'Ö' | 'Ø' | 'Ō' => "O",
        'ù' | 'ú' | 'û' | 'ü' | 'ū' | 'ů' => "u",
        'Ù' | 'Ú' | 'Û' | 'Ü' | 'Ū' | 'Ů' => "U",
        'ý' | 'ÿ' => "y",
        'Ý' => "Y",
        'š' | 'ś' => "s",
        'Š' | 'Ś' => "S",
        'ž' | 'ź' | 'ż' => "z",
        'Ž' | 'Ź' | 'Ż' => "Z",
        'ß' => "ss",
        'æ' => "ae",
        'Æ' => "AE",
        'œ' => "oe",
        'Œ' => "OE",
        'đ' | 'ð' => "d",
        'Đ' | 'Ð' => "D",
        'ł' => "l",
        'Ł' => "L",
        'þ' => "th",
        'Þ' => "TH",
        _ => return None,
    };
    Some(folded)
}
