use places_api::slug::slugify;

#[test]
fn lowercases_and_hyphenates() {
    assert_eq!(slugify("Central Park"), "central-park");
}

#[test]
fn folds_diacritics_to_ascii() {
    assert_eq!(slugify("São Paulo"), "sao-paulo");
    assert_eq!(slugify("Florianópolis"), "florianopolis");
    assert_eq!(slugify("Münster"), "munster");
    assert_eq!(slugify("Straße"), "strasse");
}

#[test]
fn collapses_separator_runs() {
    assert_eq!(slugify("Rio -- de   Janeiro!!"), "rio-de-janeiro");
    assert_eq!(slugify("a...b,,,c"), "a-b-c");
}

#[test]
fn strips_leading_and_trailing_hyphens() {
    assert_eq!(slugify("  --Niterói--  "), "niteroi");
    assert_eq!(slugify("!?"), "");
}

#[test]
fn keeps_digits() {
    assert_eq!(slugify("Pier 39"), "pier-39");
}

#[test]
fn unmapped_non_ascii_acts_as_separator() {
    assert_eq!(slugify("北京 Park"), "park");
    assert_eq!(slugify("a→b"), "a-b");
}

#[test]
fn empty_input_yields_empty_slug() {
    assert_eq!(slugify(""), "");
}

#[test]
fn deterministic_for_repeated_input() {
    let first = slugify("Belo Horizonte");
    let second = slugify("Belo Horizonte");
    assert_eq!(first, second);
    assert_eq!(first, "belo-horizonte");
}

#[test]
fn already_slugged_input_is_a_fixed_point() {
    assert_eq!(slugify("central-park"), "central-park");
}
