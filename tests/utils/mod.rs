use regex as rust_regex;
use uniregex::{Match, Regex, RegexOptions};

/// The options exercised against rust-regex, with the equivalent builder
/// settings on the rust-regex side.
const MODES: &[(RegexOptions, bool)] = &[
    (RegexOptions::NONE, false),
    (RegexOptions::IGNORE_CASE, true),
];

/// UTF-16 index of a byte offset of `input`.
fn units(input: &str, byte: usize) -> usize {
    input[..byte].encode_utf16().count()
}

/// Span of a match, or None when the search failed.
fn span(m: &Match<'_>) -> Option<(usize, usize)> {
    m.success().then(|| (m.index(), m.end()))
}

/// Group values of a match, or None when the search failed.
fn groups(m: &Match<'_>) -> Option<Vec<Option<String>>> {
    m.success().then(|| {
        m.groups()
            .iter()
            .map(|group| group.success().then(|| group.value()))
            .collect()
    })
}

/// Match a pattern against a given input in every mode, as text and as
/// bytes, and compare both compilation and execution with rust-regex.
/// Text positions are compared in UTF-16 units, byte positions in bytes.
pub fn check_against_rust_regex(pattern: &str, input: &str) {
    for &(options, case_insensitive) in MODES {
        let rust = rust_regex::RegexBuilder::new(pattern)
            .case_insensitive(case_insensitive)
            .build();
        let ours = Regex::with_options(pattern, options);

        match (rust, ours) {
            (Ok(rust_re), Ok(our_re)) => check_matches(&rust_re, &our_re, input),
            (Err(_), Err(_)) => {} // All failed, that's good
            (Ok(_), Err(e)) => panic!("{pattern:?} failed to compile but rust-regex succeeded: {e}"),
            (Err(e), Ok(_)) => panic!("rust-regex failed to compile {pattern:?} but we succeeded: {e}"),
        }
    }
}

fn check_matches(rust_re: &rust_regex::Regex, our_re: &Regex, input: &str) {
    let pattern = our_re.pattern();
    let text: Vec<u16> = input.encode_utf16().collect();

    assert_eq!(
        our_re.group_count(),
        rust_re.captures_len(),
        "Mismatch for pattern {pattern:?} (group count)"
    );

    // is_match
    let rust_is_match = rust_re.is_match(input);
    assert_eq!(our_re.is_match(&text).unwrap(), rust_is_match);
    assert_eq!(our_re.is_match(input.as_bytes()).unwrap(), rust_is_match);

    // find
    let rust_match = rust_re.find(input).map(|m| (m.start(), m.end()));
    let in_units = rust_match.map(|(start, end)| (units(input, start), units(input, end)));
    let my_match = span(&our_re.find(&text).unwrap());
    assert_eq!(
        my_match, in_units,
        "Mismatch for pattern {pattern:?} input {input:?} (find)"
    );
    let my_match = span(&our_re.find(input.as_bytes()).unwrap());
    assert_eq!(
        my_match, rust_match,
        "Mismatch for pattern {pattern:?} input {input:?} (find over bytes)"
    );

    // find_all
    let rust_all: Vec<_> = rust_re
        .find_iter(input)
        .map(|m| (units(input, m.start()), units(input, m.end())))
        .collect();
    let mut matches = our_re.find_all(&text).unwrap();
    let my_all: Vec<_> = matches.iter().filter_map(|m| span(&m)).collect();
    assert_eq!(
        my_all, rust_all,
        "Mismatch for pattern {pattern:?} input {input:?} (find_all)"
    );
    assert_eq!(matches.len(), rust_all.len());

    // captures
    let rust_groups = rust_re.captures(input).map(|caps| {
        caps.iter()
            .map(|group| group.map(|m| m.as_str().to_string()))
            .collect::<Vec<_>>()
    });
    let my_groups = groups(&our_re.find(&text).unwrap());
    assert_eq!(
        my_groups, rust_groups,
        "Mismatch for pattern {pattern:?} input {input:?} (captures)"
    );

    // captures of every match
    let rust_all_groups: Vec<_> = rust_re
        .captures_iter(input)
        .map(|caps| {
            caps.iter()
                .map(|group| group.map(|m| m.as_str().to_string()))
                .collect::<Vec<_>>()
        })
        .collect();
    let my_all_groups: Vec<_> = our_re
        .find_all(&text)
        .unwrap()
        .into_vec()
        .iter()
        .filter_map(groups)
        .collect();
    assert_eq!(
        my_all_groups, rust_all_groups,
        "Mismatch for pattern {pattern:?} input {input:?} (captures of every match)"
    );
}
