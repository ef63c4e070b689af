//=========================================================================
// Name Disambiguation
//=========================================================================

/// Returns the first name not present in `names`.
///
/// Tries `base` first, then `"base 1"`, `"base 2"`, ... Trailing
/// whitespace is dropped from the bare `base` only: `"Level "` first tries
/// `"Level"`, and its numbered forms keep the space (`"Level  1"`).
pub fn first_available_name<'a, I>(base: &str, names: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let taken: Vec<&str> = names.into_iter().collect();

    let mut suffix = 0usize;
    loop {
        let candidate = if suffix == 0 {
            base.trim_end().to_string()
        } else {
            format!("{} {}", base, suffix)
        };

        if !taken.contains(&candidate.as_str()) {
            return candidate;
        }
        suffix += 1;
    }
}
