/// Clean user-supplied text (quiz titles, question and answer text) with ammonia.
///
/// Harmless inline tags survive; scripts and event handlers are stripped.
/// The result is trimmed, so markup-only input becomes an empty string.
pub fn clean_html(input: &str) -> String {
    ammonia::clean(input).trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_scripts() {
        assert_eq!(clean_html("What is 2+2?<script>alert(1)</script>"), "What is 2+2?");
    }

    #[test]
    fn markup_only_input_becomes_empty() {
        assert_eq!(clean_html("  <script>x</script> "), "");
    }
}
