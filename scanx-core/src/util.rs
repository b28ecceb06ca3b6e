/// Splits off the longest prefix of `input` whose characters satisfy `predicate`.
pub fn consume_while<'s>(input: &mut &'s str, predicate: impl FnMut(&char) -> bool) -> &'s str {
    let len: usize = input
        .chars()
        .take_while(predicate)
        .map(char::len_utf8)
        .sum();
    let result = &input[..len];
    *input = &input[len..];
    result
}

#[macro_export]
macro_rules! truncate_long {
    ($text:expr) => {
        format_args!(
            "{}{}",
            &$text[..$text
                .char_indices()
                .nth(497)
                .map(|(i, _)| i)
                .unwrap_or($text.len())]
                .trim_end(),
            if $text.chars().count() > 497 { "..." } else { "" },
        )
    };
}
