//! Cleanup applied to raw model output.

/// Trim every line, drop the ones left empty, and rejoin with `\n`.
///
/// Idempotent: applying it twice gives the same result as applying it once.
pub fn post_process(raw: &str) -> String {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_lines_and_padding_removed() {
        assert_eq!(post_process("a\n\n  b  \n\n"), "a\nb");
    }

    #[test]
    fn test_crlf_and_tabs() {
        assert_eq!(post_process("\t1. 申請\r\n\r\n2. 繳費 \r\n"), "1. 申請\n2. 繳費");
    }

    #[test]
    fn test_empty_and_whitespace_only() {
        assert_eq!(post_process(""), "");
        assert_eq!(post_process(" \n\t\n "), "");
    }

    #[test]
    fn test_idempotent() {
        let samples = [
            "",
            "plain",
            "a\n\n  b  \n\n",
            "  leading\ntrailing  \n\n\n middle \r\n end",
            "\u{3000}全形空白\u{3000}\n\n下一行",
        ];
        for sample in samples {
            let once = post_process(sample);
            assert_eq!(post_process(&once), once, "not idempotent for {:?}", sample);
        }
    }
}
