use super::*;

#[test]
fn test_wrap_words() {
    let text = "This is a test string that is too long to fit in a single line.";
    let lines = wrap_words(text, 20);

    assert_eq!(
        lines,
        vec![
            "This is a test",
            "string that is too",
            "long to fit in a",
            "single line."
        ]
    );
}

#[test]
fn test_wrap_words_breaks_long_words() {
    let lines = wrap_words("see https://tasks.local/x", 10);
    assert_eq!(lines, vec!["see", "https://ta", "sks.local/", "x"]);
}

#[test]
fn test_wrap_words_empty() {
    assert_eq!(wrap_words("", 10), vec![""]);
    assert_eq!(wrap_words("a\nb", 10), vec!["a b"]);
}

#[test]
fn test_repeat_from_substactions() {
    assert_eq!(repeat_from_substactions("-", &[5, 2]), "---");
    assert_eq!(repeat_from_substactions("-", &[2, 5]), "");
    assert_eq!(repeat_from_substactions("-", &[]), "");
}

#[test]
fn test_notice_area() {
    let area = notice_area(Rect::new(0, 0, 100, 40), 30);
    assert_eq!(area.width, 30);
    assert_eq!(area.x, 70);
    assert_eq!(area.height, 40);
}
