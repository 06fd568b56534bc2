//! Format validation for registration credentials.
//!
//! Full names and passwords accept both the Latin and Ukrainian Cyrillic
//! alphabets. The alphabets are defined as standalone predicates and
//! constants below so that they can be extended without touching the
//! matching logic.

/// The special characters a password may (and must, at least once) contain.
pub const SPECIAL_CHARACTERS: &str = "@#$%^&+=!_.,:;*(){}[]<>?-";

/// The Ukrainian letters that fall outside the basic Cyrillic А-Я/а-я ranges.
const UKRAINIAN_UPPERCASE: [char; 4] = ['Ґ', 'Є', 'І', 'Ї'];
const UKRAINIAN_LOWERCASE: [char; 4] = ['ґ', 'є', 'і', 'ї'];

fn is_uppercase_letter(c: char) -> bool {
    c.is_ascii_uppercase() || ('А'..='Я').contains(&c) || UKRAINIAN_UPPERCASE.contains(&c)
}

fn is_lowercase_letter(c: char) -> bool {
    c.is_ascii_lowercase() || ('а'..='я').contains(&c) || UKRAINIAN_LOWERCASE.contains(&c)
}

fn is_letter(c: char) -> bool {
    is_uppercase_letter(c) || is_lowercase_letter(c)
}

/// Check that `full_name` is exactly three words in the form
/// "Surname Firstname Patronymic".
///
/// Each word must start with one uppercase letter (Latin or Cyrillic,
/// including Ґ, Є, І and Ї) followed by at least one lowercase letter from
/// the same alphabets. The words must be separated by single whitespace
/// characters with no leading or trailing text; the input is not trimmed or
/// normalized before matching.
pub fn is_valid_full_name(full_name: &str) -> bool {
    if full_name.starts_with(char::is_whitespace) || full_name.ends_with(char::is_whitespace) {
        return false;
    }

    let words: Vec<&str> = full_name.split(char::is_whitespace).collect();

    words.len() == 3 && words.iter().all(|word| is_capitalized_word(word))
}

/// A word is one uppercase letter followed by one or more lowercase letters.
fn is_capitalized_word(word: &str) -> bool {
    let mut chars = word.chars();

    match chars.next() {
        Some(first) if is_uppercase_letter(first) => {}
        _ => return false,
    }

    let mut has_lowercase_tail = false;
    for c in chars {
        if !is_lowercase_letter(c) {
            return false;
        }
        has_lowercase_tail = true;
    }

    has_lowercase_tail
}

/// Check that `password` meets the password format policy.
///
/// A strong password:
/// - is at least eight characters long,
/// - only contains Latin or Cyrillic letters (including Ґ, Є, І and Ї),
///   digits and the characters in [SPECIAL_CHARACTERS] (whitespace is not
///   allowed anywhere),
/// - contains at least one letter, at least one digit and at least one
///   special character.
///
/// All conditions must hold at once; a password containing a single
/// character outside the allowed set (e.g. an emoji or a space) is rejected
/// even if the remaining characters satisfy the presence conditions.
pub fn is_strong_password(password: &str) -> bool {
    if password.chars().count() < 8 {
        return false;
    }

    let all_allowed = password.chars().all(is_allowed_password_character);
    let has_letter = password.chars().any(is_letter);
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    let has_special = password.chars().any(|c| SPECIAL_CHARACTERS.contains(c));

    all_allowed && has_letter && has_digit && has_special
}

fn is_allowed_password_character(c: char) -> bool {
    is_letter(c) || c.is_ascii_digit() || SPECIAL_CHARACTERS.contains(c)
}


#[cfg(test)]
mod password_tests {
    use super::is_strong_password;

    #[test]
    fn accepts_letters_digits_and_special() {
        assert!(is_strong_password("Abc12345!"));
    }

    #[test]
    fn accepts_cyrillic_letters() {
        assert!(is_strong_password("Пароль12!"));
    }

    #[test]
    fn rejects_short_password() {
        // Seven characters, otherwise valid.
        assert!(!is_strong_password("short1!"));
    }

    #[test]
    fn rejects_missing_digit_and_special() {
        assert!(!is_strong_password("abcdefgh"));
    }

    #[test]
    fn rejects_missing_special() {
        assert!(!is_strong_password("Password1"));
    }

    #[test]
    fn rejects_missing_digit() {
        assert!(!is_strong_password("Password!"));
    }

    #[test]
    fn rejects_whitespace() {
        assert!(!is_strong_password("Pass 123!"));
    }

    #[test]
    fn rejects_character_outside_allowed_set() {
        // Satisfies the three presence conditions but contains an emoji.
        assert!(!is_strong_password("Abc12345!😀"));
    }

    #[test]
    fn rejects_empty_string() {
        assert!(!is_strong_password(""));
    }
}
