//! Phone number extraction from free-text phone fields.

/// Shortest digit run treated as a complete national number.
const NATIONAL_NUMBER_DIGITS: usize = 9;

/// Extract the phone numbers written in a phone field.
///
/// Digits accumulate across separators until the run is longer than eight
/// digits, so `"351 912 345 678"` stays one number. A short trailing run
/// borrows the head of the previous number (`"912345678/79"` lists
/// `912345678` and `912345679`); a short run on its own is dropped.
/// Numbers with more than nine digits carry an international prefix.
///
/// # Examples
///
/// ```
/// use tabclean_correct::split_phone_numbers;
///
/// assert_eq!(
///     split_phone_numbers("912345678 or 929876543"),
///     vec!["912345678", "929876543"]
/// );
/// assert_eq!(split_phone_numbers("+351 912 345 678"), vec!["+351912345678"]);
/// assert!(split_phone_numbers("ext 12").is_empty());
/// ```
pub fn split_phone_numbers(value: &str) -> Vec<String> {
    let mut runs: Vec<String> = Vec::new();
    let mut digits = String::new();
    for ch in value.chars() {
        if ch.is_ascii_digit() {
            digits.push(ch);
        } else if digits.len() >= NATIONAL_NUMBER_DIGITS {
            runs.push(std::mem::take(&mut digits));
        }
    }
    if !digits.is_empty() {
        runs.push(digits);
    }

    if let Some(last) = runs.pop_if(|last| last.len() < NATIONAL_NUMBER_DIGITS) {
        if let Some(previous) = runs.last() {
            let keep = previous.len().saturating_sub(last.len());
            let completed = format!("{}{last}", &previous[..keep]);
            runs.push(completed);
        }
    }

    runs.into_iter()
        .map(|number| {
            if number.len() > NATIONAL_NUMBER_DIGITS {
                format!("+{number}")
            } else {
                number
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_number_kept() {
        assert_eq!(split_phone_numbers("912345678"), vec!["912345678"]);
        assert_eq!(split_phone_numbers("912 345 678"), vec!["912345678"]);
    }

    #[test]
    fn test_short_runs_accumulate() {
        assert_eq!(split_phone_numbers("21-123-4567"), vec!["211234567"]);
    }

    #[test]
    fn test_eight_digit_run_joins_the_next_number() {
        assert_eq!(
            split_phone_numbers("91234567 or 929876543"),
            vec!["+91234567929876543"]
        );
    }

    #[test]
    fn test_area_code_elision() {
        assert_eq!(
            split_phone_numbers("912345678/79"),
            vec!["912345678", "912345679"]
        );
    }

    #[test]
    fn test_long_numbers_get_prefix() {
        assert_eq!(
            split_phone_numbers("00351912345678; 912345678"),
            vec!["+00351912345678", "912345678"]
        );
    }

    #[test]
    fn test_no_digits() {
        assert!(split_phone_numbers("").is_empty());
        assert!(split_phone_numbers("n/a").is_empty());
    }
}
