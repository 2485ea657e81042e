//! Masking of personal data in log fields
//!
//! Client CPF and email are never written to logs in clear text. Wrap them
//! in [`MaskedCpf`] / [`MaskedEmail`] when recording them as tracing fields.

use std::fmt;

/// CPF showing only the first and last groups: `123.***.***-09`
#[derive(Clone, Copy, Debug)]
pub struct MaskedCpf<'a>(pub &'a str);

impl fmt::Display for MaskedCpf<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cpf = self.0;
        match (cpf.get(..3), cpf.rsplit_once('-')) {
            (Some(head), Some((_, tail))) if cpf.len() > 6 => {
                write!(f, "{}.***.***-{}", head, tail)
            }
            _ => write!(f, "***"),
        }
    }
}

/// Email keeping the first character of the local part and the domain
///
/// ```
/// use delivery_manager::logging::MaskedEmail;
///
/// assert_eq!(MaskedEmail("maria@example.com").to_string(), "m***@example.com");
/// ```
#[derive(Clone, Copy, Debug)]
pub struct MaskedEmail<'a>(pub &'a str);

impl fmt::Display for MaskedEmail<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.split_once('@') {
            Some((local, domain)) => match local.chars().next() {
                Some(first) => write!(f, "{}***@{}", first, domain),
                None => write!(f, "***@{}", domain),
            },
            None => write!(f, "***"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_masked_cpf() {
        assert_eq!(MaskedCpf("123.456.789-09").to_string(), "123.***.***-09");
        // Too short or malformed values are hidden entirely
        assert_eq!(MaskedCpf("12-3").to_string(), "***");
        assert_eq!(MaskedCpf("12345678909").to_string(), "***");
        assert_eq!(MaskedCpf("").to_string(), "***");
    }

    #[test]
    fn test_masked_email() {
        assert_eq!(MaskedEmail("maria@example.com").to_string(), "m***@example.com");
        assert_eq!(MaskedEmail("@example.com").to_string(), "***@example.com");
        assert_eq!(MaskedEmail("not-an-email").to_string(), "***");
    }

    #[test]
    fn test_masked_values_never_contain_the_middle() {
        let masked = MaskedCpf("987.654.321-00").to_string();
        assert!(!masked.contains("654"));
        assert!(!masked.contains("321"));
    }
}
