//! File adapter: decimal integers one per line, plus plain-text messages and reports

use num_bigint::BigUint;
use num_traits::Zero;
use std::fs;
use std::path::Path;
use tracing::debug;

use crate::error::{CryptoError, Result};
use crate::types::PrimalityQuery;

/// Parse exactly `count` decimal integers from newline-separated text.
///
/// Lines are trimmed and blank lines ignored.
pub fn parse_integers(content: &str, count: usize) -> Result<Vec<BigUint>> {
    let values = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(parse_integer)
        .collect::<Result<Vec<_>>>()?;

    if values.len() != count {
        return Err(CryptoError::MalformedInput(format!(
            "expected {} numbers, found {}",
            count,
            values.len()
        )));
    }

    Ok(values)
}

/// Read exactly `count` integers from `path`
pub fn read_integers(path: impl AsRef<Path>, count: usize) -> Result<Vec<BigUint>> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)?;

    let values = parse_integers(&content, count).map_err(|e| match e {
        CryptoError::MalformedInput(msg) => {
            CryptoError::MalformedInput(format!("{}: {}", path.display(), msg))
        }
        other => other,
    })?;

    debug!(path = %path.display(), count, "read integers");
    Ok(values)
}

/// Write one decimal value per line, replacing any existing file
pub fn write_integers(path: impl AsRef<Path>, values: &[BigUint]) -> Result<()> {
    let path = path.as_ref();
    let mut content = String::new();
    for value in values {
        content.push_str(&value.to_str_radix(10));
        content.push('\n');
    }

    fs::write(path, content)?;
    debug!(path = %path.display(), count = values.len(), "wrote integers");
    Ok(())
}

/// Parse a primality query: `n`, then optionally `r`, or `r1` and `r2` giving `r = r1*r2 - 1`
pub fn parse_primality_query(content: &str) -> Result<PrimalityQuery> {
    let lines: Vec<&str> = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();

    let n = match lines.first() {
        Some(line) => parse_integer(line)?,
        None => {
            return Err(CryptoError::MalformedInput(
                "missing number n".to_string(),
            ))
        }
    };

    match lines.len() {
        1 => Ok(PrimalityQuery::new(n)),
        2 => Ok(PrimalityQuery::with_exponent(n, parse_integer(lines[1])?)),
        _ => {
            let r1 = parse_integer(lines[1])?;
            let r2 = parse_integer(lines[2])?;
            let product = r1 * r2;
            if product.is_zero() {
                return Err(CryptoError::MalformedInput(
                    "exponent factors must be positive".to_string(),
                ));
            }
            Ok(PrimalityQuery::with_exponent(n, product - 1u32))
        }
    }
}

/// Read a primality query from `path`
pub fn read_primality_query(path: impl AsRef<Path>) -> Result<PrimalityQuery> {
    let content = fs::read_to_string(path.as_ref())?;
    parse_primality_query(&content)
}

/// Read a text message, dropping the trailing line break
pub fn read_text(path: impl AsRef<Path>) -> Result<String> {
    let content = fs::read_to_string(path.as_ref())?;
    Ok(content.trim_end_matches(['\r', '\n']).to_string())
}

/// Write a text report, replacing any existing file
pub fn write_text(path: impl AsRef<Path>, text: &str) -> Result<()> {
    fs::write(path.as_ref(), format!("{}\n", text))?;
    Ok(())
}

/// Plain decimal digits with an optional leading `+`; `parse_bytes` alone would skip `_`
fn parse_integer(line: &str) -> Result<BigUint> {
    let digits = line.strip_prefix('+').unwrap_or(line);
    let invalid = || CryptoError::MalformedInput(format!("invalid number: {:?}", line));

    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }

    BigUint::parse_bytes(digits.as_bytes(), 10).ok_or_else(invalid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_parse_integers() {
        let values = parse_integers("  467 \n\n2\r\n", 2).unwrap();
        assert_eq!(values, vec![BigUint::from(467u32), BigUint::from(2u32)]);
    }

    #[test]
    fn test_parse_integers_count_mismatch() {
        assert!(matches!(
            parse_integers("1\n2\n", 3),
            Err(CryptoError::MalformedInput(_))
        ));
        assert!(matches!(
            parse_integers("1\n2\n3\n", 2),
            Err(CryptoError::MalformedInput(_))
        ));
    }

    #[test]
    fn test_parse_integers_rejects_garbage() {
        assert!(matches!(
            parse_integers("12\nabc\n", 2),
            Err(CryptoError::MalformedInput(_))
        ));
        assert!(matches!(
            parse_integers("-5\n", 1),
            Err(CryptoError::MalformedInput(_))
        ));
        for line in ["4_67", "_467", "+", "++5", "4 67", "0x1d3"] {
            assert!(
                matches!(parse_integers(line, 1), Err(CryptoError::MalformedInput(_))),
                "accepted {:?}",
                line
            );
        }
        assert_eq!(parse_integers("+467\n", 1).unwrap(), vec![BigUint::from(467u32)]);
    }

    #[test]
    fn test_file_roundtrip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("values.txt");
        let big = BigUint::parse_bytes(b"123456789012345678901234567890", 10).unwrap();
        let values = vec![BigUint::from(1u32), big, BigUint::from(0u32)];

        write_integers(&path, &values).unwrap();
        assert_eq!(read_integers(&path, 3).unwrap(), values);

        // Overwrites rather than appends
        write_integers(&path, &values[..1]).unwrap();
        assert_eq!(read_integers(&path, 1).unwrap(), &values[..1]);
    }

    #[test]
    fn test_missing_file() {
        let dir = tempdir().unwrap();
        let result = read_integers(dir.path().join("absent.txt"), 1);
        assert!(matches!(result, Err(CryptoError::Io(_))));
    }

    #[test]
    fn test_primality_query_forms() {
        let query = parse_primality_query("561\n").unwrap();
        assert_eq!(query, PrimalityQuery::new(561u32.into()));

        let query = parse_primality_query("3233\n46800\n").unwrap();
        assert_eq!(query.exponent, Some(46800u32.into()));

        let query = parse_primality_query("3233\n17\n2753\n").unwrap();
        assert_eq!(query.exponent, Some(46800u32.into()));

        assert!(parse_primality_query("\n\n").is_err());
        assert!(parse_primality_query("3233\n0\n2753\n").is_err());
    }

    #[test]
    fn test_text_roundtrip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("message.txt");
        write_text(&path, "hello world").unwrap();
        assert_eq!(read_text(&path).unwrap(), "hello world");
    }
}
